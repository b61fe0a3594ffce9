//! Host notice severities, result codes, and structured error records.
//!
//! Numeric values are fixed by the host protocol and must not be renumbered.

use serde::{Deserialize, Serialize};

/// Outcome code for a successful operation.
pub const RESULT_OK: u32 = 0;
/// Outcome code for a soft negative result.
pub const RESULT_FALSE: u32 = 1;
/// Outcome code for an invalid reference argument.
pub const RESULT_INVALID_POINTER: u32 = 0x8000_4003;
/// Outcome code for a generic failure.
pub const RESULT_FAIL: u32 = 0x8000_4005;
/// Outcome code for an unexpected internal condition.
pub const RESULT_UNEXPECTED: u32 = 0x8000_FFFF;

/// Severity attached to a host notice.
///
/// Wire codes run 1000 through 1009 in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    None,
    Ordinary,
    Attention,
    Important,
    VeryImportant,
    Info,
    Fail,
    MsgboxAttention,
    MsgboxInfo,
    MsgboxFail,
}

impl NoticeSeverity {
    /// Protocol wire code.
    pub fn code(&self) -> u16 {
        match self {
            Self::None => 1000,
            Self::Ordinary => 1001,
            Self::Attention => 1002,
            Self::Important => 1003,
            Self::VeryImportant => 1004,
            Self::Info => 1005,
            Self::Fail => 1006,
            Self::MsgboxAttention => 1007,
            Self::MsgboxInfo => 1008,
            Self::MsgboxFail => 1009,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1000 => Some(Self::None),
            1001 => Some(Self::Ordinary),
            1002 => Some(Self::Attention),
            1003 => Some(Self::Important),
            1004 => Some(Self::VeryImportant),
            1005 => Some(Self::Info),
            1006 => Some(Self::Fail),
            1007 => Some(Self::MsgboxAttention),
            1008 => Some(Self::MsgboxInfo),
            1009 => Some(Self::MsgboxFail),
            _ => None,
        }
    }
}

/// Structured error info delivered to the host error journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Reporting origin, conventionally the component name.
    pub source: String,
    pub description: String,
    pub severity: NoticeSeverity,
    /// Outcome code; `RESULT_OK` for informational records.
    pub result_code: u32,
}

impl ErrorRecord {
    /// Informational record, the shape used for init-time notices.
    pub fn info(source: &str, description: &str) -> Self {
        Self {
            source: source.to_string(),
            description: description.to_string(),
            severity: NoticeSeverity::Info,
            result_code: RESULT_OK,
        }
    }

    /// Failure record carrying the generic failure outcome code.
    pub fn failure(source: &str, description: &str) -> Self {
        Self {
            source: source.to_string(),
            description: description.to_string(),
            severity: NoticeSeverity::Fail,
            result_code: RESULT_FAIL,
        }
    }
}
