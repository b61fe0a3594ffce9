//! Logging bootstrap for the bridge engine.
//!
//! # Responsibility
//! - Open the process-wide rolling file log on first request.
//! - Trap panics so a violation of the host boundary contract is recorded.
//!
//! # Invariants
//! - The first accepted settings pin level and directory for the process;
//!   repeat calls with the same settings succeed, different settings are
//!   refused.
//! - Component code signals failure through `CallError` and must not panic
//!   across the host boundary; the trap logs any violation.
//! - Initialization itself never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "addin_bridge";
const ROLL_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROLLED_FILES: usize = 5;
const PANIC_TEXT_CAP: usize = 160;

static ACTIVE: OnceCell<ActiveLog> = OnceCell::new();
static PANIC_TRAP: OnceCell<()> = OnceCell::new();

/// Validated settings a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    level: &'static str,
    directory: PathBuf,
}

impl LogSettings {
    /// Checks the raw level and directory strings from the entry API.
    fn parse(level: &str, directory: &str) -> Result<Self, String> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

        let wanted = level.trim().to_ascii_lowercase();
        let level = LEVELS
            .iter()
            .find(|known| **known == wanted)
            .copied()
            .ok_or_else(|| {
                format!("unknown log level `{wanted}`; valid: trace, debug, info, warn, error")
            })?;

        let trimmed = directory.trim();
        if trimmed.is_empty() {
            return Err("log directory must not be empty".to_string());
        }
        let directory = Path::new(trimmed);
        if directory.is_relative() {
            return Err(format!("log directory must be absolute, got `{trimmed}`"));
        }

        Ok(Self {
            level,
            directory: directory.to_path_buf(),
        })
    }
}

struct ActiveLog {
    settings: LogSettings,
    _handle: LoggerHandle,
}

impl ActiveLog {
    fn open(settings: LogSettings) -> Result<Self, String> {
        std::fs::create_dir_all(&settings.directory).map_err(|err| {
            format!(
                "cannot create log directory `{}`: {err}",
                settings.directory.display()
            )
        })?;

        let handle = Logger::try_with_str(settings.level)
            .map_err(|err| format!("log level `{}` was refused: {err}", settings.level))?
            .log_to_file(
                FileSpec::default()
                    .directory(&settings.directory)
                    .basename(LOG_BASENAME),
            )
            .rotate(
                Criterion::Size(ROLL_AT_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEEP_ROLLED_FILES),
            )
            .append()
            .write_mode(WriteMode::BufferAndFlush)
            // detailed_format prefixes timestamp, level, module and source
            // location to every line.
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("file logger failed to start: {err}"))?;

        arm_panic_trap();
        info!(
            "event=log_open module=logging status=ok level={} dir={} engine_version={} os={}",
            settings.level,
            settings.directory.display(),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );

        Ok(Self {
            settings,
            _handle: handle,
        })
    }

    fn accepts(&self, requested: &LogSettings) -> Result<(), String> {
        if self.settings == *requested {
            return Ok(());
        }
        Err(format!(
            "logging is pinned to level `{}` at `{}`; level `{}` at `{}` was refused",
            self.settings.level,
            self.settings.directory.display(),
            requested.level,
            requested.directory.display()
        ))
    }
}

/// Opens process-wide file logging, once.
///
/// The first call that passes validation decides the level and the directory
/// for the rest of the process. Later calls succeed only when they ask for
/// the same settings.
///
/// # Errors
/// - Unknown `level`, or an empty or relative `log_dir`.
/// - The directory cannot be created, or the file logger fails to start.
/// - Settings differ from the ones already pinned.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogSettings::parse(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| ActiveLog::open(requested.clone()))?;
    active.accepts(&requested)
}

/// Log level used when the embedder does not pick one.
///
/// Debug builds default to `debug`, release builds to `info`.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

// Component thunks report failure as values; a panic here would otherwise
// unwind across the host boundary unrecorded.
fn arm_panic_trap() {
    PANIC_TRAP.get_or_init(|| {
        let earlier = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let origin = match info.location() {
                Some(at) => format!("{}:{}", at.file(), at.line()),
                None => "unknown".to_string(),
            };
            error!(
                "event=boundary_panic module=logging status=error origin={} detail={}",
                origin,
                clip_for_log(&panic_text(info), PANIC_TEXT_CAP)
            );
            earlier(info);
        }));
    });
}

fn panic_text(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        String::from("opaque panic payload")
    }
}

/// Flattens control characters and caps length; panic text can quote
/// host-supplied arguments.
fn clip_for_log(text: &str, cap: usize) -> String {
    let mut kept = String::new();
    let mut chars = text.chars();
    for ch in chars.by_ref().take(cap) {
        kept.push(if ch.is_control() { ' ' } else { ch });
    }
    if chars.next().is_some() {
        kept.push_str("[cut]");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::{clip_for_log, init_logging, LogSettings};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock should be past the unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "addin-bridge-log-{tag}-{}-{stamp}",
            std::process::id()
        ))
    }

    #[test]
    fn settings_fold_level_case_and_whitespace() {
        let settings =
            LogSettings::parse(" INFO ", "/var/log/bridge").expect("settings should parse");
        assert_eq!(settings.level, "info");
        assert_eq!(settings.directory, PathBuf::from("/var/log/bridge"));
    }

    #[test]
    fn settings_refuse_unknown_levels_and_bad_directories() {
        let level_err = LogSettings::parse("verbose", "/var/log/bridge")
            .expect_err("unknown level should be refused");
        assert!(level_err.contains("unknown log level"));

        let dir_err = LogSettings::parse("info", "log/out")
            .expect_err("relative directory should be refused");
        assert!(dir_err.contains("absolute"));

        let empty_err =
            LogSettings::parse("info", "  ").expect_err("blank directory should be refused");
        assert!(empty_err.contains("empty"));
    }

    #[test]
    fn clip_for_log_flattens_control_characters_and_caps_length() {
        let clipped = clip_for_log("first\nsecond\rthird", 9);
        assert_eq!(clipped, "first sec[cut]");

        let untouched = clip_for_log("short", 9);
        assert_eq!(untouched, "short");
    }

    #[test]
    fn first_settings_pin_the_process_and_repeats_are_accepted() {
        let chosen = scratch_dir("pin");
        let chosen_str = chosen
            .to_str()
            .expect("temp path should be UTF-8")
            .to_string();
        let other = scratch_dir("other");
        let other_str = other
            .to_str()
            .expect("temp path should be UTF-8")
            .to_string();

        init_logging("info", &chosen_str).expect("first init should succeed");
        init_logging("INFO", &chosen_str).expect("same settings should be accepted again");

        let level_conflict =
            init_logging("debug", &chosen_str).expect_err("another level should be refused");
        assert!(level_conflict.contains("pinned"));

        let dir_conflict =
            init_logging("info", &other_str).expect_err("another directory should be refused");
        assert!(dir_conflict.contains("pinned"));
    }
}
