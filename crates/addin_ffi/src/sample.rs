//! Built-in sample component.
//!
//! Exercised by the smoke binary and the end-to-end tests: one bilingual
//! method and one read/write property over a single capability interface.

use addin_core::{
    CallError, CallResult, Component, InterfaceDecl, MemberIndex, MethodDecl, PropertyDecl,
    Variant,
};

/// Name the sample advertises at registration.
pub const SAMPLE_COMPONENT_NAME: &str = "SampleComponent";

/// Reference component: `Procedure` takes one integer and returns it
/// incremented; `LastInput` exposes the most recent accepted argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleComponent {
    last_input: i32,
}

impl SampleComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_input(&self) -> i32 {
        self.last_input
    }

    fn procedure(&mut self, args: &[Variant]) -> CallResult<Variant> {
        let input = args
            .first()
            .and_then(Variant::as_i32)
            .ok_or_else(|| CallError::new("Procedure expects one integer argument"))?;
        self.last_input = input;
        Ok(Variant::Int(input + 1))
    }

    fn read_last_input(&self) -> CallResult<Variant> {
        Ok(Variant::Int(self.last_input))
    }

    fn write_last_input(&mut self, value: &Variant) -> CallResult<()> {
        self.last_input = value.as_i32().ok_or_else(|| {
            CallError::new(format!(
                "LastInput accepts integers, got {}",
                value.type_name()
            ))
        })?;
        Ok(())
    }
}

impl Component for SampleComponent {
    fn component_name(&self) -> &str {
        SAMPLE_COMPONENT_NAME
    }

    fn capability_surface(&self) -> Vec<InterfaceDecl> {
        vec![InterfaceDecl::new("SampleCapability")
            .method(MethodDecl::new("Procedure", 1, true).with_alias("МетодНаРусскомЯзыке"))
            .property(PropertyDecl::new("LastInput").with_alias("ПоследнееЗначение"))]
    }

    fn member_index(&self) -> MemberIndex<Self> {
        MemberIndex::new()
            .method("Procedure", |component: &mut Self, args| component.procedure(args))
            .property(
                "LastInput",
                |component| component.read_last_input(),
                |component, value| component.write_last_input(value),
            )
    }
}
