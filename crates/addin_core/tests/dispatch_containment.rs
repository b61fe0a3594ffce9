use addin_core::{
    AddIn, AsyncEventSink, BridgeError, CallError, CallResult, Component, ErrorLog, HostConnection,
    InterfaceDecl, MemberIndex, MethodDecl, PropertyDecl, StatusLine, Variant,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(String, String, String)>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<(String, String, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl AsyncEventSink for RecordingSink {
    fn external_event(&self, source: &str, message: &str, data: &str) {
        self.events.lock().unwrap().push((
            source.to_string(),
            message.to_string(),
            data.to_string(),
        ));
    }

    fn set_event_buffer_depth(&self, _depth: i64) {}

    fn event_buffer_depth(&self) -> i64 {
        0
    }

    fn clean_buffer(&self) {
        self.events.lock().unwrap().clear();
    }
}

struct SinkOnlyConnection {
    sink: Arc<RecordingSink>,
}

impl HostConnection for SinkOnlyConnection {
    fn async_event_sink(&self) -> Option<Arc<dyn AsyncEventSink>> {
        Some(Arc::clone(&self.sink) as Arc<dyn AsyncEventSink>)
    }

    fn status_line(&self) -> Option<Arc<dyn StatusLine>> {
        None
    }

    fn error_log(&self) -> Option<Arc<dyn ErrorLog>> {
        None
    }
}

struct Volatile;

fn succeed(_volatile: &mut Volatile, _args: &[Variant]) -> CallResult<Variant> {
    Ok(Variant::Int(7))
}

fn explode(_volatile: &mut Volatile, _args: &[Variant]) -> CallResult<Variant> {
    Err(CallError::with_detail(
        "device unavailable",
        "device unavailable; port closed",
    ))
}

fn read_gauge(_volatile: &Volatile) -> CallResult<Variant> {
    Err(CallError::new("gauge is offline"))
}

fn write_gauge(_volatile: &mut Volatile, _value: &Variant) -> CallResult<()> {
    Err(CallError::new("gauge is sealed"))
}

impl Component for Volatile {
    fn component_name(&self) -> &str {
        "Volatile"
    }

    fn capability_surface(&self) -> Vec<InterfaceDecl> {
        vec![InterfaceDecl::new("Hardware")
            .method(MethodDecl::new("Succeed", 0, true))
            .method(MethodDecl::new("Explode", 0, false))
            .property(PropertyDecl::new("Gauge"))]
    }

    fn member_index(&self) -> MemberIndex<Self> {
        MemberIndex::new()
            .method("Succeed", succeed)
            .method("Explode", explode)
            .property("Gauge", read_gauge, write_gauge)
    }
}

struct Pulse {
    ticks: u32,
}

fn tick(pulse: &mut Pulse, _args: &[Variant]) -> CallResult<Variant> {
    pulse.ticks += 1;
    Ok(Variant::Empty)
}

impl Component for Pulse {
    fn component_name(&self) -> &str {
        "Pulse"
    }

    fn capability_surface(&self) -> Vec<InterfaceDecl> {
        vec![InterfaceDecl::new("Timing").method(MethodDecl::new("Tick", 0, false))]
    }

    fn member_index(&self) -> MemberIndex<Self> {
        MemberIndex::new().method("Tick", tick)
    }
}

fn connected() -> (AddIn<Volatile>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let connection = SinkOnlyConnection {
        sink: Arc::clone(&sink),
    };
    let mut bridge = AddIn::new(Volatile);
    bridge.init(&connection);
    bridge.register().expect("registration should succeed");
    (bridge, sink)
}

#[test]
fn successful_dispatch_stays_off_the_event_channel() {
    let (mut bridge, sink) = connected();

    let value = bridge.call_as_function(0, &[]).unwrap();
    assert_eq!(value, Variant::Int(7));
    assert!(sink.events().is_empty());
}

#[test]
fn members_without_a_return_value_dispatch_both_ways() {
    let sink = Arc::new(RecordingSink::default());
    let connection = SinkOnlyConnection {
        sink: Arc::clone(&sink),
    };
    let mut bridge = AddIn::new(Pulse { ticks: 0 });
    bridge.init(&connection);
    bridge.register().expect("registration should succeed");
    assert_eq!(bridge.has_return_value(0).unwrap(), Some(false));

    bridge
        .call_as_procedure(0, &[])
        .expect("procedure call should succeed");
    assert_eq!(bridge.component().ticks, 1);

    let value = bridge
        .call_as_function(0, &[])
        .expect("function call should succeed without a return value");
    assert_eq!(value, Variant::Empty);
    assert_eq!(bridge.component().ticks, 2);
    assert!(sink.events().is_empty());
}

#[test]
fn failing_method_is_contained_with_one_notification() {
    let (mut bridge, sink) = connected();

    let value = bridge
        .call_as_function(1, &[])
        .expect("failure must be contained, not propagated");
    assert_eq!(value, Variant::Empty);

    let events = sink.events();
    assert_eq!(events.len(), 1, "exactly one notification per failure");
    let (source, message, data) = &events[0];
    assert_eq!(source, "Volatile");
    assert_eq!(message, "device unavailable");
    assert_eq!(data, "device unavailable; port closed");
}

#[test]
fn procedure_dispatch_contains_failures_too() {
    let (mut bridge, sink) = connected();

    bridge
        .call_as_procedure(1, &[])
        .expect("failure must be contained, not propagated");
    assert_eq!(sink.events().len(), 1);
}

#[test]
fn arity_mismatch_is_contained() {
    let (mut bridge, sink) = connected();

    let value = bridge
        .call_as_function(0, &[Variant::Int(1)])
        .expect("shape errors are contained like any dispatch failure");
    assert_eq!(value, Variant::Empty);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].1.contains("expects 0 argument(s), got 1"));
}

#[test]
fn unknown_identifier_is_contained() {
    let (mut bridge, sink) = connected();

    let value = bridge
        .call_as_function(99, &[])
        .expect("unknown identifiers are contained after registration");
    assert_eq!(value, Variant::Empty);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].1.contains("unknown method identifier 99"));
}

#[test]
fn containment_survives_a_missing_event_sink() {
    let mut bridge = AddIn::new(Volatile);
    bridge.register().expect("registration should succeed");

    let value = bridge
        .call_as_function(1, &[])
        .expect("containment does not depend on a connected sink");
    assert_eq!(value, Variant::Empty);
}

#[test]
fn property_read_failure_propagates_silently() {
    let (bridge, sink) = connected();

    let err = bridge
        .property_value(2)
        .expect_err("accessor failures must propagate");
    assert!(matches!(err, BridgeError::Accessor(_)));
    assert!(sink.events().is_empty());
}

#[test]
fn property_write_failure_propagates_silently() {
    let (mut bridge, sink) = connected();

    let err = bridge
        .set_property_value(2, &Variant::Int(5))
        .expect_err("accessor failures must propagate");
    assert!(matches!(err, BridgeError::Accessor(_)));
    assert!(sink.events().is_empty());
}

#[test]
fn unknown_property_identifiers_are_typed_errors() {
    let (mut bridge, sink) = connected();

    assert_eq!(
        bridge.property_value(7),
        Err(BridgeError::UnknownProperty(7))
    );
    assert_eq!(
        bridge.set_property_value(7, &Variant::Empty),
        Err(BridgeError::UnknownProperty(7))
    );
    assert!(sink.events().is_empty());
}
