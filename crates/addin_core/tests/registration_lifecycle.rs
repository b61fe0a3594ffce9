use addin_core::{
    AddIn, AsyncEventSink, BridgeError, CallError, CallResult, CatalogError, Component, ErrorLog,
    ErrorRecord, HostConnection, InterfaceDecl, MemberIndex, MethodDecl, NoticeSeverity,
    PropertyDecl, StatusLine, Variant, PROTOCOL_VERSION, RESULT_OK,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingJournal {
    entries: Mutex<Vec<(String, ErrorRecord)>>,
}

impl RecordingJournal {
    fn entries(&self) -> Vec<(String, ErrorRecord)> {
        self.entries.lock().unwrap().clone()
    }
}

impl ErrorLog for RecordingJournal {
    fn add_error(&self, context: &str, record: &ErrorRecord) {
        self.entries
            .lock()
            .unwrap()
            .push((context.to_string(), record.clone()));
    }
}

struct JournalOnlyConnection {
    journal: Arc<RecordingJournal>,
}

impl HostConnection for JournalOnlyConnection {
    fn async_event_sink(&self) -> Option<Arc<dyn AsyncEventSink>> {
        None
    }

    fn status_line(&self) -> Option<Arc<dyn StatusLine>> {
        None
    }

    fn error_log(&self) -> Option<Arc<dyn ErrorLog>> {
        Some(Arc::clone(&self.journal) as Arc<dyn ErrorLog>)
    }
}

struct Counter {
    value: i32,
    declare_ghost: Arc<AtomicBool>,
}

impl Counter {
    fn new() -> Self {
        Self::with_switch(Arc::new(AtomicBool::new(false)))
    }

    fn with_switch(declare_ghost: Arc<AtomicBool>) -> Self {
        Self {
            value: 0,
            declare_ghost,
        }
    }
}

fn bump(counter: &mut Counter, _args: &[Variant]) -> CallResult<Variant> {
    counter.value += 1;
    Ok(Variant::Int(counter.value))
}

fn read_value(counter: &Counter) -> CallResult<Variant> {
    Ok(Variant::Int(counter.value))
}

fn write_value(counter: &mut Counter, value: &Variant) -> CallResult<()> {
    counter.value = value
        .as_i32()
        .ok_or_else(|| CallError::new("Value expects an integer"))?;
    Ok(())
}

impl Component for Counter {
    fn component_name(&self) -> &str {
        "Counter"
    }

    fn capability_surface(&self) -> Vec<InterfaceDecl> {
        let mut surface = vec![InterfaceDecl::new("Counting")
            .method(MethodDecl::new("Bump", 0, true))
            .property(PropertyDecl::new("Value").with_alias("Значение"))];
        if self.declare_ghost.load(Ordering::SeqCst) {
            // Declared but never implemented; turning this on must fail the
            // next registration attempt.
            surface.push(InterfaceDecl::new("Extras").method(MethodDecl::new("Ghost", 0, false)));
        }
        surface
    }

    fn member_index(&self) -> MemberIndex<Self> {
        MemberIndex::new()
            .method("Bump", bump)
            .property("Value", read_value, write_value)
    }
}

#[test]
fn metadata_queries_demand_registration() {
    let bridge = AddIn::new(Counter::new());

    assert_eq!(bridge.method_count(), Err(BridgeError::NotRegistered));
    assert_eq!(bridge.property_count(), Err(BridgeError::NotRegistered));
    assert_eq!(bridge.find_method("Bump"), Err(BridgeError::NotRegistered));
    assert_eq!(bridge.find_property("Value"), Err(BridgeError::NotRegistered));
    assert_eq!(bridge.method_name(0), Err(BridgeError::NotRegistered));
    assert_eq!(bridge.property_name(0), Err(BridgeError::NotRegistered));
    assert_eq!(bridge.parameter_count(0), Err(BridgeError::NotRegistered));
    assert_eq!(bridge.has_return_value(0), Err(BridgeError::NotRegistered));
    assert_eq!(
        bridge.parameter_default_value(0, 0),
        Err(BridgeError::NotRegistered)
    );
    assert_eq!(
        bridge.is_property_readable(0),
        Err(BridgeError::NotRegistered)
    );
    assert_eq!(
        bridge.is_property_writable(0),
        Err(BridgeError::NotRegistered)
    );
    assert_eq!(bridge.property_value(0), Err(BridgeError::NotRegistered));
}

#[test]
fn dispatch_demands_registration() {
    let mut bridge = AddIn::new(Counter::new());

    assert_eq!(
        bridge.call_as_procedure(0, &[]),
        Err(BridgeError::NotRegistered)
    );
    assert_eq!(
        bridge.call_as_function(0, &[]),
        Err(BridgeError::NotRegistered)
    );
    assert_eq!(
        bridge.set_property_value(0, &Variant::Int(1)),
        Err(BridgeError::NotRegistered)
    );
}

#[test]
fn register_publishes_and_advertises_the_component_name() {
    let mut bridge = AddIn::new(Counter::new());

    let name = bridge
        .register()
        .expect("registration should succeed")
        .to_string();
    assert_eq!(name, "Counter");
    assert!(bridge.is_registered());
    assert_eq!(bridge.method_count().unwrap(), 1);
    assert_eq!(bridge.property_count().unwrap(), 1);
}

#[test]
fn reregistration_keeps_identifiers_stable() {
    let mut bridge = AddIn::new(Counter::new());
    bridge.register().expect("first registration should succeed");
    let bump_id = bridge.find_method("Bump").unwrap();
    let value_id = bridge.find_property("Значение").unwrap();

    bridge.register().expect("re-registration should succeed");
    assert_eq!(bridge.find_method("Bump").unwrap(), bump_id);
    assert_eq!(bridge.find_property("Значение").unwrap(), value_id);
}

#[test]
fn failed_reregistration_keeps_the_published_catalog() {
    let ghost = Arc::new(AtomicBool::new(false));
    let mut bridge = AddIn::new(Counter::with_switch(Arc::clone(&ghost)));
    bridge.register().expect("first registration should succeed");

    ghost.store(true, Ordering::SeqCst);
    let err = bridge
        .register()
        .expect_err("unimplemented member must fail the build");
    assert!(matches!(err, CatalogError::UnresolvedMethod(name) if name == "Ghost"));

    // The earlier catalog still answers and dispatches.
    assert!(bridge.is_registered());
    assert_eq!(bridge.find_method("Bump").unwrap(), Some(0));
    assert_eq!(bridge.method_count().unwrap(), 1);
    assert_eq!(bridge.call_as_function(0, &[]).unwrap(), Variant::Int(1));
}

#[test]
fn component_info_is_the_scaled_protocol_version() {
    let bridge = AddIn::new(Counter::new());

    assert_eq!(bridge.component_info(), 2000);
    assert_eq!(bridge.component_info(), PROTOCOL_VERSION.encode());
}

#[test]
fn init_caches_services_and_journals_missing_ones() {
    let journal = Arc::new(RecordingJournal::default());
    let connection = JournalOnlyConnection {
        journal: Arc::clone(&journal),
    };
    let mut bridge = AddIn::new(Counter::new());

    bridge.init(&connection);
    assert!(bridge.is_connected());
    assert!(bridge.host_services().error_log().is_some());
    assert!(bridge.host_services().event_sink().is_none());
    assert!(bridge.host_services().status_line().is_none());

    let entries = journal.entries();
    assert_eq!(entries.len(), 1);
    let (context, record) = &entries[0];
    assert_eq!(context, "init");
    assert_eq!(record.source, "Counter");
    assert_eq!(record.severity, NoticeSeverity::Info);
    assert_eq!(record.result_code, RESULT_OK);
    assert!(record.description.contains("async_event_sink"));
    assert!(record.description.contains("status_line"));
}

#[test]
fn done_releases_every_cached_handle() {
    let journal = Arc::new(RecordingJournal::default());
    let connection = JournalOnlyConnection {
        journal: Arc::clone(&journal),
    };
    let mut bridge = AddIn::new(Counter::new());
    bridge.init(&connection);
    bridge.register().expect("registration should succeed");

    bridge.done();
    assert!(!bridge.is_connected());
    assert!(bridge.host_services().error_log().is_none());

    // Registration state is independent of the connection.
    assert!(bridge.is_registered());
    assert_eq!(bridge.find_method("Bump").unwrap(), Some(0));
}
