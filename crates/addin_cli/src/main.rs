//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive the full bridge flow against the in-process loopback host.
//! - Keep output deterministic for quick local sanity checks.

use addin_core::Variant;
use addin_ffi::api;

fn main() {
    println!("addin_core ping={}", api::ping());
    println!("addin_core version={}", api::core_version());

    let logging = api::init_default_logging();
    if !logging.is_empty() {
        println!("logging status=skipped detail={logging}");
    }

    let connected = api::component_connect();
    if !connected.ok {
        println!("connect status=error detail={}", connected.message);
        std::process::exit(1);
    }
    println!("connect status=ok protocol={}", api::component_info());

    let name = api::component_register();
    if name.is_empty() {
        println!("register status=error");
        std::process::exit(1);
    }
    println!(
        "register status=ok component={name} methods={} properties={}",
        api::component_method_count(),
        api::component_property_count()
    );

    let method_id = api::component_find_method("МетодНаРусскомЯзыке".to_string());
    println!(
        "lookup name={} id={method_id} params={} returns={}",
        api::component_method_name(method_id, 0).unwrap_or_default(),
        api::component_parameter_count(method_id),
        api::component_has_return_value(method_id)
    );

    let result = api::component_call_as_function(method_id, vec![Variant::Int(41)]);
    if result.ok {
        println!("call status=ok result={:?}", result.value);
    } else {
        println!("call status=error detail={}", result.message);
    }

    // Arity mismatch after registration has to land on the event channel,
    // not in the envelope.
    let contained = api::component_call_as_procedure(method_id, Vec::new());
    let events = api::host_drain_events();
    println!("containment accepted={} events={}", contained.ok, events.len());
    if let Some(event) = events.first() {
        println!("containment source={} message={}", event.source, event.message);
    }

    let property_id = api::component_find_property("LastInput".to_string());
    let stored = api::component_property_value(property_id);
    println!("property id={property_id} value={:?}", stored.value);

    let status = api::host_set_status("smoke finished".to_string());
    if status.ok {
        println!("status text={}", api::host_status_text().unwrap_or_default());
    }

    let done = api::component_disconnect();
    println!("disconnect status={}", if done.ok { "ok" } else { "error" });
}
