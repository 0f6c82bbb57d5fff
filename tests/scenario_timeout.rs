//! End-to-end timeout scenario: issue `identify` with
//! `request_timeout_ms=100`, server never replies; the call completes with
//! `ServiceTimeout`.

mod common;

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use mms_client_core::codec::ReadVariableRequest;
use mms_client_core::error::MmsError;
use mms_client_core::session::SessionConfig;
use mms_client_core::transport::Indication;

#[test]
fn identify_times_out_without_a_response() {
    let harness = common::build(SessionConfig {
        request_timeout_ms: 100,
        ..SessionConfig::default()
    });
    common::connect(&harness);

    let session = harness.session.clone();
    let caller = thread::spawn(move || session.identify());

    // Let the call register in the outstanding-call table before advancing
    // time past its deadline.
    thread::sleep(Duration::from_millis(20));
    harness.clock.advance(150);

    let result = caller.join().unwrap();
    assert!(matches!(result, Err(MmsError::ServiceTimeout)));
}

/// The async continuation path completes through the timeout sweeper, not
/// through `call_sync`'s own deadline check: an async call's deadline is
/// only ever noticed when `Indication::Tick` drives `sweep_timeouts`.
#[test]
fn async_continuation_times_out_via_tick_driven_sweep() {
    let harness = common::build(SessionConfig {
        request_timeout_ms: 100,
        ..SessionConfig::default()
    });
    common::connect(&harness);

    let (tx, rx) = mpsc::channel();
    harness
        .session
        .read_variable_async(
            ReadVariableRequest {
                domain_id: "D".into(),
                item_id: "V".into(),
            },
            move |_invoke_id, result| {
                let _ = tx.send(result);
            },
        )
        .expect("async call should be accepted");

    // Advance the clock past the deadline, then drive the sweeper. Nothing
    // fires until the `Tick` indication arrives.
    harness.clock.advance(150);
    assert!(rx.try_recv().is_err(), "continuation must not fire before a sweep");

    harness.handle.inject(Indication::Tick);

    let result = rx
        .recv_timeout(Duration::from_secs(1))
        .expect("continuation should fire after the tick-driven sweep");
    assert!(matches!(result, Err(MmsError::ServiceTimeout)));
}
