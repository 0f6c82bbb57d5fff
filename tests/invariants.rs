//! Boundary behaviors not covered by the literal end-to-end scenarios.

mod common;

use std::thread;
use std::time::Duration;

use mms_client_core::codec::ReadVariableRequest;
use mms_client_core::error::MmsError;
use mms_client_core::outstanding_calls::OUTSTANDING_CALLS;
use mms_client_core::transport::Indication;

fn read_req(n: u32) -> ReadVariableRequest {
    ReadVariableRequest {
        domain_id: "D".into(),
        item_id: format!("V{n}"),
    }
}

#[test]
fn eleventh_concurrent_call_hits_outstanding_call_limit() {
    let harness = common::default_harness();
    common::connect(&harness);

    for n in 0..OUTSTANDING_CALLS as u32 {
        harness
            .session
            .read_variable_async(read_req(n), |_, _| {})
            .expect("call within capacity should be accepted");
    }

    let result = harness.session.read_variable_async(read_req(999), |_, _| {});
    assert!(matches!(result, Err(MmsError::OutstandingCallLimit)));
}

#[test]
fn transport_close_during_pending_sync_call_returns_connection_lost() {
    let harness = common::default_harness();
    common::connect(&harness);

    let session = harness.session.clone();
    let reader = thread::spawn(move || session.read_variable(read_req(0)));

    thread::sleep(Duration::from_millis(20));
    harness.session.on_indication(Indication::Closed);

    let result = reader.join().unwrap();
    assert!(matches!(result, Err(MmsError::ConnectionLost)));
}

#[test]
fn conclude_after_association_closed_fails_without_sending() {
    let harness = common::default_harness();
    // Association never connected: still `Closed`, the initial state.

    let result = harness.session.conclude();
    assert!(matches!(result, Err(MmsError::ConnectionLost)));
    assert!(harness.handle.sent_rx.try_recv().is_err(), "conclude must not send when not connected");
}

#[test]
fn unknown_invoke_id_in_response_is_dropped_without_panic() {
    use bytes::Bytes;

    let harness = common::default_harness();
    common::connect(&harness);

    let mut buf = vec![0xa1u8];
    buf.extend_from_slice(&424242u32.to_le_bytes());
    buf.extend_from_slice(&serde_json::to_vec(&7i64).unwrap());

    // Must not panic, and must not disturb the (empty) outstanding table.
    harness.handle.inject(Indication::Data(Bytes::from(buf)));
    assert!(harness.session.association_state() == mms_client_core::state::AssociationState::Connected);
}
