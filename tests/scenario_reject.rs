//! End-to-end reject scenario: server replies reject `(type=1, reason=1)`
//! for the outstanding invoke-id; the call completes with
//! `RejectUnrecognizedService`.

mod common;

use std::thread;
use std::time::Duration;

use bytes::Bytes;
use mms_client_core::codec::ReadVariableRequest;
use mms_client_core::error::{MmsError, RejectError};
use mms_client_core::transport::Indication;

#[test]
fn reject_maps_to_unrecognized_service() {
    let harness = common::default_harness();
    common::connect(&harness);

    let session = harness.session.clone();
    let reader = thread::spawn(move || {
        session.read_variable(ReadVariableRequest {
            domain_id: "D".into(),
            item_id: "V".into(),
        })
    });

    let sent = harness.handle.sent_rx.recv_timeout(Duration::from_secs(1)).expect("request sent");
    let invoke_id = u32::from_le_bytes(sent.0[0..4].try_into().unwrap());

    let mut buf = vec![0xa4u8];
    buf.extend_from_slice(&invoke_id.to_le_bytes());
    buf.extend_from_slice(&serde_json::to_vec(&(1i32, 1i32)).unwrap());

    harness.handle.inject(Indication::Data(Bytes::from(buf)));

    let result = reader.join().unwrap();
    assert!(matches!(result, Err(MmsError::Reject(RejectError::UnrecognizedService))));
}
