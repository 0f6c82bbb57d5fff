//! End-to-end service-error scenario: server replies confirmed-error with
//! class=7, code=2; the call completes with `AccessObjectNonExistent`.

mod common;

use std::thread;
use std::time::Duration;

use bytes::Bytes;
use mms_client_core::codec::ReadVariableRequest;
use mms_client_core::error::{AccessError, MmsError, ServiceError};
use mms_client_core::transport::Indication;

#[test]
fn confirmed_error_maps_to_access_non_existent() {
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

    let mut buf = vec![0xa2u8];
    buf.extend_from_slice(&invoke_id.to_le_bytes());
    buf.extend_from_slice(&serde_json::to_vec(&(7i32, 2i32)).unwrap());

    harness.handle.inject(Indication::Data(Bytes::from(buf)));

    let result = reader.join().unwrap();
    assert!(matches!(
        result,
        Err(MmsError::Service(ServiceError::Access(AccessError::NonExistent)))
    ));
}
