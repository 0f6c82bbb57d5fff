//! End-to-end happy-path read: `read-variable(domain="D", item="V")`;
//! server replies with INTEGER 42; sync return is an MmsValue integer 42.

mod common;

use std::thread;
use std::time::Duration;

use bytes::Bytes;
use mms_client_core::codec::ReadVariableRequest;
use mms_client_core::transport::Indication;
use mms_client_core::value::MmsValue;

#[test]
fn happy_read_returns_decoded_integer() {
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

    // Confirmed-response: outer tag, then `[invoke_id][i64 json]`, matching
    // `JsonTestCodec::decode_read_variable`'s wire shape.
    let mut buf = vec![0xa1u8];
    buf.extend_from_slice(&invoke_id.to_le_bytes());
    buf.extend_from_slice(&serde_json::to_vec(&42i64).unwrap());

    harness.handle.inject(Indication::Data(Bytes::from(buf)));

    let value = reader.join().unwrap().expect("read_variable should succeed");
    assert_eq!(value, MmsValue::Integer(42));
}
