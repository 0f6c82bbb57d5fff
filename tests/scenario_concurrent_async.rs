//! End-to-end concurrent-async scenario: issue 5 async reads back-to-back;
//! server replies in reverse order; all 5 continuations fire with correct
//! invoke-id to value pairing.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use mms_client_core::codec::ReadVariableRequest;
use mms_client_core::transport::Indication;
use mms_client_core::value::MmsValue;

#[test]
fn five_concurrent_async_reads_correlate_by_invoke_id() {
    let harness = common::default_harness();
    common::connect(&harness);

    let results: Arc<Mutex<Vec<(u32, MmsValue)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut invoke_ids = Vec::new();

    for n in 1..=5u32 {
        let results = results.clone();
        let invoke_id = harness
            .session
            .read_variable_async(
                ReadVariableRequest {
                    domain_id: "D".into(),
                    item_id: format!("V{n}"),
                },
                move |id, result| {
                    results.lock().unwrap().push((id, result.expect("decoded value")));
                },
            )
            .expect("async call accepted");
        invoke_ids.push(invoke_id);
    }
    assert_eq!(invoke_ids, vec![1, 2, 3, 4, 5]);

    for &invoke_id in invoke_ids.iter() {
        let sent = harness.handle.sent_rx.recv_timeout(Duration::from_secs(1)).expect("request sent");
        assert_eq!(u32::from_le_bytes(sent.0[0..4].try_into().unwrap()), invoke_id);
    }

    // Server replies in the reverse of request order.
    for &invoke_id in invoke_ids.iter().rev() {
        let mut buf = vec![0xa1u8];
        buf.extend_from_slice(&invoke_id.to_le_bytes());
        buf.extend_from_slice(&serde_json::to_vec(&(invoke_id as i64 * 10)).unwrap());
        harness.handle.inject(Indication::Data(Bytes::from(buf)));
    }

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 5);
    for (invoke_id, value) in results.iter() {
        assert_eq!(*value, MmsValue::Integer(*invoke_id as i64 * 10));
    }
}
