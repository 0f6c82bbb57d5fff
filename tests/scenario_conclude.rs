//! End-to-end conclude scenario: after successful connect, `conclude`
//! succeeds, association transitions Connected→Closed, transport close
//! observed.

mod common;

use std::thread;
use std::time::Duration;

use bytes::Bytes;
use mms_client_core::state::AssociationState;
use mms_client_core::transport::Indication;

#[test]
fn orderly_conclude_closes_the_transport() {
    let harness = common::default_harness();
    common::connect(&harness);
    assert_eq!(harness.session.association_state(), AssociationState::Connected);

    let session = harness.session.clone();
    let concluding = thread::spawn(move || session.conclude());

    harness.handle.sent_rx.recv_timeout(Duration::from_secs(1)).expect("conclude-request sent");
    harness.handle.inject(Indication::Data(Bytes::from_static(&[0x8c])));

    let result = concluding.join().unwrap();
    assert!(result.is_ok());
    assert_eq!(harness.session.association_state(), AssociationState::Closed);
    assert!(harness.handle.was_closed());
}
