//! Shared test harness: a [`Session`] wired to the loopback transport and
//! the non-BER JSON test codec, driven by a [`FakeClock`] so timeout tests
//! don't race a real wall clock.

use std::sync::Arc;

use mms_client_core::clock::FakeClock;
use mms_client_core::codec::test_codec::JsonTestCodec;
use mms_client_core::session::{Session, SessionConfig};
use mms_client_core::transport::loopback::{LoopbackHandle, LoopbackTransport};

pub struct Harness {
    pub session: Session,
    pub handle: LoopbackHandle,
    pub clock: Arc<FakeClock>,
}

pub fn build(config: SessionConfig) -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let (transport, handle) = LoopbackTransport::new();
    let clock = Arc::new(FakeClock::new());
    let session = Session::with_clock(
        Arc::new(transport),
        Arc::new(JsonTestCodec),
        Arc::new(JsonTestCodec),
        None,
        config,
        clock.clone(),
    );

    Harness { session, handle, clock }
}

pub fn default_harness() -> Harness {
    build(SessionConfig::default())
}

/// Drives `connect` to completion against the loopback transport: spawns
/// the blocking `connect` call, injects a well-formed initiate-response,
/// and waits for the handshake to finish.
pub fn connect(harness: &Harness) {
    use bytes::Bytes;
    use mms_client_core::transport::{Indication, IsoParameters};
    use std::thread;
    use std::time::Duration;

    let params = IsoParameters {
        local_ap_title: None,
        remote_ap_title: None,
        local_selector: vec![],
        remote_selector: vec![],
        remote_hostname: "127.0.0.1".into(),
        remote_port: None,
        tls: None,
    };

    let session = harness.session.clone();
    let connecting = thread::spawn(move || session.connect(&params));

    thread::sleep(Duration::from_millis(20));
    harness.handle.inject(Indication::AssociationSuccess(Bytes::from_static(&[0xa9])));

    connecting.join().unwrap().expect("connect should succeed");
}
