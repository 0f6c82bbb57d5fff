//! # Transport Adapter (consumed)
//!
//! Wraps the underlying ISO client connection (COTP/ACSE/presentation,
//! optionally TLS). This is an external collaborator: the
//! session engine only ever reaches the transport through the [`Transport`]
//! trait and only ever receives wire activity through [`Indication`]. Real
//! COTP/ACSE/TLS plumbing is out of scope for this crate.

use std::time::Duration;

use bytes::{Bytes, BytesMut};

use crate::error::TransportError;

/// ISO/MMS association parameters.
#[derive(Debug, Clone)]
pub struct IsoParameters {
    pub local_ap_title: Option<String>,
    pub remote_ap_title: Option<String>,
    pub local_selector: Vec<u8>,
    pub remote_selector: Vec<u8>,
    pub remote_hostname: String,
    pub remote_port: Option<u16>,
    pub tls: Option<TlsConfiguration>,
}

impl IsoParameters {
    /// Default port is 102, or 3782 when TLS is configured.
    pub fn effective_port(&self) -> u16 {
        self.remote_port.unwrap_or(if self.tls.is_some() { 3782 } else { 102 })
    }
}

/// Placeholder for TLS configuration (out of scope Non-goals;
/// carried only so `ClientConfig` can flip the default port).
#[derive(Debug, Clone)]
pub struct TlsConfiguration {
    pub ca_cert_path: String,
    pub client_cert_path: String,
    pub client_key_path: String,
}

/// Upward indications delivered by the transport.
#[derive(Debug, Clone)]
pub enum Indication {
    Tick,
    Closed,
    AssociationFailed,
    /// The ISO association step succeeded, carrying the MMS initiate-response
    /// payload received inside it. This is the authoritative association
    /// outcome: it fires independently of whether the carried payload itself
    /// turns out to decode.
    AssociationSuccess(Bytes),
    Data(Bytes),
}

/// The transport adapter's consumed interface.
pub trait Transport: Send + Sync {
    /// Registers the upward indication callback. The session installs this
    /// exactly once, before the first `associate`, so that every subsequent
    /// indication from the transport's reader thread reaches
    /// `Session::on_indication`.
    fn set_indication_handler(&self, handler: Box<dyn Fn(Indication) + Send + Sync>);

    /// Initiates the ISO association carrying `payload` (the MMS
    /// initiate-request), bounded by `connect_timeout`.
    fn associate(
        &self,
        params: &IsoParameters,
        payload: Bytes,
        connect_timeout: Duration,
    ) -> Result<(), TransportError>;

    /// Sends a fully-encoded MMS PDU.
    fn send_message(&self, buf: Bytes) -> Result<(), TransportError>;

    /// Orderly transport close.
    fn close(&self);

    /// Abrupt transport abort. Returns `false` on failure, in which case
    /// the caller falls back to `close`.
    fn abort(&self) -> bool;

    /// Acquires a transmit buffer the caller will fill and either hand to
    /// `send_message` or explicitly release.
    fn allocate_transmit_buffer(&self) -> BytesMut;

    /// Releases a transmit buffer without sending (error exit paths).
    fn release_transmit_buffer(&self);

    /// Releases a receive buffer delivered via `Indication::Data`. Must be
    /// called on every exit path the demultiplexer takes for that buffer,
    /// except when ownership is handed to a synchronous caller.
    fn release_receive_buffer(&self);
}

/// In-process transport used by tests and by higher layers that want to
/// drive the session engine without real sockets. Feeds indications through
/// a channel consumed by a dedicated reader thread, matching the
/// transport-owned reader thread model described by the `Transport` trait above.
#[cfg(any(test, feature = "test-support"))]
pub mod loopback {
    use super::*;
    use crossbeam::channel::{unbounded, Receiver, Sender};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Messages sent by the client, observable by a test driver standing in
    /// for the remote server.
    #[derive(Debug, Clone)]
    pub struct SentMessage(pub Bytes);

    struct Inner {
        sent: Sender<SentMessage>,
        closed: AtomicBool,
        aborted: AtomicBool,
        fail_associate: AtomicBool,
        handler: Mutex<Option<Box<dyn Fn(Indication) + Send + Sync>>>,
    }

    /// A loopback [`Transport`] plus the handle a test driver uses to
    /// inspect what the client sent and to inject server indications.
    pub struct LoopbackTransport {
        inner: Arc<Inner>,
    }

    pub struct LoopbackHandle {
        pub sent_rx: Receiver<SentMessage>,
        inner: Arc<Inner>,
    }

    impl LoopbackTransport {
        /// Builds a connected pair: the transport the session owns, and a
        /// handle the test uses to observe sends and inject indications.
        pub fn new() -> (Self, LoopbackHandle) {
            let (sent, sent_rx) = unbounded();
            let inner = Arc::new(Inner {
                sent,
                closed: AtomicBool::new(false),
                aborted: AtomicBool::new(false),
                fail_associate: AtomicBool::new(false),
                handler: Mutex::new(None),
            });
            (
                LoopbackTransport {
                    inner: inner.clone(),
                },
                LoopbackHandle { sent_rx, inner },
            )
        }

        pub fn fail_next_associate(&self) {
            self.inner.fail_associate.store(true, Ordering::SeqCst);
        }

        pub fn was_closed(&self) -> bool {
            self.inner.closed.load(Ordering::SeqCst)
        }

        pub fn was_aborted(&self) -> bool {
            self.inner.aborted.load(Ordering::SeqCst)
        }
    }

    impl LoopbackHandle {
        /// Injects a server-side indication, matching the transport-owned
        /// reader thread model — the session's demultiplexer must be
        /// reentrancy-safe against this.
        pub fn inject(&self, indication: Indication) {
            if let Some(handler) = self.inner.handler.lock().as_ref() {
                handler(indication);
            }
        }

        pub fn was_closed(&self) -> bool {
            self.inner.closed.load(Ordering::SeqCst)
        }

        pub fn was_aborted(&self) -> bool {
            self.inner.aborted.load(Ordering::SeqCst)
        }
    }

    impl Transport for LoopbackTransport {
        fn set_indication_handler(&self, handler: Box<dyn Fn(Indication) + Send + Sync>) {
            *self.inner.handler.lock() = Some(handler);
        }

        fn associate(
            &self,
            _params: &IsoParameters,
            _payload: Bytes,
            _connect_timeout: Duration,
        ) -> Result<(), TransportError> {
            if self.inner.fail_associate.swap(false, Ordering::SeqCst) {
                return Err(TransportError::AssociationFailed);
            }
            Ok(())
        }

        fn send_message(&self, buf: Bytes) -> Result<(), TransportError> {
            self.inner
                .sent
                .send(SentMessage(buf))
                .map_err(|e| TransportError::SendFailed(e.to_string()))
        }

        fn close(&self) {
            self.inner.closed.store(true, Ordering::SeqCst);
        }

        fn abort(&self) -> bool {
            self.inner.aborted.store(true, Ordering::SeqCst);
            true
        }

        fn allocate_transmit_buffer(&self) -> BytesMut {
            BytesMut::with_capacity(256)
        }

        fn release_transmit_buffer(&self) {}

        fn release_receive_buffer(&self) {}
    }
}
