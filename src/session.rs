//! # Session
//!
//! Owns every piece of session state and provides the entry point the
//! transport calls for each indication plus the connect/close/abort/conclude
//! lifecycle operations. The per-service call surface in
//! [`crate::services`] borrows `Session` to run the shared request-path
//! skeleton.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::clock::{poll_interval, Clock, SystemClock};
use crate::codec::{Decoder, Encoder, InitiateParameters};
use crate::demux::{self, DemuxContext, RESERVED_CONNECT_INVOKE_ID};
use crate::error::MmsError;
use crate::file_service::Filestore;
use crate::invoke_id::InvokeIdAllocator;
use crate::outstanding_calls::{AsyncContinuation, CallKind, OutstandingCallTable};
use crate::report::ReportHandler;
use crate::response_slot::SharedResponseSlot;
use crate::state::{AssociationGuard, AssociationState, ConcludeGuard, ConcludeState, ConnectionGuard, ConnectionState};
use crate::transport::{Indication, IsoParameters, Transport};

/// Configuration controlling connect/request deadlines, announced limits,
/// and collaborator wiring.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionConfig {
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_pdu_size: u32,
    pub proposed_max_serv_outstanding_calling: u16,
    pub proposed_max_serv_outstanding_called: u16,
    pub proposed_data_structure_nesting_level: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5_000,
            connect_timeout_ms: 10_000,
            max_pdu_size: 65_000,
            proposed_max_serv_outstanding_calling: 10,
            proposed_max_serv_outstanding_called: 10,
            proposed_data_structure_nesting_level: 24,
        }
    }
}

type ReportCallback = Box<ReportHandler>;
type ConnectionLostCallback = Box<dyn Fn() + Send + Sync>;
type RawMessageObserver = Box<dyn Fn(&[u8]) + Send + Sync>;

/// The MMS client session engine: exactly one session per transport handle.
/// Cheap to clone — internally an `Arc` — so the same session can be shared
/// between the user's calling threads and the transport's reader thread
/// that drives [`Session::on_indication`].
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    encoder: Arc<dyn Encoder>,
    decoder: Arc<dyn Decoder>,
    filestore: Option<Arc<dyn Filestore>>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,

    invoke_ids: InvokeIdAllocator,
    outstanding: OutstandingCallTable,
    response_slot: SharedResponseSlot,

    association: AssociationGuard,
    connection: ConnectionGuard,
    conclude: ConcludeGuard,

    report_handler: Mutex<Option<ReportCallback>>,
    connection_lost_handler: Mutex<Option<ConnectionLostCallback>>,
    raw_message_observer: Mutex<Option<RawMessageObserver>>,
}

impl Session {
    /// Builds a session over `transport`, registering itself as the
    /// transport's indication sink (mirrors the C original's
    /// `IsoClientConnection_create(callback, parameter)` wiring).
    pub fn new(
        transport: Arc<dyn Transport>,
        encoder: Arc<dyn Encoder>,
        decoder: Arc<dyn Decoder>,
        filestore: Option<Arc<dyn Filestore>>,
        config: SessionConfig,
    ) -> Self {
        Self::with_clock(transport, encoder, decoder, filestore, config, Arc::new(SystemClock::new()))
    }

    /// As [`Self::new`] but with an injectable clock, used by tests that
    /// need deterministic timeout behavior.
    pub fn with_clock(
        transport: Arc<dyn Transport>,
        encoder: Arc<dyn Encoder>,
        decoder: Arc<dyn Decoder>,
        filestore: Option<Arc<dyn Filestore>>,
        config: SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = Session {
            inner: Arc::new(Inner {
                transport: transport.clone(),
                encoder,
                decoder,
                filestore,
                clock,
                config,
                invoke_ids: InvokeIdAllocator::new(),
                outstanding: OutstandingCallTable::new(),
                response_slot: SharedResponseSlot::new(),
                association: AssociationGuard::default(),
                connection: ConnectionGuard::default(),
                conclude: ConcludeGuard::default(),
                report_handler: Mutex::new(None),
                connection_lost_handler: Mutex::new(None),
                raw_message_observer: Mutex::new(None),
            }),
        };

        let dispatch_session = session.clone();
        transport.set_indication_handler(Box::new(move |indication| {
            dispatch_session.on_indication(indication);
        }));

        session
    }

    pub fn set_report_handler(&self, handler: impl Fn(crate::report::ReportEvent) + Send + Sync + 'static) {
        *self.inner.report_handler.lock() = Some(Box::new(handler));
    }

    pub fn set_connection_lost_handler(&self, handler: impl Fn() + Send + Sync + 'static) {
        *self.inner.connection_lost_handler.lock() = Some(Box::new(handler));
    }

    pub fn set_raw_message_observer(&self, observer: impl Fn(&[u8]) + Send + Sync + 'static) {
        *self.inner.raw_message_observer.lock() = Some(Box::new(observer));
    }

    pub fn association_state(&self) -> AssociationState {
        self.inner.association.get()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub(crate) fn encoder(&self) -> &dyn Encoder {
        self.inner.encoder.as_ref()
    }

    pub(crate) fn decoder(&self) -> &dyn Decoder {
        self.inner.decoder.as_ref()
    }

    /// Clones the decoder handle for use inside an async continuation, which
    /// must be `'static` and so cannot borrow `&self` — continuations fire
    /// on the transport reader thread, not the caller's.
    pub(crate) fn decoder_arc(&self) -> Arc<dyn Decoder> {
        self.inner.decoder.clone()
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    pub(crate) fn invoke_ids(&self) -> &InvokeIdAllocator {
        &self.inner.invoke_ids
    }

    pub(crate) fn outstanding(&self) -> &OutstandingCallTable {
        &self.inner.outstanding
    }

    pub(crate) fn response_slot(&self) -> &SharedResponseSlot {
        &self.inner.response_slot
    }

    /// Runs `encode` into a transmit buffer borrowed from the transport.
    /// On success the buffer is handed back frozen, ready for
    /// `Transport::send_message`; on encode failure the buffer is released
    /// here since no send will follow. Callers that decide not to send a
    /// successfully-encoded payload after all (outstanding-table full, a
    /// later poll failure) must release it themselves.
    fn encode_for_transmit(
        &self,
        encode: impl FnOnce(&dyn Encoder) -> Result<Vec<u8>, crate::error::CodecError>,
    ) -> Result<Bytes, MmsError> {
        let mut buf = self.inner.transport.allocate_transmit_buffer();
        match encode(self.inner.encoder.as_ref()) {
            Ok(encoded) => {
                buf.extend_from_slice(&encoded);
                Ok(buf.freeze())
            }
            Err(e) => {
                self.inner.transport.release_transmit_buffer();
                Err(MmsError::from(e))
            }
        }
    }

    /// The entry point the transport invokes for every indication. Building
    /// a fresh [`DemuxContext`] per call keeps the borrow scoped to this
    /// invocation instead of holding any lock across it.
    pub fn on_indication(&self, indication: Indication) {
        let report_guard = self.inner.report_handler.lock();
        let report_handler = report_guard.as_deref();
        let lost_guard = self.inner.connection_lost_handler.lock();
        let connection_lost_handler = lost_guard.as_deref();
        let observer_guard = self.inner.raw_message_observer.lock();
        let raw_message_observer = observer_guard.as_deref();

        let ctx = DemuxContext {
            clock: self.inner.clock.as_ref(),
            encoder: self.inner.encoder.as_ref(),
            decoder: self.inner.decoder.as_ref(),
            filestore: self.inner.filestore.as_deref(),
            transport: self.inner.transport.as_ref(),
            outstanding: &self.inner.outstanding,
            response_slot: &self.inner.response_slot,
            association: &self.inner.association,
            connection: &self.inner.connection,
            conclude: &self.inner.conclude,
            report_handler,
            connection_lost_handler,
            raw_message_observer,
        };
        demux::dispatch(&ctx, indication);
    }

    /// Drives the initiate handshake to completion.
    pub fn connect(&self, params: &IsoParameters) -> Result<(), MmsError> {
        let initiate = InitiateParameters {
            local_detail_calling: self.inner.config.max_pdu_size,
            proposed_max_serv_outstanding_calling: self.inner.config.proposed_max_serv_outstanding_calling,
            proposed_max_serv_outstanding_called: self.inner.config.proposed_max_serv_outstanding_called,
            proposed_data_structure_nesting_level: self.inner.config.proposed_data_structure_nesting_level,
        };
        let payload = self.encode_for_transmit(|enc| enc.encode_initiate_request(&initiate))?;

        self.inner.connection.set(ConnectionState::Waiting);

        let connect_timeout = Duration::from_millis(self.inner.config.connect_timeout_ms);
        if self
            .inner
            .transport
            .associate(params, payload, connect_timeout)
            .is_err()
        {
            self.inner.connection.set(ConnectionState::AssociationFailed);
            self.inner.association.set(AssociationState::Closed);
            return Err(MmsError::ConnectionRejected);
        }

        let deadline_ms = self.inner.clock.now_ms() + self.inner.config.connect_timeout_ms;
        loop {
            match self.inner.connection.get() {
                ConnectionState::Waiting => {
                    if self.inner.clock.now_ms() > deadline_ms {
                        self.inner.connection.set(ConnectionState::AssociationFailed);
                        self.inner.association.set(AssociationState::Closed);
                        return Err(MmsError::ConnectionRejected);
                    }
                    self.inner.clock.sleep(poll_interval::CONNECT);
                }
                ConnectionState::Associated => break,
                ConnectionState::AssociationFailed | ConnectionState::Idle => {
                    self.inner.association.set(AssociationState::Closed);
                    return Err(MmsError::ConnectionRejected);
                }
            }
        }

        // Consume and release the stored initiate-response payload, mirroring
        // the synchronous call path's own drain/take discipline.
        let _ = self.inner.response_slot.take_if(RESERVED_CONNECT_INVOKE_ID);
        self.inner.connection.set(ConnectionState::Idle);
        self.inner.association.set(AssociationState::Connected);
        Ok(())
    }

    /// Orderly close: clears the connection-lost handler first so the
    /// transport's subsequent `Closed` indication is not double-reported to
    /// the user.
    pub fn close(&self) {
        *self.inner.connection_lost_handler.lock() = None;
        if self.inner.association.get() == AssociationState::Connected {
            self.inner.transport.close();
        }
        self.inner.association.set(AssociationState::Closed);
    }

    /// Abrupt close: falls back to `close` if `abort` fails, and in that
    /// case surfaces `ServiceTimeout` to the caller.
    pub fn abort(&self) -> Result<(), MmsError> {
        *self.inner.connection_lost_handler.lock() = None;
        if self.inner.transport.abort() {
            self.inner.association.set(AssociationState::Closed);
            Ok(())
        } else {
            if self.inner.association.get() == AssociationState::Connected {
                self.inner.transport.close();
            }
            self.inner.association.set(AssociationState::Closed);
            Err(MmsError::ServiceTimeout)
        }
    }

    /// Orderly conclude handshake.
    pub fn conclude(&self) -> Result<(), MmsError> {
        if self.inner.association.get() != AssociationState::Connected {
            return Err(MmsError::ConnectionLost);
        }

        let invoke_id = self.inner.invoke_ids.next();
        let payload = self.encode_for_transmit(|enc| enc.encode_conclude_request(invoke_id))?;

        self.inner.conclude.set(ConcludeState::Requested);
        self.inner
            .transport
            .send_message(payload)
            .map_err(|_| MmsError::ConnectionLost)?;

        let deadline_ms = self.inner.clock.now_ms() + self.inner.config.request_timeout_ms;
        loop {
            match self.inner.conclude.get() {
                ConcludeState::Requested => {
                    if self.inner.association.get() != AssociationState::Connected {
                        return Err(MmsError::ConnectionLost);
                    }
                    if self.inner.clock.now_ms() > deadline_ms {
                        return Err(MmsError::ServiceTimeout);
                    }
                    self.inner.clock.sleep(poll_interval::CONCLUDE);
                }
                ConcludeState::Accepted => return Ok(()),
                ConcludeState::Rejected => return Err(MmsError::ConcludeRejected),
                ConcludeState::Idle => return Err(MmsError::ConnectionLost),
            }
        }
    }

    /// Runs the shared request-path skeleton and blocks until the response
    /// arrives, the deadline expires, or the association closes. Used by
    /// every synchronous service in [`crate::services`].
    pub(crate) fn call_sync(
        &self,
        encode: impl FnOnce(&dyn Encoder, u32) -> Result<Vec<u8>, crate::error::CodecError>,
    ) -> Result<(Bytes, usize), MmsError> {
        let invoke_id = self.begin_call(CallKind::None, None, encode)?;

        let deadline_ms = self.inner.clock.now_ms() + self.inner.config.request_timeout_ms;
        loop {
            if let Some(result) = self.inner.response_slot.take_if(invoke_id) {
                self.inner.outstanding.remove(invoke_id);
                return result;
            }
            if self.inner.association.get() != AssociationState::Connected {
                self.inner.outstanding.remove(invoke_id);
                return Err(MmsError::ConnectionLost);
            }
            if self.inner.clock.now_ms() > deadline_ms {
                self.inner.outstanding.remove(invoke_id);
                return Err(MmsError::ServiceTimeout);
            }
            self.inner.clock.sleep(poll_interval::SYNC_RESPONSE);
        }
    }

    /// As [`Self::call_sync`] but returns immediately with the invoke-id;
    /// `continuation` fires on the transport reader thread exactly once.
    pub(crate) fn call_async(
        &self,
        kind: CallKind,
        encode: impl FnOnce(&dyn Encoder, u32) -> Result<Vec<u8>, crate::error::CodecError>,
        continuation: AsyncContinuation,
    ) -> Result<u32, MmsError> {
        self.begin_call(kind, Some(continuation), encode)
    }

    fn begin_call(
        &self,
        kind: CallKind,
        continuation: Option<AsyncContinuation>,
        encode: impl FnOnce(&dyn Encoder, u32) -> Result<Vec<u8>, crate::error::CodecError>,
    ) -> Result<u32, MmsError> {
        if self.inner.association.get() != AssociationState::Connected {
            return Err(MmsError::ConnectionLost);
        }

        let invoke_id = self.inner.invoke_ids.next();
        let payload = self.encode_for_transmit(|enc| encode(enc, invoke_id))?;

        let now_ms = self.inner.clock.now_ms();
        if !self.inner.outstanding.insert(
            invoke_id,
            kind,
            continuation,
            now_ms,
            self.inner.config.request_timeout_ms,
        ) {
            self.inner.transport.release_transmit_buffer();
            return Err(MmsError::OutstandingCallLimit);
        }

        if let Err(e) = self.inner.transport.send_message(payload) {
            self.inner.outstanding.remove(invoke_id);
            return Err(MmsError::Other(e.to_string()));
        }

        Ok(invoke_id)
    }
}
