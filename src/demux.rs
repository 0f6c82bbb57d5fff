//! # PDU Demultiplexer
//!
//! The callback the transport invokes for every indication.
//! Classifies `Data` by the outer MMS PDU tag and routes to response
//! correlation, unsolicited report handling, conclude handling, or
//! server-initiated file service. Runs on the transport's reader thread and
//! must be reentrancy-safe against user threads posting requests
//! concurrently — it never holds the outstanding-call lock while invoking a
//! continuation or the report handler.

use bytes::Bytes;

use crate::clock::Clock;
use crate::codec::{Decoder, Encoder};
use crate::error::MmsError;
use crate::file_service::{self, Filestore};
use crate::outstanding_calls::{CallKind, OutstandingCallTable};
use crate::report::{self, ReportHandler};
use crate::response_slot::SharedResponseSlot;
use crate::state::{AssociationGuard, AssociationState, ConcludeGuard, ConcludeState, ConnectionGuard, ConnectionState};
use crate::transport::{Indication, Transport};

/// Outer MMS PDU tags dispatched by [`dispatch`].
mod tag {
    pub const UNCONFIRMED: u8 = 0xa3;
    pub const CONFIRMED_ERROR: u8 = 0xa2;
    pub const REJECT: u8 = 0xa4;
    pub const CONFIRMED_RESPONSE: u8 = 0xa1;
    pub const CONFIRMED_REQUEST: u8 = 0xa0;
    pub const CONCLUDE_REQUEST: u8 = 0x8b;
    pub const CONCLUDE_RESPONSE_PLUS: u8 = 0x8c;
    pub const CONCLUDE_RESPONSE_MINUS: u8 = 0x8d;
}

/// Everything the demultiplexer needs to reach, borrowed for the duration of
/// one `on_indication` call. `Session` owns all of these; this struct exists
/// so `demux::dispatch` can be unit-tested without constructing a full
/// `Session`.
pub struct DemuxContext<'a> {
    pub clock: &'a dyn Clock,
    pub encoder: &'a dyn Encoder,
    pub decoder: &'a dyn Decoder,
    pub filestore: Option<&'a dyn Filestore>,
    pub transport: &'a dyn Transport,
    pub outstanding: &'a OutstandingCallTable,
    pub response_slot: &'a SharedResponseSlot,
    pub association: &'a AssociationGuard,
    pub connection: &'a ConnectionGuard,
    pub conclude: &'a ConcludeGuard,
    pub report_handler: Option<&'a ReportHandler>,
    pub connection_lost_handler: Option<&'a (dyn Fn() + Send + Sync)>,
    pub raw_message_observer: Option<&'a (dyn Fn(&[u8]) + Send + Sync)>,
}

/// Entry point invoked by the transport for every indication.
pub fn dispatch(ctx: &DemuxContext<'_>, indication: Indication) {
    match indication {
        Indication::Tick => sweep_timeouts(ctx),
        Indication::Closed => {
            ctx.connection.set(ConnectionState::Idle);
            ctx.association.set(AssociationState::Closed);
            if let Some(handler) = ctx.connection_lost_handler {
                handler();
            }
        }
        Indication::AssociationFailed => {
            ctx.connection.set(ConnectionState::AssociationFailed);
            ctx.association.set(AssociationState::Closed);
        }
        Indication::AssociationSuccess(buf) => handle_initiate_response(ctx, buf),
        Indication::Data(buf) => {
            if let Some(observer) = ctx.raw_message_observer {
                observer(&buf);
            }
            handle_data(ctx, buf);
        }
    }
}

fn sweep_timeouts(ctx: &DemuxContext<'_>) {
    if let Some(expired) = ctx.outstanding.sweep(ctx.clock.now_ms()) {
        match expired.kind {
            CallKind::None => {
                ctx.response_slot
                    .store_error(ctx.clock, expired.invoke_id, MmsError::ServiceTimeout);
            }
            _ => {
                if let Some(continuation) = expired.continuation {
                    continuation(expired.invoke_id, Err(MmsError::ServiceTimeout));
                }
            }
        }
    }
}

fn handle_data(ctx: &DemuxContext<'_>, buf: Bytes) {
    let Some(&outer_tag) = buf.first() else {
        ctx.transport.release_receive_buffer();
        return;
    };

    match outer_tag {
        tag::UNCONFIRMED => {
            match ctx.decoder.decode_information_report(&buf[1..]) {
                Ok(kind) => {
                    if let Some(handler) = ctx.report_handler {
                        report::dispatch(kind, handler);
                    }
                }
                Err(_) => tracing::warn!("failed to parse unconfirmed PDU, dropping"),
            }
            ctx.transport.release_receive_buffer();
        }
        tag::CONFIRMED_ERROR => {
            match ctx.decoder.decode_confirmed_error(&buf[1..]) {
                Ok((invoke_id, service_error)) => {
                    complete_call(ctx, invoke_id, Err(MmsError::Service(service_error)));
                }
                Err(_) => tracing::warn!("failed to parse confirmed-error PDU, dropping"),
            }
            ctx.transport.release_receive_buffer();
        }
        tag::REJECT => {
            match ctx.decoder.decode_reject(&buf[1..]) {
                Ok((invoke_id, reject_error)) => {
                    complete_call(ctx, invoke_id, Err(MmsError::Reject(reject_error)));
                }
                Err(_) => tracing::warn!("failed to parse reject PDU, dropping"),
            }
            ctx.transport.release_receive_buffer();
        }
        tag::CONFIRMED_RESPONSE => {
            match ctx.decoder.decode_invoke_id(&buf[1..]) {
                Ok((invoke_id, body_offset)) => {
                    // `body_offset` is relative to `buf[1..]`; callers index
                    // the stored buffer from its own start, so add back the
                    // outer tag byte we sliced off.
                    complete_call_with_buffer(ctx, invoke_id, buf.clone(), body_offset + 1);
                }
                Err(_) => {
                    tracing::warn!("failed to parse confirmed-response invoke-id, dropping");
                    ctx.transport.release_receive_buffer();
                }
            }
        }
        tag::CONFIRMED_REQUEST => {
            if let Some(filestore) = ctx.filestore {
                handle_server_file_request(ctx, filestore, &buf[1..]);
            }
            ctx.transport.release_receive_buffer();
        }
        tag::CONCLUDE_REQUEST => {
            ctx.conclude.set(ConcludeState::Requested);
            ctx.transport.release_receive_buffer();
        }
        tag::CONCLUDE_RESPONSE_PLUS => {
            ctx.conclude.set(ConcludeState::Accepted);
            ctx.association.set(AssociationState::Closed);
            ctx.transport.close();
            ctx.transport.release_receive_buffer();
        }
        tag::CONCLUDE_RESPONSE_MINUS => {
            ctx.conclude.set(ConcludeState::Rejected);
            ctx.association.set(AssociationState::Closed);
            ctx.transport.release_receive_buffer();
        }
        _ => {
            ctx.transport.release_receive_buffer();
        }
    }
}

/// Invoke-id 0 is a value `connect` can legitimately hand out, so the
/// initiate-response — which carries no invoke-id of its own — is instead
/// keyed to an invoke-id `connect` never allocates: `u32::MAX`.
pub const RESERVED_CONNECT_INVOKE_ID: u32 = u32::MAX;

/// Handles `Indication::AssociationSuccess`: the ISO association step has
/// already succeeded by the time this fires, so the connection transitions
/// to `Associated` unconditionally. A malformed initiate-response payload is
/// logged but does not fail the association — it only means `connect`'s
/// caller gets an empty/unparsed result out of the response slot.
fn handle_initiate_response(ctx: &DemuxContext<'_>, buf: Bytes) {
    if ctx.decoder.decode_initiate_response(&buf).is_err() {
        tracing::warn!("initiate-response payload failed to parse; association still succeeded");
    }
    ctx.connection.set(ConnectionState::Associated);
    // The stored payload is consumed synchronously by `connect` through the
    // same response-slot path used by ordinary sync calls, keyed by the
    // reserved invoke-id since the initiate-response carries none of its own.
    ctx.response_slot.store_success(ctx.clock, RESERVED_CONNECT_INVOKE_ID, buf, 1);
    ctx.transport.release_receive_buffer();
}

fn handle_server_file_request(ctx: &DemuxContext<'_>, filestore: &dyn Filestore, buf: &[u8]) {
    match file_service::handle_request(ctx.encoder, ctx.decoder, filestore, buf) {
        Ok(response) => {
            if let Err(e) = ctx.transport.send_message(Bytes::from(response)) {
                tracing::warn!(?e, "failed to send server-initiated file-service response");
            }
        }
        Err(e) => tracing::warn!(?e, "failed to handle server-initiated file-service request"),
    }
}

/// Looks up and removes the outstanding call for `invoke_id`, then either
/// invokes its continuation or stores the result for a synchronous caller.
/// `kind = None` marks a synchronous call.
fn complete_call(ctx: &DemuxContext<'_>, invoke_id: u32, result: Result<(Bytes, usize), MmsError>) {
    match ctx.outstanding.take(invoke_id) {
        Some((CallKind::None, _)) => match result {
            Ok((buf, offset)) => ctx.response_slot.store_success(ctx.clock, invoke_id, buf, offset),
            Err(e) => ctx.response_slot.store_error(ctx.clock, invoke_id, e),
        },
        Some((_, Some(continuation))) => continuation(invoke_id, result),
        Some((_, None)) => {}
        None => tracing::warn!(invoke_id, "response for unknown invoke-id, dropping"),
    }
}

fn complete_call_with_buffer(ctx: &DemuxContext<'_>, invoke_id: u32, buf: Bytes, body_offset: usize) {
    complete_call(ctx, invoke_id, Ok((buf, body_offset)));
}
