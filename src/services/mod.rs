//! # Call Surface
//!
//! One module per service family, each exposing a synchronous variant that
//! decodes and returns the result, and an asynchronous variant that returns
//! the invoke-id immediately and fires a user continuation on the transport
//! reader thread. Every function here is a thin binding over
//! [`Session::call_sync`]/[`Session::call_async`]; none of them touch the
//! state machines, the registry, or the response slot directly.

mod file;
mod journal;
mod nvl;
mod read;
mod write;

use std::sync::Arc;

use bytes::Bytes;

use crate::codec::Decoder;
use crate::error::{CodecError, MmsError};

/// Maps a decode failure the same way every service does: a malformed body
/// is `ParsingResponse`, never a panic.
pub(crate) fn decode_or_parsing_error<T>(result: Result<T, CodecError>) -> Result<T, MmsError> {
    result.map_err(|_| MmsError::ParsingResponse)
}

/// Shared shape of an async continuation body: given the wire result handed
/// back by the registry (raw buffer + body offset, or the already-mapped
/// error), decode with `decode` and forward to `on_complete`. Every
/// `_async` service method wraps this so the decode-or-propagate-error path
/// is written once.
pub(crate) fn complete_async<T: Send + 'static>(
    decoder: Arc<dyn Decoder>,
    decode: impl FnOnce(&dyn Decoder, &Bytes, usize) -> Result<T, CodecError> + Send + 'static,
    on_complete: impl FnOnce(u32, Result<T, MmsError>) + Send + 'static,
) -> Box<dyn FnOnce(u32, Result<(Bytes, usize), MmsError>) + Send> {
    Box::new(move |invoke_id, result| {
        let mapped = match result {
            Ok((buf, offset)) => decode_or_parsing_error(decode(decoder.as_ref(), &buf, offset)),
            Err(e) => Err(e),
        };
        on_complete(invoke_id, mapped);
    })
}
