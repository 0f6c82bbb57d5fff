//! # Error Taxonomy
//!
//! This module defines the closed set of errors the session engine can
//! surface to a caller, plus the two narrower error types used at the
//! transport and codec collaborator boundaries. Wire-level reject codes and
//! service-error class/code pairs are mapped into [`MmsError`] by
//! [`crate::demux`]; nothing else in the engine invents new error variants.

use thiserror::Error;

/// Reject PDU sub-reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectError {
    #[error("unrecognized service")]
    UnrecognizedService,
    #[error("unknown PDU type")]
    UnknownPduType,
    #[error("request has invalid argument")]
    RequestInvalidArgument,
    #[error("invalid PDU")]
    InvalidPdu,
    #[error("reject (type={0}, reason={1})")]
    Other(i32, i32),
}

/// `definition` service-error class sub-codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("object undefined")]
    ObjectUndefined,
    #[error("invalid address")]
    InvalidAddress,
    #[error("type unsupported")]
    TypeUnsupported,
    #[error("type inconsistent")]
    TypeInconsistent,
    #[error("object exists")]
    ObjectExists,
    #[error("object attribute inconsistent")]
    ObjectAttributeInconsistent,
    #[error("other definition error")]
    Other,
}

/// `access` service-error class sub-codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("object access unsupported")]
    AccessUnsupported,
    #[error("object non-existent")]
    NonExistent,
    #[error("object access denied")]
    AccessDenied,
    #[error("object invalidated")]
    Invalidated,
    #[error("other access error")]
    Other,
}

/// `file` service-error class sub-codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("ambiguous filename")]
    AmbiguousName,
    #[error("file busy")]
    Busy,
    #[error("filename syntax error")]
    SyntaxError,
    #[error("content type invalid")]
    ContentTypeInvalid,
    #[error("position invalid")]
    PositionInvalid,
    #[error("file access denied")]
    AccessDenied,
    #[error("file non-existent")]
    NonExistent,
    #[error("duplicate filename")]
    DuplicateFilename,
    #[error("insufficient space in filestore")]
    InsufficientSpace,
    #[error("other file error")]
    Other,
}

/// Confirmed-error service-error class, mapped from `(class, code)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("vmd-state error")]
    VmdStateOther,
    #[error("application-reference error")]
    ApplicationReferenceOther,
    #[error("definition error: {0}")]
    Definition(DefinitionError),
    #[error("resource error")]
    ResourceOther,
    #[error("service error")]
    ServiceOther,
    #[error("service-preempt error")]
    ServicePreemptOther,
    #[error("time-resolution error")]
    TimeResolutionOther,
    #[error("access error: {0}")]
    Access(AccessError),
    #[error("file error: {0}")]
    File(FileError),
    #[error("other service error (class={0}, code={1})")]
    Other(i32, i32),
}

/// The complete client-visible error taxonomy.
#[derive(Debug, Error)]
pub enum MmsError {
    #[error("no error")]
    None,
    #[error("connection lost")]
    ConnectionLost,
    #[error("connection rejected")]
    ConnectionRejected,
    #[error("service timeout")]
    ServiceTimeout,
    #[error("outstanding call limit reached")]
    OutstandingCallLimit,
    #[error("failed to parse response")]
    ParsingResponse,
    #[error("conclude rejected")]
    ConcludeRejected,
    #[error("reject: {0}")]
    Reject(#[from] RejectError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("invalid arguments")]
    InvalidArguments,
    #[error("{0}")]
    Other(String),
}

impl MmsError {
    /// Maps a reject `(type, reason)` pair
    pub fn from_reject(reject_type: i32, reject_reason: i32) -> Self {
        let reject = match (reject_type, reject_reason) {
            (1, 1) => RejectError::UnrecognizedService,
            (5, 0) => RejectError::UnknownPduType,
            (1, 4) => RejectError::RequestInvalidArgument,
            (5, 1) => RejectError::InvalidPdu,
            (t, r) => RejectError::Other(t, r),
        };
        MmsError::Reject(reject)
    }

    /// Maps a confirmed-error `(class, code)` pair
    pub fn from_service_error(class: i32, code: i32) -> Self {
        let service = match class {
            0 => ServiceError::VmdStateOther,
            1 => ServiceError::ApplicationReferenceOther,
            2 => ServiceError::Definition(match code {
                    1 => DefinitionError::ObjectUndefined,
                    2 => DefinitionError::InvalidAddress,
                    3 => DefinitionError::TypeUnsupported,
                    4 => DefinitionError::TypeInconsistent,
                    5 => DefinitionError::ObjectExists,
                    6 => DefinitionError::ObjectAttributeInconsistent,
                    _ => DefinitionError::Other,
                }),
            3 => ServiceError::ResourceOther,
            4 => ServiceError::ServiceOther,
            5 => ServiceError::ServicePreemptOther,
            6 => ServiceError::TimeResolutionOther,
            7 => ServiceError::Access(match code {
                    1 => AccessError::AccessUnsupported,
                    2 => AccessError::NonExistent,
                    3 => AccessError::AccessDenied,
                    4 => AccessError::Invalidated,
                    _ => AccessError::Other,
                }),
            11 => ServiceError::File(match code {
                    1 => FileError::AmbiguousName,
                    2 => FileError::Busy,
                    3 => FileError::SyntaxError,
                    4 => FileError::ContentTypeInvalid,
                    5 => FileError::PositionInvalid,
                    6 => FileError::AccessDenied,
                    7 => FileError::NonExistent,
                    8 => FileError::DuplicateFilename,
                    9 => FileError::InsufficientSpace,
                    _ => FileError::Other,
                }),
            (c) => ServiceError::Other(c, code),
        };
        MmsError::Service(service)
    }
}

/// Errors surfaced by the transport collaborator ("Transport adapter").
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("not connected")]
    NotConnected,
    #[error("association failed")]
    AssociationFailed,
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("abort failed: {0}")]
    AbortFailed(String),
}

/// Errors surfaced by the encoder/decoder collaborator.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("buffer truncated")]
    Truncated,
    #[error("unexpected tag {0:#x}")]
    UnexpectedTag(u8),
    #[error("invalid UTF-8 in name")]
    InvalidUtf8,
    #[error("malformed: {0}")]
    Malformed(String),
}

impl From<CodecError> for MmsError {
    fn from(_: CodecError) -> Self {
        MmsError::ParsingResponse
    }
}
