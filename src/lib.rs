//! # MMS Client Session Engine
//!
//! An MMS (Manufacturing Message Specification, ISO 9506) client session
//! engine for IEC 61850 substation automation clients. This crate
//! multiplexes user-issued MMS services — variable read/write, named-
//! variable-list management, directory browsing, file transfer, journal
//! reads, identify/status, and orderly conclude — over a single long-lived
//! ISO/OSI association provided by an underlying transport.
//!
//! The engine guarantees correct invoke-id correlation under concurrent
//! user calls, orderly teardown, server-initiated interleaving (obtain-file),
//! and recovery from transport loss. BER/ASN.1 encoding, the ISO transport
//! stack, the MMS value model, and the local filestore are external
//! collaborators reached only through the [`codec`], [`transport`], and
//! [`file_service`] trait boundaries — this crate ships no real ASN.1 codec
//! or socket transport, only the session engine and a non-production
//! loopback/JSON stand-in used by its own tests.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mms_client_core::session::{Session, SessionConfig};
//! use mms_client_core::transport::IsoParameters;
//!
//! # fn build_transport() -> Arc<dyn mms_client_core::transport::Transport> { unimplemented!() }
//! # fn build_codec() -> (Arc<dyn mms_client_core::codec::Encoder>, Arc<dyn mms_client_core::codec::Decoder>) { unimplemented!() }
//! let transport = build_transport();
//! let (encoder, decoder) = build_codec();
//! let session = Session::new(transport, encoder, decoder, None, SessionConfig::default());
//!
//! let params = IsoParameters {
//! local_ap_title: None,
//! remote_ap_title: None,
//! local_selector: vec![],
//! remote_selector: vec![],
//! remote_hostname: "10.0.0.1".into(),
//! remote_port: None,
//! tls: None,
//! };
//! session.connect(&params)?;
//! # Ok::<(), mms_client_core::error::MmsError>(())
//! ```

pub mod clock;
pub mod codec;
pub mod demux;
pub mod error;
pub mod file_service;
pub mod invoke_id;
pub mod outstanding_calls;
pub mod report;
pub mod response_slot;
pub mod services;
pub mod session;
pub mod state;
pub mod transport;
pub mod value;

pub use error::MmsError;
pub use session::{Session, SessionConfig};

/// The current version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build-time and protocol defaults.
pub mod defaults {
    /// Per-call response deadline, unless overridden by [`crate::session::SessionConfig`].
    pub const REQUEST_TIMEOUT_MS: u64 = 5_000;

    /// Initiate handshake deadline.
    pub const CONNECT_TIMEOUT_MS: u64 = 10_000;

    /// ISO/MMS well-known port without TLS.
    pub const ISO_PORT: u16 = 102;

    /// ISO/MMS well-known port with TLS configured.
    pub const ISO_PORT_TLS: u16 = 3782;

    /// Fixed outstanding-call table capacity.
    pub const OUTSTANDING_CALLS: usize = crate::outstanding_calls::OUTSTANDING_CALLS;

    /// Build-time maximum local detail (max-PDU) announced in initiate when
    /// `SessionConfig::max_pdu_size` is left at its default.
    pub const MAX_PDU_SIZE: u32 = 65_000;
}
