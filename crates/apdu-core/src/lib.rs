//! Core types and traits for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the foundational types for talking to smart cards
//! with APDU commands and responses according to ISO/IEC 7816-4:
//!
//! - Building and parsing APDU commands and responses
//! - Status word interpretation
//! - A transport trait abstracting the physical card channel
//!
//! Protocol engines (such as the Cryptnox secure channel in
//! `cryptnox-wallet`) build on these types and drive a [`CardTransport`]
//! implementation supplied by the caller.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod response;
pub mod transport;

pub use command::Command;
pub use response::status::StatusWord;
pub use response::Response;
pub use transport::{CardTransport, TransportError};
