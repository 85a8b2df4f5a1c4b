//! Transport layer for card communication
//!
//! This module provides the trait implemented by physical card channels
//! (PC/SC readers, NFC frontends such as the PN532, test doubles).

pub mod error;

use std::fmt;

use bytes::Bytes;

pub use error::TransportError;

/// Trait for card transport connections
///
/// Implementors provide raw APDU exchange plus card presence detection and
/// reader reset. The response bytes returned by [`transmit_raw`] include the
/// trailing SW1 SW2 status word.
///
/// [`transmit_raw`]: CardTransport::transmit_raw
pub trait CardTransport: fmt::Debug + Send + Sync {
    /// Send a raw APDU command and get the response, blocking until the
    /// card answers or the exchange fails
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Whether a passive target is currently in the reader field
    fn is_card_present(&self) -> bool;

    /// Reset the transport. Idempotent and safe to call without a card.
    fn reset(&mut self) -> Result<(), TransportError>;
}
