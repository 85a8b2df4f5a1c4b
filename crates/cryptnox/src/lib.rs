//! Host-side secure channel client for Cryptnox smart cards.
//!
//! Establishes an authenticated, encrypted application channel to a
//! Cryptnox wallet applet over any ISO/IEC 7816-4 APDU transport: ephemeral
//! P-256 Diffie-Hellman against the card's certificate, SHA-512 session key
//! derivation, then AES-CBC secure messaging with CBC-MAC integrity and a
//! rolling IV. PIN verification and card-info retrieval ride on the secure
//! channel.
//!
//! ```no_run
//! use cryptnox_wallet::CryptnoxWallet;
//! # fn run(transport: impl cryptnox_apdu_core::CardTransport) -> cryptnox_wallet::Result<()> {
//! let mut wallet = CryptnoxWallet::new(transport);
//! wallet.connect()?;
//! wallet.verify_pin("1234")?;
//! let _info = wallet.get_card_info()?;
//! wallet.disconnect();
//! # Ok(())
//! # }
//! ```

pub mod commands;
mod constants;
mod crypto;
mod error;
mod secure_channel;
mod session;
mod sink;
mod types;
mod wallet;

pub use constants::*;
pub use error::{Error, Result};
pub use session::Session;
pub use sink::{DebugSink, NullSink, TracingSink};
pub use types::CardCertificate;
pub use wallet::{ChannelState, CryptnoxWallet};

pub use cryptnox_apdu_core::{CardTransport, Command, Response, StatusWord, TransportError};
