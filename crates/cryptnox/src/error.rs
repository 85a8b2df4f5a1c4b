//! Error types for Cryptnox operations
//!
//! One variant per failure condition of the secure channel. Fatal errors
//! leave the session cleared; [`Error::AppStatus`] is the only recoverable
//! kind and carries the plaintext body the card returned.

use bytes::Bytes;
use cryptnox_apdu_core::response::error::ResponseError;
use cryptnox_apdu_core::transport::TransportError;
use cryptnox_apdu_core::StatusWord;
use thiserror::Error;

/// Result type for Cryptnox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Cryptnox operations
#[derive(Debug, Error)]
pub enum Error {
    /// No passive target in the reader field
    #[error("No card present")]
    NoCard,

    /// SELECT failed: the target does not host the Cryptnox wallet applet
    #[error("Card is not a supported Cryptnox wallet")]
    CardNotSupported,

    /// Underlying APDU exchange failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response could not be parsed
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Handshake step answered with a status word other than 90 00
    #[error("Unexpected status word {0}")]
    UnexpectedStatus(StatusWord),

    /// Response payload has the wrong length
    #[error("Unexpected response length: expected {expected}, got {actual}")]
    UnexpectedResponseLength {
        /// Expected payload length
        expected: usize,
        /// Actual payload length
        actual: usize,
    },

    /// Command-side data has the wrong length
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required (or largest allowed) length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Card certificate format byte or point marker is wrong
    #[error("Invalid card certificate: {0}")]
    InvalidCertificate(&'static str),

    /// Shared-secret computation failed
    #[error("ECDH key agreement failed")]
    EcdhFailure,

    /// Random generator could not produce the requested bytes
    #[error("Random number generator failure")]
    RngFailure,

    /// Secure-messaging response MAC verification failed
    #[error("Secure messaging MAC mismatch")]
    MacMismatch,

    /// Unpadding error when decrypting
    #[error("Unpadding error when decrypting")]
    Unpad(cipher::block_padding::UnpadError),

    /// Secure command attempted without an open channel
    #[error("Secure channel not open")]
    SessionClosed,

    /// Secure command verified and decrypted, but the card reported an
    /// application-level status. The session stays open.
    #[error("Card returned status {status}")]
    AppStatus {
        /// Status word reported by the card
        status: StatusWord,
        /// Plaintext response body
        body: Bytes,
    },
}

impl Error {
    /// Status word carried by this error, if any
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::UnexpectedStatus(status) | Self::AppStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session survives this error
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::AppStatus { .. })
    }
}
