//! Error types specific to APDU responses

/// Error for APDU response parsing
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(&'static str),
}
