//! Debug output sinks for APDU traffic.

use tracing::debug;

/// Line-oriented debug output for APDU traffic.
///
/// Implementations may discard everything; the engine never depends on
/// observable output. Key material, IVs and plaintext PINs are never passed
/// here — only the bytes that travel the wire.
pub trait DebugSink {
    /// Print a plain message line.
    fn println(&mut self, msg: &str);

    /// Print a labelled hex dump.
    fn print_hex(&mut self, label: &str, bytes: &[u8]) {
        self.println(&format!("{}: {}", label, hex::encode(bytes)));
    }
}

/// Sink that discards all output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn println(&mut self, _msg: &str) {}

    fn print_hex(&mut self, _label: &str, _bytes: &[u8]) {}
}

/// Sink that forwards to `tracing` at DEBUG level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn println(&mut self, msg: &str) {
        debug!("{msg}");
    }

    fn print_hex(&mut self, label: &str, bytes: &[u8]) {
        debug!("{label}: {}", hex::encode(bytes));
    }
}
