use cryptnox_apdu_core::Command;

use crate::constants::{CLA_PROPRIETARY, INS_VERIFY_PIN};

/// Plaintext VERIFY PIN command; the secure-messaging wrapper encrypts the
/// digits before anything reaches the wire.
pub fn with_pin(pin: &str) -> Command {
    Command::new_with_data(
        CLA_PROPRIETARY,
        INS_VERIFY_PIN,
        0x00,
        0x00,
        pin.as_bytes().to_vec(),
    )
}
