use cryptnox_apdu_core::Command;
use p256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey};

use crate::constants::{CLA_PROPRIETARY, INS_OPEN_SECURE_CHANNEL};

/// OPEN SECURE CHANNEL carrying the host ephemeral key as an uncompressed
/// SEC1 point (0x04 prefix, 65 bytes).
pub fn with_host_key(public_key: &PublicKey) -> Command {
    Command::new_with_data(
        CLA_PROPRIETARY,
        INS_OPEN_SECURE_CHANNEL,
        0x00,
        0x00,
        public_key.to_encoded_point(false).to_bytes(),
    )
}
