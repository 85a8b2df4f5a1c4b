use bytes::BytesMut;
use cryptnox_apdu_core::Command;

use crate::constants::{CLA_PROPRIETARY, INS_MUTUALLY_AUTHENTICATE, MAC_LEN};

/// MUTUALLY AUTHENTICATE carrying the host MAC followed by the encrypted
/// host random.
pub fn with_cryptogram(mac: &[u8; MAC_LEN], ciphertext: &[u8]) -> Command {
    let mut data = BytesMut::with_capacity(MAC_LEN + ciphertext.len());
    data.extend_from_slice(mac);
    data.extend_from_slice(ciphertext);
    Command::new_with_data(
        CLA_PROPRIETARY,
        INS_MUTUALLY_AUTHENTICATE,
        0x00,
        0x00,
        data.freeze(),
    )
}
