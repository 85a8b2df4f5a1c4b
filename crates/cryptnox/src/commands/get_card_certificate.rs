use cryptnox_apdu_core::Command;

use crate::constants::{CLA_PROPRIETARY, INS_GET_CARD_CERTIFICATE, NONCE_LEN};

/// GET CARD CERTIFICATE carrying the host nonce the card must echo.
pub fn with_nonce(nonce: &[u8; NONCE_LEN]) -> Command {
    Command::new_with_data(
        CLA_PROPRIETARY,
        INS_GET_CARD_CERTIFICATE,
        0x00,
        0x00,
        nonce.to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_with_nonce_bytes() {
        let cmd = with_nonce(&hex!("0001020304050607"));
        assert_eq!(cmd.to_bytes().as_ref(), hex!("80F80000080001020304050607"));
    }
}
