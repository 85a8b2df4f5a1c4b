use cryptnox_apdu_core::Command;

use crate::constants::{CLA_PROPRIETARY, INS_GET_CARD_INFO};

/// Plaintext GET CARD INFO command for the secure-messaging wrapper.
pub fn request() -> Command {
    Command::new_with_data(CLA_PROPRIETARY, INS_GET_CARD_INFO, 0x00, 0x00, vec![0x00])
}
