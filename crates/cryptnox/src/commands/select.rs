use cryptnox_apdu_core::Command;

use crate::constants::{CLA_ISO, CRYPTNOX_AID, INS_SELECT};

/// SELECT by name with the Cryptnox wallet AID.
pub fn select_wallet() -> Command {
    Command::new_with_data(CLA_ISO, INS_SELECT, 0x04, 0x00, CRYPTNOX_AID)
}
