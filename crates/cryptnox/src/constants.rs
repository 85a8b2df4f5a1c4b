//! Wire-level constants for the Cryptnox wallet applet.

/// Application identifier of the Cryptnox wallet applet.
pub const CRYPTNOX_AID: &[u8] = b"\xA0\x00\x00\x10\x00\x01\x12";

/// Pairing secret shared by the "Basic" card class (32 ASCII bytes, no NUL).
pub const COMMON_PAIRING_DATA: &[u8; 32] = b"Cryptnox Basic CommonPairingData";

/// CLA for ISO interindustry commands (SELECT).
pub const CLA_ISO: u8 = 0x00;
/// CLA for Cryptnox proprietary commands.
pub const CLA_PROPRIETARY: u8 = 0x80;

/// INS byte of SELECT.
pub const INS_SELECT: u8 = 0xA4;
/// INS byte of GET CARD CERTIFICATE.
pub const INS_GET_CARD_CERTIFICATE: u8 = 0xF8;
/// INS byte of OPEN SECURE CHANNEL.
pub const INS_OPEN_SECURE_CHANNEL: u8 = 0x10;
/// INS byte of MUTUALLY AUTHENTICATE.
pub const INS_MUTUALLY_AUTHENTICATE: u8 = 0x11;
/// INS byte of VERIFY PIN.
pub const INS_VERIFY_PIN: u8 = 0x20;
/// INS byte of GET CARD INFO.
pub const INS_GET_CARD_INFO: u8 = 0xFA;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;
/// Secure-messaging MAC length (one AES block).
pub const MAC_LEN: usize = 16;
/// Host nonce length in GET CARD CERTIFICATE.
pub const NONCE_LEN: usize = 8;
/// Salt length in the OPEN SECURE CHANNEL response.
pub const SALT_LEN: usize = 32;
/// Card certificate length: format byte, nonce, ephemeral key, signature.
pub const CERTIFICATE_LEN: usize = 146;
/// MUTUALLY AUTHENTICATE response payload length: MAC plus 48-byte cryptogram.
pub const MUTUAL_AUTH_RESPONSE_LEN: usize = 64;

/// IV for the host cryptogram sent in MUTUALLY AUTHENTICATE.
pub const MUTUAL_AUTH_IV: [u8; BLOCK_LEN] = [0x01; BLOCK_LEN];

/// Largest plaintext a single secure-messaging command can carry: the
/// one-byte Lc holds ciphertext plus MAC.
pub const MAX_SECURE_PAYLOAD: usize = u8::MAX as usize - MAC_LEN;

/// Maximum PIN length in ASCII digits.
pub const MAX_PIN_LEN: usize = 8;
