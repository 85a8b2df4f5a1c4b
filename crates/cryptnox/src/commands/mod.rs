//! Builders for the Cryptnox wallet APDU set.
//!
//! Each module builds one command as a plain [`Command`] value; the
//! secure-messaging commands are wrapped by the engine before transmission.
//!
//! [`Command`]: cryptnox_apdu_core::Command

pub mod get_card_certificate;
pub mod get_card_info;
pub mod mutually_authenticate;
pub mod open_secure_channel;
pub mod select;
pub mod verify_pin;
