//! Session state for the Cryptnox secure channel.
//!
//! The session holds the derived keys and the rolling IV. It starts closed
//! and zeroed, is populated by mutual authentication and wiped again on
//! disconnect, teardown errors and drop.

use zeroize::Zeroize;

use crate::constants::BLOCK_LEN;

/// Secure channel keys
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub(crate) struct Keys {
    /// Encryption key
    enc: [u8; 32],
    /// MAC key
    mac: [u8; 32],
}

/// Secure channel session state: keys, rolling IV and the open flag.
///
/// The open flag is equivalent to the keys and IV being installed; every
/// mutation below keeps that equivalence.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Session {
    keys: Keys,
    iv: [u8; BLOCK_LEN],
    open: bool,
}

impl Session {
    /// Create a closed session with zeroed keys.
    pub fn new() -> Self {
        Self {
            keys: Keys {
                enc: [0u8; 32],
                mac: [0u8; 32],
            },
            iv: [0u8; BLOCK_LEN],
            open: false,
        }
    }

    /// Install freshly derived keys and the initial rolling IV, opening the
    /// session.
    pub(crate) fn install(&mut self, enc: [u8; 32], mac: [u8; 32], iv: [u8; BLOCK_LEN]) {
        self.keys = Keys { enc, mac };
        self.iv = iv;
        self.open = true;
    }

    /// Replace the rolling IV with the MAC of the latest response.
    pub(crate) fn roll_iv(&mut self, iv: &[u8; BLOCK_LEN]) {
        self.iv.copy_from_slice(iv);
    }

    /// Zeroize keys and IV and close the session.
    pub fn clear(&mut self) {
        self.zeroize();
    }

    /// Whether the session keys are installed.
    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) const fn enc_key(&self) -> &[u8; 32] {
        &self.keys.enc
    }

    pub(crate) const fn mac_key(&self) -> &[u8; 32] {
        &self.keys.mac
    }

    pub(crate) const fn iv(&self) -> &[u8; BLOCK_LEN] {
        &self.iv
    }

    /// Build an open session from raw key material.
    #[cfg(test)]
    pub(crate) fn from_raw(enc: [u8; 32], mac: [u8; 32], iv: [u8; BLOCK_LEN]) -> Self {
        let mut session = Self::new();
        session.install(enc, mac, iv);
        session
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
