use bytes::Bytes;
use p256::PublicKey;

use crate::constants::{CERTIFICATE_LEN, NONCE_LEN};
use crate::error::Error;

/// Card certificate returned by GET CARD CERTIFICATE.
///
/// Fixed layout: format byte `'C'`, the echoed 8-byte host nonce, the
/// card's ephemeral public key as an uncompressed SEC1 point, and the
/// card's DER signature over the preceding bytes. The signature is carried
/// as raw bytes and not verified.
#[derive(Debug, Clone)]
pub struct CardCertificate {
    format_id: u8,
    nonce: [u8; NONCE_LEN],
    ephemeral_key: PublicKey,
    signature: Bytes,
}

impl CardCertificate {
    /// Certificate format byte (`'C'`).
    pub const fn format_id(&self) -> u8 {
        self.format_id
    }

    /// Host nonce echoed by the card.
    pub const fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Card ephemeral public key for this channel.
    pub const fn ephemeral_key(&self) -> &PublicKey {
        &self.ephemeral_key
    }

    /// Raw signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

impl TryFrom<&[u8]> for CardCertificate {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.len() != CERTIFICATE_LEN {
            return Err(Error::UnexpectedResponseLength {
                expected: CERTIFICATE_LEN,
                actual: value.len(),
            });
        }
        if value[0] != b'C' {
            return Err(Error::InvalidCertificate("unknown format byte"));
        }
        if value[9] != 0x04 {
            return Err(Error::InvalidCertificate(
                "ephemeral key is not an uncompressed point",
            ));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&value[1..9]);

        let ephemeral_key = PublicKey::from_sec1_bytes(&value[9..74])
            .map_err(|_| Error::InvalidCertificate("malformed ephemeral key point"))?;

        Ok(Self {
            format_id: value[0],
            nonce,
            ephemeral_key,
            signature: Bytes::copy_from_slice(&value[74..]),
        })
    }
}
