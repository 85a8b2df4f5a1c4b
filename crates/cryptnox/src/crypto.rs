//! Cryptographic primitives for the Cryptnox secure channel: AES-256-CBC
//! with ISO/IEC 9797-1 bit padding, AES-CBC-MAC, SHA-512 session key
//! derivation and P-256 ECDH.

use aes::cipher::{
    block_padding::{Iso7816, NoPadding},
    BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use bytes::{Bytes, BytesMut};
use cipher::block_padding::UnpadError;
use generic_array::GenericArray;
use p256::{ecdh::SharedSecret, PublicKey, SecretKey};
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use crate::constants::{BLOCK_LEN, COMMON_PAIRING_DATA, SALT_LEN};
use crate::error::Error;

type Encryptor = cbc::Encryptor<aes::Aes256>;
type Decryptor = cbc::Decryptor<aes::Aes256>;

/// All-zero IV used to seed every CBC-MAC computation.
pub(crate) const ZERO_IV: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

pub(crate) fn generate_ecdh_shared_secret(private: &SecretKey, public: &PublicKey) -> SharedSecret {
    p256::elliptic_curve::ecdh::diffie_hellman(private.to_nonzero_scalar(), public.as_affine())
}

/// Derive session keys from the ECDH shared secret and the card salt.
///
/// Keys are derived as (K(E) | K(M)) = SHA-512(shared_secret | pairing_data | salt)
/// where the pairing data is fixed for the device class.
pub(crate) fn derive_session_keys(
    secret: &SharedSecret,
    salt: &[u8; SALT_LEN],
) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha512::new();
    hasher.update(secret.raw_secret_bytes());
    hasher.update(COMMON_PAIRING_DATA);
    hasher.update(salt);
    let mut digest = hasher.finalize();

    let mut enc_key = [0u8; 32];
    let mut mac_key = [0u8; 32];
    enc_key.copy_from_slice(&digest[0..32]);
    mac_key.copy_from_slice(&digest[32..64]);
    digest.as_mut_slice().zeroize();

    (enc_key, mac_key)
}

/// Encrypt data using the provided key and IV, padding it in ISO 7816
/// format (0x80 then zeros, always at least one padding byte).
pub(crate) fn encrypt_data(data: &mut BytesMut, enc_key: &[u8; 32], iv: &[u8; BLOCK_LEN]) -> Bytes {
    let msg_len = prepare_padding(data);
    // The buffer was grown to a block multiple above, so padding cannot fail.
    let encrypted = Encryptor::new(GenericArray::from_slice(enc_key), GenericArray::from_slice(iv))
        .encrypt_padded_mut::<Iso7816>(data, msg_len)
        .unwrap();
    Bytes::copy_from_slice(encrypted)
}

/// Decrypt data using the provided key and IV, removing the ISO 7816 padding.
pub(crate) fn decrypt_data(
    data: &mut BytesMut,
    enc_key: &[u8; 32],
    iv: &[u8; BLOCK_LEN],
) -> Result<Bytes, UnpadError> {
    let decrypted = Decryptor::new(GenericArray::from_slice(enc_key), GenericArray::from_slice(iv))
        .decrypt_padded_mut::<Iso7816>(data)?;
    Ok(Bytes::copy_from_slice(decrypted))
}

/// CBC-MAC over a header block and the ciphertext that follows it.
///
/// The input is encrypted under the MAC key with an all-zero IV and no
/// padding; the MAC is the final ciphertext block. `data` must already be
/// block-aligned, the header block carries any zero extension.
pub(crate) fn calculate_mac(
    meta: &[u8; BLOCK_LEN],
    data: &[u8],
    mac_key: &[u8; 32],
) -> Result<[u8; BLOCK_LEN], Error> {
    if data.len() % BLOCK_LEN != 0 {
        return Err(Error::InvalidLength {
            expected: data.len().next_multiple_of(BLOCK_LEN),
            actual: data.len(),
        });
    }

    let mut buf = BytesMut::with_capacity(BLOCK_LEN + data.len());
    buf.extend_from_slice(meta);
    buf.extend_from_slice(data);

    let len = buf.len();
    // buf is one header block plus block-aligned data, checked above.
    let ciphertext = Encryptor::new(
        GenericArray::from_slice(mac_key),
        GenericArray::from_slice(&ZERO_IV),
    )
    .encrypt_padded_mut::<NoPadding>(&mut buf, len)
    .unwrap();

    let mut mac = [0u8; BLOCK_LEN];
    mac.copy_from_slice(&ciphertext[ciphertext.len() - BLOCK_LEN..]);
    Ok(mac)
}

// Grow the buffer so the ISO 7816 padding always has room, including the
// full padding block required when the input is already block-aligned.
fn prepare_padding(data: &mut BytesMut) -> usize {
    let len = data.len();
    data.resize(len + BLOCK_LEN - len % BLOCK_LEN, 0);

    len
}
