//! Secure-messaging wrapper for application commands.
//!
//! Commands are encrypted under the session key with the rolling IV and
//! carry a CBC-MAC computed over a zero-extended header block and the
//! ciphertext. Responses are MAC-verified before any decryption; the
//! response ciphertext decrypts under the MAC that was *sent*, while the
//! rolling IV for the next command becomes the MAC that was *received*.
//! The asymmetry is part of the wire protocol.

use bytes::{Bytes, BytesMut};
use cryptnox_apdu_core::{Command, Response};

use crate::constants::{BLOCK_LEN, MAC_LEN, MAX_SECURE_PAYLOAD};
use crate::crypto::{calculate_mac, decrypt_data, encrypt_data};
use crate::error::{Error, Result};
use crate::session::Session;

/// A wrapped command plus the MAC it was sealed with. The MAC doubles as
/// the IV for decrypting the card's answer.
#[derive(Debug)]
pub(crate) struct ProtectedCommand {
    pub(crate) command: Command,
    pub(crate) mac: [u8; MAC_LEN],
}

/// Encrypt and MAC an application command for transmission.
pub(crate) fn protect_command(session: &Session, command: &Command) -> Result<ProtectedCommand> {
    let mut plain = BytesMut::from(command.data());
    let ciphertext = encrypt_data(&mut plain, session.enc_key(), session.iv());

    // The transmitted Lc covers the MAC and the ciphertext and must fit in
    // one byte.
    if ciphertext.len() > MAX_SECURE_PAYLOAD {
        return Err(Error::InvalidLength {
            expected: MAX_SECURE_PAYLOAD,
            actual: ciphertext.len(),
        });
    }
    let lc = ciphertext.len() + MAC_LEN;

    let mut meta = [0u8; BLOCK_LEN];
    meta[0] = command.cla;
    meta[1] = command.ins;
    meta[2] = command.p1;
    meta[3] = command.p2;
    meta[4] = lc as u8;
    let mac = calculate_mac(&meta, &ciphertext, session.mac_key())?;

    let mut data = BytesMut::with_capacity(lc);
    data.extend_from_slice(&mac);
    data.extend_from_slice(&ciphertext);

    let command = Command::new_with_data(
        command.cla,
        command.ins,
        command.p1,
        command.p2,
        data.freeze(),
    );
    Ok(ProtectedCommand { command, mac })
}

/// Verify and decrypt a secure-messaging response, rolling the session IV.
///
/// The status word is not inspected here: the card MACs its reply for
/// application errors too, and the IV must roll either way.
pub(crate) fn process_response(
    session: &mut Session,
    sent_mac: &[u8; MAC_LEN],
    response: &Response,
) -> Result<Bytes> {
    let payload = response.payload();
    if payload.len() < MAC_LEN {
        return Err(Error::UnexpectedResponseLength {
            expected: MAC_LEN,
            actual: payload.len(),
        });
    }

    let (received_mac, ciphertext) = payload.split_at(MAC_LEN);
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(Error::UnexpectedResponseLength {
            expected: MAC_LEN + ciphertext.len().next_multiple_of(BLOCK_LEN),
            actual: payload.len(),
        });
    }

    let mut meta = [0u8; BLOCK_LEN];
    meta[0] = ciphertext.len() as u8;
    let expected = calculate_mac(&meta, ciphertext, session.mac_key())?;
    if expected.as_slice() != received_mac {
        return Err(Error::MacMismatch);
    }

    // MAC verified; only now touch the ciphertext.
    let body = if ciphertext.is_empty() {
        Bytes::new()
    } else {
        let mut buf = BytesMut::from(ciphertext);
        decrypt_data(&mut buf, session.enc_key(), sent_mac).map_err(Error::Unpad)?
    };

    let mut iv = [0u8; BLOCK_LEN];
    iv.copy_from_slice(received_mac);
    session.roll_iv(&iv);

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;
    use hex_literal::hex;

    fn test_session() -> Session {
        Session::from_raw(
            hex!("FDBCB1637597CF3F8F5E8263007D4E45F64C12D44066D4576EB1443D60AEF441"),
            hex!("2FB70219E6635EE0958AB3F7A428BA87E8CD6E6F873A5725A55F25B102D0F1F7"),
            hex!("627E64358FA9BDCDAD4442BD8006E0A5"),
        )
    }

    /// Card-side construction of a valid secure-messaging response.
    fn card_response(session: &Session, command_mac: &[u8; MAC_LEN], body: &[u8]) -> Response {
        let ciphertext = if body.is_empty() {
            Bytes::new()
        } else {
            let mut buf = BytesMut::from(body);
            encrypt_data(&mut buf, session.enc_key(), command_mac)
        };

        let mut meta = [0u8; BLOCK_LEN];
        meta[0] = ciphertext.len() as u8;
        let mac = calculate_mac(&meta, &ciphertext, session.mac_key()).unwrap();

        let mut payload = BytesMut::new();
        payload.put_slice(&mac);
        payload.put_slice(&ciphertext);
        Response::success(payload.freeze())
    }

    #[test]
    fn test_protect_command_layout() {
        let session = test_session();
        let plain = Command::new_with_data(0x80, 0x20, 0x00, 0x00, b"1234".to_vec());

        let protected = protect_command(&session, &plain).unwrap();
        let bytes = protected.command.to_bytes();

        // Header survives, Lc covers MAC plus one ciphertext block.
        assert_eq!(&bytes[..4], &[0x80, 0x20, 0x00, 0x00]);
        assert_eq!(bytes[4], 0x20);
        assert_eq!(&bytes[5..21], &protected.mac);

        // The MAC recomputes over the zero-extended header and ciphertext.
        let ciphertext = &bytes[21..];
        let mut meta = [0u8; BLOCK_LEN];
        meta[..5].copy_from_slice(&[0x80, 0x20, 0x00, 0x00, 0x20]);
        let expected = calculate_mac(&meta, ciphertext, session.mac_key()).unwrap();
        assert_eq!(protected.mac, expected);

        // The ciphertext decrypts back to the padded plaintext under the
        // rolling IV.
        let mut buf = BytesMut::from(ciphertext);
        let decrypted = decrypt_data(&mut buf, session.enc_key(), session.iv()).unwrap();
        assert_eq!(decrypted.as_ref(), b"1234");
    }

    #[test]
    fn test_wrapper_round_trip_rolls_iv() {
        let mut session = test_session();
        let plain = Command::new_with_data(0x80, 0xFA, 0x00, 0x00, vec![0x00]);

        let protected = protect_command(&session, &plain).unwrap();
        let response = card_response(&session, &protected.mac, b"card info");
        let response_mac: [u8; MAC_LEN] = response.payload()[..MAC_LEN].try_into().unwrap();

        let body = process_response(&mut session, &protected.mac, &response).unwrap();
        assert_eq!(body.as_ref(), b"card info");
        assert_eq!(session.iv(), &response_mac);
    }

    #[test]
    fn test_empty_response_body() {
        let mut session = test_session();
        let plain = Command::new_with_data(0x80, 0x20, 0x00, 0x00, b"1234".to_vec());

        let protected = protect_command(&session, &plain).unwrap();
        let response = card_response(&session, &protected.mac, &[]);

        let body = process_response(&mut session, &protected.mac, &response).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_tampered_ciphertext_fails_mac() {
        let mut session = test_session();
        let plain = Command::new_with_data(0x80, 0xFA, 0x00, 0x00, vec![0x00]);

        let protected = protect_command(&session, &plain).unwrap();
        let response = card_response(&session, &protected.mac, b"card info");

        let mut tampered = BytesMut::from(response.payload());
        tampered[MAC_LEN] ^= 0x01;
        let tampered = Response::success(tampered.freeze());

        let iv_before = *session.iv();
        let err = process_response(&mut session, &protected.mac, &tampered).unwrap_err();
        assert!(matches!(err, Error::MacMismatch));
        // The IV only rolls after a verified response.
        assert_eq!(session.iv(), &iv_before);
    }

    #[test]
    fn test_short_response_rejected() {
        let mut session = test_session();
        let response = Response::success(Bytes::from_static(&[0x01, 0x02]));
        let err = process_response(&mut session, &[0u8; MAC_LEN], &response).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponseLength { .. }));
    }

    #[test]
    fn test_unaligned_ciphertext_rejected() {
        let mut session = test_session();
        let response = Response::success(Bytes::from(vec![0u8; MAC_LEN + 17]));
        let err = process_response(&mut session, &[0u8; MAC_LEN], &response).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponseLength { .. }));
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let session = test_session();
        // 240 bytes of plaintext pad to 256 bytes of ciphertext, pushing Lc
        // past a single byte.
        let plain = Command::new_with_data(0x80, 0xFA, 0x00, 0x00, vec![0u8; 240]);
        let err = protect_command(&session, &plain).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { .. }));
    }
}
