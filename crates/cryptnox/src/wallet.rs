//! Cryptnox wallet protocol engine.
//!
//! Drives the full channel lifecycle against a [`CardTransport`]: applet
//! selection, certificate retrieval, ephemeral ECDH, mutual authentication
//! and the secure-messaging exchanges that follow. All APDU exchanges are
//! synchronous and must be issued serially against one session.

use std::fmt;

use bytes::{Bytes, BytesMut};
use p256::SecretKey;
use rand::{thread_rng, RngCore};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use cryptnox_apdu_core::{CardTransport, Command, Response, StatusWord};

use crate::commands;
use crate::constants::{
    BLOCK_LEN, CLA_PROPRIETARY, INS_MUTUALLY_AUTHENTICATE, MAC_LEN, MAX_PIN_LEN,
    MUTUAL_AUTH_IV, MUTUAL_AUTH_RESPONSE_LEN, NONCE_LEN, SALT_LEN,
};
use crate::crypto::{
    calculate_mac, derive_session_keys, encrypt_data, generate_ecdh_shared_secret,
};
use crate::error::{Error, Result};
use crate::secure_channel::{process_response, protect_command, ProtectedCommand};
use crate::session::Session;
use crate::sink::{DebugSink, NullSink};
use crate::types::CardCertificate;

/// Progress of channel establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No channel; nothing selected.
    Idle,
    /// Wallet applet selected.
    Selected,
    /// Card certificate received and validated.
    CertReceived,
    /// OPEN SECURE CHANNEL answered with the salt.
    OpcSent,
    /// Mutual authentication completed; secure messaging active.
    Authenticated,
}

/// Host-side client for the Cryptnox secure channel.
///
/// Owns the transport and sink for the lifetime of the channel. Create it,
/// call [`connect`], issue secure commands, then [`disconnect`] to wipe the
/// session keys and reset the reader.
///
/// [`connect`]: CryptnoxWallet::connect
/// [`disconnect`]: CryptnoxWallet::disconnect
pub struct CryptnoxWallet<T: CardTransport, S: DebugSink = NullSink> {
    transport: T,
    sink: S,
    session: Session,
    state: ChannelState,
}

impl<T: CardTransport, S: DebugSink> fmt::Debug for CryptnoxWallet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptnoxWallet")
            .field("state", &self.state)
            .field("open", &self.session.is_open())
            .finish()
    }
}

impl<T: CardTransport> CryptnoxWallet<T, NullSink> {
    /// Create a client over the transport, discarding debug output.
    pub fn new(transport: T) -> Self {
        Self::with_sink(transport, NullSink)
    }
}

impl<T: CardTransport, S: DebugSink> CryptnoxWallet<T, S> {
    /// Create a client over the transport with a debug sink for APDU dumps.
    pub fn with_sink(transport: T, sink: S) -> Self {
        Self {
            transport,
            sink,
            session: Session::new(),
            state: ChannelState::Idle,
        }
    }

    /// Current position in the channel state machine.
    pub const fn state(&self) -> ChannelState {
        self.state
    }

    /// Whether the secure channel is open.
    pub const fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Get a reference to the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Detect the card and establish the secure channel.
    pub fn connect(&mut self) -> Result<()> {
        if !self.transport.is_card_present() {
            return Err(Error::NoCard);
        }
        self.establish_secure_channel()
    }

    /// Run the SELECT → certificate → ECDH → mutual-auth handshake.
    ///
    /// On any failure the session is cleared and the machine returns to
    /// [`ChannelState::Idle`].
    pub fn establish_secure_channel(&mut self) -> Result<()> {
        let mut rng = thread_rng();

        let mut nonce = [0u8; NONCE_LEN];
        rng.try_fill_bytes(&mut nonce)
            .map_err(|_| Error::RngFailure)?;

        let mut host_random = Zeroizing::new([0u8; 32]);
        rng.try_fill_bytes(&mut host_random[..])
            .map_err(|_| Error::RngFailure)?;

        let host_key = SecretKey::random(&mut rng);

        self.handshake(host_key, nonce, host_random).map_err(|err| {
            self.abort();
            err
        })
    }

    fn handshake(
        &mut self,
        host_key: SecretKey,
        nonce: [u8; NONCE_LEN],
        host_random: Zeroizing<[u8; 32]>,
    ) -> Result<()> {
        // A failing SELECT means the passive target is not a Cryptnox
        // wallet (non-ISO-DEP cards also land here).
        let cmd = commands::select::select_wallet();
        let response = self
            .transmit("SELECT", &cmd)
            .map_err(|_| Error::CardNotSupported)?;
        if !response.is_success() {
            return Err(Error::CardNotSupported);
        }
        self.state = ChannelState::Selected;

        let cmd = commands::get_card_certificate::with_nonce(&nonce);
        let response = self.transmit("GET CARD CERTIFICATE", &cmd)?;
        expect_success(&response)?;
        let certificate = CardCertificate::try_from(response.payload())?;
        self.state = ChannelState::CertReceived;

        let cmd = commands::open_secure_channel::with_host_key(&host_key.public_key());
        let response = self.transmit("OPEN SECURE CHANNEL", &cmd)?;
        expect_success(&response)?;
        let payload = response.payload();
        if payload.len() != SALT_LEN {
            return Err(Error::UnexpectedResponseLength {
                expected: SALT_LEN,
                actual: payload.len(),
            });
        }
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(payload);
        self.state = ChannelState::OpcSent;

        let shared = generate_ecdh_shared_secret(&host_key, certificate.ephemeral_key());
        let (enc_key, mac_key) = derive_session_keys(&shared, &salt);
        let enc_key = Zeroizing::new(enc_key);
        let mac_key = Zeroizing::new(mac_key);
        drop(shared);

        // Host cryptogram: the 32-byte random encrypted under the fixed
        // channel-setup IV, then MACed the same way every later secure
        // command is.
        let mut plain = BytesMut::from(&host_random[..]);
        let cryptogram = encrypt_data(&mut plain, &enc_key, &MUTUAL_AUTH_IV);

        let mut meta = [0u8; BLOCK_LEN];
        meta[0] = CLA_PROPRIETARY;
        meta[1] = INS_MUTUALLY_AUTHENTICATE;
        meta[4] = (cryptogram.len() + MAC_LEN) as u8;
        let mac = calculate_mac(&meta, &cryptogram, &mac_key)?;

        let cmd = commands::mutually_authenticate::with_cryptogram(&mac, &cryptogram);
        let response = self.transmit("MUTUALLY AUTHENTICATE", &cmd)?;
        expect_success(&response)?;
        let payload = response.payload();
        if payload.len() != MUTUAL_AUTH_RESPONSE_LEN {
            return Err(Error::UnexpectedResponseLength {
                expected: MUTUAL_AUTH_RESPONSE_LEN,
                actual: payload.len(),
            });
        }

        // The card's response MAC seeds the rolling IV.
        let mut iv = [0u8; BLOCK_LEN];
        iv.copy_from_slice(&payload[..BLOCK_LEN]);
        self.session.install(*enc_key, *mac_key, iv);
        self.state = ChannelState::Authenticated;

        debug!("Secure channel established");
        Ok(())
    }

    /// Wrap and send an application command through the secure channel.
    ///
    /// Returns the plaintext body and status word of any response whose MAC
    /// verifies; the caller decides how to treat non-success status words.
    /// Fatal errors clear the session.
    pub fn send_secure_command(&mut self, command: &Command) -> Result<(Bytes, StatusWord)> {
        if !self.session.is_open() {
            return Err(Error::SessionClosed);
        }

        // Wrapping touches no card state, so a rejected command (for
        // instance an oversized payload) leaves the session usable.
        let protected = protect_command(&self.session, command)?;

        self.exchange_protected(&protected).map_err(|err| {
            self.abort();
            err
        })
    }

    fn exchange_protected(&mut self, protected: &ProtectedCommand) -> Result<(Bytes, StatusWord)> {
        let response = self.transmit("secure command", &protected.command)?;
        let body = process_response(&mut self.session, &protected.mac, &response)?;
        Ok((body, response.status()))
    }

    /// Verify the card PIN through the secure channel.
    ///
    /// A wrong PIN comes back as a recoverable [`Error::AppStatus`] (the
    /// `63 CX` status carries the remaining tries); the session stays open.
    pub fn verify_pin(&mut self, pin: &str) -> Result<()> {
        if pin.is_empty() || pin.len() > MAX_PIN_LEN {
            return Err(Error::InvalidLength {
                expected: MAX_PIN_LEN,
                actual: pin.len(),
            });
        }

        let cmd = commands::verify_pin::with_pin(pin);
        let (body, status) = self.send_secure_command(&cmd)?;
        if status.is_success() {
            debug!("PIN verified");
            Ok(())
        } else {
            if let Some(tries) = status.counter() {
                warn!(tries, "PIN rejected");
            }
            Err(Error::AppStatus { status, body })
        }
    }

    /// Fetch the card information record through the secure channel.
    pub fn get_card_info(&mut self) -> Result<Bytes> {
        let cmd = commands::get_card_info::request();
        let (body, status) = self.send_secure_command(&cmd)?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::AppStatus { status, body })
        }
    }

    /// Tear down the session and reset the reader.
    ///
    /// Safe to call at any time: the reader reset is idempotent and works
    /// without a card, and no transport error surfaces.
    pub fn disconnect(&mut self) {
        self.session.clear();
        if let Err(err) = self.transport.reset() {
            warn!(%err, "Reader reset failed during disconnect");
        }
        self.state = ChannelState::Idle;
    }

    fn abort(&mut self) {
        self.session.clear();
        self.state = ChannelState::Idle;
    }

    fn transmit(&mut self, label: &str, command: &Command) -> Result<Response> {
        let bytes = command.to_bytes();
        self.sink.print_hex(label, &bytes);

        let raw = self.transport.transmit_raw(&bytes)?;
        self.sink.print_hex("response", &raw);

        Ok(Response::from_bytes(&raw)?)
    }
}

fn expect_success(response: &Response) -> Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(Error::UnexpectedStatus(response.status()))
    }
}
