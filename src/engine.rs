//! [`Engine`]: the reusable PASETO v2 local generator/validator.

use chacha20poly1305::XChaCha20Poly1305;
use subtle::ConstantTimeEq;

use crate::aead;
use crate::codec;
use crate::error::Error;
use crate::pae::Pae;

/// Required length in bytes of an [`Engine`] encryption key.
pub const KEY_SIZE: usize = 32;

/// A PASETO v2 local generator and validator, bound to one encryption key
/// and (optionally) one footer.
///
/// `Engine` does not mutate after construction, so it is safe to share
/// across threads and reuse for any number of [`Engine::encrypt`]/
/// [`Engine::decrypt`] calls as long as the key and footer stay fixed.
/// [`Engine::with_footer`] returns an independent copy rather than mutating
/// in place.
#[derive(Clone)]
pub struct Engine {
    cipher: XChaCha20Poly1305,
    footer: Vec<u8>,
}

impl Engine {
    /// Constructs a new `Engine` with encryption key `key`.
    ///
    /// # Errors
    /// Returns [`Error::BadKeySize`] if `key` is not exactly [`KEY_SIZE`]
    /// bytes.
    pub fn new(key: &[u8]) -> Result<Engine, Error> {
        if key.len() != KEY_SIZE {
            return Err(Error::BadKeySize);
        }

        Ok(Engine {
            cipher: aead::new_cipher(key),
            footer: Vec::new(),
        })
    }

    /// Returns a copy of this `Engine` with its footer set to `footer`.
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<Vec<u8>>) -> Engine {
        self.footer = footer.into();
        self
    }

    /// Encrypts `plaintext` in place and returns the resulting PASETO v2
    /// local token. `plaintext`'s contents are overwritten with sealed
    /// ciphertext; it is safe to reuse or discard the buffer afterward.
    pub fn encrypt(&self, mut plaintext: Vec<u8>) -> String {
        let mut pae = Pae::init(self.footer.len());
        pae.derive_nonce(&plaintext);
        pae.set_footer(&self.footer);

        aead::encrypt(&self.cipher, &mut plaintext, &pae);
        codec::encode(&plaintext, &pae)
    }

    /// Parses and decrypts `token`, appending the resulting plaintext to
    /// `dst` and returning it.
    ///
    /// If this `Engine` carries a non-empty footer, `token`'s footer is
    /// required to match it exactly (constant-time comparison); a missing
    /// or differing footer is reported as [`Error::BadEncryption`], the
    /// same error returned for a tampered ciphertext, so the two failure
    /// modes are indistinguishable to a caller.
    ///
    /// # Errors
    /// Returns [`Error::BadHeader`] or [`Error::BadEncoding`] if `token`
    /// is not a well-formed PASETO v2 local token, and
    /// [`Error::BadEncryption`] if it fails to authenticate.
    pub fn decrypt(&self, dst: Vec<u8>, token: &str) -> Result<Vec<u8>, Error> {
        let (mut payload, offset, pae) = codec::decode(dst, token)?;

        if !bool::from(pae.get_footer().ct_eq(&self.footer)) {
            return Err(Error::BadEncryption);
        }

        aead::decrypt(&self.cipher, &mut payload, offset, &pae)?;
        Ok(payload)
    }
}

/// Shorthand for `Engine::new(key)?.with_footer(footer).encrypt(plaintext)`.
/// Prefer building an [`Engine`] directly when performing more than one
/// operation with the same key.
///
/// # Errors
/// Returns [`Error::BadKeySize`] if `key` is not exactly [`KEY_SIZE`]
/// bytes.
pub fn encrypt(key: &[u8], plaintext: Vec<u8>, footer: &[u8]) -> Result<String, Error> {
    Ok(Engine::new(key)?.with_footer(footer).encrypt(plaintext))
}

/// Shorthand for `Engine::new(key)?.decrypt(dst, token)`. Prefer building
/// an [`Engine`] directly when performing more than one operation with the
/// same key.
///
/// # Errors
/// See [`Engine::new`] and [`Engine::decrypt`].
pub fn decrypt(key: &[u8], dst: Vec<u8>, token: &str) -> Result<Vec<u8>, Error> {
    Engine::new(key)?.decrypt(dst, token)
}
