//! XChaCha20-Poly1305 sealing/opening, in place, with a [`Pae`] as
//! associated data.

use chacha20poly1305::aead::AeadInPlace;
use chacha20poly1305::{KeyInit, Tag, XChaCha20Poly1305, XNonce};

use crate::error::{trap, Error};
use crate::pae::Pae;

/// Size in bytes of the Poly1305 authentication tag appended to the
/// ciphertext.
pub const TAG_SIZE: usize = 16;

/// Constructs the AEAD cipher bound to `key`.
///
/// # Panics
/// Panics (internal-invariant trap) if `key` is not exactly 32 bytes -
/// callers are expected to have validated key length already (see
/// [`crate::Engine::new`]).
pub(crate) fn new_cipher(key: &[u8]) -> XChaCha20Poly1305 {
    match XChaCha20Poly1305::new_from_slice(key) {
        Ok(cipher) => cipher,
        Err(_) => trap("bad key size"),
    }
}

/// Seals `buf` in place with `pae.get_nonce()` as nonce and
/// `pae.as_bytes()` as associated data, appending a 16-byte tag.
pub(crate) fn encrypt(cipher: &XChaCha20Poly1305, buf: &mut Vec<u8>, pae: &Pae) {
    let nonce = XNonce::from_slice(pae.get_nonce());
    match cipher.encrypt_in_place(nonce, pae.as_bytes(), buf) {
        Ok(()) => {}
        Err(_) => trap("cipher seal failed"),
    }
}

/// Opens the ciphertext occupying `buf[offset..]` in place, with
/// `pae.get_nonce()` as nonce and `pae.as_bytes()` as associated data.
/// Bytes before `offset` (a caller-supplied `dst` prefix) are never read or
/// written.
///
/// On success, `buf` is truncated by the 16-byte tag so that `buf[offset..]`
/// is exactly the plaintext. On tag mismatch, `buf`'s contents past `offset`
/// are left in an unspecified state and only [`Error::BadEncryption`] is
/// returned - callers must not inspect `buf` after a failed call.
///
/// # Panics
/// Panics (internal-invariant trap) if `buf.len() - offset < 16` - callers
/// always pass the output of [`crate::codec::decode`], which never produces
/// a ciphertext region shorter than the tag.
pub(crate) fn decrypt(cipher: &XChaCha20Poly1305, buf: &mut Vec<u8>, offset: usize, pae: &Pae) -> Result<(), Error> {
    let nonce = XNonce::from_slice(pae.get_nonce());

    if buf.len() < offset + TAG_SIZE {
        trap("bad tag size");
    }
    let tag_start = buf.len() - TAG_SIZE;

    let (head, tag_bytes) = buf.split_at_mut(tag_start);
    let tag = Tag::from_slice(tag_bytes);
    cipher
        .decrypt_in_place_detached(nonce, pae.as_bytes(), &mut head[offset..], tag)
        .map_err(|_| Error::BadEncryption)?;

    buf.truncate(tag_start);
    Ok(())
}
