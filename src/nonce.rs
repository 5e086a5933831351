//! Nonce derivation: a 24-byte XChaCha20-Poly1305 nonce bound to the
//! plaintext via a keyed BLAKE2b MAC, so that an RNG failure collapses to
//! a deterministic-per-message nonce rather than a nonce collision.

use blake2::digest::consts::U24;
use blake2::digest::Mac;
use blake2::Blake2bMac;
use zeroize::Zeroize;

use crate::buf::extend;
use crate::error::trap;

/// Size in bytes of the derived nonce (and of XChaCha20's nonce).
pub const NONCE_SIZE: usize = 24;

/// Size in bytes of the random key fed into the BLAKE2b MAC.
const RANDOM_KEY_SIZE: usize = 32;

type NonceMac = Blake2bMac<U24>;

/// Computes `BLAKE2b-MAC(key = random_32_bytes, msg = plaintext, out_len =
/// 24)` into `out`.
///
/// Panics (an internal-invariant trap, not a public [`crate::Error`]) if
/// the OS RNG fails to fill the random key or if the hash primitive
/// rejects the fixed-size key - both are treated as fatal environment
/// errors, never retried, matching the source's panic-on-RNG-failure
/// policy.
pub(crate) fn derive_into(out: &mut [u8; NONCE_SIZE], plaintext: &[u8]) {
    let mut random_key = [0u8; RANDOM_KEY_SIZE];
    if getrandom::getrandom(&mut random_key).is_err() {
        trap("rng failure");
    }

    let mac_result = match NonceMac::new_from_slice(&random_key) {
        Ok(mut mac) => {
            mac.update(plaintext);
            Some(mac.finalize().into_bytes())
        }
        Err(_) => None,
    };
    random_key.zeroize();

    match mac_result {
        Some(digest) => out.copy_from_slice(digest.as_slice()),
        None => trap("bad nonce length"),
    }
}

/// Standalone nonce-derivation helper for use outside a [`crate::pae::Pae`]
/// context: equivalent to [`crate::pae::Pae::derive_nonce`], but appends
/// the 24 derived bytes to `dst` (extending it via [`extend`] if
/// necessary) instead of writing into a PAE's nonce slot.
pub fn derive(dst: Vec<u8>, plaintext: &[u8]) -> Vec<u8> {
    let mut dst = extend(dst, NONCE_SIZE);
    let start = dst.len() - NONCE_SIZE;

    let mut nonce = [0u8; NONCE_SIZE];
    derive_into(&mut nonce, plaintext);
    dst[start..].copy_from_slice(&nonce);

    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_appends_exactly_nonce_size_bytes() {
        let dst = b"prefix".to_vec();
        let out = derive(dst.clone(), b"plaintext");
        assert_eq!(out.len(), dst.len() + NONCE_SIZE);
        assert_eq!(&out[..dst.len()], &dst[..]);
    }

    #[test]
    fn derive_is_not_constant_across_calls() {
        let a = derive(Vec::new(), b"same message");
        let b = derive(Vec::new(), b"same message");
        // random key differs each call even for identical plaintext
        assert_ne!(a, b);
    }

    #[test]
    fn derive_into_produces_24_bytes_deterministically_sized() {
        let mut out = [0u8; NONCE_SIZE];
        derive_into(&mut out, b"hello world");
        assert_eq!(out.len(), NONCE_SIZE);
    }
}
