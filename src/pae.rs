//! Pre-Authentication Encoding (PAE): the canonical byte serialization of
//! `(header, nonce, footer)` used as AEAD associated data. For v2 `local`
//! only the nonce and footer vary, so the layout is fixed:
//!
//! ```text
//! offset size   content
//!   0     8     LE u64 = 3            (piece count)
//!   8     8     LE u64 = 9            (len of header string)
//!  16     9     "v2.local."           (the header literal)
//!  25     8     LE u64 = 24           (nonce length)
//!  33    24     nonce bytes
//!  57     8     LE u64 = F            (footer length, possibly 0)
//!  65     F     footer bytes          (absent if F == 0)
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::buf::extend;
use crate::error::{trap, Error};
use crate::nonce::{derive_into, NONCE_SIZE};

pub(crate) const HEADER: &[u8] = b"v2.local.";
pub(crate) const HEADER_SIZE: usize = HEADER.len();

/// Length of the fixed PAE prefix (piece count + header piece + nonce
/// piece + footer-length field), before any footer bytes.
pub(crate) const MIN_PAE_SIZE: usize = 8 + 8 + HEADER_SIZE + 8 + NONCE_SIZE + 8;

const B64_NONCE_SIZE: usize = (NONCE_SIZE * 4).div_ceil(3);

const NONCE_OFFSET: usize = 8 + 8 + HEADER_SIZE + 8;
const FOOTER_LEN_OFFSET: usize = MIN_PAE_SIZE - 8;

/// A pre-authentication-encoding buffer. A thin wrapper over `Vec<u8>`
/// whose layout is always either exactly [`MIN_PAE_SIZE`] bytes (no
/// footer) or `MIN_PAE_SIZE + footer.len()` bytes.
#[derive(Debug, Clone)]
pub struct Pae(Vec<u8>);

impl Pae {
    /// Builds the fixed PAE prefix (piece count, header piece, a
    /// zeroed nonce slot, and a zero footer length), reserving `extra_cap`
    /// bytes of additional capacity for a footer to be appended later
    /// without reallocating.
    pub fn init(extra_cap: usize) -> Self {
        let mut b = extend(Vec::new(), MIN_PAE_SIZE + extra_cap);
        b.truncate(MIN_PAE_SIZE);

        let mut i = 0;
        i += put_u64_le(&mut b[i..i + 8], 3);
        i += put_u64_le(&mut b[i..i + 8], HEADER_SIZE as u64);
        b[i..i + HEADER_SIZE].copy_from_slice(HEADER);
        i += HEADER_SIZE;
        i += put_u64_le(&mut b[i..i + 8], NONCE_SIZE as u64);
        i += NONCE_SIZE; // nonce slot is already zeroed by `extend`
        put_u64_le(&mut b[i..i + 8], 0);

        Pae(b)
    }

    fn check_length(&self) {
        if self.0.len() < MIN_PAE_SIZE {
            trap("bad pae length");
        }
    }

    /// The full PAE byte sequence, as fed to the AEAD as associated data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The 24-byte nonce slot at offset 33.
    pub fn get_nonce(&self) -> &[u8] {
        self.check_length();
        &self.0[NONCE_OFFSET..NONCE_OFFSET + NONCE_SIZE]
    }

    /// Overwrites the nonce slot with `x` as-is.
    ///
    /// # Panics
    /// Panics (internal-invariant trap) if `x.len() != 24`.
    pub fn set_nonce(&mut self, x: &[u8]) {
        self.check_length();
        if x.len() != NONCE_SIZE {
            trap("bad nonce length");
        }
        self.0[NONCE_OFFSET..NONCE_OFFSET + NONCE_SIZE].copy_from_slice(x);
    }

    /// Base64url-decodes `s` and writes the result into the nonce slot.
    pub fn set_nonce_b64(&mut self, s: &str) -> Result<(), Error> {
        self.check_length();
        if s.len() != B64_NONCE_SIZE {
            return Err(Error::BadEncoding);
        }

        let mut decoded = [0u8; NONCE_SIZE];
        URL_SAFE_NO_PAD
            .decode_slice(s, &mut decoded)
            .map_err(|_| Error::BadEncoding)?;
        self.set_nonce(&decoded);
        Ok(())
    }

    /// Derives a nonce from `plaintext` via [`crate::nonce::derive_into`]
    /// and writes it into the nonce slot.
    pub fn derive_nonce(&mut self, plaintext: &[u8]) {
        self.check_length();
        let mut nonce = [0u8; NONCE_SIZE];
        derive_into(&mut nonce, plaintext);
        self.0[NONCE_OFFSET..NONCE_OFFSET + NONCE_SIZE].copy_from_slice(&nonce);
    }

    /// The footer bytes, if any (empty slice if the footer length field is
    /// zero).
    pub fn get_footer(&self) -> &[u8] {
        self.check_length();
        &self.0[MIN_PAE_SIZE..]
    }

    /// Sets the footer to `f`, truncating or extending the backing buffer
    /// and updating the footer-length field atomically with the content
    /// change.
    pub fn set_footer(&mut self, f: &[u8]) {
        self.check_length();
        self.0.truncate(MIN_PAE_SIZE);
        if !f.is_empty() {
            let mut b = extend(std::mem::take(&mut self.0), f.len());
            b[MIN_PAE_SIZE..].copy_from_slice(f);
            self.0 = b;
        }
        put_u64_le(&mut self.0[FOOTER_LEN_OFFSET..FOOTER_LEN_OFFSET + 8], f.len() as u64);
    }

    /// Base64url-decodes `s` and sets it as the footer. On malformed
    /// base64 the footer is reset to empty and `BadEncoding` is returned.
    pub fn set_footer_b64(&mut self, s: &str) -> Result<(), Error> {
        self.check_length();
        let decoded_len = URL_SAFE_NO_PAD
            .decode(s)
            .map(|v| {
                let len = v.len();
                self.set_footer(&v);
                len
            })
            .map_err(|_| {
                self.set_footer(&[]);
                Error::BadEncoding
            });
        decoded_len.map(|_| ())
    }
}

/// Writes the little-endian 64-bit representation of `v` into `dst`,
/// returning the number of bytes written (always 8).
///
/// # Panics
/// Panics (internal-invariant trap) if `dst.len() < 8`.
fn put_u64_le(dst: &mut [u8], v: u64) -> usize {
    if dst.len() < 8 {
        trap("bad pae length");
    }
    dst[..8].copy_from_slice(&v.to_le_bytes());
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_has_minimum_length_and_fixed_fields() {
        let p = Pae::init(0);
        let b = p.as_bytes();
        assert_eq!(b.len(), MIN_PAE_SIZE);
        assert_eq!(u64::from_le_bytes(b[0..8].try_into().unwrap()), 3);
        assert_eq!(u64::from_le_bytes(b[8..16].try_into().unwrap()), 9);
        assert_eq!(&b[16..25], b"v2.local.");
        assert_eq!(u64::from_le_bytes(b[25..33].try_into().unwrap()), 24);
        assert_eq!(u64::from_le_bytes(b[57..65].try_into().unwrap()), 0);
        assert_eq!(p.get_nonce(), &[0u8; 24]);
        assert!(p.get_footer().is_empty());
    }

    #[test]
    fn set_nonce_round_trips() {
        let mut p = Pae::init(0);
        let nonce = [7u8; 24];
        p.set_nonce(&nonce);
        assert_eq!(p.get_nonce(), &nonce);
    }

    #[test]
    #[should_panic(expected = "bad nonce length")]
    fn set_nonce_wrong_length_traps() {
        let mut p = Pae::init(0);
        p.set_nonce(&[0u8; 10]);
    }

    #[test]
    fn set_footer_updates_length_field_atomically() {
        let mut p = Pae::init(16);
        p.set_footer(b"hello");
        assert_eq!(p.get_footer(), b"hello");
        let len_field = u64::from_le_bytes(p.as_bytes()[57..65].try_into().unwrap());
        assert_eq!(len_field, 5);
        assert_eq!(p.as_bytes().len(), MIN_PAE_SIZE + 5);
    }

    #[test]
    fn set_footer_empty_elides_trailing_bytes() {
        let mut p = Pae::init(0);
        p.set_footer(b"x");
        p.set_footer(b"");
        assert!(p.get_footer().is_empty());
        assert_eq!(p.as_bytes().len(), MIN_PAE_SIZE);
    }

    #[test]
    fn set_footer_b64_round_trips() {
        let mut p = Pae::init(0);
        let encoded = URL_SAFE_NO_PAD.encode(b"a footer");
        p.set_footer_b64(&encoded).unwrap();
        assert_eq!(p.get_footer(), b"a footer");
    }

    #[test]
    fn set_footer_b64_bad_input_resets_to_empty() {
        let mut p = Pae::init(0);
        p.set_footer(b"stale");
        let err = p.set_footer_b64("not valid base64!!").unwrap_err();
        assert!(matches!(err, Error::BadEncoding));
        assert!(p.get_footer().is_empty());
    }
}
