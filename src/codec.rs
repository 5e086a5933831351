//! Wire format: `v2.local.<b64 nonce><b64 ciphertext+tag>[.<b64 footer>]`.
//!
//! [`encode`] and [`decode`] only deal with the textual envelope; sealing
//! and opening the ciphertext itself is [`crate::aead`]'s job.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::aead::TAG_SIZE;
use crate::buf::extend;
use crate::error::{trap, Error};
use crate::pae::{Pae, HEADER, HEADER_SIZE};

const B64_NONCE_SIZE: usize = (crate::nonce::NONCE_SIZE * 4).div_ceil(3);
const B64_TAG_SIZE: usize = (TAG_SIZE * 4).div_ceil(3);

/// Number of bytes a base64url (unpadded) string of `encoded_len` characters
/// decodes to. Valid only for lengths this codec itself produced (never
/// `encoded_len % 4 == 1`, which has no valid decoding).
fn decoded_len(encoded_len: usize) -> usize {
    encoded_len * 6 / 8
}

/// Assembles a PASETO v2 local token from a sealed `ciphertext` (payload
/// plus trailing 16-byte tag) and the nonce/footer carried in `pae`.
///
/// # Panics
/// Panics (internal-invariant trap) if `ciphertext` is shorter than the
/// AEAD tag - callers always pass the output of [`crate::aead::encrypt`],
/// which never produces anything shorter.
pub(crate) fn encode(ciphertext: &[u8], pae: &Pae) -> String {
    if ciphertext.len() < TAG_SIZE {
        trap("bad tag size");
    }

    let footer = pae.get_footer();

    let mut out = String::with_capacity(
        HEADER_SIZE
            + B64_NONCE_SIZE
            + (ciphertext.len() * 4).div_ceil(3)
            + if footer.is_empty() { 0 } else { 1 + (footer.len() * 4).div_ceil(3) },
    );

    out.push_str(std::str::from_utf8(HEADER).unwrap_or_else(|_| trap("bad header bytes")));
    URL_SAFE_NO_PAD.encode_string(pae.get_nonce(), &mut out);
    URL_SAFE_NO_PAD.encode_string(ciphertext, &mut out);

    if !footer.is_empty() {
        out.push('.');
        URL_SAFE_NO_PAD.encode_string(footer, &mut out);
    }

    out
}

/// Parses `token` as a PASETO v2 local token, appending the still-sealed
/// ciphertext to `dst` and returning it together with the offset at which
/// the ciphertext begins and the assembled pre-authentication encoding.
///
/// `dst`'s existing contents are preserved; only bytes past its original
/// length are touched, and the returned offset (`dst`'s original length)
/// tells [`crate::aead::decrypt`] where the caller's prefix ends and the
/// ciphertext it must open begins. The returned [`Pae`] carries the nonce
/// and footer extracted from `token`.
pub(crate) fn decode(dst: Vec<u8>, token: &str) -> Result<(Vec<u8>, usize, Pae), Error> {
    if token.len() < HEADER_SIZE || &token.as_bytes()[..HEADER_SIZE] != HEADER {
        return Err(Error::BadHeader);
    }
    let rest = &token[HEADER_SIZE..];

    if rest.len() < B64_NONCE_SIZE {
        return Err(Error::BadEncoding);
    }
    let (nonce_b64, rest) = rest.split_at(B64_NONCE_SIZE);

    if rest.is_empty() {
        return Err(Error::BadEncoding);
    }

    let (payload_b64, footer_b64) = match rest.find('.') {
        Some(0) => return Err(Error::BadEncoding),
        Some(i) if i == rest.len() - 1 => return Err(Error::BadEncoding),
        Some(i) => (&rest[..i], &rest[i + 1..]),
        None => (rest, ""),
    };

    if payload_b64.len() < B64_TAG_SIZE {
        return Err(Error::BadEncoding);
    }

    let payload_len = decoded_len(payload_b64.len());
    let footer_len = decoded_len(footer_b64.len());

    let orig_len = dst.len();
    let mut payload = extend(dst, payload_len);

    let mut pae = Pae::init(footer_len);
    pae.set_nonce_b64(nonce_b64)?;
    pae.set_footer_b64(footer_b64)?;

    let written = URL_SAFE_NO_PAD
        .decode_slice(payload_b64, &mut payload[orig_len..])
        .map_err(|_| Error::BadEncoding)?;
    payload.truncate(orig_len + written);

    Ok((payload, orig_len, pae))
}
