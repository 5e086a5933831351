//! The closed error taxonomy surfaced by this crate's public API.

use thiserror::Error;

/// Errors returned by `fpast2l`'s public operations.
///
/// Every variant except `Internal` can result from untrusted input or
/// caller misuse and is safe to match on. `Internal` indicates a logic bug
/// in this crate (a length invariant violated by code that should never
/// violate it) and is never expected to surface in correct use - see
/// [`Error::is_internal`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// `Engine::new` (or a one-shot helper) was given a key whose length
    /// is not exactly [`crate::KEY_SIZE`] bytes.
    #[error("fpast2l: bad key size")]
    BadKeySize,

    /// `decode` found a missing or incorrect `"v2.local."` header.
    #[error("fpast2l: bad header")]
    BadHeader,

    /// `decode` or a PAE setter found malformed base64 or a structural
    /// mismatch (missing separator, insufficient length, trailing dot).
    #[error("fpast2l: bad encoding")]
    BadEncoding,

    /// The AEAD failed to open the ciphertext: wrong key, tampered
    /// ciphertext/tag/associated-data, or (when footer equality is
    /// enforced) a footer that does not match the engine's configured
    /// footer.
    #[error("fpast2l: decryption failed")]
    BadEncryption,

    /// Never constructed by this crate: `Engine` has no public constructor
    /// other than [`crate::Engine::new`], so there is no zero-value engine
    /// to operate on in the first place. Kept in the taxonomy for parity
    /// with the closed error sum this crate implements.
    #[error("fpast2l: engine not properly initialized")]
    EngineNotInitialized,

    #[error("fpast2l: (internal) {0}")]
    #[doc(hidden)]
    Internal(&'static str),
}

impl Error {
    /// Whether this error represents an internal-invariant trap rather
    /// than a condition reachable through untrusted input.
    ///
    /// Internal errors indicate a bug in this crate; they exist so that
    /// misuse of the low-level buffer/PAE primitives fails loudly instead
    /// of silently producing a malformed token.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal(_))
    }
}

/// Panics with an internal-invariant message. Reserved for conditions
/// that indicate a programmer error within this crate - a nil/mismatched
/// cipher, a bad nonce/PAE length, negative extra capacity - never for
/// untrusted input. Mirrors the source implementation's `internal(s)`
/// panics, which are deliberately unrecoverable.
#[track_caller]
pub(crate) fn trap(msg: &'static str) -> ! {
    panic!("fpast2l: (internal) {msg}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_variants_are_not_internal() {
        for e in [
            Error::BadKeySize,
            Error::BadHeader,
            Error::BadEncoding,
            Error::BadEncryption,
            Error::EngineNotInitialized,
        ] {
            assert!(!e.is_internal());
        }
    }

    #[test]
    fn internal_variant_is_internal_and_carries_prefix() {
        let e = Error::Internal("bad pae length");
        assert!(e.is_internal());
        assert!(e.to_string().contains("(internal)"));
    }

    #[test]
    fn public_messages_carry_the_crate_prefix() {
        assert!(Error::BadHeader.to_string().starts_with("fpast2l: "));
    }
}
