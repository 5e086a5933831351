//! `fpast2l`: a [PASETO](https://github.com/paseto-standard/paseto-spec) v2
//! `local` token codec.
//!
//! A v2 local token is a symmetrically encrypted, authenticated blob: a
//! 24-byte XChaCha20-Poly1305 nonce, the encrypted payload, a 16-byte
//! authentication tag, and an optional cleartext footer, all assembled with
//! base64url and fixed-literal dots into `v2.local.<nonce><payload+tag>[.footer]`.
//! This crate implements only that one PASETO version and purpose - no
//! claims, no JSON, no other PASETO version - by design.
//!
//! ```
//! use fpast2l::Engine;
//!
//! let key = [0u8; fpast2l::KEY_SIZE];
//! let eng = Engine::new(&key).unwrap();
//!
//! let token = eng.encrypt(b"attack at dawn".to_vec());
//! let payload = eng.decrypt(Vec::new(), &token).unwrap();
//! assert_eq!(payload, b"attack at dawn");
//! ```
//!
//! For a one-time operation, the free functions [`encrypt`] and [`decrypt`]
//! avoid spelling out an [`Engine`]:
//!
//! ```
//! let key = [0u8; fpast2l::KEY_SIZE];
//! let token = fpast2l::encrypt(&key, b"hi".to_vec(), b"").unwrap();
//! let payload = fpast2l::decrypt(&key, Vec::new(), &token).unwrap();
//! assert_eq!(payload, b"hi");
//! ```
//!
//! With the `gateway` feature (on by default), this crate also builds the
//! `ngauth` and `ngpast2l` binaries: thin HTTP services that validate a
//! `Bearer` token against this codec. See the `gateway` module for the
//! pieces they're built from.

// The crate-wide `unwrap_used`/`expect_used` denies (see Cargo.toml) are
// about untrusted-input handling in library code; every module's
// `#[cfg(test)] mod tests` is exempt the same way it would be if these
// lints were scoped to non-test code directly.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod aead;
mod buf;
mod codec;
mod engine;
mod error;
mod nonce;
mod pae;

#[cfg(feature = "gateway")]
pub mod gateway;

pub use engine::{decrypt, encrypt, Engine, KEY_SIZE};
pub use error::Error;
pub use nonce::derive as derive_nonce;
