//! Shared configuration shape for the gateway binaries. Each binary owns
//! its own `clap::Parser` struct (their CLI surfaces differ) and converts
//! into this type.

/// The encryption key, footer, and log level shared by both gateway
/// binaries, independent of how each one's CLI gathers them.
pub struct Config {
    pub key: Vec<u8>,
    pub footer: Vec<u8>,
    pub log_level: String,
}

/// Parses a hex-encoded key, as accepted by both binaries' `--key`/`$*_KEY`
/// option.
///
/// # Errors
/// Returns a human-readable message (for clap's error reporting) if `s` is
/// not valid hex or does not decode to exactly [`crate::KEY_SIZE`] bytes.
pub fn parse_key_hex(s: &str) -> Result<Vec<u8>, String> {
    let key = hex::decode(s).map_err(|e| format!("invalid hex: {e}"))?;
    if key.len() != crate::KEY_SIZE {
        return Err(format!(
            "key must decode to {} bytes, got {}",
            crate::KEY_SIZE,
            key.len()
        ));
    }
    Ok(key)
}

/// Reads a raw (not hex-encoded) key from a file, as accepted by both
/// binaries' `--key-file`/`$*_KEY_FILE` option - an alternative to passing
/// key material directly on the command line or in the environment.
///
/// # Errors
/// Returns a human-readable message if `path` cannot be read or its
/// contents are not exactly [`crate::KEY_SIZE`] bytes.
pub fn read_key_file(path: &std::path::Path) -> Result<Vec<u8>, String> {
    let key = std::fs::read(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    if key.len() != crate::KEY_SIZE {
        return Err(format!(
            "{} must contain exactly {} bytes, got {}",
            path.display(),
            crate::KEY_SIZE,
            key.len()
        ));
    }
    Ok(key)
}

/// One listener specification for `ngpast2l`. TLS is named but not wired
/// up - `validate` rejects any spec that asks for it. The field exists so
/// this config's shape matches the original's per-listener `tls.Config`,
/// ready for a real TLS implementation to fill in later.
#[derive(Debug, Clone)]
pub struct BindSpec {
    pub addr: String,
    pub tls_cert: Option<std::path::PathBuf>,
    pub tls_key: Option<std::path::PathBuf>,
}

impl BindSpec {
    /// A plaintext (non-TLS) listener spec for `addr`.
    pub fn plain(addr: impl Into<String>) -> Self {
        BindSpec { addr: addr.into(), tls_cert: None, tls_key: None }
    }

    /// Rejects this spec if it asks for TLS - listener-level TLS wiring is
    /// out of scope for this gateway.
    ///
    /// # Errors
    /// Returns a human-readable message if either TLS field is set.
    pub fn validate(&self) -> Result<(), String> {
        if self.tls_cert.is_some() || self.tls_key.is_some() {
            return Err(format!(
                "bind {}: TLS listener wiring is not implemented in this gateway",
                self.addr
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_bind_spec_validates() {
        assert!(BindSpec::plain("0.0.0.0:8080").validate().is_ok());
    }

    #[test]
    fn tls_bind_spec_fails_validation() {
        let spec = BindSpec {
            addr: "0.0.0.0:8443".to_owned(),
            tls_cert: Some("cert.pem".into()),
            tls_key: Some("key.pem".into()),
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn parses_valid_hex_key() {
        let hex_key = "11".repeat(crate::KEY_SIZE);
        let key = parse_key_hex(&hex_key).unwrap();
        assert_eq!(key, vec![0x11u8; crate::KEY_SIZE]);
    }

    #[test]
    fn rejects_non_hex_input() {
        assert!(parse_key_hex("not hex at all").is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(parse_key_hex("1122").is_err());
    }

    #[test]
    fn reads_valid_key_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("fpast2l-test-key-{}", std::process::id()));
        std::fs::write(&path, vec![0x7au8; crate::KEY_SIZE]).unwrap();

        let key = read_key_file(&path).unwrap();
        assert_eq!(key, vec![0x7au8; crate::KEY_SIZE]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rejects_key_file_of_wrong_size() {
        let mut path = std::env::temp_dir();
        path.push(format!("fpast2l-test-key-bad-{}", std::process::id()));
        std::fs::write(&path, b"too short").unwrap();

        assert!(read_key_file(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rejects_missing_key_file() {
        assert!(read_key_file(std::path::Path::new("/nonexistent/fpast2l-key")).is_err());
    }
}
