//! `ngpast2l`: a multi-listener PASETO v2 local validation gateway.
//!
//! Unlike `ngauth`, the key is required (a multi-listener production
//! gateway cannot sensibly generate a different random key per listener)
//! and any number of bind addresses are served concurrently behind the
//! same [`fpast2l::Engine`]. TLS listener wiring is not implemented: a
//! `--bind` paired with `--tls-cert`/`--tls-key` fails config validation
//! rather than silently serving plaintext.

use std::process::ExitCode;
use std::path::PathBuf;

use clap::Parser;
use fpast2l::gateway::{self, config::{BindSpec, Config}};

#[derive(Parser)]
#[command(name = "ngpast2l", about = "multi-listener PASETO v2 local validation gateway")]
struct Args {
    /// Address to listen on. May be repeated to serve multiple listeners
    /// behind the same engine.
    #[arg(long = "bind", env = "NGPAST2L_BIND", value_delimiter = ',', required = true)]
    binds: Vec<String>,

    /// TLS certificate path, applied to every `--bind` listener. Causes
    /// startup to fail with a config error (TLS wiring isn't implemented).
    #[arg(long, env = "NGPAST2L_TLS_CERT")]
    tls_cert: Option<PathBuf>,

    /// TLS private key path, applied to every `--bind` listener. Causes
    /// startup to fail with a config error (TLS wiring isn't implemented).
    #[arg(long, env = "NGPAST2L_TLS_KEY")]
    tls_key: Option<PathBuf>,

    /// Path to a file holding a raw 32-byte encryption key. Takes
    /// precedence over `--key` if both are given; one of the two is
    /// required.
    #[arg(long, env = "NGPAST2L_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Hex-encoded 32-byte encryption key. One of `--key`/`--key-file` is
    /// required: a multi-listener gateway has nowhere to rotate a randomly
    /// generated key into.
    #[arg(long, env = "NGPAST2L_KEY", value_parser = gateway::config::parse_key_hex)]
    key: Option<Vec<u8>>,

    /// Footer required on every token.
    #[arg(long, env = "NGPAST2L_FOOTER", default_value = "")]
    footer: String,

    /// `tracing_subscriber::EnvFilter` directive string.
    #[arg(long, env = "NGPAST2L_LOG", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    gateway::init_logging(&args.log);

    let key = match (&args.key_file, args.key) {
        (Some(path), _) => match gateway::config::read_key_file(path) {
            Ok(key) => key,
            Err(e) => {
                tracing::error!(err = %e, "failed to read key file");
                return ExitCode::from(2);
            }
        },
        (None, Some(key)) => key,
        (None, None) => {
            tracing::error!("one of --key or --key-file is required");
            return ExitCode::from(2);
        }
    };

    let specs: Vec<BindSpec> = args
        .binds
        .iter()
        .map(|addr| BindSpec {
            addr: addr.clone(),
            tls_cert: args.tls_cert.clone(),
            tls_key: args.tls_key.clone(),
        })
        .collect();

    for spec in &specs {
        if let Err(e) = spec.validate() {
            tracing::error!(err = %e, "invalid bind configuration");
            return ExitCode::from(2);
        }
    }

    let addrs: Vec<String> = specs.into_iter().map(|s| s.addr).collect();
    let cfg = Config { key, footer: args.footer.into_bytes(), log_level: args.log };
    gateway::serve_many(cfg, &addrs).await
}
