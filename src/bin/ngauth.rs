//! `ngauth`: a single-listener PASETO v2 local validation gateway.
//!
//! Unless `--key`/`NGAUTH_KEY` is given, a fresh random key is generated on
//! every start - tokens issued by one run are never valid against another.
//! This mirrors the upstream daemon's dev/single-instance posture: there is
//! no persistence story here, only a demonstration of the validator.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fpast2l::gateway::{self, config::Config};
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "ngauth", about = "PASETO v2 local validation gateway")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "NGAUTH_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Path to a file holding a raw 32-byte encryption key. Takes
    /// precedence over `--key` if both are given.
    #[arg(long, env = "NGAUTH_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Hex-encoded 32-byte encryption key. A random key is generated if
    /// neither this nor `--key-file` is given - tokens will not validate
    /// across restarts.
    #[arg(long, env = "NGAUTH_KEY", value_parser = gateway::config::parse_key_hex)]
    key: Option<Vec<u8>>,

    /// Footer required on every token (empty means no footer is required).
    #[arg(long, env = "NGAUTH_FOOTER", default_value = "")]
    footer: String,

    /// `tracing_subscriber::EnvFilter` directive string.
    #[arg(long, env = "NGAUTH_LOG", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    gateway::init_logging(&args.log);

    let key = match (args.key_file, args.key) {
        (Some(path), _) => match gateway::config::read_key_file(&path) {
            Ok(key) => key,
            Err(e) => {
                error!(err = %e, "failed to read key file");
                return ExitCode::from(2);
            }
        },
        (None, Some(key)) => key,
        (None, None) => {
            warn!("no --key or --key-file given, generating a random one; tokens will not survive a restart");
            let mut key = vec![0u8; fpast2l::KEY_SIZE];
            if getrandom::getrandom(&mut key).is_err() {
                return ExitCode::from(2);
            }
            key
        }
    };

    let cfg = Config { key, footer: args.footer.into_bytes(), log_level: args.log };
    gateway::serve_one(cfg, &args.bind).await
}
