//! A thin HTTP gateway around [`crate::Engine`]: validate a bearer PASETO
//! v2 local token, answer with its decrypted payload. Built from this
//! module are two binaries - `ngauth` (one listener, generated key) and
//! `ngpast2l` (any number of listeners sharing one engine) - but the
//! serving loop, router, and validator live here so neither binary
//! duplicates them.

pub mod config;
pub mod handler;
pub mod pool;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use config::Config;
use handler::AppState;
use pool::BufferPool;

/// Fixed shutdown budget: once a termination signal arrives, in-flight
/// requests get this long to finish before listeners are torn down
/// unconditionally.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Number of pre-allocated scratch buffers per engine.
const POOL_SIZE: usize = 128;

/// Initializes the global `tracing` subscriber. `log_level` is an
/// `EnvFilter` directive string (`"info"`, `"debug"`, `"ngauth=trace,warn"`,
/// ...). Must be called at most once, before any other gateway function.
pub fn init_logging(log_level: &str) {
    tracing_subscriber::fmt().with_env_filter(log_level.to_owned()).compact().init();
}

fn build_state(cfg: &Config) -> Result<AppState, crate::Error> {
    let engine = crate::Engine::new(&cfg.key)?.with_footer(cfg.footer.clone());
    Ok(AppState {
        engine: Arc::new(engine),
        pool: BufferPool::new(page_size_hint(), POOL_SIZE),
    })
}

fn page_size_hint() -> usize {
    4096
}

fn router(state: AppState) -> Router {
    Router::new().fallback(handler::handle).with_state(state)
}

/// Runs the gateway bound to exactly one address - `ngauth`'s serving
/// loop - until a termination signal arrives, then drains with the fixed
/// grace period before returning the process exit code.
pub async fn serve_one(cfg: Config, bind_addr: &str) -> ExitCode {
    serve_many(cfg, std::slice::from_ref(&bind_addr.to_owned())).await
}

/// Runs the gateway bound to any number of addresses concurrently, sharing
/// one [`crate::Engine`] and buffer pool - `ngpast2l`'s serving loop -
/// until a termination signal arrives.
pub async fn serve_many(cfg: Config, bind_addrs: &[String]) -> ExitCode {
    let state = match build_state(&cfg) {
        Ok(state) => state,
        Err(e) => {
            error!(err = %e, "failed to construct engine");
            return ExitCode::from(2);
        }
    };

    let mut listeners = Vec::with_capacity(bind_addrs.len());
    for addr in bind_addrs {
        match TcpListener::bind(addr).await {
            Ok(ln) => {
                info!(event = "listen", addr = %addr);
                listeners.push(ln);
            }
            Err(e) => {
                error!(event = "listen", addr = %addr, err = %e, "failed to bind");
                return ExitCode::from(2);
            }
        }
    }

    info!(event = "init", listeners = listeners.len());
    let app = router(state);
    let shutdown = Arc::new(Notify::new());

    let tasks: Vec<_> = listeners
        .into_iter()
        .map(|ln| {
            let app = app.clone().into_make_service_with_connect_info::<SocketAddr>();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                axum::serve(ln, app)
                    .with_graceful_shutdown(async move { shutdown.notified().await })
                    .await
            })
        })
        .collect();

    wait_for_signal().await;
    info!(event = "stop");
    shutdown.notify_waiters();

    // a second signal during drain forces an immediate exit, same as the
    // upstream handler's double Ctrl-C behavior
    tokio::spawn(async {
        wait_for_signal().await;
        std::process::exit(127);
    });

    let drain = async {
        for task in tasks {
            let _ = task.await;
        }
    };
    if tokio::time::timeout(SHUTDOWN_GRACE, drain).await.is_err() {
        warn!("graceful shutdown exceeded grace period");
    }

    info!(event = "close");
    ExitCode::SUCCESS
}

async fn wait_for_signal() {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = wait_for_sigterm() => {},
    }
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sig) => {
            sig.recv().await;
        }
        Err(_) => std::future::pending::<()>().await,
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(key: Vec<u8>) -> Config {
        Config { key, footer: Vec::new(), log_level: "error".to_owned() }
    }

    #[test]
    fn build_state_rejects_bad_key_size() {
        assert!(build_state(&cfg(vec![0u8; 4])).is_err());
    }

    #[test]
    fn build_state_succeeds_with_valid_key() {
        assert!(build_state(&cfg(vec![0u8; crate::KEY_SIZE])).is_ok());
    }
}
