//! The gateway's one and only route: validate the `Authorization` header
//! as a PASETO v2 local token and echo the decrypted payload back.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, Version};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use tracing::info;

use crate::gateway::pool::BufferPool;
use crate::Engine;

const BEARER: &str = "Bearer ";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub pool: BufferPool,
}

/// Strips a case-insensitive `"Bearer "` prefix from `auth`, returning the
/// remainder.
///
/// The upstream handler this replaces checked `len("Bearer ") >= len(auth)`
/// instead of actually comparing the prefix bytes, so any header at least
/// as long as `"Bearer "` - including one that doesn't start with it at all
/// - slipped past the check. This compares the prefix content.
fn strip_bearer(auth: &str) -> Option<&str> {
    if auth.len() < BEARER.len() {
        return None;
    }
    let (prefix, rest) = auth.split_at(BEARER.len());
    if prefix.eq_ignore_ascii_case(BEARER) {
        Some(rest)
    } else {
        None
    }
}

/// Handles every request the gateway receives: decrypt the bearer token,
/// answer `200` with the decrypted payload (base64url, in a fresh
/// `Authorization: Bearer ...` response header) on success, or a bare `401`
/// on any failure - missing header, malformed token, or failed
/// authentication are all indistinguishable to the caller.
pub async fn handle(
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();

    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(strip_bearer);

    let (status, response) = match token {
        Some(token) => {
            let buf = state.pool.acquire();
            match state.engine.decrypt(buf, token) {
                Ok(payload) => {
                    let reply = URL_SAFE_NO_PAD.encode(&payload);
                    state.pool.release(payload);
                    (StatusCode::OK, respond_ok(reply))
                }
                Err(_) => (StatusCode::UNAUTHORIZED, StatusCode::UNAUTHORIZED.into_response()),
            }
        }
        None => (StatusCode::UNAUTHORIZED, StatusCode::UNAUTHORIZED.into_response()),
    };

    info!(
        remote_addr = %remote_addr,
        method = %method,
        path = uri.path(),
        proto = ?version,
        status = status.as_u16(),
        response_time = ?start.elapsed(),
        "request"
    );
    response
}

fn respond_ok(reply: String) -> Response {
    let mut resp = Bytes::new().into_response();
    *resp.status_mut() = StatusCode::OK;
    let header_value = match HeaderValue::from_str(&format!("{BEARER}{reply}")) {
        Ok(v) => v,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    resp.headers_mut().insert(axum::http::header::AUTHORIZATION, header_value);
    resp
}
