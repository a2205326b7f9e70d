use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;

/// Request header carrying the shared secret.
pub const SECRET_HEADER: &str = "key";

/// Single static shared secret, compared verbatim.
///
/// Plain string equality, not constant-time. This is an access gate, not an
/// authentication scheme.
#[derive(Clone)]
pub struct AccessGate {
    secret: Arc<str>,
}

impl AccessGate {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn authorize(&self, supplied: Option<&str>) -> bool {
        supplied == Some(&*self.secret)
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

/// Middleware that short-circuits with 403 unless the secret header matches.
pub async fn require_secret(State(gate): State<AccessGate>, request: Request, next: Next) -> Response {
    let supplied = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    if !gate.authorize(supplied) {
        tracing::warn!(
            path = %request.uri().path(),
            header_present = supplied.is_some(),
            "rejected request with invalid secret key"
        );
        return ServerError::Forbidden.into_response();
    }
    next.run(request).await
}
