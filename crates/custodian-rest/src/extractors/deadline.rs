//! Per-request call context extractor.

use crate::{responses::AppError, state::AppState};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use custodian_core::{CallContext, CustodianError, CustodianResult};
use std::time::Duration;

/// Header a client can use to ask for a shorter deadline, in milliseconds.
pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// The [`CallContext`] for one request.
///
/// The deadline is the server's request timeout, or the client's
/// `x-request-timeout-ms` if that is shorter. When the client disconnects axum
/// drops the handler future, which cancels any in-flight store or cache call.
#[derive(Debug, Clone)]
pub struct RequestContext(pub CallContext);

impl std::ops::Deref for RequestContext {
    type Target = CallContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let timeout = request_timeout(&parts.headers, state.request_timeout)?;
        Ok(Self(CallContext::with_timeout(timeout)))
    }
}

/// Resolves the effective timeout for a request, capped at `max`.
pub fn request_timeout(headers: &HeaderMap, max: Duration) -> CustodianResult<Duration> {
    let Some(value) = headers.get(REQUEST_TIMEOUT_HEADER) else {
        return Ok(max);
    };

    let millis = value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .ok_or_else(|| {
            CustodianError::validation(format!(
                "{} must be a positive number of milliseconds",
                REQUEST_TIMEOUT_HEADER
            ))
        })?;

    Ok(Duration::from_millis(millis).min(max))
}
