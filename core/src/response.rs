//! Response classification.
//!
//! # Design
//! Classification is two steps: decode the body at most once into an
//! optional `ApiErrorBody`, then map the status class to an `Outcome`.
//! Redirect-range statuses are informational and never fail the call.

use crate::error::AtlasError;
use crate::http::HttpResponse;
use crate::types::{ApiErrorBody, ApiErrorEnvelope};

/// Status ranges the Atlas API distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 0 (no status from the transport) or 2xx.
    Ok,
    /// 3xx.
    Informational,
    /// Everything else.
    Error,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            0 | 200..=299 => StatusClass::Ok,
            300..=399 => StatusClass::Informational,
            _ => StatusClass::Error,
        }
    }
}

/// Why a response was classified as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    NoResponse,
    Api(ApiErrorBody),
}

/// The classified result of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// 3xx; carries the decoded body when there was one.
    Informational(Option<ApiErrorBody>),
    Failure(Failure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Collapse into a `Result`. Informational outcomes are `Ok`.
    pub fn into_result(self) -> Result<Option<ApiErrorBody>, AtlasError> {
        match self {
            Outcome::Success => Ok(None),
            Outcome::Informational(body) => Ok(body),
            Outcome::Failure(Failure::NoResponse) => Err(AtlasError::NoResponse),
            Outcome::Failure(Failure::Api(body)) => Err(AtlasError::Api {
                status: body.status,
                code: body.code,
                detail: body.detail,
            }),
        }
    }
}

/// Decode an `{"error": {...}}` body. Failures are logged and yield `None`.
fn decode_error_body(status: u16, body: &str) -> Option<ApiErrorBody> {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => Some(envelope.error),
        Err(err) => {
            let err = AtlasError::from(err);
            tracing::warn!(status, body, error = %err, "error handling error body");
            None
        }
    }
}

/// Classify `response`, consuming it.
pub fn classify(response: Option<HttpResponse>) -> Outcome {
    let Some(response) = response else {
        return Outcome::Failure(Failure::NoResponse);
    };

    match StatusClass::of(response.status) {
        StatusClass::Ok => Outcome::Success,
        StatusClass::Informational => {
            let body = decode_error_body(response.status, &response.body);
            let info = body.clone().unwrap_or_default();
            tracing::info!(
                status = response.status,
                api_status = info.status,
                code = info.code,
                detail = %info.detail,
                "informational 3xx response"
            );
            Outcome::Informational(body)
        }
        StatusClass::Error => {
            let body = decode_error_body(response.status, &response.body).unwrap_or_default();
            Outcome::Failure(Failure::Api(body))
        }
    }
}
