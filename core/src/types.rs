//! Wire DTOs for the Atlas API.
//!
//! # Design
//! The API wraps every error in an `{"error": {...}}` envelope. All fields
//! default to their zero value so a partially valid body still yields
//! whatever could be read.

use serde::{Deserialize, Serialize};

/// Structured error returned by the Atlas API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiErrorBody {
    pub status: u16,
    pub code: i64,
    pub detail: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
}

/// Top-level envelope around `ApiErrorBody`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}
