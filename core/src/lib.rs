//! Client core for the RIPE Atlas v2 API.
//!
//! # Overview
//! Resolves a config name to a file, builds authenticated `HttpRequest`
//! values, and classifies `HttpResponse` values into an `Outcome`
//! (host-does-IO pattern). `AtlasClient::execute` is provided for callers
//! that want the shared `ureq` agent to do the round-trip.
//!
//! # Design
//! - `AtlasClient` is the explicit context: config, endpoint, and the lazily
//!   created shared agent.
//! - Name resolution is a tagged `ConfigName` classified by ordered rules.
//! - Classification decodes the error body once, then maps the status range.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod name;
pub mod response;
pub mod types;

pub use client::{add_query_parameters, page_number, user_agent, version, AtlasClient, API_ENDPOINT};
pub use config::{load_config, Config};
pub use error::{AtlasError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use name::{basedir, default_basedir, resolve_name, ConfigName, APP_NAME};
pub use response::{classify, Failure, Outcome, StatusClass};
pub use types::{ApiErrorBody, ApiErrorEnvelope};
