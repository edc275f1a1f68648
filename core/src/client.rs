//! Request builder and shared transport for the Atlas API.
//!
//! # Design
//! `AtlasClient` is the per-process context: it owns the loaded `Config`,
//! the API endpoint, and a lazily created `ureq::Agent` that every request
//! reuses. `build_request` only produces an `HttpRequest`; the round-trip is
//! done by `execute` or by any transport the caller prefers, and the result
//! goes through `response::classify`.

use std::collections::BTreeMap;
use std::sync::{LazyLock, OnceLock};

use regex::Regex;
use url::Url;

use crate::config::Config;
use crate::error::{AtlasError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::{self, Outcome};
use crate::types::ApiErrorBody;

/// Fixed origin of the RIPE Atlas v2 API.
pub const API_ENDPOINT: &str = "https://atlas.ripe.net/api/v2";

/// Version of this wrapper, sent in `User-Agent`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static PAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|[?&])page=(\d+)").unwrap());

pub fn version() -> &'static str {
    VERSION
}

/// `User-Agent` value for every request.
pub fn user_agent() -> String {
    format!("ripe-atlas/{VERSION}")
}

/// Value of the `page` query parameter in `url`, if it is numeric.
///
/// Relative URLs and bare query strings fall back to a pattern match.
pub fn page_number(url: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(url) {
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "page")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()));
    }
    PAGE_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Append `params` to `base` as an encoded query string, keys in order.
pub fn add_query_parameters(base: &str, params: &BTreeMap<String, String>) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{base}?{query}")
}

/// Context for talking to the Atlas API.
#[derive(Debug)]
pub struct AtlasClient {
    config: Config,
    endpoint: String,
    agent: OnceLock<ureq::Agent>,
}

impl AtlasClient {
    pub fn new(config: Config) -> Self {
        Self::with_endpoint(config, API_ENDPOINT)
    }

    /// Point the client at another server, e.g. a local mock.
    pub fn with_endpoint(config: Config, endpoint: &str) -> Self {
        Self {
            config,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            agent: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The shared agent, created on first use.
    ///
    /// Redirects are not followed so 3xx statuses reach `classify`.
    pub fn agent(&self) -> &ureq::Agent {
        self.agent.get_or_init(|| {
            tracing::debug!(endpoint = %self.endpoint, "creating shared HTTP agent");
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .max_redirects(0)
                .max_redirects_will_error(false)
                .build()
                .new_agent()
        })
    }

    /// Whether the shared agent has been created yet.
    pub fn transport_ready(&self) -> bool {
        self.agent.get().is_some()
    }

    /// Build a request for `resource`, injecting the API key and headers.
    ///
    /// A configured key overrides any `key` entry in `params`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        resource: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<HttpRequest> {
        let resource = resource.trim_matches('/');
        if resource.is_empty() {
            return Err(AtlasError::MissingResource);
        }
        if resource.contains(['?', '#']) {
            return Err(AtlasError::InvalidResource(resource.to_string()));
        }

        let mut params = params.clone();
        if let Some(key) = self.config.api_key() {
            params.insert("key".to_string(), key.to_string());
        }

        let raw = add_query_parameters(&format!("{}/{resource}/", self.endpoint), &params);
        let url = Url::parse(&raw).map_err(|source| AtlasError::RequestBuild {
            url: raw.clone(),
            source,
        })?;

        let _ = self.agent();

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        let mut headers = vec![
            ("Host".to_string(), host),
            ("User-Agent".to_string(), user_agent()),
        ];
        if let Some(auth) = self.config.proxy_auth() {
            headers.push(("Proxy-Authorization".to_string(), auth.to_string()));
        }

        tracing::debug!(%method, %resource, params = params.len(), "built request");
        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body: None,
        })
    }

    /// Send `req` through the shared agent and read the whole body.
    ///
    /// Non-2xx statuses come back as data; only transport failures are errors.
    /// The body is read to the end before returning.
    pub fn execute(&self, req: &HttpRequest) -> Result<HttpResponse> {
        let agent = self.agent();
        let transport = |e: ureq::Error| AtlasError::Transport(e.to_string());

        let mut response = match req.method {
            HttpMethod::Get => with_headers(agent.get(&req.url), &req.headers).call(),
            HttpMethod::Delete => with_headers(agent.delete(&req.url), &req.headers).call(),
            HttpMethod::Post => send(with_headers(agent.post(&req.url), &req.headers), &req.body),
            HttpMethod::Put => send(with_headers(agent.put(&req.url), &req.headers), &req.body),
            HttpMethod::Patch => send(with_headers(agent.patch(&req.url), &req.headers), &req.body),
        }
        .map_err(transport)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.body_mut().read_to_string().map_err(transport)?;

        Ok(HttpResponse { status, headers, body })
    }

    /// Classify `response` and turn failures into errors.
    pub fn handle_response(&self, response: Option<HttpResponse>) -> Result<Option<ApiErrorBody>> {
        let outcome: Outcome = response::classify(response);
        outcome.into_result()
    }
}

// ureq derives Host from the URL itself.
fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        if name.eq_ignore_ascii_case("host") {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: &Option<String>,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.content_type("application/json").send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
