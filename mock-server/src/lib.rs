use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// API key the mock accepts for authenticated endpoints.
pub const VALID_KEY: &str = "good-key";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Probe {
    pub id: u32,
    pub country_code: String,
    pub is_public: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Measurement {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Default)]
pub struct Store {
    pub probes: HashMap<u32, Probe>,
    pub measurements: Vec<Measurement>,
}

/// Read-only seeded data shared by all handlers.
pub type Db = Arc<Store>;

type Params = Query<HashMap<String, String>>;

fn seed() -> Store {
    let probes = [(666, "FR"), (1, "NL"), (2, "DE")]
        .into_iter()
        .map(|(id, cc)| {
            let probe = Probe {
                id,
                country_code: cc.to_string(),
                is_public: true,
            };
            (id, probe)
        })
        .collect();
    let measurements = (1..=3)
        .map(|id| Measurement {
            id,
            kind: "ping".to_string(),
            description: format!("ping #{id}"),
        })
        .collect();
    Store { probes, measurements }
}

pub fn app() -> Router {
    let db: Db = Arc::new(seed());
    Router::new()
        .route("/api/v2/measurements/", get(list_measurements))
        .route("/api/v2/probes/{id}/", get(get_probe))
        .route("/api/v2/legacy/", get(legacy))
        .route("/api/v2/broken/", get(broken))
        .route("/api/v2/echo/", get(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Atlas-style `{"error": {...}}` body.
pub fn error_body(status: StatusCode, code: i64, detail: &str) -> (StatusCode, Json<Value>) {
    let body = json!({
        "error": {
            "status": status.as_u16(),
            "code": code,
            "detail": detail,
            "title": status.canonical_reason().unwrap_or_default(),
        }
    });
    (status, Json(body))
}

async fn list_measurements(
    State(db): State<Db>,
    Query(params): Params,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if params.get("key").map(String::as_str) != Some(VALID_KEY) {
        tracing::debug!("rejecting measurement list without a valid key");
        return Err(error_body(StatusCode::FORBIDDEN, 104, "Invalid or missing API key"));
    }
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse::<usize>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let next = (page < db.measurements.len())
        .then(|| format!("/api/v2/measurements/?page={}", page + 1));
    let results: Vec<_> = db.measurements.get(page - 1).into_iter().cloned().collect();
    Ok(Json(json!({
        "count": db.measurements.len(),
        "next": next,
        "results": results,
    })))
}

async fn get_probe(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<Json<Probe>, (StatusCode, Json<Value>)> {
    db.probes
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, 1, "not found"))
}

async fn legacy() -> (StatusCode, HeaderMap, Json<Value>) {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::from_static("/api/v2/measurements/"),
    );
    let (status, body) = error_body(StatusCode::MOVED_PERMANENTLY, 301, "moved to measurements");
    (status, headers, body)
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>upstream exploded</html>")
}

/// Reflect what the server saw, for checking headers over the wire.
async fn echo(headers: HeaderMap, Query(params): Params) -> Json<Value> {
    let get_header = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "query": params,
        "host": get_header(header::HOST),
        "user_agent": get_header(header::USER_AGENT),
        "proxy_authorization": get_header(header::PROXY_AUTHORIZATION),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_uses_atlas_envelope() {
        let (status, Json(body)) = error_body(StatusCode::NOT_FOUND, 1, "not found");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["status"], 404);
        assert_eq!(body["error"]["code"], 1);
        assert_eq!(body["error"]["detail"], "not found");
        assert_eq!(body["error"]["title"], "Not Found");
    }

    #[test]
    fn measurement_serializes_type_field() {
        let m = Measurement {
            id: 7,
            kind: "traceroute".to_string(),
            description: "t".to_string(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "traceroute");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn seed_contains_default_probe() {
        let store = seed();
        assert!(store.probes.contains_key(&666));
        assert_eq!(store.measurements.len(), 3);
    }
}
