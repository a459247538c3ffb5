// src/exists/mod.rs

mod http;
mod payload;

pub use http::HttpExistsClient;
pub use payload::FormPayload;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Server answer to "does a record with these field values already exist".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExistsResponse {
    pub exists: bool,
    // informational only
    pub id: Option<i64>,
}

/// One existence query per duplicate-check cycle.
///
/// Implementations report transport faults, non-success statuses and
/// malformed bodies as `ExistsTransport`, `ExistsStatus` and `ExistsMalformed`.
#[async_trait]
pub trait ExistsCheck: Send + Sync {
    async fn check(&self, payload: &FormPayload) -> AppResult<ExistsResponse>;
}

/// Requires a JSON object with a boolean `exists`. A non-integer `id` is ignored.
pub fn parse_exists_response(body: &str) -> AppResult<ExistsResponse> {
    let v: Value =
        serde_json::from_str(body).map_err(|e| AppError::ExistsMalformed(e.to_string()))?;

    let obj = v
        .as_object()
        .ok_or_else(|| AppError::ExistsMalformed("response is not an object".into()))?;

    let exists = obj
        .get("exists")
        .and_then(Value::as_bool)
        .ok_or_else(|| AppError::ExistsMalformed("missing boolean `exists`".into()))?;

    let id = obj.get("id").and_then(Value::as_i64);

    Ok(ExistsResponse { exists, id })
}
