// src/exists/http.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::context::AppCtx;
use crate::error::{AppError, AppResult};

use super::{parse_exists_response, ExistsCheck, ExistsResponse, FormPayload};

/// POSTs the urlencoded form payload to the existence-check endpoint.
pub struct HttpExistsClient {
    http: Client,
    endpoint: Url,
}

impl HttpExistsClient {
    pub fn new(endpoint: &str, timeout: Duration) -> AppResult<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| AppError::ExistsEndpointInvalid(e.to_string()))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::ExistsEndpointInvalid(format!(
                "unsupported scheme: {}",
                endpoint.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ExistsClientInit(e.to_string()))?;

        Ok(Self { http, endpoint })
    }

    pub fn from_ctx(ctx: &AppCtx) -> AppResult<Self> {
        Self::new(&ctx.exists_url, ctx.exists_timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ExistsCheck for HttpExistsClient {
    async fn check(&self, payload: &FormPayload) -> AppResult<ExistsResponse> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .form(payload.pairs())
            .send()
            .await
            .map_err(|e| AppError::ExistsTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExistsStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::ExistsTransport(e.to_string()))?;

        parse_exists_response(&body)
    }
}
