//! Shared request/response layer for the authenticated Merit endpoints.
//!
//! # Design
//! Each call is split into three steps, any of which callers may drive
//! themselves: `build_*` produces an `HttpRequest`, the transport executes
//! it, and `parse_response` turns the `HttpResponse` into a typed value or a
//! classified `MeritError`. `get` and `post` chain the three for the common
//! case. Nothing is retried or cached, and `BaseApi` holds no per-call state,
//! so one instance can serve concurrent callers.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::MeritConfig;
use crate::error::MeritError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const CONTENT_TYPE_HEADER: &str = "content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Authenticated access to the Merit data API.
#[derive(Clone)]
pub struct BaseApi {
    api_key: String,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl BaseApi {
    pub fn new(config: &MeritConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: config.api_key().to_string(),
            base_url: config.base_url().to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a GET for `endpoint`, which must start with `/` and may carry a
    /// query string.
    pub fn build_get(&self, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{endpoint}", self.base_url),
            headers: self.headers(),
            body: None,
        }
    }

    /// Build a POST for `endpoint` with an optional JSON body.
    pub fn build_post(&self, endpoint: &str, body: Option<&Value>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{endpoint}", self.base_url),
            headers: self.headers(),
            body: body.map(Value::to_string),
        }
    }

    /// Execute `request` and parse the response into `T`.
    pub fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, MeritError> {
        debug!("{} {}", request.method.as_str(), request.url);
        let response = self.transport.execute(&request).map_err(|e| {
            warn!("{} {} failed before a response: {e}", request.method.as_str(), request.url);
            MeritError::from(e)
        })?;
        parse_response(response)
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, MeritError> {
        self.send(self.build_get(endpoint))
    }

    pub fn post<T: DeserializeOwned>(&self, endpoint: &str, body: Option<&Value>) -> Result<T, MeritError> {
        self.send(self.build_post(endpoint, body))
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            (API_KEY_HEADER.to_string(), self.api_key.clone()),
            (CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()),
        ]
    }
}

impl fmt::Debug for BaseApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Turn a raw response into `T`, or the `MeritError` its status maps to.
pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, MeritError> {
    if !response.is_success() {
        let err = MeritError::from_response(response.status, &response.body, &response.status_text());
        warn!("merit api returned {err}");
        return Err(err);
    }
    serde_json::from_str(&response.body).map_err(|e| MeritError::Decode {
        status: response.status,
        message: e.to_string(),
    })
}
