//! Transport-neutral request handlers.
//!
//! Requests and responses follow the API gateway proxy event layout, so the
//! handlers can sit behind a serverless gateway or be driven locally by the
//! `travote-handler` binary.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::{config::TravoteConfig, error::TravoteError};

mod countries;
mod places;
mod vote;

pub use countries::handle_countries;
pub use places::handle_places;
pub use vote::{VoteRequest, VoteResponse, handle_vote};

const ERROR_ALLOW_METHODS: &str = "OPTIONS,GET,POST,PUT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub http_method: String,
    /// Sent as `null` by the gateway when the URL has no query string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub query_string_parameters: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(params: &[(&str, &str)]) -> Self {
        Self {
            http_method: "GET".to_string(),
            query_string_parameters: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: None,
        }
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            query_string_parameters: HashMap::new(),
            body: Some(body.into()),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query_string_parameters.get(key).map(String::as_str)
    }

    pub(crate) fn require_method(&self, method: &str) -> Result<(), HandlerError> {
        if self.http_method.eq_ignore_ascii_case(method) {
            Ok(())
        } else {
            Err(HandlerError::MethodNotAllowed(self.http_method.clone()))
        }
    }

    /// Parse an optional query parameter, rejecting malformed values.
    pub(crate) fn parse_param<T: std::str::FromStr>(
        &self,
        key: &str,
    ) -> Result<Option<T>, HandlerError> {
        self.param(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| HandlerError::BadRequest(format!("Invalid value for {key}: {raw:?}")))
            })
            .transpose()
    }

    pub(crate) fn required_param<T: std::str::FromStr>(&self, key: &str) -> Result<T, HandlerError> {
        self.parse_param(key)?
            .ok_or_else(|| HandlerError::BadRequest(format!("Missing parameter {key}")))
    }

    pub(crate) fn has_params(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.param(key).is_some())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error> {
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiResponse {
    /// `200` with a JSON body and `Access-Control-Allow-Origin: *`.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status_code: 200,
                headers: cors_headers(None),
                body,
            },
            Err(e) => {
                error!(error = %e, "Failed to encode response body");
                Self::error(500, "Internal server error")
            }
        }
    }

    /// `{"error": message}` with the full set of CORS headers.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let body = ErrorBody {
            error: message.into(),
        };
        Self {
            status_code,
            headers: cors_headers(Some(ERROR_ALLOW_METHODS)),
            body: serde_json::to_string(&body)
                .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string()),
        }
    }

    pub(crate) fn with_allowed_methods(mut self, methods: &str) -> Self {
        self.headers = cors_headers(Some(methods));
        self
    }

    /// The message of an error response.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .map(|b| b.error)
    }
}

fn cors_headers(allow_methods: Option<&str>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::from([(
        "Access-Control-Allow-Origin".to_string(),
        "*".to_string(),
    )]);
    if let Some(methods) = allow_methods {
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type".to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            methods.to_string(),
        );
    }
    headers
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Service(#[from] TravoteError),
}

impl From<crate::geo::InvalidInput> for HandlerError {
    fn from(e: crate::geo::InvalidInput) -> Self {
        Self::Service(e.into())
    }
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed(_) => 405,
            Self::BadRequest(_) | Self::Service(TravoteError::InvalidInput(_)) => 400,
            Self::Service(_) => 500,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let status = self.status_code();
        match self {
            Self::MethodNotAllowed(method) => {
                warn!(%method, "Rejected request method");
                ApiResponse::error(status, "Method not allowed")
            }
            Self::BadRequest(msg) => {
                warn!(%msg, "Bad request");
                ApiResponse::error(status, msg)
            }
            Self::Service(TravoteError::InvalidInput(e)) => {
                warn!(error = %e, "Invalid input");
                ApiResponse::error(status, e.to_string())
            }
            Self::Service(e) => {
                error!(error = %e, "Request failed");
                ApiResponse::error(status, "Internal server error")
            }
        }
    }
}

/// Resolve the result limit for a request: the `limit` parameter or `default`,
/// clamped to the configured maximum.
pub(crate) fn request_limit(
    request: &ApiRequest,
    default: i64,
    config: &TravoteConfig,
) -> Result<i64, HandlerError> {
    let requested = request.parse_param::<i64>("limit")?.unwrap_or(default);
    let limit = config.clamp_limit(requested);
    if limit != requested {
        warn!(requested, max = config.max_result_limit, "Requested limit above maximum, clamping");
    }
    Ok(limit)
}
