use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned to the caller for every failure that is not a 405.
pub const GENERIC_FAILURE_MESSAGE: &str = "AI failed to process the request.";

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidMode(_) => "INVALID_MODE",
            AppError::MissingField(_) => "MISSING_FIELD",
            AppError::InvalidBody(_) => "INVALID_BODY",
            AppError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            AppError::UpstreamError(_) => "UPSTREAM_ERROR",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::MethodNotAllowed => ErrorResponse {
                error: "Method not allowed".to_string(),
                details: None,
            },
            // The raw error text is echoed back as a diagnostic.
            other => ErrorResponse {
                error: GENERIC_FAILURE_MESSAGE.to_string(),
                details: Some(other.to_string()),
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::PersistenceFailure(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = err
            .field_errors()
            .keys()
            .map(|field| wire_name(field))
            .collect();
        fields.sort();
        AppError::MissingField(fields.join(", "))
    }
}

/// `model_answer` -> `modelAnswer`, the spelling clients send.
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

pub type AppResult<T> = Result<T, AppError>;
