use actix_web::{web, HttpResponse};
use futures::StreamExt;
use serde::de::DeserializeOwned;

use crate::errors::{AppError, AppResult};

/// Creates a success JSON response
pub fn success_json<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}

/// Creates a 503 JSON response
pub fn service_unavailable_json<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(data)
}

/// Collects the request body, failing once it grows past `limit` bytes.
pub async fn read_body(mut payload: web::Payload, limit: usize) -> AppResult<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidBody(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::InvalidBody(format!(
                "body is larger than {} bytes",
                limit
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Parses a JSON body regardless of its Content-Type. A body that is a JSON
/// string holding a JSON document is unwrapped once.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidBody(e.to_string()))?;

    let value = match value {
        serde_json::Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| AppError::InvalidBody(e.to_string()))?,
        other => other,
    };

    serde_json::from_value(value).map_err(|e| AppError::InvalidBody(e.to_string()))
}
