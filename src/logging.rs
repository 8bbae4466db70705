//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// Bodies longer than this many bytes are truncated at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// JSON fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 4] = ["password", "newPassword", "currentPassword", "token"];

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords and session tokens are redacted from JSON bodies, whatever their
/// content type, and from the `Authorization` header.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return Error::Validation("Could not read the request body".to_owned())
                .into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body_bytes);
    tracing::info!(
        "Received request: {} {}\nheaders: {:#?}",
        parts.method,
        parts.uri,
        redact_headers(&parts.headers)
    );
    log_body("request", &redact_body(&body_text));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(
        "Sending response: {}\nheaders: {:#?}",
        parts.status,
        parts.headers
    );
    log_body("response", &redact_body(&String::from_utf8_lossy(&body_bytes)));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer ********"));
    }

    headers
}

/// Replace the values of password and token fields in JSON bodies.
///
/// The content type is not trusted: any body that parses as JSON is redacted.
/// Other bodies are returned unchanged.
fn redact_body(body_text: &str) -> String {
    match serde_json::from_str::<Value>(body_text) {
        Ok(mut json) => {
            redact_json(&mut json);
            json.to_string()
        }
        Err(_) => body_text.to_owned(),
    }
}

fn redact_json(json: &mut Value) {
    match json {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *value = Value::String(REDACTED.to_owned());
                } else {
                    redact_json(value);
                }
            }
        }
        Value::Array(values) => values.iter_mut().for_each(redact_json),
        _ => {}
    }
}

/// The longest prefix of `text` that fits in `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let end = text
        .char_indices()
        .map(|(index, _)| index)
        .take_while(|&index| index <= limit)
        .last()
        .unwrap_or(0);

    &text[..end]
}

fn log_body(direction: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{direction} body: {}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full {direction} body: {body:?}");
    } else {
        tracing::info!("{direction} body: {body:?}");
    }
}
