use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Instant;

use crate::state::AppState;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_FIELDS: [&str; 8] = [
    "password",
    "oldpassword",
    "newpassword",
    "token",
    "authorization",
    "secret",
    "passwordhash",
    "password_hash",
];

const SENSITIVE_HEADERS: [header::HeaderName; 3] = [
    header::AUTHORIZATION,
    header::COOKIE,
    header::SET_COOKIE,
];

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/api/health" | "/api/health/")
}

/// Replaces sensitive values at any depth.
fn filter_sensitive_data(mut value: Value) -> Value {
    match &mut value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SENSITIVE_FIELDS.contains(&key.to_lowercase().as_str()) {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    *field = filter_sensitive_data(field.take());
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                *item = filter_sensitive_data(item.take());
            }
        }
        _ => {}
    }
    value
}

fn filter_sensitive_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered_headers = headers.clone();
    for name in SENSITIVE_HEADERS {
        if filtered_headers.contains_key(&name) {
            filtered_headers.insert(name, HeaderValue::from_static(REDACTED));
        }
    }
    filtered_headers
}

fn body_as_json(bytes: &Bytes) -> Value {
    serde_json::from_slice::<Value>(bytes)
        .map(filter_sensitive_data)
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

pub async fn http_logger(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_owned();

    if should_ignore_path(&path) || method == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();

    let (parts, body) = req.into_parts();
    let bytes = buffer_body("request", body).await?;
    let req_body = body_as_json(&bytes);
    let req = Request::from_parts(parts, Body::from(bytes));

    let mut response = next.run(req).await;
    let latency = start_time.elapsed();
    let status = response.status();

    let should_log_body =
        matches!(method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE);
    let res_body = if should_log_body {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let json_body = body_as_json(&bytes);
        response = Response::from_parts(parts, Body::from(bytes));
        json_body
    } else {
        Value::Object(serde_json::Map::new())
    };

    tracing::info!(
        method = %method,
        path = %path,
        query = uri.query().unwrap_or(""),
        x_request_id = %x_request_id,
        req_headers = ?filter_sensitive_headers(&req_headers),
        req_body = %req_body,
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        res_body = %res_body,
        app_env = %state.settings.app_env,
        "HTTP request completed"
    );

    Ok(response)
}

pub async fn buffer_body<B>(
    direction: &str,
    body: B,
) -> std::result::Result<Bytes, (StatusCode, String)>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    match body.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => Err((
            StatusCode::BAD_REQUEST,
            format!("failed to read {direction} body: {err}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redacts_nested_credentials() {
        let body = json!({
            "username": "admin@gmail.com",
            "password": "admin123",
            "data": { "token": "abc", "items": [{ "newPassword": "x" }] }
        });
        let filtered = filter_sensitive_data(body);
        assert_eq!(filtered["username"], "admin@gmail.com");
        assert_eq!(filtered["password"], REDACTED);
        assert_eq!(filtered["data"]["token"], REDACTED);
        assert_eq!(filtered["data"]["items"][0]["newPassword"], REDACTED);
    }

    #[test]
    fn test_redacts_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let filtered = filter_sensitive_headers(&headers);
        assert_eq!(filtered[header::AUTHORIZATION], REDACTED);
        assert_eq!(filtered[header::ACCEPT], "application/json");
    }
}
