//! Glue between axum's request/response types and the monitor's snapshots.

use axum::body::{to_bytes, Body};
use axum::extract::{MatchedPath, Request};
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use super::{RequestSnapshot, ResponseSnapshot};

/// Correlation tag stored in request extensions so stacked monitor layers
/// agree on the request id and entry timestamp.
#[derive(Debug, Clone, Copy)]
pub struct RequestTag {
    pub id: Uuid,
    pub received: DateTime<Utc>,
}

impl RequestTag {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            received: Utc::now(),
        }
    }
}

impl Default for RequestTag {
    fn default() -> Self {
        Self::new()
    }
}

/// Captures a [`RequestSnapshot`] and hands the request back. When
/// `include_payload` is set the body is buffered and the request rebuilt
/// from the buffered bytes; a failed read degrades to an empty payload
/// rather than failing the request.
pub async fn snapshot_request(
    request: Request,
    tag: RequestTag,
    include_payload: bool,
) -> (RequestSnapshot, Request) {
    let (parts, body) = request.into_parts();

    let method = parts.method.to_string();
    let origin = origin(&parts);
    let path = parts.uri.path().to_string();
    let query = query_map(parts.uri.query());
    let params = parts
        .extensions
        .get::<MatchedPath>()
        .map(|matched| path_params(matched.as_str(), &path))
        .unwrap_or_else(empty_object);
    let headers = headers_map(&parts.headers);

    let (payload, body) = if include_payload {
        match to_bytes(body, usize::MAX).await {
            Ok(bytes) => {
                let payload = parse_body(&bytes);
                (payload, Body::from(bytes))
            }
            Err(err) => {
                warn!(request_id = %tag.id, error = %err, "failed to buffer request payload");
                (empty_object(), Body::empty())
            }
        }
    } else {
        (empty_object(), body)
    };

    let snapshot = RequestSnapshot {
        id: tag.id,
        method,
        origin,
        path,
        headers,
        query,
        params,
        payload,
        received: tag.received,
    };
    (snapshot, Request::from_parts(parts, body))
}

/// Captures a [`ResponseSnapshot`] and hands the response back, buffering
/// the body only when a source-displaying option needs it.
pub async fn snapshot_response(
    response: Response,
    id: Uuid,
    include_source: bool,
) -> (ResponseSnapshot, Response) {
    let (parts, body) = response.into_parts();

    let status = parts.status.as_u16() as i64;
    let headers = headers_map(&parts.headers);

    let (source, body) = if include_source {
        match to_bytes(body, usize::MAX).await {
            Ok(bytes) => {
                let source = parse_body(&bytes);
                (source, Body::from(bytes))
            }
            Err(err) => {
                warn!(request_id = %id, error = %err, "failed to buffer response body");
                (empty_object(), Body::empty())
            }
        }
    } else {
        (empty_object(), body)
    };

    let snapshot = ResponseSnapshot {
        status,
        headers,
        source,
        completed: Utc::now(),
    };
    (snapshot, Response::from_parts(parts, body))
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Body bytes as a JSON value: JSON when it parses, a string otherwise,
/// an empty object when there is no body.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return empty_object();
    }
    if let Ok(value) = serde_json::from_slice(bytes) {
        return value;
    }
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

/// Scheme and authority of the request. Requests carrying a relative URI
/// (the common server-side case) resolve through the Host header.
fn origin(parts: &Parts) -> String {
    if let Some(authority) = parts.uri.authority() {
        let scheme = parts.uri.scheme_str().unwrap_or("http");
        return format!("{}://{}", scheme, authority);
    }
    parts
        .headers
        .get(HOST)
        .and_then(|host| host.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_default()
}

fn headers_map(headers: &HeaderMap) -> Value {
    let mut map = serde_json::Map::new();
    for (name, value) in headers {
        map.insert(
            name.to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }
    Value::Object(map)
}

/// Raw key/value view of the query string. Values are carried verbatim;
/// this is display-only data.
fn query_map(query: Option<&str>) -> Value {
    let mut map = serde_json::Map::new();
    if let Some(query) = query {
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    Value::Object(map)
}

/// Recovers path parameters by aligning the matched route pattern against
/// the concrete path, e.g. `/v1/items/:id` vs `/v1/items/42` -> `{id: 42}`.
/// A trailing wildcard captures the remainder of the path.
fn path_params(pattern: &str, path: &str) -> Value {
    let mut params = serde_json::Map::new();
    let mut actual = path.split('/');

    for segment in pattern.split('/') {
        let Some(concrete) = actual.next() else {
            break;
        };
        if let Some(name) = segment.strip_prefix(':') {
            params.insert(name.to_string(), Value::String(concrete.to_string()));
        } else if let Some(name) = segment.strip_prefix('*') {
            let mut rest = concrete.to_string();
            for more in actual.by_ref() {
                rest.push('/');
                rest.push_str(more);
            }
            params.insert(name.to_string(), Value::String(rest));
            break;
        }
    }

    Value::Object(params)
}
