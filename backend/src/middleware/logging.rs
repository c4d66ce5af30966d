use axum::{
    body::{to_bytes, Body, Bytes, HttpBody},
    http::{header::CONTENT_LENGTH, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Logs every 4xx/5xx response together with a preview of its body. Bodies of
/// known size up to `MAX_BUFFERED_BODY_BYTES` are buffered and handed back
/// unchanged; larger or streamed bodies pass through without a preview.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    let bufferable = body
        .size_hint()
        .upper()
        .is_some_and(|len| len <= MAX_BUFFERED_BODY_BYTES as u64);
    let (body, preview) = if !bufferable {
        let size = body
            .size_hint()
            .upper()
            .map_or_else(|| "unknown size".to_string(), |len| format!("{} bytes", len));
        (body, format!("<body not buffered: {}>", size))
    } else {
        match to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
            Ok(bytes) => {
                let preview = preview(&bytes);
                (Body::from(bytes), preview)
            }
            Err(err) => {
                parts.headers.remove(CONTENT_LENGTH);
                (Body::empty(), format!("<unreadable body: {}>", err))
            }
        }
    };

    let uri = uri.to_string();
    let event = ErrorEvent {
        status,
        method: method.as_str(),
        uri: &uri,
        request_id: &request_id,
        latency_ms,
        body: &preview,
    };
    event.emit();

    Response::from_parts(parts, body)
}

struct ErrorEvent<'a> {
    status: StatusCode,
    method: &'a str,
    uri: &'a str,
    request_id: &'a str,
    latency_ms: u64,
    body: &'a str,
}

impl ErrorEvent<'_> {
    fn emit(&self) {
        let status = self.status.as_u16();
        if self.status.is_server_error() {
            tracing::error!(
                status,
                method = self.method,
                uri = self.uri,
                request_id = self.request_id,
                latency_ms = self.latency_ms,
                body = self.body,
                "Request failed"
            );
        } else {
            tracing::warn!(
                status,
                method = self.method,
                uri = self.uri,
                request_id = self.request_id,
                latency_ms = self.latency_ms,
                body = self.body,
                "Request rejected"
            );
        }
    }
}

fn preview(bytes: &Bytes) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn error_body_passes_through_unchanged() {
        let app = Router::new()
            .route(
                "/",
                get(|| async { (StatusCode::NOT_FOUND, "Student not found") }),
            )
            .layer(axum::middleware::from_fn(log_error_responses));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Student not found");
    }

    #[tokio::test]
    async fn oversized_error_body_is_not_dropped() {
        let large = "x".repeat(MAX_BUFFERED_BODY_BYTES * 2);
        let expected = large.clone();
        let app = Router::new()
            .route(
                "/",
                get(move || {
                    let large = large.clone();
                    async move { (StatusCode::BAD_REQUEST, large) }
                }),
            )
            .layer(axum::middleware::from_fn(log_error_responses));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.len(), expected.len());
    }

    #[test]
    fn long_bodies_are_truncated_in_preview() {
        let bytes = Bytes::from(vec![b'a'; MAX_LOGGED_BODY_BYTES + 10]);
        let text = preview(&bytes);
        assert!(text.ends_with(&format!("(truncated, {} bytes total)", MAX_LOGGED_BODY_BYTES + 10)));
    }
}
