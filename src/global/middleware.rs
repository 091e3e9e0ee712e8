//! Request tracing and HTTP metrics.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Open a span per request carrying its id, log start and completion, and
/// record request metrics.
///
/// An incoming `x-request-id` is reused so ids can be correlated with the
/// caller's logs; otherwise a fresh UUID is generated. The id is echoed on
/// the response.
pub async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        tracing::info!("Request started");
        let start = Instant::now();

        let mut response = next.run(request).await;

        let duration = start.elapsed();
        let status = response.status().as_u16();
        tracing::info!(status, duration_ms = duration.as_millis() as u64, "Request completed");
        record_request_metrics(&method, &path, status, duration);

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

fn record_request_metrics(method: &Method, path: &str, status: u16, duration: Duration) {
    let method = method.to_string();
    let path = normalize_path(path);
    let status = status.to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration.as_secs_f64());
}

/// Collapse paths to at most three segments to bound label cardinality.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).take(3).collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_should_keep_short_paths() {
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/api/offers/generate"), "/api/offers/generate");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn normalize_path_should_truncate_deep_paths() {
        assert_eq!(
            normalize_path("/swagger-ui/static/css/app.css"),
            "/swagger-ui/static/css"
        );
    }
}
