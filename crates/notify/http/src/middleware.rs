//! HTTP middleware.

use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Log each request with its outcome and latency.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = latency_ms(started.elapsed());
    if status.is_server_error() {
        tracing::warn!(method = %method, path = %path, status = %status, latency_ms, "request failed");
    } else {
        tracing::info!(method = %method, path = %path, status = %status, latency_ms, "request completed");
    }

    response
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn latency_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_ms() {
        assert_eq!(latency_ms(Duration::from_micros(2_500)), 2);
        assert_eq!(latency_ms(Duration::MAX), u64::MAX);
    }
}
