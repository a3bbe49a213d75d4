//! Push HTTP handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use notify_core::{ErrorBody, PushError, PushRequest, PushResponse};
use notify_service::Push;

const CONTENT_TYPE_JSON: &str = "application/json";

/// Handle a push request.
pub async fn push_handler<S>(State(service): State<S>, headers: HeaderMap, body: Bytes) -> Response
where
    S: Push,
{
    match handle_push_inner(&service, &headers, &body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_reply(&e),
    }
}

async fn handle_push_inner<S: Push>(
    service: &S,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<PushResponse, PushError> {
    assert_content_type(headers)?;

    let request: PushRequest =
        serde_json::from_slice(body).map_err(|e| PushError::MalformedBody(e.to_string()))?;

    tracing::debug!(recipients = request.recipients.len(), "push request decoded");

    service.push(&request).await
}

/// Require a JSON body. Media type parameters such as `charset` are ignored.
fn assert_content_type(headers: &HeaderMap) -> Result<(), PushError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    if !media_type.eq_ignore_ascii_case(CONTENT_TYPE_JSON) {
        return Err(PushError::UnsupportedContentType(content_type.to_string()));
    }

    Ok(())
}

/// Log a failure and turn it into the uniform error body.
fn error_reply(e: &PushError) -> Response {
    let status = StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match e {
        PushError::ProtocolViolation { units, outcomes } => tracing::error!(
            status = status.as_u16(),
            units,
            outcomes,
            "delivery provider broke the batch contract"
        ),
        _ if e.is_client_error() => {
            tracing::warn!(status = status.as_u16(), error = %e, "push request rejected")
        }
        _ => tracing::error!(status = status.as_u16(), error = %e, "push request failed"),
    }

    let body = ErrorBody {
        status: status.as_u16(),
        message: e.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Liveness check.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
