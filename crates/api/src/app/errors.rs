use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use wareops_infra::{RecordError, StoreError};
use wareops_ledger::AllocationError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn unauthenticated(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthenticated", message)
}

pub fn forbidden(page: &str, action: &str) -> axum::response::Response {
    json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        format!("missing permission {page}:{action}"),
    )
}

pub fn missing_params(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "missing_params", message)
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "storage failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "server_error", err.to_string())
}

pub fn record_error_to_response(err: RecordError) -> axum::response::Response {
    match err {
        RecordError::Allocation(AllocationError::InvalidEntry(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_entry", msg)
        }
        RecordError::Allocation(AllocationError::CaseNotFound(key)) => json_error(
            StatusCode::NOT_FOUND,
            "case_not_found",
            format!("case not found: {key}"),
        ),
        // Carries the actual remainder so the operator can be told how many
        // lines are still open on the case.
        RecordError::Allocation(AllocationError::ExceedsRemaining { remaining }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({
                "error": "exceeds_remaining",
                "message": format!("requested lines exceed remaining capacity ({remaining} left)"),
                "remaining": remaining,
            })),
        )
            .into_response(),
        RecordError::Contention { key } => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("allocation for {key} kept conflicting, retry the submission"),
        ),
        RecordError::Store(e) => store_error_to_response(e),
    }
}
