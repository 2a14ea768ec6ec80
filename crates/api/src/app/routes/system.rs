use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use wareops_auth::AuthContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "userId": ctx.user_id,
        "role": ctx.role,
        "permissions": ctx.permissions,
        "branch": ctx.branch,
    }))
}
