use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use serde_json::json;

use wareops_core::EmployeeNo;
use wareops_infra::{RetryPolicy, with_backoff};

use crate::app::{dto, errors, services::AppServices};
use crate::middleware::SESSION_COOKIE;

pub fn router() -> Router {
    Router::new().route("/session", post(login).delete(logout))
}

/// Login by employee number.
///
/// The directory lookup is wrapped in exponential backoff: a cold store or a
/// transient network failure should not bounce an operator back to the login
/// screen. The issued cookie is a raw lookup key (JSON `{"id": ...}`) with no
/// signature and no server-side expiry beyond the cookie max-age.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let employee_no = body.employee_no.trim();
    if employee_no.is_empty() {
        return errors::missing_params("employeeNo is required");
    }
    let employee_no = EmployeeNo::new(employee_no);

    let directory = services.directory();
    let lookup = with_backoff(RetryPolicy::default(), "login_user_lookup", || {
        let directory = directory.clone();
        let employee_no = employee_no.clone();
        async move { directory.find_user_by_employee_no(&employee_no).await }
    })
    .await;

    let user = match lookup {
        Ok(Some(user)) => user,
        Ok(None) => {
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "unknown employee number",
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "login lookup failed after retries");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                e.to_string(),
            );
        }
    };

    tracing::info!(user_id = %user.id, "login succeeded");

    let cookie_value = json!({ "id": user.id }).to_string();
    let cookie =
        format!("{SESSION_COOKIE}={cookie_value}; Path=/; HttpOnly; SameSite=Lax; Max-Age=43200");

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "ok": true,
            "user": {
                "id": user.id,
                "employeeNo": user.employee_no,
                "fullName": user.full_name,
                "role": user.role,
                "branch": user.branch,
            },
        })),
    )
        .into_response()
}

pub async fn logout() -> axum::response::Response {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "ok": true })),
    )
        .into_response()
}
