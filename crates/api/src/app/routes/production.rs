use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use wareops_auth::AuthContext;
use wareops_core::{CaseKey, UserId, WorkDate};
use wareops_ledger::{DailySummary, PackingEntry, SortingEntry};

use crate::app::{dto, errors, services::AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/entries", post(submit_entries))
        .route("/cases", get(get_case))
        .route("/summary", get(get_summary))
}

/// Submit a day's sorting/packing entries.
///
/// Sorting entries consume case capacity, one transaction per case; packing
/// entries are audit-only. Submissions are NOT idempotent: a client retry of
/// the same payload consumes capacity again (there is no dedup key in the
/// wire format).
pub async fn submit_entries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::ProductionEntriesRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, "production", "add") {
        return resp;
    }

    let Ok(date) = body.date.parse::<WorkDate>() else {
        return errors::missing_params("date is required (YYYY-MM-DD)");
    };
    let user_id = body.user_id.trim();
    if user_id.is_empty() {
        return errors::missing_params("userId is required");
    }

    let sorting: Vec<SortingEntry> = body.sorting_entries.into_iter().map(Into::into).collect();
    let packing: Vec<PackingEntry> = body.packing_entries.into_iter().map(Into::into).collect();

    match services
        .record_production(date, UserId::new(user_id), sorting, packing)
        .await
    {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({ "ok": true, "summary": summary })),
        )
            .into_response(),
        Err(e) => errors::record_error_to_response(e),
    }
}

/// Current state of one case, with `remainingLines`/`fullySorted` recomputed.
pub async fn get_case(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<dto::CaseQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, "production", "view") {
        return resp;
    }

    let (Some(shipment_id), Some(case_number)) = (query.shipment_id, query.case_number) else {
        return errors::missing_params("shipmentId and caseNumber are required");
    };
    if shipment_id.trim().is_empty() || case_number.trim().is_empty() {
        return errors::missing_params("shipmentId and caseNumber are required");
    }

    let key = CaseKey::new(shipment_id, case_number);
    match services.case_state(&key).await {
        Ok(Some(state)) => (StatusCode::OK, Json(state)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "case_not_found",
            format!("case not found: {key}"),
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Merged per-user daily totals (read side of the audit aggregate).
pub async fn get_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<dto::SummaryQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, "production", "view") {
        return resp;
    }

    let Some(date) = query.date.as_deref().and_then(|d| d.parse::<WorkDate>().ok()) else {
        return errors::missing_params("date is required (YYYY-MM-DD)");
    };
    let Some(user_id) = query.user_id.filter(|u| !u.trim().is_empty()) else {
        return errors::missing_params("userId is required");
    };
    let user_id = UserId::new(user_id);

    match services.daily_summary(date, &user_id).await {
        Ok(summary) => {
            let summary = summary.unwrap_or_else(|| DailySummary::empty(date, user_id));
            (
                StatusCode::OK,
                Json(json!({ "ok": true, "summary": summary })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
