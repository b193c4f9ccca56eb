use crate::error::ServiceResult;
use crate::state::AppState;
use actix_web::web::{Data, Json};
use actix_web::{get, post, Responder};
use serde_json::json;

#[get("/api/admin/stats")]
pub async fn admin_stats(state: Data<AppState>) -> impl Responder {
    Json(state.aggregator.dashboard_stats().await)
}

#[get("/api/admin/queues")]
pub async fn admin_queues(state: Data<AppState>) -> impl Responder {
    Json(state.aggregator.queues_overview().await)
}

#[post("/api/admin/history/clear_last")]
pub async fn clear_last_history(state: Data<AppState>) -> ServiceResult<impl Responder> {
    let body = match state.ledger.lock().await.clear_last()? {
        Some(removed) => json!({
            "ok": true,
            "message": "Last entry cleared",
            "removed": removed,
        }),
        None => json!({
            "ok": false,
            "message": "No history to clear",
        }),
    };

    Ok(Json(body))
}

#[post("/api/admin/history/clear_all")]
pub async fn clear_all_history(state: Data<AppState>) -> ServiceResult<impl Responder> {
    let cleared = state.ledger.lock().await.clear_all()?;

    Ok(Json(json!({
        "ok": true,
        "message": format!("Cleared {cleared} history items."),
    })))
}
