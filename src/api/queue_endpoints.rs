use crate::api::requests::{AddUserRequest, CreatedQueue, JoinRequest, JoinedQueue, QueueUsers};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpResponse, Responder};
use serde_json::json;

#[post("/create_queue")]
pub async fn create_queue(state: Data<AppState>) -> ServiceResult<impl Responder> {
    let queue_id = state.registry.lock().await.create_queue()?;
    let queue_url = state.config.join_url(&queue_id);

    Ok(Json(CreatedQueue { queue_id, queue_url }))
}

#[get("/queue/{queue_id}/qr")]
pub async fn queue_qr(state: Data<AppState>, path: Path<String>) -> ServiceResult<HttpResponse> {
    let queue_id = path.into_inner();

    if !state.registry.lock().await.contains(&queue_id) {
        return Err(ServiceError::NotFound);
    }

    let url = state.config.join_url(&queue_id);
    let bytes = state.qr_cache.fetch(&queue_id, &url).await?;

    Ok(HttpResponse::Ok().content_type("image/png").body(bytes))
}

#[get("/api/queue/{queue_id}/data")]
pub async fn queue_data(state: Data<AppState>, path: Path<String>) -> ServiceResult<impl Responder> {
    let users = state.registry.lock().await.queue_users(&path.into_inner())?;

    Ok(Json(QueueUsers { users }))
}

#[post("/api/queue/{queue_id}/join")]
pub async fn queue_join(
    state: Data<AppState>,
    path: Path<String>,
    payload: Option<Json<JoinRequest>>,
) -> ServiceResult<impl Responder> {
    let requested = payload.and_then(|p| p.into_inner().name);

    let (name, position) = state
        .registry
        .lock()
        .await
        .join_queue(&path.into_inner(), requested)?;

    Ok(Json(JoinedQueue { name, position }))
}

#[post("/api/queue/{queue_id}/add")]
pub async fn queue_add(
    state: Data<AppState>,
    path: Path<String>,
    payload: Option<Json<AddUserRequest>>,
) -> ServiceResult<impl Responder> {
    let name = payload.and_then(|p| p.into_inner().name).unwrap_or_default();

    state.registry.lock().await.add_user(&path.into_inner(), &name)?;

    Ok(Json(json!({ "ok": true })))
}

/// Serves the front of the queue, then logs the event to the stats ledger.
/// The two documents are updated in independent transactions; the registry
/// and ledger locks are never held together.
#[post("/api/queue/{queue_id}/next")]
pub async fn queue_next(state: Data<AppState>, path: Path<String>) -> ServiceResult<impl Responder> {
    let queue_id = path.into_inner();

    let removed = state.registry.lock().await.serve_next(&queue_id)?;

    if let Some(user) = &removed {
        state.ledger.lock().await.record_served(&queue_id, user)?;
    }

    Ok(Json(json!({ "removed": removed })))
}

#[post("/api/queue/{queue_id}/clear")]
pub async fn queue_clear(state: Data<AppState>, path: Path<String>) -> ServiceResult<impl Responder> {
    state.registry.lock().await.clear_queue(&path.into_inner())?;

    Ok(Json(json!({ "ok": true })))
}

#[post("/api/queue/{queue_id}/delete")]
pub async fn queue_delete(state: Data<AppState>, path: Path<String>) -> ServiceResult<impl Responder> {
    let queue_id = path.into_inner();

    state.registry.lock().await.delete_queue(&queue_id)?;
    state.qr_cache.invalidate(&queue_id).await?;
    state.ledger.lock().await.record_deletion(&queue_id)?;

    Ok(Json(json!({
        "ok": true,
        "message": format!("Queue {queue_id} deleted"),
    })))
}
