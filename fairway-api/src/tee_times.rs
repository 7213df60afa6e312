use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use fairway_core::{Performance, Principal, Role, TeeTime};
use fairway_reserve::{classify_time_slot, determine_booking_type, HoldGrant, TimerStatus};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tee-times", post(register_tee_time).get(list_tee_times))
        .route("/v1/tee-times/{id}", get(get_tee_time))
        .route("/v1/tee-times/{id}/reserve", post(reserve))
        .route("/v1/tee-times/{id}/confirm", post(confirm))
        .route("/v1/tee-times/{id}/cancel", post(cancel))
        .route("/v1/tee-times/{id}/timer", get(timer_status))
        .route("/v1/tee-times/{id}/complete", post(complete_performance))
}

#[derive(Debug, Deserialize)]
pub struct RegisterTeeTimeRequest {
    pub course_id: Uuid,
    pub tee_date: NaiveDate,
    pub tee_off: NaiveTime,
    pub green_fee: i64,
    pub party_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub course_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub actual_player_count: i32,
    pub actual_fee: i64,
    pub notes: Option<String>,
}

/// POST /v1/tee-times
/// Register a slot on the tee sheet; it starts AVAILABLE.
async fn register_tee_time(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<RegisterTeeTimeRequest>,
) -> Result<(StatusCode, Json<TeeTime>), AppError> {
    if !principal.role.at_least(Role::GolfCourse) {
        return Err(AppError::AuthorizationError(format!(
            "role {} cannot register tee times",
            principal.role
        )));
    }
    if req.green_fee < 0 {
        return Err(AppError::ValidationError(
            "green fee cannot be negative".to_string(),
        ));
    }
    if req.party_size == 0 {
        return Err(AppError::ValidationError(
            "party size must be at least 1".to_string(),
        ));
    }

    let tee_time = TeeTime::new(
        req.course_id,
        req.tee_date,
        req.tee_off,
        req.green_fee,
        req.party_size as i32,
        classify_time_slot(req.tee_off),
        determine_booking_type(req.party_size),
        chrono::Utc::now(),
    );

    state
        .repo
        .insert(&tee_time)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    info!(tee_time = %tee_time.id, course = %tee_time.course_id, "tee time registered");
    Ok((StatusCode::CREATED, Json(tee_time)))
}

/// GET /v1/tee-times?course_id=..&date=..
async fn list_tee_times(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TeeTime>>, AppError> {
    let tee_times = state
        .repo
        .list(query.course_id, query.date)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(Json(tee_times))
}

/// GET /v1/tee-times/{id}
async fn get_tee_time(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeeTime>, AppError> {
    let tee_time = state
        .repo
        .find(id)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?
        .ok_or_else(|| AppError::NotFoundError(format!("tee time not found: {id}")))?;

    Ok(Json(tee_time))
}

/// POST /v1/tee-times/{id}/reserve
async fn reserve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<HoldGrant>, AppError> {
    let grant = state.manager.reserve(id, &principal).await?;
    Ok(Json(grant))
}

/// POST /v1/tee-times/{id}/confirm
async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<TeeTime>, AppError> {
    let tee_time = state.manager.confirm(id, &principal).await?;
    Ok(Json(tee_time))
}

/// POST /v1/tee-times/{id}/cancel
async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<TeeTime>, AppError> {
    let tee_time = state
        .manager
        .cancel(id, &principal, req.reason.as_deref())
        .await?;
    Ok(Json(tee_time))
}

/// GET /v1/tee-times/{id}/timer
/// Hold countdown; reading an overdue hold reverts it.
async fn timer_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimerStatus>, AppError> {
    let timer = state.manager.timer_status(id).await?;
    Ok(Json(timer))
}

/// POST /v1/tee-times/{id}/complete
async fn complete_performance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CompleteRequest>,
) -> Result<(StatusCode, Json<Performance>), AppError> {
    let performance = state
        .manager
        .complete_performance(
            id,
            &principal,
            req.actual_player_count,
            req.actual_fee,
            req.notes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(performance)))
}
