//! Goat CRUD handlers: index, show, create, update, destroy.
//!
//! The status code of a failure depends on the action, not on the kind of
//! error: update answers 400 for an unknown id while destroy answers 404.

use crate::error::{ApiError, ErrorExposure, GoatError};
use crate::model::GoatInput;
use crate::response::{success_created, success_ok};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Ids that are not integers cannot name an existing goat.
fn parse_id(id_str: &str) -> Result<i32, GoatError> {
    id_str.trim().parse().map_err(|_| GoatError::NotFound)
}

fn reject(errors: ErrorExposure, status: StatusCode) -> impl Fn(GoatError) -> ApiError {
    move |err| {
        tracing::debug!(error = %err, kind = ?err.kind(), status = status.as_u16(), "goat request failed");
        ApiError::new(status, errors.client_message(&err))
    }
}

fn body(payload: Result<Json<GoatInput>, JsonRejection>) -> Result<GoatInput, ApiError> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))
}

pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let goats = state
        .goats
        .get_all()
        .await
        .map_err(reject(state.errors, StatusCode::INTERNAL_SERVER_ERROR))?;
    Ok(success_ok(goats))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let fail = reject(state.errors, StatusCode::NOT_FOUND);
    let id = parse_id(&id_str).map_err(&fail)?;
    let goat = state.goats.find_by_id(id).await.map_err(&fail)?;
    Ok(success_ok(goat))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<GoatInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    let goat = state
        .goats
        .create(&input)
        .await
        .map_err(reject(state.errors, StatusCode::BAD_REQUEST))?;
    tracing::info!(id = goat.id, "goat created");
    Ok(success_created(goat))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    payload: Result<Json<GoatInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let fail = reject(state.errors, StatusCode::BAD_REQUEST);
    let id = parse_id(&id_str).map_err(&fail)?;
    let existing = state.goats.find_by_id(id).await.map_err(&fail)?;
    let input = body(payload)?;
    let goat = state.goats.update(&existing, &input).await.map_err(&fail)?;
    Ok(success_ok(goat))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let fail = reject(state.errors, StatusCode::NOT_FOUND);
    let id = parse_id(&id_str).map_err(&fail)?;
    let existing = state.goats.find_by_id(id).await.map_err(&fail)?;
    state.goats.destroy(&existing).await.map_err(&fail)?;
    tracing::info!(id, "goat deleted");
    Ok(StatusCode::NO_CONTENT)
}
