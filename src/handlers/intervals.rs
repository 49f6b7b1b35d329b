use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::middleware::AuthUser;
use crate::models::{Interval, NewInterval};
use crate::state::AppState;

const DEFAULT_DAYS: i32 = 1;

fn interval_not_found() -> ApiError {
    ApiError::not_found("Interval not found")
}

#[derive(Debug, Deserialize)]
pub struct CreateIntervalBody {
    pub name: Option<String>,
    pub days: Option<i32>,
}

/// GET /api/intervals
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Interval>>, ApiError> {
    let intervals = state.store.intervals_for_owner(user.id).await?;
    Ok(Json(intervals))
}

/// POST /api/intervals
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateIntervalBody>,
) -> Result<Json<Interval>, ApiError> {
    let name = match body.name.filter(|name| !name.is_empty()) {
        Some(name) => name,
        None => {
            return Err(ApiError::validation(vec![FieldError::new(
                "name",
                "Name is required",
            )]))
        }
    };

    let interval = state
        .store
        .create_interval(NewInterval {
            owner: user.id,
            name,
            days: body.days.unwrap_or(DEFAULT_DAYS),
        })
        .await?;

    Ok(Json(interval))
}

/// DELETE /api/intervals/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let interval = state
        .store
        .find_interval(id)
        .await?
        .ok_or_else(interval_not_found)?;
    if interval.owner != user.id {
        return Err(ApiError::forbidden());
    }

    state.store.delete_interval(id).await?;

    Ok(Json(json!({ "msg": "Interval removed" })))
}
