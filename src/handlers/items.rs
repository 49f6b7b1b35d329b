use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::middleware::AuthUser;
use crate::models::{ItemPatch, NewItem, ResolvedItem};
use crate::state::AppState;

const DEFAULT_CATEGORY: &str = "personal";

fn item_not_found() -> ApiError {
    ApiError::not_found("Item not found")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemBody {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub done_num: Option<i64>,
    pub category: Option<String>,
    pub interval_ref: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemBody {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub done_num: Option<i64>,
    pub interval_ref: Option<Uuid>,
    pub category: Option<String>,
}

/// How `derive_fields` treats the incoming `doneNum`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum UpdateMode {
    Set,
    Increment,
}

/// Build the patch for the shared update path. Falsy values (absent field,
/// empty string, zero doneNum) mean "not provided" and leave the stored
/// field untouched; in particular the counter cannot be reset to zero and
/// `intervalRef` cannot be cleared here. Increment derives the new counter
/// from the body value plus one, never from the stored row.
fn derive_fields(mode: UpdateMode, body: UpdateItemBody) -> ItemPatch {
    let done_num = match body.done_num {
        None | Some(0) => None,
        Some(n) => match mode {
            UpdateMode::Set => Some(n),
            // Clamp at the ceiling instead of overflowing.
            UpdateMode::Increment => Some(n.checked_add(1).unwrap_or(i64::MAX)),
        },
    };

    ItemPatch {
        name: body.name.filter(|name| !name.is_empty()),
        date: body.date,
        done_num,
        interval_ref: body.interval_ref,
        category: body.category.filter(|category| !category.is_empty()),
    }
}

/// GET /api/items
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ResolvedItem>>, ApiError> {
    let items = state.store.items_for_owner(user.id).await?;
    Ok(Json(items))
}

/// POST /api/items
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateItemBody>,
) -> Result<Json<ResolvedItem>, ApiError> {
    let name = match body.name.filter(|name| !name.is_empty()) {
        Some(name) => name,
        None => {
            return Err(ApiError::validation(vec![FieldError::new(
                "name",
                "Name is required",
            )]))
        }
    };

    let new = NewItem {
        owner: user.id,
        name,
        done_num: body.done_num,
        category: body
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        date: body.date.unwrap_or_else(Utc::now),
        interval_ref: body.interval_ref,
    };

    let item = state.store.create_item(new).await?;
    let resolved = state
        .store
        .resolve_item(item.id)
        .await?
        .ok_or_else(item_not_found)?;

    Ok(Json(resolved))
}

/// PUT /api/items/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<ResolvedItem>, ApiError> {
    apply_update(&state, &user, id, UpdateMode::Set, body).await
}

/// PUT /api/items/increment/:id
pub async fn increment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<ResolvedItem>, ApiError> {
    apply_update(&state, &user, id, UpdateMode::Increment, body).await
}

/// Shared update path: lookup, ownership check, patch, resolved read-back.
async fn apply_update(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    mode: UpdateMode,
    body: UpdateItemBody,
) -> Result<Json<ResolvedItem>, ApiError> {
    let item = state.store.find_item(id).await?.ok_or_else(item_not_found)?;
    if item.owner != user.id {
        return Err(ApiError::forbidden());
    }

    let patch = derive_fields(mode, body);
    state.store.update_item_fields(id, patch).await?;

    let resolved = state
        .store
        .resolve_item(id)
        .await?
        .ok_or_else(item_not_found)?;

    Ok(Json(resolved))
}

/// DELETE /api/items/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let item = state.store.find_item(id).await?.ok_or_else(item_not_found)?;
    if item.owner != user.id {
        return Err(ApiError::forbidden());
    }

    state.store.delete_item(id).await?;

    Ok(Json(json!({ "msg": "Item removed" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(done_num: Option<i64>) -> UpdateItemBody {
        UpdateItemBody {
            name: None,
            date: None,
            done_num,
            interval_ref: None,
            category: None,
        }
    }

    #[test]
    fn set_mode_passes_done_num_through() {
        let patch = derive_fields(UpdateMode::Set, body(Some(5)));
        assert_eq!(patch.done_num, Some(5));
    }

    #[test]
    fn increment_mode_adds_one_to_body_value() {
        let patch = derive_fields(UpdateMode::Increment, body(Some(5)));
        assert_eq!(patch.done_num, Some(6));
    }

    #[test]
    fn increment_clamps_at_the_counter_ceiling() {
        let patch = derive_fields(UpdateMode::Increment, body(Some(i64::MAX)));
        assert_eq!(patch.done_num, Some(i64::MAX));
    }

    #[test]
    fn zero_done_num_is_skipped_in_both_modes() {
        assert_eq!(derive_fields(UpdateMode::Set, body(Some(0))).done_num, None);
        assert_eq!(
            derive_fields(UpdateMode::Increment, body(Some(0))).done_num,
            None
        );
    }

    #[test]
    fn absent_done_num_is_skipped() {
        assert_eq!(derive_fields(UpdateMode::Increment, body(None)).done_num, None);
    }

    #[test]
    fn empty_strings_are_skipped() {
        let patch = derive_fields(
            UpdateMode::Set,
            UpdateItemBody {
                name: Some(String::new()),
                date: None,
                done_num: None,
                interval_ref: None,
                category: Some(String::new()),
            },
        );
        assert_eq!(patch, ItemPatch::default());
    }

    #[test]
    fn provided_fields_land_in_the_patch() {
        let interval_ref = Uuid::new_v4();
        let patch = derive_fields(
            UpdateMode::Set,
            UpdateItemBody {
                name: Some("feed the cat".to_string()),
                date: None,
                done_num: Some(3),
                interval_ref: Some(interval_ref),
                category: Some("chores".to_string()),
            },
        );

        assert_eq!(patch.name.as_deref(), Some("feed the cat"));
        assert_eq!(patch.done_num, Some(3));
        assert_eq!(patch.interval_ref, Some(interval_ref));
        assert_eq!(patch.category.as_deref(), Some("chores"));
    }
}
