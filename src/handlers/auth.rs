use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::error::{ApiError, FieldError};
use crate::handlers::users::{looks_like_email, TokenBody};
use crate::middleware::AuthUser;
use crate::models::UserProfile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<TokenBody>, ApiError> {
    let email = body.email.unwrap_or_default();

    let mut errors = Vec::new();
    if !looks_like_email(&email) {
        errors.push(FieldError::new("email", "Please include a valid email"));
    }
    if body.password.is_none() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    let password = body.password.unwrap_or_default();

    // Same response for unknown email and wrong password
    let user = match state.store.find_user_by_email(&email).await? {
        Some(user) => user,
        None => return Err(ApiError::bad_request("Invalid Credentials")),
    };

    let user_id = user.id;
    if !verify_password(password, user.password).await? {
        return Err(ApiError::bad_request("Invalid Credentials"));
    }

    let token = state.keys.sign(user_id).map_err(|err| {
        tracing::error!("token signing failed: {err}");
        ApiError::server()
    })?;

    Ok(Json(TokenBody { token }))
}

/// GET /api/auth
pub async fn current_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state
        .store
        .find_user(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserProfile::from(user)))
}

/// bcrypt comparison, run off the async runtime like hashing.
async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| {
            tracing::error!("verify task failed: {err}");
            ApiError::server()
        })?
        .map_err(|err| {
            tracing::error!("password verification failed: {err}");
            ApiError::server()
        })
}
