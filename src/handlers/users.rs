use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, FieldError};
use crate::models::NewUser;
use crate::state::AppState;

const MIN_PASSWORD_CHARS: usize = 6;

/// Response body for register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenBody {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Plausibility check, not RFC validation.
pub(crate) fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<TokenBody>, ApiError> {
    let name = body.name.unwrap_or_default();
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Please add a name"));
    }
    if !looks_like_email(&email) {
        errors.push(FieldError::new("email", "Please include a valid email"));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(FieldError::new(
            "password",
            "Please enter a password with 6 or more characters",
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("User already exists"));
    }

    let hash = hash_password(password).await?;
    let user = state
        .store
        .create_user(NewUser {
            name,
            email,
            password: hash,
        })
        .await?;

    let token = state.keys.sign(user.id).map_err(|err| {
        tracing::error!("token signing failed: {err}");
        ApiError::server()
    })?;

    Ok(Json(TokenBody { token }))
}

/// bcrypt is CPU-bound, so it runs off the async runtime.
async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|err| {
            tracing::error!("hash task failed: {err}");
            ApiError::server()
        })?
        .map_err(|err| {
            tracing::error!("password hashing failed: {err}");
            ApiError::server()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_plausibility() {
        assert!(looks_like_email("ida@example.com"));
        assert!(looks_like_email("ida+tasks@mail.example.org"));
        assert!(!looks_like_email("ida"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ida@example"));
        assert!(!looks_like_email("ida@.com"));
    }
}
