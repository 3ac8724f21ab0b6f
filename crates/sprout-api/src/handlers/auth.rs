//! Sign-in: find-or-create the parent and issue a bearer token.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sprout_core::{TokenRepository, User, UserRepository};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: User,
}

/// Minimal shape check: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

#[utoipa::path(post, path = "/api/v1/auth/signin", tag = "Auth",
    responses(
        (status = 200, description = "Bearer token issued"),
        (status = 400, description = "Missing or invalid email")
    ))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    let email = body
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| is_valid_email(e))
        .ok_or_else(|| ApiError::BadRequest("A valid email is required".to_string()))?;

    let name = body
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let user = state.db.users.find_or_create(&email, name.as_deref()).await?;
    let token = state.db.tokens.issue(user.id).await?;

    info!(subsystem = "api", component = "auth", user_id = %user.id, "Parent signed in");
    Ok(Json(SignInResponse { token, user }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email("ana@@example.com"));
    }
}
