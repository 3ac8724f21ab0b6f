//! Bearer-token authentication extractors.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use sprout_core::defaults::TOKEN_PREFIX;
use sprout_core::{AuthPrincipal, TokenRepository};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Pull the token out of an `Authorization: Bearer ...` header value.
fn bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Extractor resolving the caller, if any.
#[derive(Debug, Clone)]
pub struct Auth {
    pub principal: AuthPrincipal,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);

        let principal = match token {
            // Unknown token formats never reach the database
            Some(token) if token.starts_with(TOKEN_PREFIX) => {
                match state.db.tokens.validate(token).await {
                    Ok(Some(user)) => AuthPrincipal::User {
                        user_id: user.id,
                        email: user.email,
                    },
                    Ok(None) => AuthPrincipal::Anonymous,
                    Err(e) => {
                        warn!(subsystem = "api", component = "auth", error = %e, "Token lookup failed");
                        AuthPrincipal::Anonymous
                    }
                }
            }
            _ => AuthPrincipal::Anonymous,
        };

        Ok(Auth { principal })
    }
}

/// Extractor that requires a valid token.
#[derive(Debug, Clone)]
pub struct RequireAuth {
    pub user_id: Uuid,
    pub email: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = Auth::from_request_parts(parts, state).await?;

        match auth.principal {
            AuthPrincipal::User { user_id, email } => Ok(RequireAuth { user_id, email }),
            AuthPrincipal::Anonymous => {
                Err(ApiError::Unauthorized("Unauthorized".to_string()))
            }
        }
    }
}
