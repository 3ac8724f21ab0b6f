//! HTTP handlers, one module per resource.

pub mod assist;
pub mod auth;
pub mod children;
pub mod conversations;
pub mod dashboard;
pub mod health;
pub mod insights;
pub mod recommendations;

use sprout_core::{Child, ChildRepository};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Fetch a child owned by the caller, or 404.
pub(crate) async fn owned_child(
    state: &AppState,
    parent_id: Uuid,
    child_id: Uuid,
) -> Result<Child, ApiError> {
    state
        .db
        .children
        .get_owned(parent_id, child_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Child not found".to_string()))
}

/// Non-blank string field or a 400 with `message`.
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

/// Required id field that must parse as a UUID.
pub(crate) fn required_id(value: Option<String>, message: &str) -> Result<Uuid, ApiError> {
    let raw = required(value, message)?;
    Uuid::parse_str(&raw).map_err(|_| ApiError::BadRequest(format!("Invalid id: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(None, "name is required").is_err());
        assert!(required(Some("   ".into()), "name is required").is_err());
        assert_eq!(required(Some(" Maya ".into()), "x").ok().as_deref(), Some("Maya"));
    }

    #[test]
    fn test_required_id_parses_uuid() {
        let id = Uuid::now_v7();
        assert_eq!(required_id(Some(id.to_string()), "x").ok(), Some(id));
        assert!(matches!(
            required_id(Some("not-a-uuid".into()), "x"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(required_id(None, "x"), Err(ApiError::BadRequest(_))));
    }
}
