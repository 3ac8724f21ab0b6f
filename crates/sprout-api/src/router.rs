//! Router assembly: routes, OpenAPI docs, and the middleware stack.

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::{Config, SwaggerUi};
use uuid::Uuid;

use crate::handlers::{
    assist, auth, children, conversations, dashboard, health, insights, recommendations,
};
use crate::state::AppState;

/// Origins allowed when `ALLOWED_ORIGINS` is unset.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sprout API",
        description = "Parent/child conversation insights: recording, analysis, visualization and recommendations"
    ),
    paths(
        health::health_check,
        auth::sign_in,
        children::list_children,
        children::create_child,
        children::get_child,
        children::delete_child,
        children::get_visualization,
        children::get_playlist,
        conversations::list_conversations,
        conversations::create_conversation,
        conversations::get_conversation,
        conversations::reprocess_conversation,
        insights::list_insights,
        dashboard::get_dashboard,
        recommendations::list_recommendations,
        recommendations::generate_recommendations,
        assist::interactive,
        assist::real_time,
        assist::family,
        assist::guidance,
    ),
    tags(
        (name = "System", description = "Health checks"),
        (name = "Auth", description = "Sign-in and bearer tokens"),
        (name = "Children", description = "Child profiles, visualization and playlists"),
        (name = "Conversations", description = "Recorded conversations and their analysis"),
        (name = "Insights", description = "Insights extracted from conversations"),
        (name = "Dashboard", description = "Parent overview"),
        (name = "Recommendations", description = "Content and activity recommendations"),
        (name = "Assist", description = "Live conversation support")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as YAML.
async fn openapi_yaml() -> impl IntoResponse {
    match ApiDoc::openapi().to_yaml() {
        Ok(spec) => ([(header::CONTENT_TYPE, "application/yaml")], spec).into_response(),
        Err(e) => {
            tracing::error!(subsystem = "api", error = %e, "OpenAPI serialization failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Parse a comma-separated origin list, skipping invalid entries.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    let raw = if raw.trim().is_empty() {
        DEFAULT_ALLOWED_ORIGINS
    } else {
        raw
    };

    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(subsystem = "api", "Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "rate_limit_exceeded",
                    "error_description": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

/// Build the application router with all routes and middleware.
pub fn build_router(
    state: AppState,
    allowed_origins: Vec<HeaderValue>,
    max_body_bytes: usize,
) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(
            SwaggerUi::new("/docs").config(
                Config::new(["/openapi.yaml"])
                    .try_it_out_enabled(true)
                    .filter(true)
                    .display_request_duration(true),
            ),
        )
        .route("/openapi.yaml", get(openapi_yaml))
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/auth/signin", post(auth::sign_in))
        // Children
        .route(
            "/api/v1/children",
            get(children::list_children).post(children::create_child),
        )
        .route(
            "/api/v1/children/:id",
            get(children::get_child).delete(children::delete_child),
        )
        .route(
            "/api/v1/children/:id/visualization",
            get(children::get_visualization),
        )
        .route("/api/v1/children/:id/playlist", get(children::get_playlist))
        // Conversations
        .route(
            "/api/v1/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route(
            "/api/v1/conversations/:id",
            get(conversations::get_conversation),
        )
        .route(
            "/api/v1/conversations/:id/reprocess",
            post(conversations::reprocess_conversation),
        )
        .route("/api/v1/insights", get(insights::list_insights))
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route(
            "/api/v1/recommendations",
            get(recommendations::list_recommendations)
                .post(recommendations::generate_recommendations),
        )
        // Assist
        .route("/api/v1/assist/interactive", post(assist::interactive))
        .route("/api/v1/assist/real-time", post(assist::real_time))
        .route("/api/v1/assist/family", post(assist::family))
        .route("/api/v1/assist/guidance", post(assist::guidance))
        // Middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins() {
        let origins = parse_allowed_origins("https://a.example, ,http://localhost:5173");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://a.example");
    }

    #[test]
    fn test_blank_origins_use_default() {
        let origins = parse_allowed_origins("  ");
        assert_eq!(origins, vec![HeaderValue::from_static(DEFAULT_ALLOWED_ORIGINS)]);
    }

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/children/{id}/visualization"));
        assert!(doc.paths.paths.contains_key("/api/v1/assist/guidance"));
    }
}
