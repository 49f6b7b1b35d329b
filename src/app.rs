use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, intervals, items, users};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Build the full application router. Routes added before the guard layer
/// require a bearer credential; everything after it is public.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Protected API
        .merge(item_routes())
        .merge(interval_routes())
        .route("/api/auth", get(auth::current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/users", post(users::register))
        .route("/api/auth", post(auth::login))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn item_routes() -> Router<AppState> {
    use axum::routing::put;

    Router::new()
        .route("/api/items", get(items::list).post(items::create))
        .route("/api/items/increment/:id", put(items::increment))
        .route("/api/items/:id", put(items::update).delete(items::remove))
}

fn interval_routes() -> Router<AppState> {
    use axum::routing::delete;

    Router::new()
        .route("/api/intervals", get(intervals::list).post(intervals::create))
        .route("/api/intervals/:id", delete(intervals::remove))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Routinely API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "register": "POST /api/users (public)",
            "login": "POST /api/auth (public)",
            "current_user": "GET /api/auth (bearer)",
            "items": "GET|POST /api/items, PUT|DELETE /api/items/:id, PUT /api/items/increment/:id (bearer)",
            "intervals": "GET|POST /api/intervals, DELETE /api/intervals/:id (bearer)",
            "health": "GET /health (public)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now })),
        ),
        Err(err) => {
            tracing::error!("health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "error": "store unavailable"
                })),
            )
        }
    }
}
