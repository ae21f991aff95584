// handlers/public/system.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET / - service identity
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.config.environment,
            "endpoints": {
                "public": ["/", "/health", "/auth/register", "/auth/login"],
                "protected": [
                    "/api/auth/whoami",
                    "/api/categories",
                    "/api/add-ons",
                    "/api/order-types",
                    "/api/outlets"
                ]
            }
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": {
                        "code": "SERVICE_UNAVAILABLE",
                        "message": "Database unreachable"
                    }
                })),
            )
        }
    }
}
