use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /api/health
/// Returns a simple status object with the current time and service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api
/// Describes the service and lists its endpoints.
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "name": "MapGemi API",
        "description": "AI-Powered Location Finder API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /api/recommend?prompt=...": "Get location recommendations",
            "POST /api/recommend/alternatives": "Get alternative recommendations",
            "GET /api/visited?user_id=...": "Get visited places",
            "POST /api/visited": "Mark place as visited",
            "GET /api/visited/{id}?user_id=...": "Get specific visited place",
            "PUT /api/visited/{id}": "Update visited place",
            "DELETE /api/visited/{id}?user_id=...": "Remove visited place",
            "GET /api/health": "Health check",
        }
    }))
}
