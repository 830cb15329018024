pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommend::handlers as recommend;
use crate::state::AppState;
use crate::visited::handlers as visited;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(health::index_handler))
        .route("/api/health", get(health::health_handler))
        // Recommendations
        .route("/api/recommend", get(recommend::handle_recommend))
        .route(
            "/api/recommend/alternatives",
            post(recommend::handle_alternatives),
        )
        // Visited places
        .route(
            "/api/visited",
            get(visited::handle_list).post(visited::handle_store),
        )
        .route(
            "/api/visited/:id",
            get(visited::handle_show)
                .put(visited::handle_update)
                .delete(visited::handle_destroy),
        )
        .with_state(state)
}
