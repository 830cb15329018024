use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::visited::VisitedPlaceRow;
use crate::state::AppState;
use crate::visited::store::{
    delete_visited, find_by_place_id, find_visited, insert_visited, list_visited, update_visited,
};
use crate::visited::validation::{
    validate_changes, validate_new_place, NewVisitedPlaceRequest, UpdateVisitedPlaceRequest,
};

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// `{message, data}` envelope shared by every visited-place response.
#[derive(Debug, Serialize)]
pub struct VisitedResponse<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> VisitedResponse<T> {
    fn new(message: &'static str, data: T) -> Json<Self> {
        Json(Self {
            message,
            data: Some(data),
        })
    }
}

fn validation_failed(errors: Vec<String>) -> AppError {
    AppError::UnprocessableEntity(format!("Validation failed: {}", errors.join(" ")))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Visited place {id} not found"))
}

/// GET /api/visited
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<VisitedResponse<Vec<VisitedPlaceRow>>>, AppError> {
    let places = list_visited(&state.db, params.user_id).await?;
    Ok(VisitedResponse::new(
        "Visited places retrieved successfully",
        places,
    ))
}

/// POST /api/visited
pub async fn handle_store(
    State(state): State<AppState>,
    Json(req): Json<NewVisitedPlaceRequest>,
) -> Result<(StatusCode, Json<VisitedResponse<VisitedPlaceRow>>), AppError> {
    let place = validate_new_place(req).map_err(validation_failed)?;

    if let Some(created) = insert_visited(&state.db, &place).await? {
        return Ok((
            StatusCode::CREATED,
            VisitedResponse::new("Place marked as visited successfully", created),
        ));
    }

    let existing = find_by_place_id(&state.db, place.user_id, &place.place_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("visit for '{}' conflicted but was not found", place.place_id))?;

    Ok((
        StatusCode::CONFLICT,
        VisitedResponse::new("Place already marked as visited", existing),
    ))
}

/// GET /api/visited/:id
pub async fn handle_show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<VisitedResponse<VisitedPlaceRow>>, AppError> {
    let place = find_visited(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(VisitedResponse::new(
        "Visited place retrieved successfully",
        place,
    ))
}

/// PUT /api/visited/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateVisitedPlaceRequest>,
) -> Result<Json<VisitedResponse<VisitedPlaceRow>>, AppError> {
    let user_id = req.user_id;
    let changes = validate_changes(req).map_err(validation_failed)?;

    let place = update_visited(&state.db, user_id, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(VisitedResponse::new(
        "Visited place updated successfully",
        place,
    ))
}

/// DELETE /api/visited/:id
pub async fn handle_destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<VisitedResponse<()>>, AppError> {
    if !delete_visited(&state.db, params.user_id, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(VisitedResponse {
        message: "Visited place removed successfully",
        data: None,
    }))
}
