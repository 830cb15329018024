//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::AppError;
use crate::llm_client::LlmError;
use crate::recommend::extractor::{extract, extract_detailed};
use crate::recommend::mock::mock_locations;
use crate::recommend::prompts::{alternatives_prompt, recommend_prompt};
use crate::recommend::record::LocationRecord;
use crate::state::AppState;

pub const MAX_PROMPT_CHARS: usize = 500;
pub const MAX_NAME_CHARS: usize = 255;

const RECOMMEND_UNAVAILABLE: &str = "Failed to get recommendations. Please try again later.";
const ALTERNATIVES_UNAVAILABLE: &str = "Failed to get alternative recommendations";
const MOCK_NOTE: &str = "Using mock data - Gemini API temporarily unavailable";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub message: String,
    pub query: String,
    /// Kept as `restaurants` for frontend compatibility, though any kind of
    /// location may appear.
    pub restaurants: Vec<LocationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlternativesRequest {
    pub visited_place_name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub message: String,
    pub visited_place: String,
    pub city: String,
    pub alternatives: Vec<LocationRecord>,
    pub raw_response: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/recommend?prompt=...
///
/// Asks Gemini for five locations matching the prompt and returns them as
/// normalized records. Food places always carry a menu reference.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> Result<Json<RecommendResponse>, AppError> {
    let prompt = require_text("prompt", params.prompt.as_deref(), MAX_PROMPT_CHARS)?;

    let raw_response = match state.llm.generate(&recommend_prompt(prompt)).await {
        Ok(text) => text,
        Err(e @ (LlmError::Http(_) | LlmError::Parse(_))) if state.config.mock_fallback => {
            error!("Error getting recommendations for prompt '{prompt}': {e}");
            return Ok(Json(RecommendResponse {
                message: "Recommendations retrieved successfully (mock data)".to_string(),
                query: prompt.to_string(),
                restaurants: mock_locations(),
                raw_response: None,
                note: Some(MOCK_NOTE.to_string()),
            }));
        }
        Err(e) => return Err(AppError::from_llm(e, RECOMMEND_UNAVAILABLE)),
    };

    let extraction = extract_detailed(&raw_response);
    info!(
        "Extracted {} recommendations via {:?} tier",
        extraction.records.len(),
        extraction.tier
    );

    Ok(Json(RecommendResponse {
        message: "Recommendations retrieved successfully".to_string(),
        query: prompt.to_string(),
        restaurants: extraction.records,
        raw_response: Some(raw_response),
        note: None,
    }))
}

/// POST /api/recommend/alternatives
///
/// Suggests 2-3 restaurants similar to one the user just visited.
pub async fn handle_alternatives(
    State(state): State<AppState>,
    Json(request): Json<AlternativesRequest>,
) -> Result<Json<AlternativesResponse>, AppError> {
    let visited_place = require_text(
        "visited_place_name",
        request.visited_place_name.as_deref(),
        MAX_NAME_CHARS,
    )?;
    let city = require_text("city", request.city.as_deref(), MAX_NAME_CHARS)?;

    let raw_response = state
        .llm
        .generate(&alternatives_prompt(visited_place, city))
        .await
        .map_err(|e| {
            error!("Error getting alternatives for '{visited_place}' in '{city}': {e}");
            AppError::from_llm(e, ALTERNATIVES_UNAVAILABLE)
        })?;

    let alternatives = extract(&raw_response);
    info!("Extracted {} alternatives for '{visited_place}'", alternatives.len());

    Ok(Json(AlternativesResponse {
        message: "Alternative recommendations retrieved successfully".to_string(),
        visited_place: visited_place.to_string(),
        city: city.to_string(),
        alternatives,
        raw_response,
    }))
}

/// Returns the trimmed value, or a validation error when it is missing,
/// blank, or longer than `max_chars`.
fn require_text<'a>(
    field: &str,
    value: Option<&'a str>,
    max_chars: usize,
) -> Result<&'a str, AppError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{field} may not be greater than {max_chars} characters"
        )));
    }
    Ok(value)
}
