use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VisitedPlaceRow {
    pub id: i64,
    pub user_id: Uuid,
    /// Upstream place identifier (e.g. a Google Places ID).
    pub place_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub menu_image_url: Option<String>,
    pub menu_table: Option<Value>,
    pub visited_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
