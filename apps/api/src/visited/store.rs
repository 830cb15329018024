//! Postgres queries for the `visited_places` table. Every query is scoped to
//! the owning user.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::visited::VisitedPlaceRow;
use crate::visited::validation::{NewVisitedPlace, VisitedPlaceChanges};

/// Returns the user's visited places, most recent visit first.
pub async fn list_visited(pool: &PgPool, user_id: Uuid) -> Result<Vec<VisitedPlaceRow>, sqlx::Error> {
    sqlx::query_as::<_, VisitedPlaceRow>(
        "SELECT * FROM visited_places WHERE user_id = $1 ORDER BY visited_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_visited(
    pool: &PgPool,
    user_id: Uuid,
    id: i64,
) -> Result<Option<VisitedPlaceRow>, sqlx::Error> {
    sqlx::query_as::<_, VisitedPlaceRow>(
        "SELECT * FROM visited_places WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_place_id(
    pool: &PgPool,
    user_id: Uuid,
    place_id: &str,
) -> Result<Option<VisitedPlaceRow>, sqlx::Error> {
    sqlx::query_as::<_, VisitedPlaceRow>(
        "SELECT * FROM visited_places WHERE user_id = $1 AND place_id = $2",
    )
    .bind(user_id)
    .bind(place_id)
    .fetch_optional(pool)
    .await
}

/// Inserts a visit. Returns `None` when the user already has a row for this
/// `place_id`; the unique constraint decides, so concurrent inserts are safe.
pub async fn insert_visited(
    pool: &PgPool,
    place: &NewVisitedPlace,
) -> Result<Option<VisitedPlaceRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, VisitedPlaceRow>(
        r#"
        INSERT INTO visited_places
            (user_id, place_id, name, lat, lng, menu_image_url, menu_table, visited_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()))
        ON CONFLICT (user_id, place_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(place.user_id)
    .bind(&place.place_id)
    .bind(&place.name)
    .bind(place.lat)
    .bind(place.lng)
    .bind(&place.menu_image_url)
    .bind(&place.menu_table)
    .bind(place.visited_at)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = &row {
        info!(
            "Recorded visit {} to '{}' for user {}",
            row.id, row.place_id, row.user_id
        );
    }
    Ok(row)
}

/// Applies a partial update. Returns `None` when the row does not exist for
/// this user.
pub async fn update_visited(
    pool: &PgPool,
    user_id: Uuid,
    id: i64,
    changes: &VisitedPlaceChanges,
) -> Result<Option<VisitedPlaceRow>, sqlx::Error> {
    sqlx::query_as::<_, VisitedPlaceRow>(
        r#"
        UPDATE visited_places SET
            name           = COALESCE($3, name),
            lat            = COALESCE($4, lat),
            lng            = COALESCE($5, lng),
            menu_image_url = CASE WHEN $6 THEN $7 ELSE menu_image_url END,
            menu_table     = CASE WHEN $8 THEN $9 ELSE menu_table END,
            visited_at     = COALESCE($10, visited_at),
            updated_at     = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&changes.name)
    .bind(changes.lat)
    .bind(changes.lng)
    .bind(changes.menu_image_url.is_some())
    .bind(changes.menu_image_url.clone().flatten())
    .bind(changes.menu_table.is_some())
    .bind(changes.menu_table.clone().flatten())
    .bind(changes.visited_at)
    .fetch_optional(pool)
    .await
}

/// Deletes a visit. Returns whether a row was removed.
pub async fn delete_visited(pool: &PgPool, user_id: Uuid, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM visited_places WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
