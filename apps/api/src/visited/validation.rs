//! Request validation for the visited-place store.
//!
//! Every check runs and all failures are reported together, so the client can
//! fix a whole form in one round trip.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

pub const MAX_FIELD_CHARS: usize = 255;

#[derive(Debug, Deserialize)]
pub struct NewVisitedPlaceRequest {
    pub user_id: Uuid,
    pub place_id: Option<String>,
    pub name: Option<String>,
    /// Accepts a JSON number or a numeric string; recommendations carry
    /// coordinates as strings.
    pub lat: Option<Value>,
    pub lng: Option<Value>,
    pub menu_image_url: Option<String>,
    pub menu_table: Option<Value>,
    pub visited_at: Option<String>,
}

/// Partial update. For the nullable menu fields, `Some(None)` means an
/// explicit `null` (clear the column) and `None` means the key was absent.
#[derive(Debug, Deserialize)]
pub struct UpdateVisitedPlaceRequest {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub lat: Option<Value>,
    pub lng: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub menu_image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub menu_table: Option<Option<Value>>,
    pub visited_at: Option<String>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVisitedPlace {
    pub user_id: Uuid,
    pub place_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub menu_image_url: Option<String>,
    pub menu_table: Option<Value>,
    /// `None` lets the database stamp the current time.
    pub visited_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitedPlaceChanges {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub menu_image_url: Option<Option<String>>,
    pub menu_table: Option<Option<Value>>,
    pub visited_at: Option<DateTime<Utc>>,
}

pub fn validate_new_place(req: NewVisitedPlaceRequest) -> Result<NewVisitedPlace, Vec<String>> {
    let mut errors = Vec::new();

    let place_id = required_text("place_id", req.place_id.as_deref(), &mut errors);
    let name = required_text("name", req.name.as_deref(), &mut errors);
    let lat = required_coordinate("lat", req.lat.as_ref(), 90.0, &mut errors);
    let lng = required_coordinate("lng", req.lng.as_ref(), 180.0, &mut errors);
    check_menu_image_url(req.menu_image_url.as_deref(), &mut errors);
    check_menu_table(req.menu_table.as_ref(), &mut errors);
    let visited_at = optional_timestamp(req.visited_at.as_deref(), &mut errors);

    match (place_id, name, lat, lng) {
        (Some(place_id), Some(name), Some(lat), Some(lng)) if errors.is_empty() => {
            Ok(NewVisitedPlace {
                user_id: req.user_id,
                place_id,
                name,
                lat,
                lng,
                menu_image_url: req.menu_image_url,
                menu_table: req.menu_table,
                visited_at,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_changes(req: UpdateVisitedPlaceRequest) -> Result<VisitedPlaceChanges, Vec<String>> {
    let mut errors = Vec::new();

    let name = match req.name.as_deref() {
        Some(raw) => required_text("name", Some(raw), &mut errors),
        None => None,
    };
    let lat = req
        .lat
        .as_ref()
        .and_then(|v| required_coordinate("lat", Some(v), 90.0, &mut errors));
    let lng = req
        .lng
        .as_ref()
        .and_then(|v| required_coordinate("lng", Some(v), 180.0, &mut errors));
    if let Some(url) = &req.menu_image_url {
        check_menu_image_url(url.as_deref(), &mut errors);
    }
    if let Some(table) = &req.menu_table {
        check_menu_table(table.as_ref(), &mut errors);
    }
    let visited_at = optional_timestamp(req.visited_at.as_deref(), &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(VisitedPlaceChanges {
        name,
        lat,
        lng,
        menu_image_url: req.menu_image_url,
        menu_table: req.menu_table,
        visited_at,
    })
}

fn required_text(field: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.push(format!("The {field} field is required."));
        return None;
    }
    if value.chars().count() > MAX_FIELD_CHARS {
        errors.push(format!(
            "The {field} field must not be greater than {MAX_FIELD_CHARS} characters."
        ));
        return None;
    }
    Some(value.to_string())
}

fn required_coordinate(
    field: &str,
    value: Option<&Value>,
    bound: f64,
    errors: &mut Vec<String>,
) -> Option<f64> {
    let parsed = match value {
        None | Some(Value::Null) => {
            errors.push(format!("The {field} field is required."));
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() && (-bound..=bound).contains(&v) => Some(v),
        Some(_) => {
            errors.push(format!("The {field} field must be between -{bound} and {bound}."));
            None
        }
        None => {
            errors.push(format!("The {field} field must be a number."));
            None
        }
    }
}

fn check_menu_image_url(value: Option<&str>, errors: &mut Vec<String>) {
    let Some(raw) = value else {
        return;
    };
    let valid = Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false);
    if !valid {
        errors.push("The menu_image_url field must be a valid URL.".to_string());
    }
}

fn check_menu_table(value: Option<&Value>, errors: &mut Vec<String>) {
    if let Some(table) = value {
        if !table.is_array() {
            errors.push("The menu_table field must be an array.".to_string());
        }
    }
}

/// Parses RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC), or a bare date.
fn optional_timestamp(value: Option<&str>, errors: &mut Vec<String>) -> Option<DateTime<Utc>> {
    let raw = value.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        });
    if parsed.is_none() {
        errors.push("The visited_at field must be a valid date.".to_string());
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_request(body: Value) -> NewVisitedPlaceRequest {
        serde_json::from_value(body).unwrap()
    }

    fn update_request(body: Value) -> UpdateVisitedPlaceRequest {
        serde_json::from_value(body).unwrap()
    }

    const USER: &str = "6f1c2d3e-4a5b-4c6d-8e9f-0a1b2c3d4e5f";

    #[test]
    fn test_valid_new_place() {
        let place = validate_new_place(new_request(json!({
            "user_id": USER,
            "place_id": "ChIJ123",
            "name": " Sushi Zen ",
            "lat": "40.7128",
            "lng": -74.006,
            "menu_image_url": "https://example.com/menu.jpg",
            "menu_table": [{"item": "Roll", "price": "$12.99", "description": ""}],
            "visited_at": "2024-07-14T18:30:00.000Z"
        })))
        .unwrap();
        assert_eq!(place.name, "Sushi Zen");
        assert!((place.lat - 40.7128).abs() < 1e-9);
        assert!((place.lng + 74.006).abs() < 1e-9);
        assert_eq!(
            place.visited_at.unwrap().to_rfc3339(),
            "2024-07-14T18:30:00+00:00"
        );
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let errors = validate_new_place(new_request(json!({"user_id": USER}))).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&"The place_id field is required.".to_string()));
        assert!(errors.contains(&"The lng field is required.".to_string()));
    }

    #[test]
    fn test_coordinates_out_of_range() {
        let errors = validate_new_place(new_request(json!({
            "user_id": USER,
            "place_id": "p",
            "name": "n",
            "lat": 91,
            "lng": "east"
        })))
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                "The lat field must be between -90 and 90.".to_string(),
                "The lng field must be a number.".to_string(),
            ]
        );
    }

    #[test]
    fn test_bad_url_and_menu_table() {
        let errors = validate_new_place(new_request(json!({
            "user_id": USER,
            "place_id": "p",
            "name": "n",
            "lat": 1,
            "lng": 2,
            "menu_image_url": "not a url",
            "menu_table": "Roll $12"
        })))
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_non_http_url_rejected() {
        let mut errors = Vec::new();
        check_menu_image_url(Some("ftp://example.com/menu.jpg"), &mut errors);
        check_menu_image_url(Some("https://example.com/menu.jpg"), &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_name_length_limit() {
        let long = "x".repeat(MAX_FIELD_CHARS + 1);
        let mut errors = Vec::new();
        assert!(required_text("name", Some(&long), &mut errors).is_none());
        assert!(errors[0].contains("255"));
    }

    #[test]
    fn test_timestamp_formats() {
        let mut errors = Vec::new();
        assert!(optional_timestamp(Some("2024-07-14 12:00:00"), &mut errors).is_some());
        assert!(optional_timestamp(Some("2024-07-14"), &mut errors).is_some());
        assert!(optional_timestamp(None, &mut errors).is_none());
        assert!(errors.is_empty());
        assert!(optional_timestamp(Some("last tuesday"), &mut errors).is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let changes = validate_changes(update_request(json!({
            "user_id": USER,
            "menu_image_url": null
        })))
        .unwrap();
        assert_eq!(changes.menu_image_url, Some(None));
        assert_eq!(changes.menu_table, None);
        assert_eq!(changes.name, None);
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        let changes = validate_changes(update_request(json!({
            "user_id": USER,
            "name": "Renamed",
            "lat": -33.86
        })))
        .unwrap();
        assert_eq!(changes.name.as_deref(), Some("Renamed"));
        assert_eq!(changes.lat, Some(-33.86));
        assert_eq!(changes.lng, None);

        let errors = validate_changes(update_request(json!({
            "user_id": USER,
            "name": "",
            "lng": 200,
            "menu_table": {"item": "x"}
        })))
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
