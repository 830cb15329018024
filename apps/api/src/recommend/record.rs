//! Location records — the normalized output unit of the extraction pipeline,
//! plus the menu enrichment applied to food establishments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const DEFAULT_CATEGORY: &str = "location";
pub const MENU_SEARCH_NOTE: &str = "Menu image from Google Photos search";

const IMAGE_SEARCH_URL: &str = "https://www.google.com/search?tbm=isch&q=";

/// Category keywords that mark a place as serving food. Matched as
/// case-insensitive substrings, so "Cafe Luna" and "Wine Bar" both count.
/// `cuisine` covers categories read from a "Cuisine: ..." line.
const FOOD_VOCABULARY: &[&str] = &[
    "restaurant",
    "cafe",
    "bar",
    "bistro",
    "diner",
    "pizzeria",
    "bakery",
    "food",
    "eatery",
    "cuisine",
];

/// Keys the category may arrive under, in priority order.
const CATEGORY_KEYS: &[&str] = &["type", "category", "cuisine"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub item: String,
    pub price: String,
    pub description: String,
}

/// One recommended place. Every field except the menu fields is always
/// serialized so the frontend can rely on the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub category: String,
    pub price_range: String,
    pub description: String,
    pub phone: String,
    pub website: String,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub rating: String,
    pub hours: String,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_table: Option<Vec<MenuItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_note: Option<String>,
    /// Free-text menu line picked up by the line heuristic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_url: Option<String>,
}

impl LocationRecord {
    pub fn is_food_related(&self) -> bool {
        is_food_category(&self.category)
    }

    pub fn has_menu(&self) -> bool {
        self.menu_table.as_ref().is_some_and(|t| !t.is_empty())
            || self.menu_image_url.as_ref().is_some_and(|u| !u.is_empty())
    }
}

pub fn is_food_category(category: &str) -> bool {
    let category = category.to_lowercase();
    FOOD_VOCABULARY.iter().any(|food| category.contains(food))
}

/// Image-search link used when a food place comes back without a menu.
pub fn menu_search_url(name: &str) -> String {
    format!("{IMAGE_SEARCH_URL}{}", urlencoding::encode(&format!("{name} menu")))
}

/// Builds a `LocationRecord` from one raw JSON element. Returns `None` for
/// anything that is not a JSON object.
pub fn normalize(raw: &Value) -> Option<LocationRecord> {
    let obj = raw.as_object()?;

    let name = string_field(obj, "name")
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
    let category = CATEGORY_KEYS
        .iter()
        .find_map(|key| string_field(obj, key))
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let mut record = LocationRecord {
        name,
        address: string_field(obj, "address").unwrap_or_default(),
        category,
        price_range: string_field(obj, "price_range").unwrap_or_default(),
        description: string_field(obj, "description").unwrap_or_default(),
        phone: string_field(obj, "phone").unwrap_or_default(),
        website: string_field(obj, "website").unwrap_or_default(),
        lat: string_field(obj, "lat"),
        lng: string_field(obj, "lng"),
        rating: string_field(obj, "rating").unwrap_or_default(),
        hours: string_field(obj, "hours").unwrap_or_default(),
        features: string_list(obj.get("features")),
        menu_table: None,
        menu_image_url: None,
        menu_note: None,
        menu_url: None,
    };

    if record.is_food_related() {
        record.menu_table = menu_table(obj.get("menu_table"));
        record.menu_image_url = string_field(obj, "menu_image_url").filter(|u| !u.is_empty());
        record.menu_url = string_field(obj, "menu_url").filter(|m| !m.is_empty());

        if !record.has_menu() {
            record.menu_image_url = Some(menu_search_url(&record.name));
            record.menu_note = Some(MENU_SEARCH_NOTE.to_string());
        }
    }

    Some(record)
}

/// Reads a scalar field as a string. Numbers are stringified; null, arrays,
/// objects and booleans count as absent.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn menu_table(value: Option<&Value>) -> Option<Vec<MenuItem>> {
    let items: Vec<MenuItem> = value?
        .as_array()?
        .iter()
        .filter_map(|entry| {
            let entry = entry.as_object()?;
            Some(MenuItem {
                item: string_field(entry, "item").unwrap_or_default(),
                price: string_field(entry, "price").unwrap_or_default(),
                description: string_field(entry, "description").unwrap_or_default(),
            })
        })
        .collect();

    (!items.is_empty()).then_some(items)
}
