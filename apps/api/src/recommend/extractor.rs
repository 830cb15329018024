//! Response extractor — turns a free-form model completion into location records.
//!
//! The completion may be clean JSON, JSON wrapped in a fenced code block, JSON
//! buried in prose, or a plain numbered list. Each parsing tier is a pure
//! `fn(&str) -> Option<Vec<Value>>`; tiers run in order and the first `Some` wins.
//! The final line-heuristic tier always succeeds, so extraction never fails —
//! the worst case is an empty list.
//!
//! Tiers 2–4 select spans greedily. When a completion contains several
//! JSON-like fragments the wrong span can be picked; that trade-off is kept
//! as-is rather than guessed around.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::recommend::record::{normalize, LocationRecord};

/// Object keys whose array value holds the records, in lookup order.
const RECOGNIZED_KEYS: &[&str] = &["locations", "restaurants"];

/// Category given to listed entries that carry no cuisine line. Prose answers
/// come back for restaurant prompts, so they are assumed to serve food.
const LISTED_CATEGORY: &str = "restaurant";

static RE_FENCED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").expect("valid regex")
});
static RE_BARE_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));
static RE_BARE_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));
static RE_TARGETED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{[^}]*"(?:locations|restaurants)"\s*:\s*\[[^\]]*\][^}]*\}"#)
        .expect("valid regex")
});
static RE_RECORD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d.*\-]+\s*(.+)$").expect("valid regex"));

/// Which tier produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    FencedJson,
    BareArray,
    BareObject,
    TargetedObject,
    LineHeuristic,
}

type Attempt = fn(&str) -> Option<Vec<Value>>;

const TIERS: &[(Tier, Attempt)] = &[
    (Tier::FencedJson, fenced_json),
    (Tier::BareArray, bare_array),
    (Tier::BareObject, bare_object),
    (Tier::TargetedObject, targeted_object),
    (Tier::LineHeuristic, line_heuristic),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub tier: Tier,
    pub records: Vec<LocationRecord>,
}

/// Extracts normalized location records from a raw completion.
pub fn extract(raw_text: &str) -> Vec<LocationRecord> {
    extract_detailed(raw_text).records
}

/// Like [`extract`], but also reports which tier matched.
pub fn extract_detailed(raw_text: &str) -> Extraction {
    for &(tier, attempt) in TIERS {
        if let Some(elements) = attempt(raw_text) {
            return Extraction {
                tier,
                records: elements.iter().filter_map(normalize).collect(),
            };
        }
    }

    Extraction {
        tier: Tier::LineHeuristic,
        records: Vec::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structured tiers
// ────────────────────────────────────────────────────────────────────────────

fn fenced_json(text: &str) -> Option<Vec<Value>> {
    let block = RE_FENCED.captures(text)?.get(1)?.as_str();
    recognized_array(serde_json::from_str(block).ok()?)
}

fn bare_array(text: &str) -> Option<Vec<Value>> {
    let span = RE_BARE_ARRAY.find(text)?.as_str();
    match serde_json::from_str(span).ok()? {
        Value::Array(elements) => Some(elements),
        _ => None,
    }
}

fn bare_object(text: &str) -> Option<Vec<Value>> {
    let span = RE_BARE_OBJECT.find(text)?.as_str();
    recognized_array(serde_json::from_str(span).ok()?)
}

fn targeted_object(text: &str) -> Option<Vec<Value>> {
    let span = RE_TARGETED.find(text)?.as_str();
    recognized_array(serde_json::from_str(span).ok()?)
}

fn recognized_array(value: Value) -> Option<Vec<Value>> {
    let Value::Object(mut obj) = value else {
        return None;
    };
    RECOGNIZED_KEYS.iter().find_map(|key| match obj.remove(*key) {
        Some(Value::Array(elements)) => Some(elements),
        _ => None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Line heuristic
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum LineKind {
    Address,
    Category,
    Price,
    Menu,
    Description,
}

fn classify(line: &str) -> LineKind {
    let lower = line.to_lowercase();
    if lower.contains("address") || lower.contains("location") {
        LineKind::Address
    } else if lower.contains("cuisine") {
        LineKind::Category
    } else if lower.contains("price") || line.contains('$') {
        LineKind::Price
    } else if lower.contains("menu") || lower.contains("http") {
        LineKind::Menu
    } else {
        LineKind::Description
    }
}

/// Returns the record name if `line` opens a new numbered or bulleted entry.
fn record_start(line: &str) -> Option<&str> {
    let name = RE_RECORD_START
        .captures(line)?
        .get(1)?
        .as_str()
        .trim_matches(|c: char| c == '*' || c == '-' || c.is_whitespace());
    (!name.is_empty()).then_some(name)
}

#[derive(Default)]
struct Draft {
    name: String,
    address: Option<String>,
    category: String,
    price_range: Option<String>,
    menu_url: Option<String>,
    description: Vec<String>,
}

impl Draft {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            category: LISTED_CATEGORY.to_string(),
            ..Default::default()
        }
    }

    fn absorb(&mut self, line: &str) {
        let slot = match classify(line) {
            LineKind::Address => &mut self.address,
            LineKind::Category => {
                self.category = line.to_string();
                return;
            }
            LineKind::Price => &mut self.price_range,
            LineKind::Menu => &mut self.menu_url,
            LineKind::Description => {
                self.description.push(line.to_string());
                return;
            }
        };
        *slot = Some(line.to_string());
    }

    fn into_value(self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".into(), Value::String(self.name));
        obj.insert("type".into(), Value::String(self.category));
        let fields = [
            ("address", self.address),
            ("price_range", self.price_range),
            ("menu_url", self.menu_url),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                obj.insert(key.into(), Value::String(value));
            }
        }
        if !self.description.is_empty() {
            obj.insert(
                "description".into(),
                Value::String(self.description.join(" ")),
            );
        }
        Value::Object(obj)
    }
}

fn line_heuristic(text: &str) -> Option<Vec<Value>> {
    let mut records = Vec::new();
    let mut current: Option<Draft> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(name) = record_start(line) {
            if let Some(done) = current.replace(Draft::new(name)) {
                records.push(done.into_value());
            }
        } else if let Some(draft) = current.as_mut() {
            draft.absorb(line);
        }
    }

    records.extend(current.map(Draft::into_value));
    Some(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::record::{MENU_SEARCH_NOTE, UNKNOWN_LOCATION};

    const FENCED_RESPONSE: &str = r#"Here are some great places:

```json
{
  "locations": [
    {"name": "Sushi Zen", "type": "restaurant", "menu_image_url": "https://example.com/zen.jpg"},
    {"name": "Central Park", "type": "park"},
    {"name": "Blue Bottle", "type": "cafe", "features": ["wifi"]}
  ]
}
```

Enjoy your trip!"#;

    #[test]
    fn test_fenced_json_returns_records_in_source_order() {
        let extraction = extract_detailed(FENCED_RESPONSE);
        assert_eq!(extraction.tier, Tier::FencedJson);
        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sushi Zen", "Central Park", "Blue Bottle"]);
        assert_eq!(
            extraction.records[0].menu_image_url.as_deref(),
            Some("https://example.com/zen.jpg")
        );
        assert!(extraction.records[2].menu_note.is_some());
    }

    #[test]
    fn test_fenced_block_without_tag_is_accepted() {
        let text = "```\n{\"restaurants\": [{\"name\": \"Nonna\"}]}\n```";
        let extraction = extract_detailed(text);
        assert_eq!(extraction.tier, Tier::FencedJson);
        assert_eq!(extraction.records[0].name, "Nonna");
    }

    #[test]
    fn test_locations_key_wins_over_restaurants() {
        let text = "```json\n{\"restaurants\": [{\"name\": \"B\"}], \"locations\": [{\"name\": \"A\"}]}\n```";
        let records = extract(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "A");
    }

    #[test]
    fn test_bare_array_in_prose() {
        let text = "Sure! [{\"name\": \"Taco Stand\", \"type\": \"eatery\"}, {\"name\": \"Pier 39\"}] Have fun.";
        let extraction = extract_detailed(text);
        assert_eq!(extraction.tier, Tier::BareArray);
        assert_eq!(extraction.records.len(), 2);
        assert!(extraction.records[0].has_menu());
        assert!(!extraction.records[1].has_menu());
    }

    #[test]
    fn test_bare_array_skips_non_object_elements() {
        let extraction = extract_detailed("[\"just\", \"strings\", {\"name\": \"Real\"}]");
        assert_eq!(extraction.tier, Tier::BareArray);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "Real");
    }

    #[test]
    fn test_bare_object_when_array_span_is_polluted() {
        let text = "{\"locations\": [{\"name\": \"Louvre\", \"type\": \"museum\"}]} see also [1]";
        let extraction = extract_detailed(text);
        assert_eq!(extraction.tier, Tier::BareObject);
        assert_eq!(extraction.records[0].name, "Louvre");
    }

    #[test]
    fn test_targeted_object_when_greedy_spans_fail() {
        let text = "Note {draft} first. {\"restaurants\": [{\"name\": \"Chez Paul\"}]} and [1] more}";
        let extraction = extract_detailed(text);
        assert_eq!(extraction.tier, Tier::TargetedObject);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "Chez Paul");
    }

    #[test]
    fn test_object_without_recognized_key_falls_to_line_heuristic() {
        let extraction = extract_detailed("{\"places\": {\"name\": \"x\"}}");
        assert_eq!(extraction.tier, Tier::LineHeuristic);
        assert!(extraction.records.is_empty());
    }

    #[test]
    fn test_malformed_fenced_json_does_not_panic() {
        let text = "```json\n{\"locations\": [{\"name\": \"A\",},]}\n```\n1. Fallback Place\n";
        let extraction = extract_detailed(text);
        assert_eq!(extraction.tier, Tier::LineHeuristic);
        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Fallback Place"]);
    }

    #[test]
    fn test_line_heuristic_numbered_list() {
        let records = extract("1. Place A\nAddress: 1 Main St\n2. Place B\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Place A");
        assert_eq!(records[0].address, "Address: 1 Main St");
        assert_eq!(records[1].name, "Place B");
        assert_eq!(records[1].address, "");
    }

    #[test]
    fn test_line_heuristic_classifies_lines() {
        let text = "\
Intro line that is ignored
* **Trattoria Roma**
Location: Via Appia 12
Cuisine: Italian restaurant
Price range: $$
Menu: https://roma.example.com/menu
Cozy spot with fresh pasta.
Great for dates.
- Museo Nacional
Open daily";
        let records = extract(text);
        assert_eq!(records.len(), 2);

        let roma = &records[0];
        assert_eq!(roma.name, "Trattoria Roma");
        assert_eq!(roma.address, "Location: Via Appia 12");
        assert_eq!(roma.category, "Cuisine: Italian restaurant");
        assert_eq!(roma.price_range, "Price range: $$");
        assert_eq!(roma.menu_url.as_deref(), Some("Menu: https://roma.example.com/menu"));
        assert_eq!(roma.description, "Cozy spot with fresh pasta. Great for dates.");
        // Category mentions "restaurant", so a menu link is synthesized.
        assert!(roma.has_menu());

        let museo = &records[1];
        assert_eq!(museo.name, "Museo Nacional");
        assert_eq!(museo.description, "Open daily");
        assert_eq!(museo.category, LISTED_CATEGORY);
        assert!(museo.menu_url.is_none());
    }

    #[test]
    fn test_listed_entries_default_to_restaurant_with_menu_link() {
        let records = extract("1. Afuri\nAddress: 1-1-7 Ebisu\nFamous yuzu shio ramen\n");
        let afuri = &records[0];
        assert_eq!(afuri.category, "restaurant");
        assert!(afuri.is_food_related());
        assert!(afuri.menu_image_url.as_deref().unwrap().ends_with("Afuri%20menu"));
        assert_eq!(afuri.menu_note.as_deref(), Some(MENU_SEARCH_NOTE));
    }

    #[test]
    fn test_cuisine_line_keeps_entry_food_related() {
        let records = extract("1. Afuri\nAddress: 1-1-7 Ebisu\nCuisine: Japanese ramen\n");
        let afuri = &records[0];
        assert_eq!(afuri.category, "Cuisine: Japanese ramen");
        assert!(afuri.has_menu());
        assert!(afuri.menu_note.is_some());
    }

    #[test]
    fn test_dollar_sign_marks_price_line() {
        let records = extract("1. Burger Barn\nAround $15 per person");
        assert_eq!(records[0].price_range, "Around $15 per person");
    }

    #[test]
    fn test_later_field_line_overwrites_earlier() {
        let records = extract("1. Spot\nAddress: old\nAddress: new");
        assert_eq!(records[0].address, "Address: new");
    }

    #[test]
    fn test_bare_bullet_is_not_a_record() {
        let records = extract("1. Real Place\n-\n***\nStill the same place");
        assert_eq!(records.len(), 1);
        assert!(records[0].description.contains("Still the same place"));
    }

    #[test]
    fn test_prose_without_list_yields_nothing() {
        assert!(extract("I could not find anything for that request.").is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_sequence() {
        let extraction = extract_detailed("");
        assert_eq!(extraction.tier, Tier::LineHeuristic);
        assert!(extraction.records.is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let inputs = [
            FENCED_RESPONSE,
            "1. Place A\nAddress: 1 Main St\n2. Place B\n",
            "[{\"name\": \"X\", \"type\": \"bistro\"}]",
            "",
        ];
        for input in inputs {
            assert_eq!(extract(input), extract(input));
        }
    }

    #[test]
    fn test_food_records_always_carry_a_menu_reference() {
        let text = r#"[
            {"name": "A", "type": "Pizzeria"},
            {"name": "B", "type": "bakery", "menu_table": []},
            {"type": "wine bar"}
        ]"#;
        for record in extract(text) {
            assert!(record.has_menu(), "{} has no menu", record.name);
        }
        let unnamed = extract(text).pop().unwrap();
        assert_eq!(unnamed.name, UNKNOWN_LOCATION);
        assert_eq!(unnamed.menu_note.as_deref(), Some(MENU_SEARCH_NOTE));
    }

    #[test]
    fn test_record_start_strips_markers() {
        assert_eq!(record_start("12. Noodle House"), Some("Noodle House"));
        assert_eq!(record_start("**Bold Name**"), Some("Bold Name"));
        assert_eq!(record_start("- dash item"), Some("dash item"));
        assert_eq!(record_start("Address: 1 Main St"), None);
        assert_eq!(record_start("---"), None);
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("Location and price: $$"), LineKind::Address);
        assert_eq!(classify("Cuisine, price $"), LineKind::Category);
        assert_eq!(classify("Menu prices vary"), LineKind::Price);
        assert_eq!(classify("See http://x.example"), LineKind::Menu);
        assert_eq!(classify("Lovely view"), LineKind::Description);
    }
}
