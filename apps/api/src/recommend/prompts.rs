// Prompt templates for the recommendation endpoints.
// `{name}` placeholders are filled in one pass, so user text is never re-scanned.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex"));

/// Location search prompt. Replace `{prompt}` with the user's request.
pub const RECOMMEND_PROMPT_TEMPLATE: &str = r#"Based on this request: '{prompt}', provide 5 relevant locations with detailed information.

MANDATORY REQUIREMENTS:
- If the location is a restaurant, cafe, or food establishment, you MUST include a menu. Use menu_table for structured data or menu_image_url for image links.
- For restaurants without available online menus, search Google Photos/Images and provide estimated menu_image_url links
- Include comprehensive location details: name, full address, type/category, price range, description, contact info
- Add latitude/longitude coordinates if possible
- For non-food locations, provide relevant service details instead of menu

Format as JSON with this structure:
{
  "locations": [
    {
      "name": "Location Name",
      "address": "Full address with city, country",
      "type": "restaurant/cafe/hotel/shop/etc",
      "price_range": "$/$$/$$$/$$$$ or equivalent",
      "description": "Detailed description",
      "phone": "contact number if available",
      "website": "website URL if available",
      "lat": "latitude",
      "lng": "longitude",
      "menu_table": [
        {"item": "Dish name", "price": "$X.XX", "description": "Brief description"}
      ],
      "menu_image_url": "URL to menu image from Google Photos/Images",
      "rating": "X.X/5",
      "hours": "Opening hours",
      "features": ["wifi", "outdoor_seating", "delivery", "etc"]
    }
  ]
}"#;

/// Follow-up prompt after a visit. Replace `{visited_place}` and `{city}`.
pub const ALTERNATIVES_PROMPT_TEMPLATE: &str = "I just visited {visited_place} in {city}. \
    Suggest 2-3 alternative restaurants in the same city with similar cuisine or atmosphere. \
    For each restaurant, provide: name, address, cuisine type, what makes it special, \
    and if possible a menu link.";

pub fn recommend_prompt(user_prompt: &str) -> String {
    fill(RECOMMEND_PROMPT_TEMPLATE, &[("prompt", user_prompt)])
}

pub fn alternatives_prompt(visited_place: &str, city: &str) -> String {
    fill(
        ALTERNATIVES_PROMPT_TEMPLATE,
        &[("visited_place", visited_place), ("city", city)],
    )
}

/// Substitutes known placeholders; unknown `{...}` spans are left untouched.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    RE_PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| Cow::Borrowed(*value))
                .unwrap_or_else(|| Cow::Owned(caps[0].to_string()))
        })
        .into_owned()
}
