//! Canned recommendations served when the provider cannot be reached and the
//! mock fallback is enabled.

use crate::recommend::record::{LocationRecord, MenuItem};

fn menu(items: &[(&str, &str, &str)]) -> Option<Vec<MenuItem>> {
    Some(
        items
            .iter()
            .map(|(item, price, description)| MenuItem {
                item: item.to_string(),
                price: price.to_string(),
                description: description.to_string(),
            })
            .collect(),
    )
}

fn tags(features: &[&str]) -> Vec<String> {
    features.iter().map(|f| f.to_string()).collect()
}

pub fn mock_locations() -> Vec<LocationRecord> {
    vec![
        LocationRecord {
            name: "Sushi Zen Restaurant".into(),
            address: "123 Main Street, Downtown".into(),
            category: "restaurant".into(),
            price_range: "$$$".into(),
            description: "Authentic Japanese sushi experience with fresh daily ingredients and traditional preparation methods.".into(),
            phone: "+1-555-0123".into(),
            website: "https://sushizen.example.com".into(),
            lat: Some("40.7128".into()),
            lng: Some("-74.0060".into()),
            rating: "4.5/5".into(),
            hours: "Mon-Sun: 11:30 AM - 10:00 PM".into(),
            features: tags(&["dine-in", "takeout", "delivery", "sake_bar"]),
            menu_table: menu(&[
                ("California Roll", "$12.99", "Fresh crab, avocado, cucumber"),
                ("Salmon Sashimi", "$18.99", "6 pieces of fresh salmon"),
                ("Chirashi Bowl", "$24.99", "Assorted sashimi over sushi rice"),
            ]),
            menu_image_url: Some("https://www.google.com/search?tbm=isch&q=sushi+zen+menu".into()),
            menu_note: None,
            menu_url: None,
        },
        LocationRecord {
            name: "Bella Vista Italiana".into(),
            address: "456 Food Avenue, Little Italy".into(),
            category: "restaurant".into(),
            price_range: "$$".into(),
            description: "Traditional Italian cuisine with homemade pasta and wood-fired pizza in a cozy atmosphere.".into(),
            phone: "+1-555-0456".into(),
            website: "https://bellavista.example.com".into(),
            lat: Some("40.7589".into()),
            lng: Some("-73.9851".into()),
            rating: "4.3/5".into(),
            hours: "Tue-Sun: 5:00 PM - 11:00 PM".into(),
            features: tags(&["outdoor_seating", "wine_bar", "romantic"]),
            menu_table: menu(&[
                ("Margherita Pizza", "$16.99", "Fresh mozzarella, basil, tomato sauce"),
                ("Fettuccine Alfredo", "$19.99", "Homemade pasta with creamy alfredo sauce"),
                ("Tiramisu", "$8.99", "Classic Italian dessert with coffee and mascarpone"),
            ]),
            menu_image_url: Some(
                "https://www.google.com/search?tbm=isch&q=bella+vista+italiana+menu".into(),
            ),
            menu_note: None,
            menu_url: None,
        },
    ]
}
