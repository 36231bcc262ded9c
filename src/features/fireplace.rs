//! Fireplace compound parser - one free-text field, four sub-features
//!
//! Count, type and room location are independent keyword scans; presence is
//! derived from whichever signals fired. No signal collapses all four
//! outputs to their sentinels regardless of partial text.

const FIREPLACE_TYPES: [&str; 5] = ["wood", "gas", "electric", "decorative", "pellet"];

const ROOM_KEYWORDS: [&str; 9] = [
    "living", "family", "great", "master", "bedroom", "den", "basement", "kitchen", "dining",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireplaceFeatures {
    pub has_fireplace: i64,
    pub count: i64,
    pub fireplace_type: &'static str,
    pub location: &'static str,
}

impl FireplaceFeatures {
    fn none() -> Self {
        Self {
            has_fireplace: 0,
            count: 0,
            fireplace_type: "unknown",
            location: "unknown",
        }
    }
}

pub fn parse_fireplace(raw: Option<&str>) -> FireplaceFeatures {
    let text = raw.unwrap_or("").to_lowercase();

    // later matches overwrite earlier ones, so "3 or 4" caps at 3
    let mut count = 0;
    if text.contains('1') || text.contains("one") {
        count = 1;
    }
    if text.contains('2') || text.contains("two") {
        count = 2;
    }
    if text.contains('3') || text.contains("three") || text.contains('4') || text.contains("four")
    {
        count = 3;
    }

    let fireplace_type = FIREPLACE_TYPES
        .iter()
        .find(|kw| text.contains(*kw))
        .copied()
        .unwrap_or("unknown");

    let matched_rooms: Vec<&'static str> = ROOM_KEYWORDS
        .iter()
        .filter(|room| text.contains(*room))
        .copied()
        .collect();
    let location = match matched_rooms.len() {
        0 => "unknown",
        1 => matched_rooms[0],
        _ => "multiple",
    };

    if count == 0 && location == "unknown" && fireplace_type == "unknown" {
        return FireplaceFeatures::none();
    }

    FireplaceFeatures {
        has_fireplace: 1,
        count,
        fireplace_type,
        location,
    }
}
