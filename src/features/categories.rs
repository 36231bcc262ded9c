//! Categorical normalizers - ordered keyword-rule cascades
//!
//! Each normalizer is a total function over free text. The cascades are
//! declared as ordered rule tables; the first matching rule wins, present
//! but unmatched input falls through to `other`, missing input maps to the
//! column's missing sentinel. Tie-breaks are strictly order-of-declaration:
//! `"gas forced air"` must resolve to `forced air`, never `gas`.

use crate::features::types::FactValue;

/// One arm of a cascade: matches when any `any_of` keyword is contained in
/// the input and none of `none_of` is.
struct KeywordRule {
    category: &'static str,
    any_of: &'static [&'static str],
    none_of: &'static [&'static str],
}

impl KeywordRule {
    const fn new(category: &'static str, any_of: &'static [&'static str]) -> Self {
        Self {
            category,
            any_of,
            none_of: &[],
        }
    }

    const fn except(
        category: &'static str,
        any_of: &'static [&'static str],
        none_of: &'static [&'static str],
    ) -> Self {
        Self {
            category,
            any_of,
            none_of,
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.any_of.iter().any(|kw| text.contains(kw))
            && !self.none_of.iter().any(|kw| text.contains(kw))
    }
}

fn first_match(rules: &[KeywordRule], text: &str) -> Option<&'static str> {
    rules.iter().find(|rule| rule.matches(text)).map(|r| r.category)
}

/// MLS short status codes, expanded before the cascade runs
const SHORT_STATUS_CODES: [(&str, &str); 3] = [
    ("C", "Continue Show"),
    ("P", "Pending Sale"),
    ("U", "Under Contract"),
];

const STATUS_RULES: [KeywordRule; 8] = [
    KeywordRule::new("missing", &["missing"]),
    KeywordRule::new("active", &["active", "for sale", "continue show"]),
    KeywordRule::new("pending/under Contract", &["pending", "contract", "option"]),
    KeywordRule::new("contingent", &["contingent"]),
    KeywordRule::new("auction/foreclosure", &["auction", "foreclos", "pre-fore"]),
    KeywordRule::new(
        "new/coming Soon",
        &["new", "coming", "extended", "price change", "back on market"],
    ),
    KeywordRule::new("sold", &["sold", "closed"]),
    KeywordRule::new("rent", &["rent"]),
];

/// Normalize the listing status. Short codes like `P` expand to their full
/// text first, so `P` lands in `pending/under Contract` like any other
/// pending-sale wording.
pub fn normalize_status(status: Option<&str>) -> &'static str {
    let raw = match status {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return "missing",
    };

    let expanded = SHORT_STATUS_CODES
        .iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, full)| *full)
        .unwrap_or(raw);

    let text = expanded.to_lowercase();
    first_match(&STATUS_RULES, &text).unwrap_or("other")
}

const PROPERTY_TYPE_RULES: [KeywordRule; 8] = [
    // widest group first; "ranch" deliberately lands here, not in farm/ranch
    KeywordRule::new(
        "single Family",
        &[
            "single",
            "detached",
            "story",
            "traditional",
            "colonial",
            "craftsman",
            "ranch",
            "bungalow",
            "cape cod",
            "contemporary",
            "modern",
            "transitional",
        ],
    ),
    KeywordRule::new("condo", &["condo"]),
    KeywordRule::new("townhouse", &["town", "row home"]),
    KeywordRule::new("multi-family", &["multi", "multiple occupancy"]),
    KeywordRule::new("land", &["land", "lot"]),
    KeywordRule::new("apartment/co-Op", &["apart", "coop", "cooperative", "high rise"]),
    KeywordRule::new("mobile/manufactured", &["mobile", "manufact", "mfd"]),
    KeywordRule::new("farm/ranch", &["farm", "ranch"]),
];

pub fn normalize_property_type(property_type: Option<&str>) -> &'static str {
    let raw = match property_type {
        Some(s) => s.to_lowercase().trim().to_string(),
        None => return "Missing",
    };
    if raw.is_empty() || raw.contains("missing") {
        return "Missing";
    }
    first_match(&PROPERTY_TYPE_RULES, &raw).unwrap_or("other")
}

/// Address strings that count as an undisclosed location
const UNDISCLOSED_ADDRESSES: [&str; 6] = [
    "MISSING",
    "Address Not Disclosed",
    "Undisclosed Address",
    "(undisclosed Address)",
    "Address Not Available",
    "Unknown Address",
];

pub fn normalize_street(street: Option<&str>) -> &'static str {
    match street {
        Some(s) if !UNDISCLOSED_ADDRESSES.contains(&s) => "known",
        _ => "undisclosed",
    }
}

const HEATING_RULES: [KeywordRule; 9] = [
    KeywordRule::new("forced air", &["forced air", "forcedair"]),
    KeywordRule::new("heatpump", &["heat pump"]),
    KeywordRule::new("central", &["central"]),
    KeywordRule::new("electric", &["electric"]),
    KeywordRule::new("gas", &["gas", "natural"]),
    KeywordRule::new("baseboard", &["baseboard"]),
    KeywordRule::except("wall heater", &["wall"], &["window"]),
    KeywordRule::new("radiant/water", &["radiant", "hot water", "steam"]),
    KeywordRule::new("none", &["none", "no cooling"]),
];

pub fn heating_category(value: Option<&FactValue>) -> &'static str {
    let value = match value {
        Some(v) => v,
        None => return "Missing",
    };
    let text = value
        .to_string()
        .replace(',', "")
        .to_lowercase()
        .trim()
        .to_string();
    if text.is_empty() || text == "missing" {
        return "Missing";
    }
    first_match(&HEATING_RULES, &text).unwrap_or("other")
}

const COOLING_RULES: [KeywordRule; 11] = [
    KeywordRule::new(
        "central air",
        &["central air", "central a/c", "air conditioning-central"],
    ),
    KeywordRule::except("central", &["central"], &["cooling", "electric", "gas"]),
    KeywordRule::new("refrigeration", &["refrigeration"]),
    KeywordRule::new("evaporative", &["evaporative", "swamp"]),
    KeywordRule::new("heat pump", &["heat pump"]),
    KeywordRule::new("window/wall unit", &["window", "wall/window", "wall unit"]),
    KeywordRule::new("electric", &["electric"]),
    KeywordRule::new("gas", &["gas"]),
    KeywordRule::new("none", &["none", "no heating"]),
    KeywordRule::new("other", &["other"]),
    KeywordRule::new("has cooling", &["has cooling", "cooling system"]),
];

pub fn cooling_category(value: Option<&FactValue>) -> &'static str {
    let value = match value {
        Some(v) => v,
        None => return "Missing",
    };
    let text = value.to_string().to_lowercase();
    if text == "missing" || text == "0" {
        return "Missing";
    }
    first_match(&COOLING_RULES, &text).unwrap_or("other")
}

const PARKING_RULES: [KeywordRule; 7] = [
    KeywordRule::new(
        "attached garage",
        &["attached garage", "garage-attached", "garage attached"],
    ),
    KeywordRule::new("detached garage", &["detached garage", "detached parking"]),
    KeywordRule::new("carport", &["carport"]),
    KeywordRule::new("off street", &["off street", "offstreet"]),
    KeywordRule::new("on street", &["on street", "onstreet"]),
    KeywordRule::new("driveway", &["driveway"]),
    KeywordRule::new("none", &["none"]),
];

pub fn parking_category(value: Option<&FactValue>) -> &'static str {
    let value = match value {
        Some(v) => v,
        None => return "Missing",
    };
    let text = value.to_string().to_lowercase();
    if text == "0" {
        return "Missing";
    }

    if let Some(category) = first_match(&PARKING_RULES, &text) {
        return category;
    }

    // bare space counts bucket to a small ordinal scale
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(spaces) = text.parse::<i64>() {
            return match spaces {
                s if s <= 0 => "missing",
                1 => "1 Space",
                2 => "2 Spaces",
                3 => "3 Spaces",
                s if s <= 6 => "4-6 Spaces",
                _ => "7+ Spaces",
            };
        }
    }

    if text.contains("parking")
        && (text.contains("desc") || text.contains("type") || text.contains("yn"))
    {
        return "Other Parking";
    }

    "other"
}

/// Top 50 US cities by population. The first 3 are megacities, the next 7
/// major, the remainder large; everything else tiers as other.
pub const TOP_50_CITIES: [&str; 50] = [
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "Austin",
    "Jacksonville",
    "Fort Worth",
    "Columbus",
    "Charlotte",
    "San Francisco",
    "Indianapolis",
    "Seattle",
    "Denver",
    "Washington",
    "Boston",
    "El Paso",
    "Nashville",
    "Detroit",
    "Oklahoma City",
    "Portland",
    "Las Vegas",
    "Memphis",
    "Louisville",
    "Baltimore",
    "Milwaukee",
    "Albuquerque",
    "Tucson",
    "Fresno",
    "Sacramento",
    "Kansas City",
    "Long Beach",
    "Mesa",
    "Atlanta",
    "Colorado Springs",
    "Virginia Beach",
    "Raleigh",
    "Omaha",
    "Miami",
    "Oakland",
    "Minneapolis",
    "Tulsa",
    "Arlington",
    "New Orleans",
    "Wichita",
];

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tier a city against the fixed top-50 list
pub fn city_tier(city: Option<&str>) -> &'static str {
    let name = match city {
        Some(c) if !c.trim().is_empty() => title_case(c),
        _ => return "unknown",
    };

    if TOP_50_CITIES[..3].contains(&name.as_str()) {
        "tier_1 - Megacity"
    } else if TOP_50_CITIES[3..10].contains(&name.as_str()) {
        "tier_2 - Major"
    } else if TOP_50_CITIES.contains(&name.as_str()) {
        "tier_3 - Large"
    } else {
        "tier_4 - Other"
    }
}
