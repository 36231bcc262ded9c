//! Numeric extractors - first-match decimal parsing over free text
//!
//! Every extractor tolerates thousands separators and unit suffixes and
//! degrades to a documented sentinel instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::features::types::FactValue;

static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static AREA_UNIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"sqft|acres?|bath").unwrap());

fn first_decimal(text: &str) -> Option<f64> {
    DECIMAL_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Square feet per acre
const SQFT_PER_ACRE: f64 = 43_560.0;

/// Fallback when a batch carries no in-range bath value at all
pub const DEFAULT_BATH_MODE: f64 = 2.0;

/// Most frequent in-range (1..=10) bath count across the batch.
/// Ties break to the value seen first; an empty valid set falls back to
/// [`DEFAULT_BATH_MODE`].
pub fn bath_mode<'a, I>(baths: I) -> f64
where
    I: Iterator<Item = Option<&'a str>>,
{
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for raw in baths.flatten() {
        let cleaned = raw.replace(',', "");
        let value = match first_decimal(&cleaned) {
            Some(v) if (1.0..=10.0).contains(&v) => v,
            _ => continue,
        };
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(f64, usize)> = None;
    for &(value, n) in &counts {
        if best.map_or(true, |(_, best_n)| n > best_n) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value).unwrap_or(DEFAULT_BATH_MODE)
}

/// Clean one bath value against the batch mode. Missing → 0; values outside
/// [1, 10] and unparseable text → mode.
pub fn clean_baths(raw: Option<&str>, mode: f64) -> f64 {
    let raw = match raw {
        Some(r) => r,
        None => return 0.0,
    };
    let text = raw.trim().to_lowercase();
    if text.is_empty() || text == "missing" {
        return 0.0;
    }
    match first_decimal(&text.replace(',', ".")) {
        Some(value) if (1.0..=10.0).contains(&value) => value,
        _ => mode,
    }
}

/// Clean the lot size out of home facts. Acreage converts to square feet,
/// sqft-labeled and unlabeled numbers pass through, placeholders → 0.
pub fn clean_lotsize(value: Option<&FactValue>) -> f64 {
    let value = match value {
        Some(v) => v,
        None => return 0.0,
    };
    let text = value.to_string().to_lowercase();
    if matches!(text.as_str(), "missing" | "no data" | "(other)") {
        return 0.0;
    }
    let text = text.replace(',', "");
    let text = text.trim();

    if text.contains("acre") {
        match first_decimal(text) {
            Some(acres) => (acres * SQFT_PER_ACRE).trunc(),
            None => 0.0,
        }
    } else {
        first_decimal(text).unwrap_or(0.0)
    }
}

const LOTSIZE_BUCKETS: [(f64, &str); 9] = [
    (1_500.0, "urban_condo"),
    (3_000.0, "urban_rowhouse"),
    (5_000.0, "urban_small_lot"),
    (7_500.0, "urban_standard"),
    (10_000.0, "suburban_small"),
    (21_780.0, "suburban_quarter"),
    (43_560.0, "suburban_half"),
    (108_900.0, "suburban_full"),
    (217_800.0, "rural_small"),
];

pub fn lotsize_bucket(sqft: f64) -> &'static str {
    for (limit, bucket) in LOTSIZE_BUCKETS {
        if sqft < limit {
            return bucket;
        }
    }
    "rural_large"
}

/// Clean interior area. Strips the scraper's label prefix, unit suffixes
/// and separators, then keeps digits and dots only.
pub fn clean_sqft(raw: Option<&str>) -> f64 {
    let raw = match raw {
        Some(r) => r,
        None => return 0.0,
    };
    let text = raw
        .to_lowercase()
        .trim()
        .replace("total interior livable area:", "")
        .replace("sqft", "")
        .replace('"', "")
        .replace('\'', "")
        .replace(',', "");
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse().unwrap_or(0.0)
}

pub fn sqft_bucket(sqft: f64) -> &'static str {
    if sqft < 5_000.0 {
        "small"
    } else if sqft <= 10_000.0 {
        "medium"
    } else {
        "large"
    }
}

/// Clean the bedroom count. Text carrying area or bath units is a
/// mislabeled column and maps to 0; "3 or more" → 3.
pub fn clean_beds(raw: Option<&str>) -> i64 {
    let raw = match raw {
        Some(r) => r,
        None => return 0,
    };
    let text = raw.to_lowercase();
    if AREA_UNIT_RE.is_match(&text) {
        return 0;
    }
    if text.contains("3 or more") {
        return 3;
    }
    INTEGER_RE
        .find(&text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Known textual story descriptions, checked before number extraction
const STORY_DESCRIPTIONS: [(&str, f64); 37] = [
    ("one", 1.0),
    ("one story", 1.0),
    ("one level", 1.0),
    ("ranch", 1.0),
    ("ranch/1 story", 1.0),
    ("1 story/ranch", 1.0),
    ("one story/ranch", 1.0),
    ("1 story", 1.0),
    ("1 level", 1.0),
    ("two", 2.0),
    ("two story", 2.0),
    ("2 story", 2.0),
    ("2 stories", 2.0),
    ("two stories", 2.0),
    ("two story or more", 2.0),
    ("2 story or more", 2.0),
    ("two story/basement", 2.0),
    ("2 story/basement", 2.0),
    ("2 or more stories", 2.0),
    ("townhouse", 2.0),
    ("condominium", 2.0),
    ("three or more", 3.0),
    ("three", 3.0),
    ("3 story", 3.0),
    ("3+", 3.0),
    ("tri-level", 3.0),
    ("one and one half", 1.5),
    ("1.5 story", 1.5),
    ("1.5 level", 1.5),
    ("2.5 story", 2.5),
    ("lot", 0.0),
    ("acreage", 0.0),
    ("mid-rise", 5.0),
    ("high-rise", 10.0),
    ("multi/split", 2.0),
    ("split level", 2.0),
    ("bi-level", 2.0),
];

/// Clean the story count. Single story is the default assumption for
/// missing or unresolvable input.
pub fn clean_stories(raw: Option<&str>) -> f64 {
    let raw = match raw {
        Some(r) => r.trim(),
        None => return 1.0,
    };
    if raw.is_empty() || raw == "MISSING" {
        return 1.0;
    }

    let lower = raw.to_lowercase();
    if let Some((_, stories)) = STORY_DESCRIPTIONS.iter().find(|(desc, _)| *desc == lower) {
        return *stories;
    }

    first_decimal(raw).unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_baths_basic() {
        assert_eq!(clean_baths(Some("3.5 Baths"), 2.0), 3.5);
        assert_eq!(clean_baths(Some("2.5"), 2.0), 2.5);
        assert_eq!(clean_baths(None, 2.0), 0.0);
        assert_eq!(clean_baths(Some("missing"), 2.0), 0.0);
    }

    #[test]
    fn test_clean_baths_out_of_range_uses_mode() {
        assert_eq!(clean_baths(Some("15"), 3.0), 3.0);
        assert_eq!(clean_baths(Some("0.5"), 3.0), 3.0);
        assert_eq!(clean_baths(Some("no baths listed"), 3.0), 3.0);
    }

    #[test]
    fn test_bath_mode_most_frequent_wins() {
        let batch = vec![
            Some("2 Baths"),
            Some("2"),
            Some("3 Baths"),
            Some("57"), // out of range, ignored
            None,
        ];
        assert_eq!(bath_mode(batch.into_iter()), 2.0);
    }

    #[test]
    fn test_bath_mode_empty_set_falls_back() {
        let batch: Vec<Option<&str>> = vec![None, Some("garbage"), Some("99")];
        assert_eq!(bath_mode(batch.into_iter()), DEFAULT_BATH_MODE);
    }

    #[test]
    fn test_clean_lotsize_units() {
        let acres = FactValue::Text("0.25 acres".to_string());
        assert_eq!(clean_lotsize(Some(&acres)), 10_890.0);

        let sqft = FactValue::Text("5000 sqft".to_string());
        assert_eq!(clean_lotsize(Some(&sqft)), 5_000.0);

        let bare = FactValue::Number(7200);
        assert_eq!(clean_lotsize(Some(&bare)), 7_200.0);

        let placeholder = FactValue::Text("No Data".to_string());
        assert_eq!(clean_lotsize(Some(&placeholder)), 0.0);

        assert_eq!(clean_lotsize(None), 0.0);
    }

    #[test]
    fn test_lotsize_buckets() {
        assert_eq!(lotsize_bucket(10_890.0), "suburban_quarter");
        assert_eq!(lotsize_bucket(0.0), "urban_condo");
        assert_eq!(lotsize_bucket(21_780.0), "suburban_half");
        assert_eq!(lotsize_bucket(500_000.0), "rural_large");
    }

    #[test]
    fn test_clean_sqft() {
        assert_eq!(clean_sqft(Some("1,947 sqft")), 1_947.0);
        assert_eq!(
            clean_sqft(Some("Total interior livable area: 2,900 sqft")),
            2_900.0
        );
        assert_eq!(clean_sqft(Some("--")), 0.0);
        assert_eq!(clean_sqft(None), 0.0);
    }

    #[test]
    fn test_sqft_buckets() {
        assert_eq!(sqft_bucket(1_800.0), "small");
        assert_eq!(sqft_bucket(10_000.0), "medium");
        assert_eq!(sqft_bucket(10_001.0), "large");
    }

    #[test]
    fn test_clean_beds() {
        assert_eq!(clean_beds(Some("4 Beds")), 4);
        assert_eq!(clean_beds(Some("3 or more")), 3);
        assert_eq!(clean_beds(Some("1,947 sqft")), 0);
        assert_eq!(clean_beds(Some("2 Baths")), 0);
        assert_eq!(clean_beds(None), 0);
    }

    #[test]
    fn test_clean_stories_lookup_then_number() {
        assert_eq!(clean_stories(Some("Ranch")), 1.0);
        assert_eq!(clean_stories(Some("Tri-Level")), 3.0);
        assert_eq!(clean_stories(Some("Mid-Rise")), 5.0);
        assert_eq!(clean_stories(Some("High-Rise")), 10.0);
        assert_eq!(clean_stories(Some("2 Level, Site Built")), 2.0);
        assert_eq!(clean_stories(Some("1.5 Story")), 1.5);
        assert_eq!(clean_stories(Some("Split Level")), 2.0);
        assert_eq!(clean_stories(Some("weird")), 1.0);
        assert_eq!(clean_stories(None), 1.0);
        assert_eq!(clean_stories(Some("MISSING")), 1.0);
    }
}
