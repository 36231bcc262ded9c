//! School aggregate features
//!
//! Parses the listing's school list (structured or stringified) and derives
//! rating, distance, grade-range and name-keyword aggregates, plus the
//! composite district score. Entries of unexpected shape are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::features::literal::{parse_nested_field, ParseOutcome};

static RATING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static DISTANCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").unwrap());

/// Grade-range tokens per level, matched as substrings of the upper-cased
/// concatenated grade list
const ELEMENTARY_GRADES: [&str; 7] = ["PK-5", "K-5", "PK-6", "K-6", "PK-8", "1-5", "1-6"];
const MIDDLE_GRADES: [&str; 4] = ["6-8", "7-8", "6-9", "5-8"];
const HIGH_GRADES: [&str; 3] = ["9-12", "10-12", "9-10"];
const SPECIAL_GRADES: [&str; 4] = ["K-9", "K-12", "PK-12", "6-12"];

const PRESTIGE_KEYWORDS: [&str; 5] = ["ACADEMY", "MAGNET", "CHARTER", "PREP", "PREPARATORY"];
const FAMOUS_NAME_KEYWORDS: [&str; 5] =
    ["WASHINGTON", "LINCOLN", "JEFFERSON", "ROOSEVELT", "KENNEDY"];

/// Every school-derived output column for one record
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolSummary {
    pub avg_rating: f64,
    pub max_rating: i64,
    pub num_good_schools: i64,
    pub min_distance_mi: f64,
    pub avg_distance_mi: f64,
    pub within_1mi: i64,
    pub has_elementary: bool,
    pub has_middle: bool,
    pub has_high: bool,
    pub has_special: bool,
    pub levels_count: i64,
    pub num_elementary: i64,
    pub num_middle: i64,
    pub num_high: i64,
    pub num_charter: i64,
    pub district_score: i64,
    pub district_cat: &'static str,
    pub has_prestige: bool,
    pub has_famous_name: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchoolType {
    Elementary,
    Middle,
    High,
    Charter,
    Vocational,
    Special,
    Other,
}

/// Parse the raw schools field into a list of entry values.
/// Anything that does not resolve to a list becomes the empty list.
pub fn parse_schools(field: Option<&Value>) -> Vec<Value> {
    let parsed = match field {
        None => return Vec::new(),
        Some(Value::String(s)) => {
            if s.trim().is_empty() {
                return Vec::new();
            }
            match parse_nested_field(s) {
                ParseOutcome::Parsed(value) => value,
                ParseOutcome::Defaulted => return Vec::new(),
            }
        }
        Some(value) => value.clone(),
    };

    match parsed {
        Value::Array(entries) => entries,
        _ => Vec::new(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric ratings across all entries: `NR` → 0, otherwise the first
/// embedded integer; anything else is dropped.
pub fn extract_ratings(schools: &[Value]) -> Vec<i64> {
    let mut ratings = Vec::new();
    for school in schools {
        let rating_list = match school.get("rating").and_then(Value::as_array) {
            Some(list) => list,
            None => continue,
        };
        for rating in rating_list {
            let text = match rating.as_str() {
                Some(text) => text,
                None => continue,
            };
            if text.trim().to_uppercase() == "NR" {
                ratings.push(0);
                continue;
            }
            if let Some(m) = RATING_RE.find(text) {
                if let Ok(value) = m.as_str().parse::<i64>() {
                    ratings.push(value);
                }
            }
        }
    }
    ratings
}

/// Distances in miles across all entries; the unit suffix is ignored
pub fn extract_distances(schools: &[Value]) -> Vec<f64> {
    let mut distances = Vec::new();
    for school in schools {
        let distance_list = match school
            .get("data")
            .and_then(|d| d.get("Distance"))
            .and_then(Value::as_array)
        {
            Some(list) => list,
            None => continue,
        };
        for distance in distance_list {
            let text = match distance.as_str() {
                Some(text) => text,
                None => continue,
            };
            if let Some(m) = DISTANCE_RE.find(text) {
                if let Ok(value) = m.as_str().parse::<f64>() {
                    distances.push(value);
                }
            }
        }
    }
    distances
}

/// All grade-range strings, upper-cased and joined for substring matching
fn joined_grades(schools: &[Value]) -> String {
    let mut grades = Vec::new();
    for school in schools {
        let grade_list = match school
            .get("data")
            .and_then(|d| d.get("Grades"))
            .and_then(Value::as_array)
        {
            Some(list) => list,
            None => continue,
        };
        for grade in grade_list {
            grades.push(value_text(grade).to_uppercase());
        }
    }
    grades.join(" ")
}

/// Primary school names, upper-cased
fn primary_names(schools: &[Value]) -> Vec<String> {
    let mut names = Vec::new();
    for school in schools {
        let name_list = match school.get("name").and_then(Value::as_array) {
            Some(list) => list,
            None => continue,
        };
        if let Some(first) = name_list.first() {
            names.push(value_text(first).to_uppercase());
        }
    }
    names
}

fn classify_school_name(name: &str) -> SchoolType {
    if name.contains("ELEMENTARY") || name.contains("PRIMARY") {
        SchoolType::Elementary
    } else if name.contains("MIDDLE") || name.contains("JUNIOR") {
        SchoolType::Middle
    } else if name.contains("HIGH") || name.contains("SENIOR") {
        SchoolType::High
    } else if name.contains("ACADEMY") || name.contains("CHARTER") {
        SchoolType::Charter
    } else if name.contains("INSTITUTE") || name.contains("TECH") || name.contains("VOC") {
        SchoolType::Vocational
    } else if name.contains("MAGNET") || name.contains("MONTESSORI") {
        SchoolType::Special
    } else {
        SchoolType::Other
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Composite district score: five independently capped sub-scores summed
/// and hard-capped at 10. The empty-distance sentinel 0 intentionally lands
/// in the closest proximity tier.
fn district_score(
    num_rated_schools: usize,
    avg_rating: f64,
    min_distance: f64,
    levels_count: i64,
    num_good_schools: i64,
) -> i64 {
    let mut score: i64 = 0;

    score += match num_rated_schools {
        n if n >= 5 => 3,
        n if n >= 3 => 2,
        n if n >= 1 => 1,
        _ => 0,
    };

    score += if avg_rating >= 8.0 {
        3
    } else if avg_rating >= 6.0 {
        2
    } else if avg_rating >= 4.0 {
        1
    } else {
        0
    };

    score += if min_distance <= 0.5 {
        3
    } else if min_distance <= 1.0 {
        2
    } else if min_distance <= 2.0 {
        1
    } else {
        0
    };

    score += levels_count.min(3);

    score += match num_good_schools {
        n if n >= 3 => 3,
        n if n >= 2 => 2,
        n if n >= 1 => 1,
        _ => 0,
    };

    score.min(10)
}

fn district_category(score: i64) -> &'static str {
    if score >= 8 {
        "excellent"
    } else if score >= 6 {
        "good"
    } else if score >= 4 {
        "average"
    } else if score >= 2 {
        "poor"
    } else {
        "very_poor"
    }
}

/// Derive every school column for one record
pub fn summarize_schools(field: Option<&Value>) -> SchoolSummary {
    let schools = parse_schools(field);
    let ratings = extract_ratings(&schools);
    let distances = extract_distances(&schools);
    let grades = joined_grades(&schools);
    let names = primary_names(&schools);
    let types: Vec<SchoolType> = names.iter().map(|n| classify_school_name(n)).collect();

    let avg_rating = round2(mean(
        &ratings.iter().map(|&r| r as f64).collect::<Vec<_>>(),
    ));
    let max_rating = ratings.iter().copied().max().unwrap_or(0);
    let num_good_schools = ratings.iter().filter(|&&r| r >= 7).count() as i64;

    let min_distance_mi = distances.iter().copied().fold(f64::INFINITY, f64::min);
    let min_distance_mi = if min_distance_mi.is_finite() {
        min_distance_mi
    } else {
        0.0
    };
    let avg_distance_mi = round2(mean(&distances));
    let within_1mi = distances.iter().filter(|&&d| d <= 1.0).count() as i64;

    let has_elementary = ELEMENTARY_GRADES.iter().any(|t| grades.contains(t));
    let has_middle = MIDDLE_GRADES.iter().any(|t| grades.contains(t));
    let has_high = HIGH_GRADES.iter().any(|t| grades.contains(t));
    let has_special = SPECIAL_GRADES.iter().any(|t| grades.contains(t));
    let levels_count = has_elementary as i64 + has_middle as i64 + has_high as i64;

    let count_type = |wanted: SchoolType| types.iter().filter(|&&t| t == wanted).count() as i64;

    let joined_names = names.join(" ");
    let has_prestige = PRESTIGE_KEYWORDS.iter().any(|kw| joined_names.contains(kw));
    let has_famous_name = FAMOUS_NAME_KEYWORDS
        .iter()
        .any(|kw| joined_names.contains(kw));

    let score = district_score(
        ratings.len(),
        avg_rating,
        min_distance_mi,
        levels_count,
        num_good_schools,
    );

    SchoolSummary {
        avg_rating,
        max_rating,
        num_good_schools,
        min_distance_mi,
        avg_distance_mi,
        within_1mi,
        has_elementary,
        has_middle,
        has_high,
        has_special,
        levels_count,
        num_elementary: count_type(SchoolType::Elementary),
        num_middle: count_type(SchoolType::Middle),
        num_high: count_type(SchoolType::High),
        num_charter: count_type(SchoolType::Charter),
        district_score: score,
        district_cat: district_category(score),
        has_prestige,
        has_famous_name,
    }
}
