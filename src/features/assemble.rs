//! Final assembly - the uniform categorical cleanup pass
//!
//! This is the single point that guarantees the no-missing-values
//! invariant for string columns: fill, trim, lower-case, strip thousands
//! separators, and canonicalize the null-ish tokens to `unknown`.

use crate::features::types::{FactValue, FeatureRow};

/// Tokens that collapse to the missing sentinel after lower-casing
const NULLISH_TOKENS: [&str; 4] = ["", "nan", "none", "null"];

/// Clean one categorical cell
pub fn clean_category(value: &str) -> String {
    let cleaned = value.trim().to_lowercase().replace(',', "");
    if NULLISH_TOKENS.contains(&cleaned.as_str()) {
        "unknown".to_string()
    } else {
        cleaned
    }
}

/// Render a home-facts slot as a categorical cell
pub fn fact_string(value: Option<&FactValue>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "unknown".to_string(),
    }
}

/// Apply the categorical cleanup to every string column of a row
pub fn finalize_strings(row: &mut FeatureRow) {
    for field in [
        &mut row.status_cat,
        &mut row.city_tier,
        &mut row.street_cat,
        &mut row.sqft_category,
        &mut row.property_type_cat,
        &mut row.lotsize_cat,
        &mut row.heating_cat,
        &mut row.cooling_cat,
        &mut row.parking_cat,
        &mut row.fireplace_type,
        &mut row.fireplace_location,
        &mut row.year_built,
        &mut row.remodeled_year,
        &mut row.school_district_cat,
    ] {
        let cleaned = clean_category(field);
        *field = cleaned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_category_canonicalizes() {
        assert_eq!(clean_category("Pending/under Contract"), "pending/under contract");
        assert_eq!(clean_category("  tier_1 - Megacity "), "tier_1 - megacity");
        assert_eq!(clean_category("1,947"), "1947");
        assert_eq!(clean_category(""), "unknown");
        assert_eq!(clean_category(" NaN "), "unknown");
        assert_eq!(clean_category("None"), "unknown");
        assert_eq!(clean_category("null"), "unknown");
    }

    #[test]
    fn test_fact_string() {
        assert_eq!(fact_string(Some(&FactValue::Number(1920))), "1920");
        assert_eq!(
            fact_string(Some(&FactValue::Text("Forced Air".to_string()))),
            "Forced Air"
        );
        assert_eq!(fact_string(None), "unknown");
    }
}
