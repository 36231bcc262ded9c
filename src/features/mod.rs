//! Feature pipeline - deterministic batch transformation from raw listing
//! records to the fixed-schema feature table
//!
//! The pipeline is pure: no I/O, no randomness, no shared state across
//! invocations. Per-field cleaners run independently; the nested-structure
//! parsers feed the school and home-facts aggregates; the bath mode is the
//! single batch-scoped value and is threaded through as an explicit
//! parameter. Malformed domain data always degrades to a sentinel; only an
//! empty batch is a terminal error.

pub mod assemble;
pub mod categories;
pub mod facts;
pub mod fireplace;
pub mod literal;
pub mod numbers;
pub mod schools;
pub mod types;

pub use types::{FeatureError, FeatureRow, RawListing};

/// Transform a batch of raw listings into feature rows, preserving input
/// order. The bath mode is computed over this batch before the per-row
/// pass.
pub fn build_features(batch: &[RawListing]) -> Result<Vec<FeatureRow>, FeatureError> {
    if batch.is_empty() {
        return Err(FeatureError::EmptyBatch);
    }

    let bath_mode = numbers::bath_mode(batch.iter().map(|listing| listing.baths.as_deref()));

    Ok(batch
        .iter()
        .map(|listing| build_row(listing, bath_mode))
        .collect())
}

/// Single-record convenience: a batch of size one
pub fn build_features_single(listing: &RawListing) -> Result<FeatureRow, FeatureError> {
    let mut rows = build_features(std::slice::from_ref(listing))?;
    rows.pop().ok_or(FeatureError::EmptyBatch)
}

fn build_row(listing: &RawListing, bath_mode: f64) -> FeatureRow {
    let home_facts = facts::extract_home_facts(listing.home_facts.as_ref());
    let school_summary = schools::summarize_schools(listing.schools.as_ref());
    let fireplace = fireplace::parse_fireplace(listing.fireplace.as_deref());

    let sqft_clean = numbers::clean_sqft(listing.sqft.as_deref());
    let lotsize_clean = numbers::clean_lotsize(home_facts.lotsize.as_ref());

    let mut row = FeatureRow {
        status_cat: categories::normalize_status(listing.status.as_deref()).to_string(),
        city_tier: categories::city_tier(listing.city.as_deref()).to_string(),
        street_cat: categories::normalize_street(listing.street.as_deref()).to_string(),
        sqft_category: numbers::sqft_bucket(sqft_clean).to_string(),
        property_type_cat: categories::normalize_property_type(listing.property_type.as_deref())
            .to_string(),
        lotsize_cat: numbers::lotsize_bucket(lotsize_clean).to_string(),
        heating_cat: categories::heating_category(home_facts.heating.as_ref()).to_string(),
        cooling_cat: categories::cooling_category(home_facts.cooling.as_ref()).to_string(),
        parking_cat: categories::parking_category(home_facts.parking.as_ref()).to_string(),
        stories_clean: numbers::clean_stories(listing.stories.as_deref()),
        pool: listing.has_pool() as i64,
        baths_clean: numbers::clean_baths(listing.baths.as_deref(), bath_mode),
        sqft_clean,
        beds_clean: numbers::clean_beds(listing.beds.as_deref()),
        fireplace_type: fireplace.fireplace_type.to_string(),
        has_fireplace: fireplace.has_fireplace,
        fireplace_count: fireplace.count,
        fireplace_location: fireplace.location.to_string(),
        year_built: assemble::fact_string(home_facts.year_built.as_ref()),
        remodeled_year: assemble::fact_string(home_facts.remodeled_year.as_ref()),
        lotsize_clean,
        avg_school_rating: school_summary.avg_rating,
        max_school_rating: school_summary.max_rating,
        num_good_schools: school_summary.num_good_schools,
        min_school_distance_mi: school_summary.min_distance_mi,
        avg_school_distance_mi: school_summary.avg_distance_mi,
        schools_within_1mi: school_summary.within_1mi,
        has_elementary_school: school_summary.has_elementary as i64,
        has_middle_school: school_summary.has_middle as i64,
        has_high_school: school_summary.has_high as i64,
        has_special_school: school_summary.has_special as i64,
        school_levels_count: school_summary.levels_count,
        num_elementary_schools: school_summary.num_elementary,
        num_middle_schools: school_summary.num_middle,
        num_high_schools: school_summary.num_high,
        num_charter_schools: school_summary.num_charter,
        school_district_score: school_summary.district_score,
        school_district_cat: school_summary.district_cat.to_string(),
        has_prestige_school: school_summary.has_prestige as i64,
        has_famous_name_school: school_summary.has_famous_name as i64,
    };

    assemble::finalize_strings(&mut row);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_listing() -> RawListing {
        serde_json::from_value(json!({
            "status": "P",
            "propertyType": "Single Family Home",
            "street": "240 Heather Ln",
            "baths": "3.5 Baths",
            "homeFacts": "{'atAGlanceFacts': [\
                {'factValue': '1920', 'factLabel': 'Year built'}, \
                {'factValue': '2005', 'factLabel': 'Remodeled year'}, \
                {'factValue': 'Gas Forced Air', 'factLabel': 'Heating'}, \
                {'factValue': 'Central Air', 'factLabel': 'Cooling'}, \
                {'factValue': '2', 'factLabel': 'Parking'}, \
                {'factValue': '0.25 acres', 'factLabel': 'lotsize'}]}",
            "fireplace": "Gas Logs in Living Room",
            "city": "Chicago",
            "schools": "[{'rating': ['NR', '7', '9'], 'data': {\
                'Distance': ['0.4 mi', '1.6 mi', '0.9 mi'], \
                'Grades': ['K-5', '6-8', '9-12']}, \
                'name': ['Lincoln Elementary School']}]",
            "sqft": "1,947 sqft",
            "beds": "4 Beds",
            "stories": "2.0",
            "PrivatePool": "Yes",
            "MlsId": "611019"
        }))
        .unwrap()
    }

    #[test]
    fn test_full_listing_end_to_end() {
        let row = build_features_single(&full_listing()).unwrap();

        assert_eq!(row.status_cat, "pending/under contract");
        assert_eq!(row.city_tier, "tier_1 - megacity");
        assert_eq!(row.street_cat, "known");
        assert_eq!(row.property_type_cat, "single family");
        assert_eq!(row.sqft_clean, 1_947.0);
        assert_eq!(row.sqft_category, "small");
        assert_eq!(row.baths_clean, 3.5);
        assert_eq!(row.beds_clean, 4);
        assert_eq!(row.stories_clean, 2.0);
        assert_eq!(row.pool, 1);

        // home facts
        assert_eq!(row.year_built, "1920");
        assert_eq!(row.remodeled_year, "2005");
        assert_eq!(row.heating_cat, "forced air");
        assert_eq!(row.cooling_cat, "central air");
        assert_eq!(row.parking_cat, "2 spaces");
        assert_eq!(row.lotsize_clean, 10_890.0);
        assert_eq!(row.lotsize_cat, "suburban_quarter");

        // fireplace
        assert_eq!(row.has_fireplace, 1);
        assert_eq!(row.fireplace_count, 0);
        assert_eq!(row.fireplace_type, "gas");
        assert_eq!(row.fireplace_location, "living");

        // schools
        assert_eq!(row.avg_school_rating, 5.33);
        assert_eq!(row.max_school_rating, 9);
        assert_eq!(row.num_good_schools, 2);
        assert_eq!(row.min_school_distance_mi, 0.4);
        assert_eq!(row.schools_within_1mi, 2);
        assert_eq!(row.has_elementary_school, 1);
        assert_eq!(row.has_middle_school, 1);
        assert_eq!(row.has_high_school, 1);
        assert_eq!(row.has_special_school, 0);
        assert_eq!(row.school_levels_count, 3);
        assert_eq!(row.num_elementary_schools, 1);
        assert_eq!(row.has_famous_name_school, 1);
        assert_eq!(row.has_prestige_school, 0);
        // 3 ratings (+2), avg 5.33 (+1), min 0.4 (+3), 3 levels (+3),
        // 2 good (+2) = 11 → capped at 10
        assert_eq!(row.school_district_score, 10);
        assert_eq!(row.school_district_cat, "excellent");
    }

    #[test]
    fn test_empty_listing_degrades_to_sentinels() {
        let row = build_features_single(&RawListing::default()).unwrap();

        assert_eq!(row.status_cat, "missing");
        assert_eq!(row.city_tier, "unknown");
        assert_eq!(row.street_cat, "undisclosed");
        assert_eq!(row.property_type_cat, "missing");
        assert_eq!(row.sqft_clean, 0.0);
        assert_eq!(row.sqft_category, "small");
        assert_eq!(row.baths_clean, 0.0);
        assert_eq!(row.beds_clean, 0);
        assert_eq!(row.stories_clean, 1.0);
        assert_eq!(row.pool, 0);
        // absent homeFacts parse to the zeroed mapping
        assert_eq!(row.year_built, "0");
        assert_eq!(row.heating_cat, "other");
        assert_eq!(row.cooling_cat, "missing");
        assert_eq!(row.parking_cat, "missing");
        assert_eq!(row.lotsize_clean, 0.0);
        assert_eq!(row.lotsize_cat, "urban_condo");
        assert_eq!(row.fireplace_type, "unknown");
        assert_eq!(row.fireplace_location, "unknown");
        assert_eq!(row.school_district_cat, "poor");

        // every categorical cell carries a non-empty sentinel
        for (name, value) in row.categorical_values() {
            assert!(!value.is_empty(), "column {name} is empty");
        }
        for (name, value) in row.numeric_values() {
            assert!(value.is_finite(), "column {name} is not finite");
        }
    }

    #[test]
    fn test_out_of_range_baths_use_batch_mode() {
        let listings: Vec<RawListing> = vec![
            serde_json::from_value(json!({"baths": "2 Baths"})).unwrap(),
            serde_json::from_value(json!({"baths": "2"})).unwrap(),
            serde_json::from_value(json!({"baths": "3"})).unwrap(),
            serde_json::from_value(json!({"baths": "15"})).unwrap(),
        ];
        let rows = build_features(&listings).unwrap();

        assert_eq!(rows[0].baths_clean, 2.0);
        assert_eq!(rows[3].baths_clean, 2.0); // imputed from the batch mode
    }

    #[test]
    fn test_empty_batch_is_a_contract_breach() {
        let batch: Vec<RawListing> = Vec::new();
        assert!(matches!(
            build_features(&batch),
            Err(FeatureError::EmptyBatch)
        ));
    }

    #[test]
    fn test_schema_is_stable_across_inputs() {
        let full = build_features_single(&full_listing()).unwrap();
        let empty = build_features_single(&RawListing::default()).unwrap();

        assert_eq!(full.categorical_values().len(), 14);
        assert_eq!(full.numeric_values().len(), 26);
        assert_eq!(
            full.categorical_values().len() + full.numeric_values().len(),
            FeatureRow::COLUMNS.len()
        );
        assert_eq!(full.csv_record().len(), FeatureRow::COLUMNS.len());
        assert_eq!(empty.csv_record().len(), FeatureRow::COLUMNS.len());
    }

    #[test]
    fn test_order_is_preserved() {
        let listings: Vec<RawListing> = vec![
            serde_json::from_value(json!({"city": "Chicago"})).unwrap(),
            serde_json::from_value(json!({"city": "Houston"})).unwrap(),
        ];
        let rows = build_features(&listings).unwrap();
        assert_eq!(rows[0].city_tier, "tier_1 - megacity");
        assert_eq!(rows[1].city_tier, "tier_2 - major");
    }

    #[test]
    fn test_idempotent_on_canonical_numerics() {
        // re-cleaning an already-canonical bath value returns it unchanged
        assert_eq!(numbers::clean_baths(Some("2.5"), 2.0), 2.5);
        // re-running a normalizer on its own output stays in the bucket
        assert_eq!(
            categories::normalize_status(Some("pending/under contract")),
            "pending/under Contract"
        );
    }
}
