//! Core data types for the feature pipeline
//! Pure data structures with no behavior beyond field reconciliation

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Raw listing record as delivered by the upstream scraper or the API
/// schema layer. Every field is optional; scalar fields tolerate both JSON
/// strings and bare numbers, nested fields arrive either as structured JSON
/// or as a stringified literal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListing {
    #[serde(default, deserialize_with = "stringlike")]
    pub status: Option<String>,

    #[serde(rename = "propertyType", default, deserialize_with = "stringlike")]
    pub property_type: Option<String>,

    #[serde(default, deserialize_with = "stringlike")]
    pub street: Option<String>,

    #[serde(default, deserialize_with = "stringlike")]
    pub baths: Option<String>,

    /// Structured JSON object or a stringified literal with an
    /// `atAGlanceFacts` list
    #[serde(rename = "homeFacts", default)]
    pub home_facts: Option<Value>,

    #[serde(default, deserialize_with = "stringlike")]
    pub fireplace: Option<String>,

    #[serde(default, deserialize_with = "stringlike")]
    pub city: Option<String>,

    /// Structured JSON list or a stringified literal list of school entries
    #[serde(default)]
    pub schools: Option<Value>,

    #[serde(default, deserialize_with = "stringlike")]
    pub sqft: Option<String>,

    #[serde(default, deserialize_with = "stringlike")]
    pub zipcode: Option<String>,

    #[serde(default, deserialize_with = "stringlike")]
    pub beds: Option<String>,

    #[serde(default, deserialize_with = "stringlike")]
    pub state: Option<String>,

    #[serde(default, deserialize_with = "stringlike")]
    pub stories: Option<String>,

    // Duplicate/aliased source fields. `PrivatePool` wins over "private pool"
    // when both are present; the MLS identifiers are never read by the
    // pipeline and never reach the output schema.
    #[serde(rename = "PrivatePool", default, deserialize_with = "stringlike")]
    pub private_pool: Option<String>,

    #[serde(rename = "private pool", default, deserialize_with = "stringlike")]
    pub private_pool_alt: Option<String>,

    #[serde(rename = "mls-id", default, deserialize_with = "stringlike")]
    pub mls_id: Option<String>,

    #[serde(rename = "MlsId", default, deserialize_with = "stringlike")]
    pub mls_id_alt: Option<String>,
}

impl RawListing {
    /// Reconcile the two pool alias fields into one boolean.
    /// `PrivatePool` has first-non-missing precedence; absent → false.
    pub fn has_pool(&self) -> bool {
        self.private_pool
            .as_deref()
            .or(self.private_pool_alt.as_deref())
            .map(|v| v.trim().to_lowercase() == "yes")
            .unwrap_or(false)
    }
}

/// Accept a JSON string or any scalar and carry it as a string
fn stringlike<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// A single home-facts value: numeric when the source text was purely
/// digits, otherwise the raw categorical string
#[derive(Debug, Clone, PartialEq)]
pub enum FactValue {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for FactValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactValue::Number(n) => write!(f, "{}", n),
            FactValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// The known home-facts labels, flattened out of `atAGlanceFacts`.
/// A `None` field means the label was absent from a successfully parsed
/// facts list; a defaulted struct (parse failure) carries zeros everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFacts {
    pub year_built: Option<FactValue>,
    pub remodeled_year: Option<FactValue>,
    pub heating: Option<FactValue>,
    pub cooling: Option<FactValue>,
    pub parking: Option<FactValue>,
    pub lotsize: Option<FactValue>,
    pub price_per_sqft: Option<FactValue>,
}

impl HomeFacts {
    /// Fallback mapping substituted when the facts field cannot be parsed
    pub fn zeroed() -> Self {
        Self {
            year_built: Some(FactValue::Number(0)),
            remodeled_year: Some(FactValue::Number(0)),
            heating: Some(FactValue::Number(0)),
            cooling: Some(FactValue::Number(0)),
            parking: Some(FactValue::Number(0)),
            lotsize: Some(FactValue::Number(0)),
            price_per_sqft: Some(FactValue::Number(0)),
        }
    }
}

/// Canonical feature row - the pipeline's sole output unit.
/// Column set, order and types are identical for every input record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub status_cat: String,
    pub city_tier: String,
    pub street_cat: String,
    pub sqft_category: String,
    #[serde(rename = "propertyType_cat")]
    pub property_type_cat: String,
    pub lotsize_cat: String,
    pub heating_cat: String,
    pub cooling_cat: String,
    pub parking_cat: String,
    pub stories_clean: f64,
    pub pool: i64,
    pub baths_clean: f64,
    pub sqft_clean: f64,
    pub beds_clean: i64,
    pub fireplace_type: String,
    pub has_fireplace: i64,
    pub fireplace_count: i64,
    pub fireplace_location: String,
    #[serde(rename = "Year built")]
    pub year_built: String,
    #[serde(rename = "Remodeled year")]
    pub remodeled_year: String,
    pub lotsize_clean: f64,
    pub avg_school_rating: f64,
    pub max_school_rating: i64,
    pub num_good_schools: i64,
    pub min_school_distance_mi: f64,
    pub avg_school_distance_mi: f64,
    pub schools_within_1mi: i64,
    pub has_elementary_school: i64,
    pub has_middle_school: i64,
    pub has_high_school: i64,
    pub has_special_school: i64,
    pub school_levels_count: i64,
    pub num_elementary_schools: i64,
    pub num_middle_schools: i64,
    pub num_high_schools: i64,
    pub num_charter_schools: i64,
    pub school_district_score: i64,
    pub school_district_cat: String,
    pub has_prestige_school: i64,
    pub has_famous_name_school: i64,
}

impl FeatureRow {
    /// Output column names, in schema order
    pub const COLUMNS: [&'static str; 40] = [
        "status_cat",
        "city_tier",
        "street_cat",
        "sqft_category",
        "propertyType_cat",
        "lotsize_cat",
        "heating_cat",
        "cooling_cat",
        "parking_cat",
        "stories_clean",
        "pool",
        "baths_clean",
        "sqft_clean",
        "beds_clean",
        "fireplace_type",
        "has_fireplace",
        "fireplace_count",
        "fireplace_location",
        "Year built",
        "Remodeled year",
        "lotsize_clean",
        "avg_school_rating",
        "max_school_rating",
        "num_good_schools",
        "min_school_distance_mi",
        "avg_school_distance_mi",
        "schools_within_1mi",
        "has_elementary_school",
        "has_middle_school",
        "has_high_school",
        "has_special_school",
        "school_levels_count",
        "num_elementary_schools",
        "num_middle_schools",
        "num_high_schools",
        "num_charter_schools",
        "school_district_score",
        "school_district_cat",
        "has_prestige_school",
        "has_famous_name_school",
    ];

    /// Categorical string columns, in schema order
    pub fn categorical_values(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("status_cat", self.status_cat.as_str()),
            ("city_tier", self.city_tier.as_str()),
            ("street_cat", self.street_cat.as_str()),
            ("sqft_category", self.sqft_category.as_str()),
            ("propertyType_cat", self.property_type_cat.as_str()),
            ("lotsize_cat", self.lotsize_cat.as_str()),
            ("heating_cat", self.heating_cat.as_str()),
            ("cooling_cat", self.cooling_cat.as_str()),
            ("parking_cat", self.parking_cat.as_str()),
            ("fireplace_type", self.fireplace_type.as_str()),
            ("fireplace_location", self.fireplace_location.as_str()),
            ("Year built", self.year_built.as_str()),
            ("Remodeled year", self.remodeled_year.as_str()),
            ("school_district_cat", self.school_district_cat.as_str()),
        ]
    }

    /// Numeric and boolean-as-int columns, in schema order
    pub fn numeric_values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("stories_clean", self.stories_clean),
            ("pool", self.pool as f64),
            ("baths_clean", self.baths_clean),
            ("sqft_clean", self.sqft_clean),
            ("beds_clean", self.beds_clean as f64),
            ("has_fireplace", self.has_fireplace as f64),
            ("fireplace_count", self.fireplace_count as f64),
            ("lotsize_clean", self.lotsize_clean),
            ("avg_school_rating", self.avg_school_rating),
            ("max_school_rating", self.max_school_rating as f64),
            ("num_good_schools", self.num_good_schools as f64),
            ("min_school_distance_mi", self.min_school_distance_mi),
            ("avg_school_distance_mi", self.avg_school_distance_mi),
            ("schools_within_1mi", self.schools_within_1mi as f64),
            ("has_elementary_school", self.has_elementary_school as f64),
            ("has_middle_school", self.has_middle_school as f64),
            ("has_high_school", self.has_high_school as f64),
            ("has_special_school", self.has_special_school as f64),
            ("school_levels_count", self.school_levels_count as f64),
            ("num_elementary_schools", self.num_elementary_schools as f64),
            ("num_middle_schools", self.num_middle_schools as f64),
            ("num_high_schools", self.num_high_schools as f64),
            ("num_charter_schools", self.num_charter_schools as f64),
            ("school_district_score", self.school_district_score as f64),
            ("has_prestige_school", self.has_prestige_school as f64),
            ("has_famous_name_school", self.has_famous_name_school as f64),
        ]
    }

    /// Render the row as CSV cells in schema order
    pub fn csv_record(&self) -> Vec<String> {
        vec![
            self.status_cat.clone(),
            self.city_tier.clone(),
            self.street_cat.clone(),
            self.sqft_category.clone(),
            self.property_type_cat.clone(),
            self.lotsize_cat.clone(),
            self.heating_cat.clone(),
            self.cooling_cat.clone(),
            self.parking_cat.clone(),
            self.stories_clean.to_string(),
            self.pool.to_string(),
            self.baths_clean.to_string(),
            self.sqft_clean.to_string(),
            self.beds_clean.to_string(),
            self.fireplace_type.clone(),
            self.has_fireplace.to_string(),
            self.fireplace_count.to_string(),
            self.fireplace_location.clone(),
            self.year_built.clone(),
            self.remodeled_year.clone(),
            self.lotsize_clean.to_string(),
            self.avg_school_rating.to_string(),
            self.max_school_rating.to_string(),
            self.num_good_schools.to_string(),
            self.min_school_distance_mi.to_string(),
            self.avg_school_distance_mi.to_string(),
            self.schools_within_1mi.to_string(),
            self.has_elementary_school.to_string(),
            self.has_middle_school.to_string(),
            self.has_high_school.to_string(),
            self.has_special_school.to_string(),
            self.school_levels_count.to_string(),
            self.num_elementary_schools.to_string(),
            self.num_middle_schools.to_string(),
            self.num_high_schools.to_string(),
            self.num_charter_schools.to_string(),
            self.school_district_score.to_string(),
            self.school_district_cat.clone(),
            self.has_prestige_school.to_string(),
            self.has_famous_name_school.to_string(),
        ]
    }
}

/// Terminal pipeline errors. Malformed domain data never lands here; only a
/// contract breach by the caller does.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("cannot build features for an empty batch")]
    EmptyBatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_precedence() {
        let listing = RawListing {
            private_pool: Some("Yes".to_string()),
            private_pool_alt: Some("no".to_string()),
            ..Default::default()
        };
        assert!(listing.has_pool());

        let listing = RawListing {
            private_pool_alt: Some(" yes ".to_string()),
            ..Default::default()
        };
        assert!(listing.has_pool());

        let listing = RawListing::default();
        assert!(!listing.has_pool());
    }

    #[test]
    fn test_scalar_fields_accept_numbers() {
        let listing: RawListing = serde_json::from_value(serde_json::json!({
            "beds": 3,
            "baths": 2.5,
            "sqft": "1,947 sqft",
            "stories": "2.0"
        }))
        .unwrap();

        assert_eq!(listing.beds.as_deref(), Some("3"));
        assert_eq!(listing.baths.as_deref(), Some("2.5"));
        assert_eq!(listing.sqft.as_deref(), Some("1,947 sqft"));
    }

    #[test]
    fn test_aliased_field_names() {
        let listing: RawListing = serde_json::from_value(serde_json::json!({
            "propertyType": "Single Family Home",
            "private pool": "yes",
            "mls-id": "611019"
        }))
        .unwrap();

        assert_eq!(listing.property_type.as_deref(), Some("Single Family Home"));
        assert!(listing.has_pool());
        assert_eq!(listing.mls_id.as_deref(), Some("611019"));
    }

    #[test]
    fn test_columns_match_schema_width() {
        assert_eq!(FeatureRow::COLUMNS.len(), 40);
    }
}
