//! Home-facts extraction - flattens the `atAGlanceFacts` list into the
//! known label slots. Unknown labels are ignored, duplicate labels last
//! wins, and a facts field that cannot be parsed at all degrades to the
//! all-zeros mapping.

use serde_json::Value;

use crate::features::literal::{parse_nested_field, ParseOutcome};
use crate::features::types::{FactValue, HomeFacts};

/// Tokens that count as an absent fact value
const PLACEHOLDER_VALUES: [&str; 3] = ["", "—", "No Data"];

/// Purely-numeric value strings become integers, everything else stays a
/// categorical string.
fn clean_fact_value(value: Option<&Value>) -> FactValue {
    match value {
        None | Some(Value::Null) => FactValue::Number(0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if PLACEHOLDER_VALUES.contains(&trimmed) {
                return FactValue::Number(0);
            }
            if trimmed.chars().all(|c| c.is_ascii_digit()) {
                match trimmed.parse::<i64>() {
                    Ok(n) => FactValue::Number(n),
                    Err(_) => FactValue::Text(trimmed.to_string()),
                }
            } else {
                FactValue::Text(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => match n.as_i64() {
            Some(int) => FactValue::Number(int),
            None => FactValue::Text(n.to_string()),
        },
        Some(other) => FactValue::Text(other.to_string()),
    }
}

/// Extract the known home facts from the raw field. Accepts a structured
/// object or a stringified literal; runs the two-stage fallback chain on
/// the latter.
pub fn extract_home_facts(field: Option<&Value>) -> HomeFacts {
    let parsed = match field {
        None => return HomeFacts::zeroed(),
        Some(Value::String(s)) => match parse_nested_field(s) {
            ParseOutcome::Parsed(value) => value,
            ParseOutcome::Defaulted => return HomeFacts::zeroed(),
        },
        Some(value) => value.clone(),
    };

    let object = match parsed.as_object() {
        Some(object) => object,
        None => return HomeFacts::zeroed(),
    };

    let fact_list = match object.get("atAGlanceFacts") {
        None | Some(Value::Null) => return HomeFacts::default(),
        Some(Value::Array(list)) => list,
        Some(_) => return HomeFacts::zeroed(),
    };

    let mut facts = HomeFacts::default();
    for fact in fact_list {
        let entry = match fact.as_object() {
            Some(entry) => entry,
            // a malformed entry poisons the whole list
            None => return HomeFacts::zeroed(),
        };
        let label = match entry.get("factLabel").and_then(Value::as_str) {
            Some(label) => label,
            None => continue,
        };
        let value = clean_fact_value(entry.get("factValue"));
        match label {
            "Year built" => facts.year_built = Some(value),
            "Remodeled year" => facts.remodeled_year = Some(value),
            "Heating" => facts.heating = Some(value),
            "Cooling" => facts.cooling = Some(value),
            "Parking" => facts.parking = Some(value),
            "lotsize" => facts.lotsize = Some(value),
            "Price/Sqft" => facts.price_per_sqft = Some(value),
            _ => {}
        }
    }
    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_from_literal_string() {
        let raw = json!(
            "{'atAGlanceFacts': [\
             {'factValue': '1920', 'factLabel': 'Year built'}, \
             {'factValue': 'Forced Air', 'factLabel': 'Heating'}, \
             {'factValue': '0.25 acres', 'factLabel': 'lotsize'}, \
             {'factValue': None, 'factLabel': 'Cooling'}]}"
        );
        let facts = extract_home_facts(Some(&raw));

        assert_eq!(facts.year_built, Some(FactValue::Number(1920)));
        assert_eq!(
            facts.heating,
            Some(FactValue::Text("Forced Air".to_string()))
        );
        // mixed digit/unit values keep their raw text for the unit parser
        assert_eq!(
            facts.lotsize,
            Some(FactValue::Text("0.25 acres".to_string()))
        );
        assert_eq!(facts.cooling, Some(FactValue::Number(0)));
        assert_eq!(facts.parking, None);
    }

    #[test]
    fn test_extract_from_structured_object() {
        let raw = json!({
            "atAGlanceFacts": [
                {"factValue": "2025", "factLabel": "Remodeled year"},
                {"factValue": "No Data", "factLabel": "Parking"},
            ]
        });
        let facts = extract_home_facts(Some(&raw));

        assert_eq!(facts.remodeled_year, Some(FactValue::Number(2025)));
        assert_eq!(facts.parking, Some(FactValue::Number(0)));
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let raw = json!({
            "atAGlanceFacts": [
                {"factValue": "1950", "factLabel": "Year built"},
                {"factValue": "1972", "factLabel": "Year built"},
            ]
        });
        let facts = extract_home_facts(Some(&raw));
        assert_eq!(facts.year_built, Some(FactValue::Number(1972)));
    }

    #[test]
    fn test_unparseable_defaults_to_zeros() {
        let raw = json!("complete garbage {{{");
        assert_eq!(extract_home_facts(Some(&raw)), HomeFacts::zeroed());
        assert_eq!(extract_home_facts(None), HomeFacts::zeroed());

        let not_an_object = json!([1, 2, 3]);
        assert_eq!(extract_home_facts(Some(&not_an_object)), HomeFacts::zeroed());
    }

    #[test]
    fn test_object_without_facts_key_is_empty() {
        let raw = json!({"somethingElse": true});
        assert_eq!(extract_home_facts(Some(&raw)), HomeFacts::default());
    }
}
