//! Record parser
//!
//! Maps one raw API listing item into a normalized [`HotelRecord`]. The
//! parser is tolerant of missing optional fields, but a structurally
//! broken item (wrong type where an object or string array is expected)
//! makes the whole item unparsable. A single malformed item never aborts
//! the run; the orchestrator just drops it.

use crate::storage::HotelRecord;
use serde_json::{Map, Value};

/// Phrases in the accessibility label that mark a sustainable property
const SUSTAINABLE_MARKERS: [&str; 2] = ["sustainable", "travel sustainable"];

/// Parses one raw listing item into a hotel record
///
/// Returns `None` when the item lacks a numeric `hotel_id`, or when the
/// structure is too broken to trust (non-object `property`, non-string
/// `accessibilityLabel`, non-string entries in `photoUrls`).
///
/// The city comes from the search query that produced the item, not from
/// the payload.
pub fn parse_hotel(item: &Value, city: &str) -> Option<HotelRecord> {
    let id = item.get("hotel_id").and_then(Value::as_i64)?;

    let empty = Map::new();
    let property = match item.get("property") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => return None,
    };

    let label = match item.get("accessibilityLabel") {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return None,
    };

    let label_lower = label.to_lowercase();
    let is_travel_sustainable = SUSTAINABLE_MARKERS
        .iter()
        .any(|marker| label_lower.contains(marker));

    // Price and currency live in the same nested object; both are set
    // or neither is.
    let gross_price = property
        .get("priceBreakdown")
        .and_then(|b| b.get("grossPrice"));
    let (price_value, currency) = match gross_price {
        Some(gross) => (
            gross.get("value").and_then(Value::as_f64),
            gross
                .get("currency")
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        None => (None, None),
    };

    let photo_urls = match property.get("photoUrls") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => {
            let mut urls = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry.as_str() {
                    Some(url) => urls.push(url),
                    None => return None,
                }
            }
            urls
        }
        Some(_) => return None,
    };

    let main_photo_url = photo_urls.first().map(|url| url.to_string());
    let all_photo_urls = if photo_urls.is_empty() {
        None
    } else {
        Some(photo_urls.join(","))
    };

    Some(HotelRecord {
        id,
        city: city.to_string(),
        name: string_field(property, "name"),
        description: if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        },
        // Not available from the search endpoint
        address: None,
        latitude: float_field(property, "latitude"),
        longitude: float_field(property, "longitude"),
        review_score: float_field(property, "reviewScore"),
        review_score_word: string_field(property, "reviewScoreWord"),
        review_count: int_field(property, "reviewCount"),
        ranking_position: int_field(property, "rankingPosition"),
        property_class: int_field(property, "propertyClass"),
        accurate_property_class: int_field(property, "accuratePropertyClass"),
        ufi: coerce_to_string(property.get("ufi")),
        country_code: string_field(property, "countryCode"),
        is_preferred: property
            .get("isPreferred")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        is_travel_sustainable,
        price_value,
        currency,
        main_photo_url,
        all_photo_urls,
    })
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn float_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

fn int_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key).and_then(Value::as_i64)
}

/// String-coerces a field that arrives as either a number or a string
fn coerce_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
