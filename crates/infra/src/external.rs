//! Ports for the external collaborators around the store: address geocoding
//! and text extraction from uploaded documents.
//!
//! Neither feeds the recommendation engine. Failures are logged and degrade to
//! "no data"; they never reach the store.

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::warn;

use foodsaver_inventory::{Coordinates, NewInventoryItem};

#[derive(Debug, Error)]
pub enum ExternalError {
    /// The service could not be reached or answered with an error.
    #[error("external service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something we cannot interpret.
    #[error("unexpected response from external service: {0}")]
    Malformed(String),

    #[error("unsupported document: {0}")]
    Unsupported(String),
}

/// Resolves a free-form address to coordinates.
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service knows no match for the address.
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, ExternalError>;
}

/// Decode a Nominatim-style search response: a JSON array of hits whose
/// `lat`/`lon` are decimal strings. Only the first hit is used.
pub fn parse_nominatim_response(
    response: &JsonValue,
) -> Result<Option<Coordinates>, ExternalError> {
    let hits = response
        .as_array()
        .ok_or_else(|| ExternalError::Malformed("expected a JSON array of results".to_string()))?;

    let Some(first) = hits.first() else {
        return Ok(None);
    };

    let lat = coordinate(first, "lat")?;
    let lon = coordinate(first, "lon")?;
    Ok(Some(Coordinates { lat, lon }))
}

fn coordinate(hit: &JsonValue, field: &str) -> Result<f64, ExternalError> {
    let value = hit
        .get(field)
        .ok_or_else(|| ExternalError::Malformed(format!("result has no {field:?}")))?;
    let parsed = match value {
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        JsonValue::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExternalError::Malformed(format!("{field} is not a number: {value}")))
}

/// Geocode `address`, logging failures and returning `None` instead.
pub fn locate_or_none<G: Geocoder + ?Sized>(geocoder: &G, address: &str) -> Option<Coordinates> {
    if address.trim().is_empty() {
        return None;
    }
    match geocoder.geocode(address) {
        Ok(found) => found,
        Err(err) => {
            warn!(address, error = %err, "geocoding failed; continuing without coordinates");
            None
        }
    }
}

/// Fill in the draft's coordinates from its location, unless already set.
pub fn enrich_with_coordinates<G: Geocoder + ?Sized>(
    mut draft: NewInventoryItem,
    geocoder: &G,
) -> NewInventoryItem {
    if draft.coordinates.is_none() {
        draft.coordinates = locate_or_none(geocoder, &draft.location);
    }
    draft
}

/// Extracts plain text from an uploaded document (invoice, stock sheet).
pub trait DocumentExtractor: Send + Sync {
    fn extract_text(&self, document: &[u8]) -> Result<String, ExternalError>;
}

/// Extract text, logging failures and returning an empty string instead.
pub fn extract_text_or_empty<D: DocumentExtractor + ?Sized>(
    extractor: &D,
    document: &[u8],
) -> String {
    match extractor.extract_text(document) {
        Ok(text) => text,
        Err(err) => {
            warn!(bytes = document.len(), error = %err, "text extraction failed");
            String::new()
        }
    }
}

/// Extractor for documents that already are UTF-8 text.
#[derive(Debug, Default, Copy, Clone)]
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract_text(&self, document: &[u8]) -> Result<String, ExternalError> {
        String::from_utf8(document.to_vec())
            .map(|text| text.trim().to_string())
            .map_err(|e| ExternalError::Unsupported(format!("not UTF-8 text: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use foodsaver_core::{BusinessId, Money};
    use foodsaver_inventory::{Category, Unit};
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeGeocoder {
        answer: Result<Option<Coordinates>, String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeGeocoder {
        fn new(answer: Result<Option<Coordinates>, String>) -> Self {
            Self {
                answer,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        fn geocode(&self, address: &str) -> Result<Option<Coordinates>, ExternalError> {
            self.calls.lock().unwrap().push(address.to_string());
            self.answer.clone().map_err(ExternalError::Unavailable)
        }
    }

    fn draft(coordinates: Option<Coordinates>) -> NewInventoryItem {
        NewInventoryItem {
            business_id: BusinessId::new(),
            business_name: "Green Grocer".to_string(),
            name: "Apples".to_string(),
            category: Category::Produce,
            quantity: 20,
            unit: Unit::Kg,
            original_price: Money::from_cents(300),
            expiry_date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
            location: "1 Orchard Rd, Springfield".to_string(),
            coordinates,
        }
    }

    #[test]
    fn parses_first_nominatim_hit() {
        let response = json!([
            {"lat": "52.5170365", "lon": "13.3888599", "display_name": "Berlin"},
            {"lat": "0", "lon": "0"}
        ]);
        let found = parse_nominatim_response(&response).unwrap().unwrap();
        assert_eq!(found.lat, 52.5170365);
        assert_eq!(found.lon, 13.3888599);
    }

    #[test]
    fn empty_results_mean_no_match() {
        assert_eq!(parse_nominatim_response(&json!([])).unwrap(), None);
    }

    #[test]
    fn malformed_responses_are_errors() {
        assert!(parse_nominatim_response(&json!({"error": "rate limited"})).is_err());
        assert!(parse_nominatim_response(&json!([{"lat": "north", "lon": "1"}])).is_err());
        assert!(parse_nominatim_response(&json!([{"lat": "1"}])).is_err());
    }

    #[test]
    fn failing_geocoder_degrades_to_none() {
        let geocoder = FakeGeocoder::new(Err("timeout".to_string()));
        assert_eq!(locate_or_none(&geocoder, "somewhere"), None);
        assert_eq!(locate_or_none(&geocoder, "  "), None);
        assert_eq!(geocoder.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn enrichment_fills_missing_coordinates_only() {
        let here = Coordinates {
            lat: 39.78,
            lon: -89.65,
        };
        let geocoder = FakeGeocoder::new(Ok(Some(here)));

        let enriched = enrich_with_coordinates(draft(None), &geocoder);
        assert_eq!(enriched.coordinates, Some(here));

        let preset = Coordinates { lat: 1.0, lon: 2.0 };
        let kept = enrich_with_coordinates(draft(Some(preset)), &geocoder);
        assert_eq!(kept.coordinates, Some(preset));
        assert_eq!(geocoder.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn text_extraction_degrades_to_empty() {
        assert_eq!(
            extract_text_or_empty(&PlainTextExtractor, b"  12 x milk 1L\n"),
            "12 x milk 1L"
        );
        assert_eq!(extract_text_or_empty(&PlainTextExtractor, &[0xff, 0xfe]), "");
    }
}
