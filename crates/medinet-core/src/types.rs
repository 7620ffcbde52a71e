//! Shared domain types for hospital and doctor search.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MedinetError, Result};

// =============================================================================
// SearchType
// =============================================================================

/// Which index a vector search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Hospital,
    Doctor,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Hospital => "hospital",
            SearchType::Doctor => "doctor",
        }
    }

    /// Noun used in user-facing sentences, pluralized for any count but one.
    pub fn noun(&self, count: usize) -> &'static str {
        match (self, count) {
            (SearchType::Hospital, 1) => "hospital",
            (SearchType::Hospital, _) => "hospitals",
            (SearchType::Doctor, 1) => "doctor",
            (SearchType::Doctor, _) => "doctors",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = MedinetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hospital" | "hospitals" => Ok(SearchType::Hospital),
            "doctor" | "doctors" => Ok(SearchType::Doctor),
            other => Err(MedinetError::InvalidSearchType(other.to_string())),
        }
    }
}

// =============================================================================
// SearchFilters
// =============================================================================

/// Optional narrowing applied to a search. Compared structurally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_halal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        *self == SearchFilters::default()
    }

    /// Canonical JSON encoding: fields in declaration order, unset fields omitted.
    ///
    /// Equal filters always encode to the same string, so this is safe to use
    /// inside cache keys.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// =============================================================================
// SearchResult
// =============================================================================

/// A hospital returned by the vector search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalHit {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub similarity: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub specialties: Vec<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub doctors_available: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_halal: Option<bool>,
}

/// A doctor returned by the vector search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorHit {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub similarity: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub specialty: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub experience_years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    Hospital(HospitalHit),
    Doctor(DoctorHit),
}

impl SearchResult {
    /// Decode a raw hit returned for a search of the given type.
    pub fn from_value(search_type: SearchType, value: Value) -> Result<Self> {
        Ok(match search_type {
            SearchType::Hospital => SearchResult::Hospital(serde_json::from_value(value)?),
            SearchType::Doctor => SearchResult::Doctor(serde_json::from_value(value)?),
        })
    }

    pub fn search_type(&self) -> SearchType {
        match self {
            SearchResult::Hospital(_) => SearchType::Hospital,
            SearchResult::Doctor(_) => SearchType::Doctor,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SearchResult::Hospital(h) => &h.id,
            SearchResult::Doctor(d) => &d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SearchResult::Hospital(h) => &h.name,
            SearchResult::Doctor(d) => &d.name,
        }
    }

    pub fn rating(&self) -> f64 {
        match self {
            SearchResult::Hospital(h) => h.rating,
            SearchResult::Doctor(d) => d.rating,
        }
    }

    pub fn similarity(&self) -> f64 {
        match self {
            SearchResult::Hospital(h) => h.similarity,
            SearchResult::Doctor(d) => d.similarity,
        }
    }

    /// Client-side route of the detail page for this result.
    pub fn route(&self) -> String {
        match self {
            SearchResult::Hospital(h) => format!("/hospitals/{}", h.id),
            SearchResult::Doctor(d) => format!("/doctors/{}", d.id),
        }
    }
}

/// Stable sort: similarity descending, ties broken by rating descending.
pub fn rank_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.similarity()
            .total_cmp(&a.similarity())
            .then_with(|| b.rating().total_cmp(&a.rating()))
    });
}

// =============================================================================
// Lenient decoders
// =============================================================================

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!("invalid id: {}", other))),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => Ok(s.trim().parse().unwrap_or(0.0)),
        Value::Null => Ok(0.0),
        other => Err(de::Error::custom(format!("invalid number: {}", other))),
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0)),
        Value::String(s) => Ok(s.trim().parse().unwrap_or(0)),
        Value::Null => Ok(0),
        other => Err(de::Error::custom(format!("invalid count: {}", other))),
    }
}

/// Explicit `null` decodes as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hospital(id: &str, similarity: f64, rating: f64) -> SearchResult {
        SearchResult::Hospital(HospitalHit {
            id: id.to_string(),
            name: format!("Hospital {}", id),
            rating,
            similarity,
            specialties: vec![],
            doctors_available: 0,
            city: None,
            country: None,
            is_halal: None,
        })
    }

    // ---- SearchType ----

    #[test]
    fn test_search_type_parse() {
        assert_eq!("hospital".parse::<SearchType>().unwrap(), SearchType::Hospital);
        assert_eq!("Doctors".parse::<SearchType>().unwrap(), SearchType::Doctor);
        assert!(matches!(
            "clinic".parse::<SearchType>(),
            Err(MedinetError::InvalidSearchType(_))
        ));
    }

    #[test]
    fn test_search_type_noun() {
        assert_eq!(SearchType::Hospital.noun(1), "hospital");
        assert_eq!(SearchType::Hospital.noun(0), "hospitals");
        assert_eq!(SearchType::Doctor.noun(3), "doctors");
    }

    // ---- SearchFilters ----

    #[test]
    fn test_empty_filters_canonical_json() {
        assert_eq!(SearchFilters::default().canonical_json(), "{}");
        assert!(SearchFilters::default().is_empty());
    }

    #[test]
    fn test_canonical_json_is_field_ordered() {
        let a = SearchFilters {
            country: Some("Malaysia".into()),
            specialty: Some("Cardiology".into()),
            ..Default::default()
        };
        let b = SearchFilters {
            specialty: Some("Cardiology".into()),
            country: Some("Malaysia".into()),
            ..Default::default()
        };
        assert_eq!(a.canonical_json(), b.canonical_json());
        assert_eq!(
            a.canonical_json(),
            r#"{"specialty":"Cardiology","country":"Malaysia"}"#
        );
    }

    #[test]
    fn test_filters_decode_camel_case() {
        let filters: SearchFilters =
            serde_json::from_value(json!({"isHalal": true, "minRating": 4})).unwrap();
        assert_eq!(filters.is_halal, Some(true));
        assert_eq!(filters.min_rating, Some(4.0));
    }

    // ---- SearchResult ----

    #[test]
    fn test_decode_hospital_with_numeric_id() {
        let value = json!({
            "id": 42,
            "name": "Gleneagles",
            "rating": 4.5,
            "similarity": 0.87,
            "specialties": ["Cardiology"],
            "doctorsAvailable": 12
        });
        let result = SearchResult::from_value(SearchType::Hospital, value).unwrap();
        assert_eq!(result.id(), "42");
        assert_eq!(result.name(), "Gleneagles");
        assert_eq!(result.route(), "/hospitals/42");
        match result {
            SearchResult::Hospital(h) => assert_eq!(h.doctors_available, 12),
            other => panic!("expected hospital, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_doctor_with_null_rating() {
        let value = json!({
            "id": "d-7",
            "name": "Dr. Tan",
            "rating": null,
            "similarity": "0.6",
            "specialty": "Oncology",
            "experienceYears": 15
        });
        let result = SearchResult::from_value(SearchType::Doctor, value).unwrap();
        assert_eq!(result.rating(), 0.0);
        assert_eq!(result.similarity(), 0.6);
        assert_eq!(result.route(), "/doctors/d-7");
        assert_eq!(result.search_type(), SearchType::Doctor);
    }

    #[test]
    fn test_decode_hits_with_null_columns() {
        let value = json!({
            "id": 4,
            "name": "Bumrungrad",
            "rating": 4.7,
            "similarity": 0.8,
            "specialties": null,
            "doctorsAvailable": null
        });
        let SearchResult::Hospital(hit) =
            SearchResult::from_value(SearchType::Hospital, value).unwrap()
        else {
            panic!("expected a hospital");
        };
        assert!(hit.specialties.is_empty());
        assert_eq!(hit.doctors_available, 0);

        let value = json!({
            "id": "d-9",
            "name": "Dr. Wong",
            "specialty": null,
            "experienceYears": null
        });
        let SearchResult::Doctor(hit) =
            SearchResult::from_value(SearchType::Doctor, value).unwrap()
        else {
            panic!("expected a doctor");
        };
        assert_eq!(hit.specialty, "");
        assert_eq!(hit.experience_years, 0);
    }

    #[test]
    fn test_decode_counts_from_strings_and_fractions() {
        let value = json!({"id": "d-1", "experienceYears": " 12 "});
        let SearchResult::Doctor(hit) =
            SearchResult::from_value(SearchType::Doctor, value).unwrap()
        else {
            panic!("expected a doctor");
        };
        assert_eq!(hit.experience_years, 12);

        let value = json!({"id": "h-1", "doctorsAvailable": 2.5});
        let SearchResult::Hospital(hit) =
            SearchResult::from_value(SearchType::Hospital, value).unwrap()
        else {
            panic!("expected a hospital");
        };
        assert_eq!(hit.doctors_available, 0);
    }

    #[test]
    fn test_decode_rejects_object_id() {
        let value = json!({"id": {"nested": true}, "name": "x"});
        assert!(SearchResult::from_value(SearchType::Hospital, value).is_err());
    }

    #[test]
    fn test_serialize_is_tagged() {
        let value = serde_json::to_value(hospital("1", 0.9, 4.0)).unwrap();
        assert_eq!(value["type"], "hospital");
        assert_eq!(value["id"], "1");
    }

    // ---- Ranking ----

    #[test]
    fn test_rank_similarity_then_rating() {
        let mut results = vec![
            hospital("a", 0.9, 3.0),
            hospital("b", 0.9, 5.0),
            hospital("c", 0.5, 5.0),
        ];
        rank_results(&mut results);
        let ids: Vec<&str> = results.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rank_is_stable_for_full_ties() {
        let mut results = vec![
            hospital("first", 0.7, 4.0),
            hospital("second", 0.7, 4.0),
            hospital("third", 0.7, 4.0),
        ];
        rank_results(&mut results);
        let ids: Vec<&str> = results.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
