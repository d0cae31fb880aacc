//! # doctor-monitor
//!
//! Client for the doctor monitoring endpoint. The endpoint is loosely shaped:
//! it may answer with a bare array or an object wrapping a `doctors` array;
//! anything else decodes to an empty list rather than an error.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://api-omsehat.sportsnow.app/doctors";

/// Localized message carried by fetch failures.
pub const FETCH_ERROR: &str = "Gagal memuat daftar dokter";

/// One doctor in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub roomno: String,
}

/// HTTP client for the doctor directory.
#[derive(Clone)]
pub struct DoctorDirectoryClient {
    http: reqwest::Client,
    endpoint: String,
}

impl DoctorDirectoryClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Fetches the directory. A non-success status or transport failure maps
    /// to an error carrying [`FETCH_ERROR`]; an unexpected body shape decodes
    /// to an empty list.
    #[instrument(skip(self))]
    pub async fn fetch_doctors(&self) -> Result<Vec<Doctor>> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| anyhow!("{FETCH_ERROR}: {e}"))?;
        if !response.status().is_success() {
            bail!("{FETCH_ERROR}: HTTP {}", response.status());
        }
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("{FETCH_ERROR}: {e}"))?;
        let doctors = decode_doctors(value);
        debug!(count = doctors.len(), "doctor directory fetched");
        Ok(doctors)
    }
}

impl Default for DoctorDirectoryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes the directory response: bare array or `{"doctors": [...]}`. Any
/// other shape is an empty list; array elements that do not decode are
/// skipped.
pub fn decode_doctors(value: serde_json::Value) -> Vec<Doctor> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("doctors") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Case-insensitive substring match over name, specialty, and room number.
/// An empty query keeps everything.
pub fn filter_doctors(doctors: &[Doctor], query: &str) -> Vec<Doctor> {
    let query = query.to_lowercase();
    doctors
        .iter()
        .filter(|d| {
            d.name.to_lowercase().contains(&query)
                || d.specialty.to_lowercase().contains(&query)
                || d.roomno.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doctor(name: &str, specialty: &str, roomno: &str) -> Doctor {
        Doctor {
            id: "1".to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            specialty: specialty.to_string(),
            roomno: roomno.to_string(),
        }
    }

    #[test]
    fn decode_bare_array() {
        let value = json!([{
            "id": "1",
            "name": "Dr. Sari",
            "email": "sari@example.com",
            "specialty": "Kardiologi",
            "roomno": "A-12"
        }]);
        let doctors = decode_doctors(value);
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].name, "Dr. Sari");
    }

    #[test]
    fn decode_wrapped_object() {
        let value = json!({"doctors": [{
            "id": "2",
            "name": "Dr. Budi",
            "email": "budi@example.com",
            "specialty": "Neurologi",
            "roomno": "B-3"
        }]});
        let doctors = decode_doctors(value);
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].specialty, "Neurologi");
    }

    #[test]
    fn decode_other_shapes_as_empty() {
        assert!(decode_doctors(json!("not a list")).is_empty());
        assert!(decode_doctors(json!(42)).is_empty());
        assert!(decode_doctors(json!({"items": []})).is_empty());
        assert!(decode_doctors(json!({"doctors": "wrong"})).is_empty());
        assert!(decode_doctors(json!(null)).is_empty());
    }

    #[test]
    fn decode_skips_malformed_elements() {
        let value = json!([
            {"id": "1", "name": "Dr. Sari", "email": "s@example.com",
             "specialty": "Kardiologi", "roomno": "A-12"},
            {"name": "missing fields"}
        ]);
        let doctors = decode_doctors(value);
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].name, "Dr. Sari");
    }

    #[test]
    fn filter_matches_name_specialty_and_room() {
        let doctors = vec![
            doctor("Dr. Sari", "Kardiologi", "A-12"),
            doctor("Dr. Budi", "Neurologi", "B-3"),
        ];
        assert_eq!(filter_doctors(&doctors, "sari").len(), 1);
        assert_eq!(filter_doctors(&doctors, "NEURO").len(), 1);
        assert_eq!(filter_doctors(&doctors, "b-3")[0].name, "Dr. Budi");
        assert!(filter_doctors(&doctors, "bedah").is_empty());
    }

    #[test]
    fn empty_query_keeps_everything() {
        let doctors = vec![
            doctor("Dr. Sari", "Kardiologi", "A-12"),
            doctor("Dr. Budi", "Neurologi", "B-3"),
        ];
        assert_eq!(filter_doctors(&doctors, "").len(), 2);
    }
}
