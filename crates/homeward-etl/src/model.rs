//! Record shapes flowing through the pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One animal exactly as received from the source API.
///
/// An opaque field map: the source is free to omit optional fields, send
/// malformed values, or add fields we have never seen. Interpretation happens
/// in the transformer, never here.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// One animal in the shape the home endpoint accepts.
///
/// Only produced by the transformer, so every instance has a non-empty name,
/// a normalized friend list, and a UTC birth timestamp or an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: u64,
    pub name: String,
    pub friends: Vec<String>,
    /// `None` when the source value was absent or unparseable
    pub born_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_animal_serializes_born_at_as_rfc3339() {
        let animal = Animal {
            id: 7,
            name: "Luna".to_string(),
            friends: vec!["Rex".to_string()],
            born_at: Some(Utc.with_ymd_and_hms(2019, 4, 12, 8, 30, 0).unwrap()),
        };

        let json = serde_json::to_value(&animal).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Luna");
        assert_eq!(json["friends"], serde_json::json!(["Rex"]));
        assert_eq!(json["born_at"], "2019-04-12T08:30:00Z");
    }

    #[test]
    fn test_animal_serializes_missing_born_at_as_null() {
        let animal = Animal {
            id: 3,
            name: "Mochi".to_string(),
            friends: vec![],
            born_at: None,
        };

        let json = serde_json::to_value(&animal).unwrap();
        assert!(json["born_at"].is_null());
    }
}
