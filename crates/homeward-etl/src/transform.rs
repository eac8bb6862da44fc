//! Record transformation and validation
//!
//! Maps one raw record into the canonical shape, or rejects it with a
//! validation error naming the offending field. A rejected record is dropped
//! and counted; it never aborts the run.
//!
//! Field rules:
//! - `id` and `name` are required and must be non-empty
//! - `friends` arrives as a comma-delimited string (or, from some sources,
//!   already as an array); absence means no friends, not an error
//! - `born_at` is normalized to UTC; an unparseable value is dropped with a
//!   warning unless strict timestamp handling is configured
//! - unrecognized fields are ignored

use crate::model::{Animal, RawRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use homeward_common::{HomewardError, Result};
use serde_json::Value;
use tracing::warn;

/// Datetime layouts accepted for `born_at` beyond RFC 3339 / RFC 2822.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Transforms raw records into canonical animals
#[derive(Debug, Clone, Copy)]
pub struct Transformer {
    strict_timestamps: bool,
}

impl Transformer {
    /// Create a transformer
    ///
    /// With `strict_timestamps` set, an unparseable birth timestamp fails the
    /// record instead of being dropped.
    pub fn new(strict_timestamps: bool) -> Self {
        Self { strict_timestamps }
    }

    /// Transform one raw record into a canonical animal
    pub fn transform(&self, raw: &RawRecord) -> Result<Animal> {
        let id = parse_id(raw.get("id"))?;

        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| HomewardError::validation("name", Some(id), "missing or empty"))?
            .to_string();

        let friends = parse_friends(raw.get("friends"));

        let born_at = match parse_born_at(raw.get("born_at")) {
            Ok(value) => value,
            Err(reason) => {
                if self.strict_timestamps {
                    return Err(HomewardError::validation("born_at", Some(id), reason));
                }
                warn!(animal_id = id, reason = %reason, "Dropping unparseable born_at");
                None
            }
        };

        Ok(Animal {
            id,
            name,
            friends,
            born_at,
        })
    }
}

fn parse_id(value: Option<&Value>) -> Result<u64> {
    let missing = || HomewardError::validation("id", None, "missing or not a positive integer");

    match value {
        Some(Value::Number(n)) => n.as_u64().ok_or_else(missing),
        // Some sources quote identifiers; accept the numeric string form.
        Some(Value::String(s)) => s.trim().parse().map_err(|_| missing()),
        _ => Err(missing()),
    }
}

/// Split a friends value into an ordered list of non-empty names.
///
/// Absent or null means no friends. A delimited string is split on commas
/// and trimmed; an array is taken element-wise; any other scalar is kept as
/// a single name.
pub fn parse_friends(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => split_friends(s),
        Some(Value::Array(items)) => items
            .iter()
            .flat_map(|item| match item {
                Value::String(s) => split_friends(s),
                Value::Null => Vec::new(),
                other => vec![other.to_string()],
            })
            .collect(),
        Some(other) => vec![other.to_string()],
    }
}

fn split_friends(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|friend| !friend.is_empty())
        .map(String::from)
        .collect()
}

/// Normalize a `born_at` value to UTC.
///
/// Returns `Ok(None)` for absent/empty values and `Err(reason)` when a
/// present value cannot be interpreted; the caller decides whether that
/// fails the record.
pub fn parse_born_at(value: Option<&Value>) -> std::result::Result<Option<DateTime<Utc>>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            parse_datetime_str(s)
                .map(Some)
                .ok_or_else(|| format!("unrecognized datetime '{s}'"))
        }
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                epoch_to_datetime(i).map(Some).ok_or_else(|| {
                    format!("epoch timestamp {i} out of range")
                })
            } else if let Some(f) = n.as_f64() {
                DateTime::from_timestamp_millis((f * 1000.0) as i64)
                    .map(Some)
                    .ok_or_else(|| format!("epoch timestamp {f} out of range"))
            } else {
                Err(format!("unsupported numeric timestamp {n}"))
            }
        }
        Some(other) => Err(format!("unsupported born_at type: {other}")),
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Offset-free layouts are taken as UTC.
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// Interpret an integer epoch as milliseconds when it is too large to be a
/// plausible seconds value.
fn epoch_to_datetime(value: i64) -> Option<DateTime<Utc>> {
    const MILLIS_THRESHOLD: i64 = 100_000_000_000;

    if value.abs() >= MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_transforms_complete_record() {
        let record = raw(json!({
            "id": 12,
            "name": "Biscuit",
            "friends": "Rex, Luna ,Mochi",
            "born_at": "2020-06-01T12:00:00+02:00"
        }));

        let animal = Transformer::new(false).transform(&record).unwrap();
        assert_eq!(animal.id, 12);
        assert_eq!(animal.name, "Biscuit");
        assert_eq!(animal.friends, vec!["Rex", "Luna", "Mochi"]);
        assert_eq!(
            animal.born_at,
            Some(Utc.with_ymd_and_hms(2020, 6, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_id_fails() {
        let record = raw(json!({"name": "Ghost"}));
        let err = Transformer::new(false).transform(&record).unwrap_err();
        assert!(matches!(
            err,
            HomewardError::Validation { field: "id", .. }
        ));
    }

    #[test]
    fn test_string_id_accepted() {
        let record = raw(json!({"id": "44", "name": "Pip"}));
        let animal = Transformer::new(false).transform(&record).unwrap();
        assert_eq!(animal.id, 44);
    }

    #[test]
    fn test_empty_name_fails() {
        let record = raw(json!({"id": 5, "name": "   "}));
        let err = Transformer::new(false).transform(&record).unwrap_err();
        assert!(matches!(
            err,
            HomewardError::Validation {
                field: "name",
                animal_id: Some(5),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_name_fails() {
        let record = raw(json!({"id": 5}));
        assert!(Transformer::new(false).transform(&record).is_err());
    }

    #[test]
    fn test_missing_friends_yields_empty_list() {
        let record = raw(json!({"id": 1, "name": "Solo"}));
        let animal = Transformer::new(false).transform(&record).unwrap();
        assert!(animal.friends.is_empty());
    }

    #[test]
    fn test_friends_array_accepted() {
        let record = raw(json!({"id": 1, "name": "Pack", "friends": ["Rex", " Luna "]}));
        let animal = Transformer::new(false).transform(&record).unwrap();
        assert_eq!(animal.friends, vec!["Rex", "Luna"]);
    }

    #[test]
    fn test_friends_empty_string_yields_empty_list() {
        assert!(parse_friends(Some(&json!(""))).is_empty());
        assert!(parse_friends(Some(&json!(" , ,"))).is_empty());
    }

    #[test]
    fn test_unparseable_born_at_dropped_with_warning() {
        let record = raw(json!({
            "id": 2,
            "name": "Nori",
            "born_at": "last tuesday"
        }));

        let animal = Transformer::new(false).transform(&record).unwrap();
        assert_eq!(animal.born_at, None);
    }

    #[test]
    fn test_unparseable_born_at_fails_in_strict_mode() {
        let record = raw(json!({
            "id": 2,
            "name": "Nori",
            "born_at": "last tuesday"
        }));

        let err = Transformer::new(true).transform(&record).unwrap_err();
        assert!(matches!(
            err,
            HomewardError::Validation {
                field: "born_at",
                ..
            }
        ));
    }

    #[test]
    fn test_born_at_epoch_seconds() {
        let parsed = parse_born_at(Some(&json!(1_600_000_000))).unwrap();
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2020, 9, 13, 12, 26, 40).unwrap())
        );
    }

    #[test]
    fn test_born_at_epoch_millis() {
        let parsed = parse_born_at(Some(&json!(1_600_000_000_000i64))).unwrap();
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2020, 9, 13, 12, 26, 40).unwrap())
        );
    }

    #[test]
    fn test_born_at_date_only() {
        let parsed = parse_born_at(Some(&json!("2018-02-14"))).unwrap();
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2018, 2, 14, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_born_at_naive_datetime_taken_as_utc() {
        let parsed = parse_born_at(Some(&json!("2021-03-04 05:06:07"))).unwrap();
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
        );
    }

    #[test]
    fn test_born_at_absent_or_empty_is_none() {
        assert_eq!(parse_born_at(None).unwrap(), None);
        assert_eq!(parse_born_at(Some(&Value::Null)).unwrap(), None);
        assert_eq!(parse_born_at(Some(&json!("  "))).unwrap(), None);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let record = raw(json!({
            "id": 8,
            "name": "Clover",
            "species": "rabbit",
            "shelter": {"city": "Minneapolis"}
        }));

        let animal = Transformer::new(false).transform(&record).unwrap();
        assert_eq!(animal.id, 8);
        assert_eq!(animal.name, "Clover");
    }
}
