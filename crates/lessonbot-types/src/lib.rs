use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ──────────────────── Subject Types ────────────────────

/// Announcement payload for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectEntry {
    /// Path to the image posted with the announcement.
    pub image_path: String,
    /// Reference links appended to the caption, in order. May be empty.
    #[serde(default)]
    pub links: Vec<String>,
}

/// Case-insensitive mapping from lesson name to its announcement payload.
///
/// Names are folded to lowercase on insert and on lookup, so `find("Math")`
/// and `find("MATH")` resolve to the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectCatalog {
    entries: HashMap<String, SubjectEntry>,
}

impl SubjectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under the case-folded name, replacing any previous one.
    pub fn insert(&mut self, name: &str, entry: SubjectEntry) {
        self.entries.insert(name.to_lowercase(), entry);
    }

    /// Look up a subject by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&SubjectEntry> {
        self.entries.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ──────────────────── Schedule Types ────────────────────

/// Wall-clock boundaries of one lesson slot, reused every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTimes {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SlotTimes {
    /// Stamp the clock times onto a concrete date.
    pub fn on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (date.and_time(self.start), date.and_time(self.end))
    }
}

// ──────────────────── Delivery Types ────────────────────

/// Identifier of a posted announcement awaiting retraction.
///
/// Exists only between the publish and retract steps of one loop iteration;
/// nothing is persisted across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryId(pub i64);

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What the scheduling loop does when a send or delete fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryErrorPolicy {
    /// Stop the run on the first failure.
    #[default]
    Abort,
    /// Log the failure and move on to the next slot.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_case_folded_lookup() {
        let mut catalog = SubjectCatalog::new();
        catalog.insert(
            "Math",
            SubjectEntry {
                image_path: "math.png".into(),
                links: vec!["https://example.com/algebra".into()],
            },
        );

        assert!(catalog.find("math").is_some());
        assert!(catalog.find("MATH").is_some());
        assert!(catalog.find("MaTh").is_some());
        assert!(catalog.find("physics").is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_insert_replaces() {
        let mut catalog = SubjectCatalog::new();
        catalog.insert(
            "Art",
            SubjectEntry {
                image_path: "old.png".into(),
                links: vec![],
            },
        );
        catalog.insert(
            "ART",
            SubjectEntry {
                image_path: "new.png".into(),
                links: vec![],
            },
        );

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("art").unwrap().image_path, "new.png");
    }

    #[test]
    fn test_slot_times_on_date() {
        let slot = SlotTimes {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 45, 0).unwrap(),
        };
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let (start, end) = slot.on(date);
        assert_eq!(start.to_string(), "2024-09-02 09:00:00");
        assert_eq!(end.to_string(), "2024-09-02 09:45:00");
    }

    #[test]
    fn test_subject_entry_links_default() {
        // An entry without a "links" field deserializes to an empty list.
        let json = r#"{"image_path":"m.png"}"#;
        let entry: SubjectEntry = serde_json::from_str(json).unwrap();
        assert!(entry.links.is_empty());
    }

    #[test]
    fn test_delivery_policy_serde() {
        let policy: DeliveryErrorPolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(policy, DeliveryErrorPolicy::Skip);
        assert_eq!(DeliveryErrorPolicy::default(), DeliveryErrorPolicy::Abort);
    }
}
