//! Timetable store — today's slot boundaries, lesson names and subjects.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Weekday;
use tracing::info;

use lessonbot_types::{SlotTimes, SubjectCatalog};

/// Narrow read interface over the three schedule data sources.
///
/// Implementations own the file formats; the core only sees parsed values.
pub trait DataLoader: Send + Sync {
    /// Load the full subject catalog.
    fn load_subject_catalog(&self, path: &Path) -> anyhow::Result<SubjectCatalog>;

    /// Load the lesson-name row for the given weekday (Monday = 0).
    fn load_day_schedule(&self, path: &Path, weekday: usize) -> anyhow::Result<Vec<String>>;

    /// Load every slot's start/end clock times, in slot order.
    fn load_timetable(&self, path: &Path) -> anyhow::Result<Vec<SlotTimes>>;
}

/// File locations consumed by one rebuild. The period path is already
/// resolved for the active rotation period.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub subjects_path: PathBuf,
    pub period_path: PathBuf,
    pub timetable_path: PathBuf,
}

/// Parsed schedule data for one day, rebuilt wholesale on every reload.
///
/// Slot `i` of the timetable and slot `i` of the day schedule describe the
/// same lesson; the lengths are checked at rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableStore {
    catalog: SubjectCatalog,
    slot_times: Vec<SlotTimes>,
    lessons: Vec<String>,
}

impl TimetableStore {
    /// Load a fresh store for the given weekday.
    ///
    /// Constructs a new value without touching any previous store, so the
    /// caller decides whether stale data stays in service after a failure.
    pub fn rebuild(
        loader: &dyn DataLoader,
        sources: &DataSources,
        weekday: Weekday,
    ) -> anyhow::Result<Self> {
        let weekday_index = weekday.num_days_from_monday() as usize;

        let catalog = loader
            .load_subject_catalog(&sources.subjects_path)
            .context("subject catalog load failed")?;
        let lessons = loader
            .load_day_schedule(&sources.period_path, weekday_index)
            .context("day schedule load failed")?;
        let slot_times = loader
            .load_timetable(&sources.timetable_path)
            .context("timetable load failed")?;

        if lessons.len() != slot_times.len() {
            anyhow::bail!(
                "day schedule has {} slots but the timetable has {}",
                lessons.len(),
                slot_times.len()
            );
        }

        info!(
            slots = slot_times.len(),
            subjects = catalog.len(),
            weekday = %weekday,
            "Schedule data loaded"
        );

        Ok(Self {
            catalog,
            slot_times,
            lessons,
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slot_times.len()
    }

    /// Clock boundaries of slot `i`.
    pub fn slot_times(&self, i: usize) -> SlotTimes {
        self.slot_times[i]
    }

    /// Lesson name of slot `i`; empty means no class in that slot today.
    pub fn lesson(&self, i: usize) -> &str {
        &self.lessons[i]
    }

    pub fn catalog(&self) -> &SubjectCatalog {
        &self.catalog
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveTime;
    use lessonbot_types::SubjectEntry;

    /// In-memory loader with fixed data, ignoring the paths it is given.
    pub(crate) struct FixedLoader {
        pub subjects: Vec<(String, SubjectEntry)>,
        pub rows: Vec<Vec<String>>,
        pub times: Vec<SlotTimes>,
    }

    impl DataLoader for FixedLoader {
        fn load_subject_catalog(&self, _path: &Path) -> anyhow::Result<SubjectCatalog> {
            let mut catalog = SubjectCatalog::new();
            for (name, entry) in &self.subjects {
                catalog.insert(name, entry.clone());
            }
            Ok(catalog)
        }

        fn load_day_schedule(&self, _path: &Path, weekday: usize) -> anyhow::Result<Vec<String>> {
            self.rows
                .get(weekday)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no row for weekday {weekday}"))
        }

        fn load_timetable(&self, _path: &Path) -> anyhow::Result<Vec<SlotTimes>> {
            Ok(self.times.clone())
        }
    }

    pub(crate) fn slot(start: (u32, u32), end: (u32, u32)) -> SlotTimes {
        SlotTimes {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    pub(crate) fn sources() -> DataSources {
        DataSources {
            subjects_path: "subjects.csv".into(),
            period_path: "period_1.csv".into(),
            timetable_path: "time_table.csv".into(),
        }
    }

    fn math_entry() -> SubjectEntry {
        SubjectEntry {
            image_path: "m.png".into(),
            links: vec!["L1".into()],
        }
    }

    fn week_rows() -> Vec<Vec<String>> {
        // Monday and Tuesday rows; Monday has a free second slot.
        vec![
            vec!["Math".into(), "".into()],
            vec!["Art".into(), "Math".into()],
        ]
    }

    #[test]
    fn test_rebuild_selects_weekday_row() {
        let loader = FixedLoader {
            subjects: vec![("Math".into(), math_entry())],
            rows: week_rows(),
            times: vec![slot((9, 0), (9, 45)), slot((10, 0), (10, 45))],
        };

        let monday = TimetableStore::rebuild(&loader, &sources(), Weekday::Mon).unwrap();
        assert_eq!(monday.lesson(0), "Math");
        assert_eq!(monday.lesson(1), "");

        let tuesday = TimetableStore::rebuild(&loader, &sources(), Weekday::Tue).unwrap();
        assert_eq!(tuesday.lesson(0), "Art");
        assert_eq!(tuesday.lesson(1), "Math");
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let loader = FixedLoader {
            subjects: vec![("Math".into(), math_entry())],
            rows: week_rows(),
            times: vec![slot((9, 0), (9, 45)), slot((10, 0), (10, 45))],
        };

        let first = TimetableStore::rebuild(&loader, &sources(), Weekday::Mon).unwrap();
        let second = TimetableStore::rebuild(&loader, &sources(), Weekday::Mon).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rebuild_rejects_length_mismatch() {
        let loader = FixedLoader {
            subjects: vec![("Math".into(), math_entry())],
            rows: week_rows(),
            times: vec![slot((9, 0), (9, 45))],
        };

        let err = TimetableStore::rebuild(&loader, &sources(), Weekday::Mon).unwrap_err();
        assert!(err.to_string().contains("2 slots but the timetable has 1"));
    }

    #[test]
    fn test_rebuild_propagates_missing_weekday() {
        let loader = FixedLoader {
            subjects: vec![],
            rows: vec![],
            times: vec![],
        };

        let err = TimetableStore::rebuild(&loader, &sources(), Weekday::Wed).unwrap_err();
        assert!(format!("{err:#}").contains("day schedule load failed"));
    }
}
