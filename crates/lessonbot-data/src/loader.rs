//! `DataLoader` implementation over header-less CSV files.

use std::fs::File;
use std::path::Path;

use chrono::NaiveTime;
use csv::StringRecord;

use lessonbot_schedule::DataLoader;
use lessonbot_types::{SlotTimes, SubjectCatalog, SubjectEntry};

use crate::LoadError;

const TIME_FORMAT: &str = "%H:%M:%S";

/// Loads the subject catalog, day schedule and timetable from CSV files.
pub struct CsvDataLoader;

impl DataLoader for CsvDataLoader {
    fn load_subject_catalog(&self, path: &Path) -> anyhow::Result<SubjectCatalog> {
        let mut catalog = SubjectCatalog::new();
        for (row, record) in records(path)?.into_iter().enumerate() {
            if record.len() < 2 {
                return Err(short_row(path, row, record.len(), 2).into());
            }
            let links = record.iter().skip(2).map(String::from).collect();
            catalog.insert(
                &record[0],
                SubjectEntry {
                    image_path: record[1].to_string(),
                    links,
                },
            );
        }
        Ok(catalog)
    }

    fn load_day_schedule(&self, path: &Path, weekday: usize) -> anyhow::Result<Vec<String>> {
        for (row, record) in records(path)?.into_iter().enumerate() {
            if row == weekday {
                return Ok(record.iter().map(String::from).collect());
            }
        }
        Err(LoadError::MissingWeekday {
            path: path.to_path_buf(),
            weekday,
        }
        .into())
    }

    fn load_timetable(&self, path: &Path) -> anyhow::Result<Vec<SlotTimes>> {
        let mut slots = Vec::new();
        for (row, record) in records(path)?.into_iter().enumerate() {
            if record.len() < 2 {
                return Err(short_row(path, row, record.len(), 2).into());
            }
            // Extra columns beyond start/end are ignored.
            slots.push(SlotTimes {
                start: parse_time(path, row, &record[0])?,
                end: parse_time(path, row, &record[1])?,
            });
        }
        Ok(slots)
    }
}

fn records(path: &Path) -> Result<Vec<StringRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file)
        .into_records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_time(path: &Path, row: usize, value: &str) -> Result<NaiveTime, LoadError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|source| LoadError::BadTime {
        path: path.to_path_buf(),
        row,
        value: value.to_string(),
        source,
    })
}

fn short_row(path: &Path, row: usize, got: usize, want: usize) -> LoadError {
    LoadError::ShortRow {
        path: path.to_path_buf(),
        row,
        got,
        want,
    }
}
