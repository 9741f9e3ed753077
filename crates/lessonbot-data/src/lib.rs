//! CSV data loading for the schedule sources.
//!
//! Three header-less files feed a rebuild:
//!
//! - subjects: `name,image_path,link1,link2,...` (ragged tails allowed);
//! - period file: one row of lesson names per weekday (Monday first);
//! - timetable: one row per slot with `HH:MM:SS` start/end columns.

mod loader;

pub use loader::CsvDataLoader;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("row {row} in {path} has {got} columns, expected at least {want}")]
    ShortRow {
        path: PathBuf,
        row: usize,
        got: usize,
        want: usize,
    },
    #[error("bad clock time {value:?} at row {row} in {path}: {source}")]
    BadTime {
        path: PathBuf,
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("no row for weekday {weekday} in {path}")]
    MissingWeekday { path: PathBuf, weekday: usize },
}
