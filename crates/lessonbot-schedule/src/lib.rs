//! The lesson scheduling core.
//!
//! Drives a two-phase publish/retract cycle over the day's lesson slots:
//!
//! ```text
//! Period Calculator (rotation period from anchor date)
//!     ↓
//! TimetableStore::rebuild (via DataLoader)
//!     ↓
//! Scheduler loop: wait for slot start → Publisher::send
//!                 wait for slot end   → Publisher::delete
//!     ↓ (no slots left)
//! idle until the daily reload instant, then rebuild for the new day
//! ```
//!
//! File formats and the messaging transport live behind the [`DataLoader`]
//! and [`Publisher`] traits; the core only sees parsed values and opaque
//! delivery identifiers.

pub mod period;
pub mod publisher;
pub mod scheduler;
pub mod store;

pub use period::{PeriodError, compute_period};
pub use publisher::Publisher;
pub use scheduler::{Scheduler, SchedulerConfig, sleep_until_local};
pub use store::{DataLoader, DataSources, TimetableStore};
