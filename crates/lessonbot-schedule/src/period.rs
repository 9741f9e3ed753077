//! Rotation period calculator.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("anchor date {anchor} is after today ({today})")]
    AnchorInFuture { anchor: NaiveDate, today: NaiveDate },
}

/// Which of the repeating schedule variants is active on `today`.
///
/// Counts whole rotation cycles since `anchor` (`cycle_index` starts at 1
/// on the anchor date) and returns the largest `n` in
/// `[1, number_of_periods]` that evenly divides the cycle index. `n = 1`
/// always divides, so the scan always terminates with a valid period.
pub fn compute_period(
    number_of_periods: u32,
    period_duration: u32,
    anchor: NaiveDate,
    today: NaiveDate,
) -> Result<u32, PeriodError> {
    let elapsed_days = (today - anchor).num_days();
    if elapsed_days < 0 {
        return Err(PeriodError::AnchorInFuture { anchor, today });
    }

    let cycle_index = elapsed_days / i64::from(period_duration) + 1;

    let period = (1..=number_of_periods)
        .rev()
        .find(|&n| cycle_index % i64::from(n) == 0)
        .unwrap_or(1);

    Ok(period)
}
