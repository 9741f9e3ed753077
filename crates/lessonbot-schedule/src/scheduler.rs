//! The scheduling loop — publishes each lesson at its start, retracts it
//! at its end, and reloads the schedule once a day.

use std::path::PathBuf;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use lessonbot_types::DeliveryErrorPolicy;

use crate::period::compute_period;
use crate::publisher::Publisher;
use crate::store::{DataLoader, DataSources, TimetableStore};

/// Everything the loop needs to know, owned by value.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub number_of_periods: u32,
    pub period_duration: u32,
    pub start_of_first_period: NaiveDate,
    pub subjects_path: PathBuf,
    /// Period file path with a `$` placeholder for the rotation period.
    pub period_path_template: String,
    pub timetable_path: PathBuf,
    pub channel_id: String,
    pub reload_time: NaiveTime,
    pub on_delivery_error: DeliveryErrorPolicy,
}

impl SchedulerConfig {
    /// Resolve the data source paths for the given rotation period.
    pub fn sources(&self, period: u32) -> DataSources {
        DataSources {
            subjects_path: self.subjects_path.clone(),
            period_path: PathBuf::from(
                self.period_path_template.replace('$', &period.to_string()),
            ),
            timetable_path: self.timetable_path.clone(),
        }
    }
}

/// What happened to one selected slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotOutcome {
    /// Published at the start and retracted at the end.
    Delivered,
    /// Passed over: subject missing, or a delivery failure under the
    /// skip policy.
    Skipped,
    /// A suspension was interrupted by cancellation.
    Cancelled,
}

/// Drives the publish/retract cycle. Owns all mutable scheduling state,
/// so rebuilds never race with reads.
pub struct Scheduler {
    config: SchedulerConfig,
    loader: Box<dyn DataLoader>,
    publisher: Box<dyn Publisher>,
    store: TimetableStore,
    /// First slot index still eligible for selection today. Moves past
    /// every processed or skipped slot so a slot skipped exactly at its
    /// start instant cannot be selected twice.
    cursor: usize,
}

impl Scheduler {
    /// Build a scheduler and perform the initial load.
    ///
    /// A load failure here is fatal: the loop must not start without a
    /// valid schedule.
    pub fn new(
        config: SchedulerConfig,
        loader: Box<dyn DataLoader>,
        publisher: Box<dyn Publisher>,
    ) -> anyhow::Result<Self> {
        let today = Local::now().date_naive();
        let store = Self::load_for_date(&config, loader.as_ref(), today)?;
        Ok(Self {
            config,
            loader,
            publisher,
            store,
            cursor: 0,
        })
    }

    /// Compute the rotation period for `date` and rebuild the store for
    /// its weekday.
    pub fn load_for_date(
        config: &SchedulerConfig,
        loader: &dyn DataLoader,
        date: NaiveDate,
    ) -> anyhow::Result<TimetableStore> {
        let period = compute_period(
            config.number_of_periods,
            config.period_duration,
            config.start_of_first_period,
            date,
        )?;
        info!(period, weekday = %date.weekday(), "Rebuilding schedule");
        TimetableStore::rebuild(loader, &config.sources(period), date.weekday())
    }

    /// Run until cancelled or a fatal failure.
    pub async fn run(&mut self, cancel: CancellationToken) -> anyhow::Result<()> {
        info!(channel = %self.config.channel_id, "Scheduling loop started");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let now = Local::now().naive_local();
            match self.next_slot(now) {
                Some(index) => {
                    let (start, end) = self.store.slot_times(index).on(now.date());
                    match self.run_slot(index, start, end, &cancel).await? {
                        SlotOutcome::Cancelled => break,
                        SlotOutcome::Delivered | SlotOutcome::Skipped => {
                            self.cursor = index + 1;
                        }
                    }
                }
                None => {
                    let wake = self.reload_instant(now);
                    info!(until = %wake, "No lessons left today, idling until reload");
                    if !sleep_until_local(wake, &cancel).await {
                        break;
                    }
                    self.reload();
                }
            }
        }

        info!("Scheduling loop stopped");
        Ok(())
    }

    /// First slot at or past the cursor whose start is still ahead of
    /// `now` and whose name is non-empty. Pure in `(now, cursor)`.
    fn next_slot(&self, now: NaiveDateTime) -> Option<usize> {
        (self.cursor..self.store.slot_count()).find(|&i| {
            let (start, _) = self.store.slot_times(i).on(now.date());
            now <= start && !self.store.lesson(i).is_empty()
        })
    }

    /// The next daily reload instant: today's reload time if still ahead
    /// of `now`, otherwise tomorrow's.
    fn reload_instant(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today_reload = now.date().and_time(self.config.reload_time);
        if now < today_reload {
            today_reload
        } else {
            (now.date() + Duration::days(1)).and_time(self.config.reload_time)
        }
    }

    /// Drive one slot through publish and retract.
    async fn run_slot(
        &self,
        index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
        cancel: &CancellationToken,
    ) -> anyhow::Result<SlotOutcome> {
        let name = self.store.lesson(index).to_string();

        if !sleep_until_local(start, cancel).await {
            return Ok(SlotOutcome::Cancelled);
        }

        let Some(entry) = self.store.catalog().find(&name).cloned() else {
            warn!(slot = index, subject = %name, "Subject not in catalog, skipping slot");
            return Ok(SlotOutcome::Skipped);
        };

        let delivery = match self
            .publisher
            .send(&name, &entry, &self.config.channel_id)
            .await
        {
            Ok(id) => {
                info!(slot = index, subject = %name, delivery = %id, "Announcement published");
                id
            }
            Err(e) => return self.delivery_failed("publish", index, e),
        };

        if !sleep_until_local(end, cancel).await {
            return Ok(SlotOutcome::Cancelled);
        }

        match self.publisher.delete(delivery, &self.config.channel_id).await {
            Ok(()) => {
                info!(slot = index, delivery = %delivery, "Announcement retracted");
                Ok(SlotOutcome::Delivered)
            }
            Err(e) => self.delivery_failed("retract", index, e),
        }
    }

    /// Apply the configured delivery failure policy: abort the run or
    /// skip the slot. Either way the failure is logged exactly once.
    fn delivery_failed(
        &self,
        step: &str,
        index: usize,
        err: anyhow::Error,
    ) -> anyhow::Result<SlotOutcome> {
        match self.config.on_delivery_error {
            DeliveryErrorPolicy::Abort => {
                error!(slot = index, "Failed to {step}, stopping run: {err:#}");
                Err(err.context(format!("{step} failed for slot {index}")))
            }
            DeliveryErrorPolicy::Skip => {
                warn!(slot = index, "Failed to {step}, skipping slot: {err:#}");
                Ok(SlotOutcome::Skipped)
            }
        }
    }

    /// Recompute the period and rebuild the store for the new day.
    ///
    /// When a reload fails after a previous successful load, the prior
    /// data is kept untouched and the cursor stays where it was, so no
    /// stale lesson is re-announced; the reload is retried at the next
    /// daily boundary.
    fn reload(&mut self) {
        let today = Local::now().date_naive();
        match Self::load_for_date(&self.config, self.loader.as_ref(), today) {
            Ok(store) => {
                self.store = store;
                self.cursor = 0;
            }
            Err(e) => {
                error!("Schedule reload failed, keeping previous data: {e:#}");
            }
        }
    }
}

/// Suspend until `target` on the local wall clock.
///
/// A target already in the past proceeds immediately. Returns `false`
/// when interrupted by cancellation.
pub async fn sleep_until_local(target: NaiveDateTime, cancel: &CancellationToken) -> bool {
    let now = Local::now().naive_local();
    let Ok(wait) = (target - now).to_std() else {
        return true;
    };
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(wait) => true,
    }
}
