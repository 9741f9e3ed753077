//! Publisher seam — posting and retracting channel announcements.

use async_trait::async_trait;

use lessonbot_types::{DeliveryId, SubjectEntry};

/// Trait for the messaging backend behind the scheduling loop.
///
/// Use `&self` for both methods — implementations keep any mutable state
/// behind interior mutability. The loop keeps at most one delivery in
/// flight, so calls never overlap.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Post the announcement for `subject_name` to `channel_id`.
    ///
    /// Returns the identifier later passed to [`delete`](Publisher::delete).
    async fn send(
        &self,
        subject_name: &str,
        entry: &SubjectEntry,
        channel_id: &str,
    ) -> anyhow::Result<DeliveryId>;

    /// Remove a previously posted announcement.
    async fn delete(&self, delivery: DeliveryId, channel_id: &str) -> anyhow::Result<()>;
}
