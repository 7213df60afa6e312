use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::tee_time::{Performance, TeeTime, TeeTimeStatus};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Result of the completion transaction.
#[derive(Debug)]
pub enum CompleteOutcome {
    /// Performance row written and the tee-time flipped to COMPLETED.
    Completed(TeeTime),
    /// Tee-time was not CONFIRMED at write time.
    StatusConflict,
    /// A performance row already exists for this tee-time.
    AlreadyRecorded,
}

/// Persistence seam for tee-time records.
///
/// Every mutating method is a conditional update keyed on the expected
/// current status and returns `Ok(None)` when the record was in another
/// state at write time. Callers never get a read-then-write window on
/// `status`, so two concurrent reserves can only produce one winner.
#[async_trait]
pub trait TeeTimeRepository: Send + Sync {
    async fn insert(&self, tee_time: &TeeTime) -> Result<(), RepoError>;

    async fn find(&self, id: Uuid) -> Result<Option<TeeTime>, RepoError>;

    async fn list(
        &self,
        course_id: Uuid,
        tee_date: NaiveDate,
    ) -> Result<Vec<TeeTime>, RepoError>;

    /// AVAILABLE → RESERVED, stamping the holder and the hold start.
    async fn reserve(
        &self,
        id: Uuid,
        holder_id: Uuid,
        holder_team_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError>;

    /// RESERVED → CONFIRMED, stamping the confirming principal.
    async fn confirm(
        &self,
        id: Uuid,
        confirmed_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError>;

    /// RESERVED → `to`, clearing the holder and hold start. `to` is
    /// AVAILABLE for the observed revert behavior, CANCELLED when the
    /// terminal-cancel rule is enabled.
    async fn release(
        &self,
        id: Uuid,
        to: TeeTimeStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError>;

    /// CONFIRMED → COMPLETED plus the performance insert, in one
    /// transaction. The unique key on `tee_time_id` decides
    /// `AlreadyRecorded`.
    async fn complete(
        &self,
        id: Uuid,
        performance: &Performance,
        at: DateTime<Utc>,
    ) -> Result<CompleteOutcome, RepoError>;

    async fn find_performance(
        &self,
        tee_time_id: Uuid,
    ) -> Result<Option<Performance>, RepoError>;

    /// Ids of RESERVED records whose hold started before `cutoff`.
    async fn expired_holds(&self, cutoff: DateTime<Utc>) -> Result<Vec<Uuid>, RepoError>;
}
