use std::sync::Arc;

use chrono::{DateTime, Utc};
use fairway_core::repository::RepoError;
use fairway_core::{
    Clock, CompleteOutcome, Performance, Principal, Role, TeeTime, TeeTimeRepository,
    TeeTimeStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::hold::{HoldPolicy, TimerStatus};

/// A freshly granted hold: the updated record plus its deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldGrant {
    pub tee_time: TeeTime,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("tee time not found: {0}")]
    NotFound(Uuid),

    #[error("tee time is {actual}, expected {expected}")]
    Conflict {
        expected: TeeTimeStatus,
        actual: TeeTimeStatus,
    },

    #[error("performance already recorded for tee time {0}")]
    AlreadyRecorded(Uuid),

    #[error("hold expired for tee time {0}")]
    Expired(Uuid),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Store(String),
}

impl ReservationError {
    fn store(err: RepoError) -> Self {
        ReservationError::Store(err.to_string())
    }
}

/// Owns the tee-time status lifecycle: hold granting, hold expiry, and
/// every transition's authorization rule.
///
/// All writes go through the repository's conditional updates, so a
/// transition that loses a race surfaces as a Conflict instead of
/// clobbering the winner. Expiry is enforced lazily: an overdue hold is
/// reverted when confirm or the timer read touches it, never by this
/// struct on its own. `sweep_expired` exists for callers that want to
/// shorten that staleness window.
pub struct ReservationManager {
    repo: Arc<dyn TeeTimeRepository>,
    clock: Arc<dyn Clock>,
    policy: HoldPolicy,
}

impl ReservationManager {
    pub fn new(repo: Arc<dyn TeeTimeRepository>, clock: Arc<dyn Clock>, policy: HoldPolicy) -> Self {
        Self { repo, clock, policy }
    }

    pub fn policy(&self) -> &HoldPolicy {
        &self.policy
    }

    /// AVAILABLE → RESERVED with a timed hold for the acting manager.
    pub async fn reserve(
        &self,
        id: Uuid,
        principal: &Principal,
    ) -> Result<HoldGrant, ReservationError> {
        if !principal.role.is_manager() {
            return Err(ReservationError::Forbidden(format!(
                "role {} cannot reserve tee times",
                principal.role
            )));
        }

        let current = self.find_required(id).await?;
        if current.status != TeeTimeStatus::Available {
            return Err(ReservationError::Conflict {
                expected: TeeTimeStatus::Available,
                actual: current.status,
            });
        }

        let now = self.clock.now();
        match self
            .repo
            .reserve(id, principal.id, principal.team_id, now)
            .await
            .map_err(ReservationError::store)?
        {
            Some(updated) => {
                info!(tee_time = %id, holder = %principal.id, "tee time reserved");
                Ok(HoldGrant {
                    expires_at: self.policy.expires_at(now),
                    tee_time: updated,
                })
            }
            // Another caller won between our read and the conditional
            // write. A legitimate outcome, surfaced as-is.
            None => Err(self.lost_race(id, TeeTimeStatus::Available).await),
        }
    }

    /// RESERVED → CONFIRMED. An overdue hold is reverted and reported
    /// as Expired instead of being confirmable.
    pub async fn confirm(
        &self,
        id: Uuid,
        principal: &Principal,
    ) -> Result<TeeTime, ReservationError> {
        let current = self.find_required(id).await?;
        if current.status != TeeTimeStatus::Reserved {
            return Err(ReservationError::Conflict {
                expected: TeeTimeStatus::Reserved,
                actual: current.status,
            });
        }

        let reserved_at = current.reserved_at.ok_or_else(|| {
            ReservationError::Store(format!("tee time {id} is RESERVED without a hold start"))
        })?;

        let now = self.clock.now();
        if self.policy.is_expired(reserved_at, now) {
            self.revert_expired(id, now).await?;
            return Err(ReservationError::Expired(id));
        }

        self.authorize_confirm(&current, principal)?;

        match self
            .repo
            .confirm(id, principal.id, now)
            .await
            .map_err(ReservationError::store)?
        {
            Some(updated) => {
                info!(tee_time = %id, confirmed_by = %principal.id, "reservation confirmed");
                Ok(updated)
            }
            None => Err(self.lost_race(id, TeeTimeStatus::Reserved).await),
        }
    }

    /// RESERVED → AVAILABLE (or CANCELLED under the terminal-cancel
    /// rule). The reason is recorded in the log only.
    pub async fn cancel(
        &self,
        id: Uuid,
        principal: &Principal,
        reason: Option<&str>,
    ) -> Result<TeeTime, ReservationError> {
        let current = self.find_required(id).await?;
        if current.status != TeeTimeStatus::Reserved {
            return Err(ReservationError::Conflict {
                expected: TeeTimeStatus::Reserved,
                actual: current.status,
            });
        }

        let is_holder = current.holder_id == Some(principal.id);
        if !is_holder && !principal.role.at_least(Role::Admin) {
            return Err(ReservationError::Forbidden(format!(
                "{} is neither the holder nor an admin",
                principal.id
            )));
        }

        let to = if self.policy.terminal_cancel {
            TeeTimeStatus::Cancelled
        } else {
            TeeTimeStatus::Available
        };

        match self
            .repo
            .release(id, to, self.clock.now())
            .await
            .map_err(ReservationError::store)?
        {
            Some(updated) => {
                info!(
                    tee_time = %id,
                    by = %principal.id,
                    reason = reason.unwrap_or("none given"),
                    "reservation cancelled"
                );
                Ok(updated)
            }
            None => Err(self.lost_race(id, TeeTimeStatus::Reserved).await),
        }
    }

    /// Countdown view of the hold. Reading an overdue hold performs the
    /// revert before answering; expiry is applied on touch, not by a
    /// background job.
    pub async fn timer_status(&self, id: Uuid) -> Result<TimerStatus, ReservationError> {
        let current = self.find_required(id).await?;

        let reserved_at = match (current.status, current.reserved_at) {
            (TeeTimeStatus::Reserved, Some(at)) => at,
            _ => return Ok(TimerStatus::inactive(current.status)),
        };

        let now = self.clock.now();
        if self.policy.is_expired(reserved_at, now) {
            self.revert_expired(id, now).await?;
            return Ok(TimerStatus {
                status: TeeTimeStatus::Available,
                reserved_at: None,
                expires_at: None,
                remaining_seconds: 0,
                is_expired: true,
            });
        }

        Ok(TimerStatus {
            status: TeeTimeStatus::Reserved,
            reserved_at: Some(reserved_at),
            expires_at: Some(self.policy.expires_at(reserved_at)),
            remaining_seconds: self.policy.remaining_seconds(reserved_at, now),
            is_expired: false,
        })
    }

    /// CONFIRMED → COMPLETED, writing the performance record in the
    /// same transaction. At most one record per tee-time, ever.
    pub async fn complete_performance(
        &self,
        id: Uuid,
        principal: &Principal,
        player_count: i32,
        unit_fee: i64,
        notes: Option<String>,
    ) -> Result<Performance, ReservationError> {
        if player_count < 1 {
            return Err(ReservationError::Validation(
                "player count must be at least 1".to_string(),
            ));
        }
        if unit_fee < 0 {
            return Err(ReservationError::Validation(
                "fee cannot be negative".to_string(),
            ));
        }
        if !principal.role.is_manager() {
            return Err(ReservationError::Forbidden(format!(
                "role {} cannot register performances",
                principal.role
            )));
        }

        let current = self.find_required(id).await?;
        if current.status != TeeTimeStatus::Confirmed {
            return Err(ReservationError::Conflict {
                expected: TeeTimeStatus::Confirmed,
                actual: current.status,
            });
        }

        let now = self.clock.now();
        let performance = Performance::new(id, player_count, unit_fee, notes, principal.id, now);

        match self
            .repo
            .complete(id, &performance, now)
            .await
            .map_err(ReservationError::store)?
        {
            CompleteOutcome::Completed(_) => {
                info!(
                    tee_time = %id,
                    players = player_count,
                    revenue = performance.revenue,
                    "performance registered, tee time completed"
                );
                Ok(performance)
            }
            CompleteOutcome::StatusConflict => {
                Err(self.lost_race(id, TeeTimeStatus::Confirmed).await)
            }
            CompleteOutcome::AlreadyRecorded => Err(ReservationError::AlreadyRecorded(id)),
        }
    }

    /// Revert every overdue hold in one pass. Optional tightening of
    /// the lazy-expiry window; correctness never depends on it running.
    pub async fn sweep_expired(&self) -> Result<usize, ReservationError> {
        let now = self.clock.now();
        let cutoff = now - self.policy.hold;
        let ids = self
            .repo
            .expired_holds(cutoff)
            .await
            .map_err(ReservationError::store)?;

        let mut reverted = 0;
        for id in ids {
            if self
                .repo
                .release(id, TeeTimeStatus::Available, now)
                .await
                .map_err(ReservationError::store)?
                .is_some()
            {
                warn!(tee_time = %id, "expired hold swept back to AVAILABLE");
                reverted += 1;
            }
        }
        Ok(reverted)
    }

    /// Holder, team-leader-or-above, or a team leader from the holder's
    /// own team may confirm.
    fn authorize_confirm(
        &self,
        current: &TeeTime,
        principal: &Principal,
    ) -> Result<(), ReservationError> {
        let is_holder = current.holder_id == Some(principal.id);
        let leads_holder_team = principal.role == Role::TeamLeader
            && principal.team_id.is_some()
            && principal.team_id == current.holder_team_id;

        if is_holder || principal.role.at_least(Role::TeamLeader) || leads_holder_team {
            return Ok(());
        }

        Err(ReservationError::Forbidden(format!(
            "{} may not confirm this reservation",
            principal.id
        )))
    }

    async fn find_required(&self, id: Uuid) -> Result<TeeTime, ReservationError> {
        self.repo
            .find(id)
            .await
            .map_err(ReservationError::store)?
            .ok_or(ReservationError::NotFound(id))
    }

    /// Expired holds always revive the slot, regardless of the
    /// terminal-cancel rule. A CAS miss here means another touch
    /// already moved the record, which is fine.
    async fn revert_expired(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), ReservationError> {
        if self
            .repo
            .release(id, TeeTimeStatus::Available, now)
            .await
            .map_err(ReservationError::store)?
            .is_some()
        {
            warn!(tee_time = %id, "hold expired, slot reverted to AVAILABLE");
        }
        Ok(())
    }

    /// Re-read after a conditional write missed, to report what the
    /// record actually is now.
    async fn lost_race(&self, id: Uuid, expected: TeeTimeStatus) -> ReservationError {
        match self.repo.find(id).await {
            Ok(Some(current)) => ReservationError::Conflict {
                expected,
                actual: current.status,
            },
            Ok(None) => ReservationError::NotFound(id),
            Err(err) => ReservationError::store(err),
        }
    }
}
