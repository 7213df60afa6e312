use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use fairway_core::repository::RepoError;
use fairway_core::{
    CompleteOutcome, Performance, TeeTime, TeeTimeRepository, TeeTimeStatus,
};

/// In-memory repository with the same conditional-update semantics as
/// the Postgres one. Each method holds the mutex for its whole
/// read-check-write, so concurrent reserves still get exactly one
/// winner. Backs the test suites and local runs without a database.
#[derive(Default)]
pub struct MemoryTeeTimeRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    tee_times: HashMap<Uuid, TeeTime>,
    // keyed by tee_time_id, mirroring the unique column
    performances: HashMap<Uuid, Performance>,
}

impl MemoryTeeTimeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeeTimeRepository for MemoryTeeTimeRepository {
    async fn insert(&self, tee_time: &TeeTime) -> Result<(), RepoError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.tee_times.contains_key(&tee_time.id) {
            return Err(format!("duplicate tee time id: {}", tee_time.id).into());
        }
        inner.tee_times.insert(tee_time.id, tee_time.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<TeeTime>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.tee_times.get(&id).cloned())
    }

    async fn list(
        &self,
        course_id: Uuid,
        tee_date: NaiveDate,
    ) -> Result<Vec<TeeTime>, RepoError> {
        let inner = self.inner.lock().unwrap();
        let mut found: Vec<TeeTime> = inner
            .tee_times
            .values()
            .filter(|t| t.course_id == course_id && t.tee_date == tee_date)
            .cloned()
            .collect();
        found.sort_by_key(|t| t.tee_off);
        Ok(found)
    }

    async fn reserve(
        &self,
        id: Uuid,
        holder_id: Uuid,
        holder_team_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(tee_time) = inner.tee_times.get_mut(&id) else {
            return Ok(None);
        };
        if tee_time.status != TeeTimeStatus::Available {
            return Ok(None);
        }
        tee_time.status = TeeTimeStatus::Reserved;
        tee_time.holder_id = Some(holder_id);
        tee_time.holder_team_id = holder_team_id;
        tee_time.reserved_at = Some(at);
        tee_time.updated_at = at;
        Ok(Some(tee_time.clone()))
    }

    async fn confirm(
        &self,
        id: Uuid,
        confirmed_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(tee_time) = inner.tee_times.get_mut(&id) else {
            return Ok(None);
        };
        if tee_time.status != TeeTimeStatus::Reserved {
            return Ok(None);
        }
        tee_time.status = TeeTimeStatus::Confirmed;
        tee_time.confirmed_at = Some(at);
        tee_time.confirmed_by = Some(confirmed_by);
        tee_time.reserved_at = None;
        tee_time.updated_at = at;
        Ok(Some(tee_time.clone()))
    }

    async fn release(
        &self,
        id: Uuid,
        to: TeeTimeStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(tee_time) = inner.tee_times.get_mut(&id) else {
            return Ok(None);
        };
        if tee_time.status != TeeTimeStatus::Reserved {
            return Ok(None);
        }
        tee_time.status = to;
        tee_time.holder_id = None;
        tee_time.holder_team_id = None;
        tee_time.reserved_at = None;
        tee_time.updated_at = at;
        Ok(Some(tee_time.clone()))
    }

    async fn complete(
        &self,
        id: Uuid,
        performance: &Performance,
        at: DateTime<Utc>,
    ) -> Result<CompleteOutcome, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.performances.contains_key(&id) {
            return Ok(CompleteOutcome::AlreadyRecorded);
        }
        let Some(tee_time) = inner.tee_times.get_mut(&id) else {
            return Ok(CompleteOutcome::StatusConflict);
        };
        if tee_time.status != TeeTimeStatus::Confirmed {
            return Ok(CompleteOutcome::StatusConflict);
        }
        tee_time.status = TeeTimeStatus::Completed;
        tee_time.completed_at = Some(at);
        tee_time.updated_at = at;
        let completed = tee_time.clone();
        inner.performances.insert(id, performance.clone());
        Ok(CompleteOutcome::Completed(completed))
    }

    async fn find_performance(
        &self,
        tee_time_id: Uuid,
    ) -> Result<Option<Performance>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.performances.get(&tee_time_id).cloned())
    }

    async fn expired_holds(&self, cutoff: DateTime<Utc>) -> Result<Vec<Uuid>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tee_times
            .values()
            .filter(|t| {
                t.status == TeeTimeStatus::Reserved
                    && t.reserved_at.is_some_and(|at| at < cutoff)
            })
            .map(|t| t.id)
            .collect())
    }
}
