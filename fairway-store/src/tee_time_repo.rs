use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fairway_core::repository::RepoError;
use fairway_core::{
    BookingType, CompleteOutcome, Performance, TeeTime, TeeTimeRepository, TeeTimeStatus,
    TimeSlot,
};

const TEE_TIME_COLUMNS: &str = "id, course_id, tee_date, tee_off, green_fee, party_size, \
     time_slot, booking_type, status, holder_id, holder_team_id, reserved_at, \
     confirmed_at, confirmed_by, completed_at, created_at, updated_at";

pub struct PgTeeTimeRepository {
    pool: PgPool,
}

impl PgTeeTimeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct TeeTimeRow {
    id: Uuid,
    course_id: Uuid,
    tee_date: NaiveDate,
    tee_off: NaiveTime,
    green_fee: i64,
    party_size: i32,
    time_slot: String,
    booking_type: String,
    status: String,
    holder_id: Option<Uuid>,
    holder_team_id: Option<Uuid>,
    reserved_at: Option<DateTime<Utc>>,
    confirmed_at: Option<DateTime<Utc>>,
    confirmed_by: Option<Uuid>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TeeTimeRow> for TeeTime {
    type Error = RepoError;

    fn try_from(row: TeeTimeRow) -> Result<Self, Self::Error> {
        let status = TeeTimeStatus::parse(&row.status)
            .ok_or_else(|| format!("unknown tee time status: {}", row.status))?;
        let time_slot = TimeSlot::parse(&row.time_slot)
            .ok_or_else(|| format!("unknown time slot: {}", row.time_slot))?;
        let booking_type = BookingType::parse(&row.booking_type)
            .ok_or_else(|| format!("unknown booking type: {}", row.booking_type))?;

        Ok(TeeTime {
            id: row.id,
            course_id: row.course_id,
            tee_date: row.tee_date,
            tee_off: row.tee_off,
            green_fee: row.green_fee,
            party_size: row.party_size,
            time_slot,
            booking_type,
            status,
            holder_id: row.holder_id,
            holder_team_id: row.holder_team_id,
            reserved_at: row.reserved_at,
            confirmed_at: row.confirmed_at,
            confirmed_by: row.confirmed_by,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PerformanceRow {
    id: Uuid,
    tee_time_id: Uuid,
    player_count: i32,
    unit_fee: i64,
    revenue: i64,
    notes: Option<String>,
    recorded_by: Uuid,
    created_at: DateTime<Utc>,
}

impl From<PerformanceRow> for Performance {
    fn from(row: PerformanceRow) -> Self {
        Performance {
            id: row.id,
            tee_time_id: row.tee_time_id,
            player_count: row.player_count,
            unit_fee: row.unit_fee,
            revenue: row.revenue,
            notes: row.notes,
            recorded_by: row.recorded_by,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl TeeTimeRepository for PgTeeTimeRepository {
    async fn insert(&self, tee_time: &TeeTime) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO tee_times
                (id, course_id, tee_date, tee_off, green_fee, party_size,
                 time_slot, booking_type, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(tee_time.id)
        .bind(tee_time.course_id)
        .bind(tee_time.tee_date)
        .bind(tee_time.tee_off)
        .bind(tee_time.green_fee)
        .bind(tee_time.party_size)
        .bind(tee_time.time_slot.as_str())
        .bind(tee_time.booking_type.as_str())
        .bind(tee_time.status.as_str())
        .bind(tee_time.created_at)
        .bind(tee_time.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<TeeTime>, RepoError> {
        let row = sqlx::query_as::<_, TeeTimeRow>(&format!(
            "SELECT {TEE_TIME_COLUMNS} FROM tee_times WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeeTime::try_from).transpose()
    }

    async fn list(
        &self,
        course_id: Uuid,
        tee_date: NaiveDate,
    ) -> Result<Vec<TeeTime>, RepoError> {
        let rows = sqlx::query_as::<_, TeeTimeRow>(&format!(
            "SELECT {TEE_TIME_COLUMNS} FROM tee_times \
             WHERE course_id = $1 AND tee_date = $2 ORDER BY tee_off"
        ))
        .bind(course_id)
        .bind(tee_date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TeeTime::try_from).collect()
    }

    async fn reserve(
        &self,
        id: Uuid,
        holder_id: Uuid,
        holder_team_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError> {
        // The status predicate makes this a compare-and-swap: under
        // concurrent reserves only one UPDATE matches a row.
        let row = sqlx::query_as::<_, TeeTimeRow>(&format!(
            "UPDATE tee_times \
             SET status = 'RESERVED', holder_id = $2, holder_team_id = $3, \
                 reserved_at = $4, updated_at = $4 \
             WHERE id = $1 AND status = 'AVAILABLE' \
             RETURNING {TEE_TIME_COLUMNS}"
        ))
        .bind(id)
        .bind(holder_id)
        .bind(holder_team_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeeTime::try_from).transpose()
    }

    async fn confirm(
        &self,
        id: Uuid,
        confirmed_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError> {
        let row = sqlx::query_as::<_, TeeTimeRow>(&format!(
            "UPDATE tee_times \
             SET status = 'CONFIRMED', confirmed_at = $3, confirmed_by = $2, \
                 reserved_at = NULL, updated_at = $3 \
             WHERE id = $1 AND status = 'RESERVED' \
             RETURNING {TEE_TIME_COLUMNS}"
        ))
        .bind(id)
        .bind(confirmed_by)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeeTime::try_from).transpose()
    }

    async fn release(
        &self,
        id: Uuid,
        to: TeeTimeStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<TeeTime>, RepoError> {
        let row = sqlx::query_as::<_, TeeTimeRow>(&format!(
            "UPDATE tee_times \
             SET status = $2, holder_id = NULL, holder_team_id = NULL, \
                 reserved_at = NULL, updated_at = $3 \
             WHERE id = $1 AND status = 'RESERVED' \
             RETURNING {TEE_TIME_COLUMNS}"
        ))
        .bind(id)
        .bind(to.as_str())
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeeTime::try_from).transpose()
    }

    async fn complete(
        &self,
        id: Uuid,
        performance: &Performance,
        at: DateTime<Utc>,
    ) -> Result<CompleteOutcome, RepoError> {
        let mut tx = self.pool.begin().await?;

        // The unique key on tee_time_id is the idempotency guard.
        let inserted = sqlx::query(
            r#"
            INSERT INTO performances
                (id, tee_time_id, player_count, unit_fee, revenue, notes,
                 recorded_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (tee_time_id) DO NOTHING
            "#,
        )
        .bind(performance.id)
        .bind(performance.tee_time_id)
        .bind(performance.player_count)
        .bind(performance.unit_fee)
        .bind(performance.revenue)
        .bind(performance.notes.as_deref())
        .bind(performance.recorded_by)
        .bind(performance.created_at)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(CompleteOutcome::AlreadyRecorded);
        }

        let row = sqlx::query_as::<_, TeeTimeRow>(&format!(
            "UPDATE tee_times \
             SET status = 'COMPLETED', completed_at = $2, updated_at = $2 \
             WHERE id = $1 AND status = 'CONFIRMED' \
             RETURNING {TEE_TIME_COLUMNS}"
        ))
        .bind(id)
        .bind(at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(CompleteOutcome::StatusConflict);
        };

        tx.commit().await?;
        Ok(CompleteOutcome::Completed(TeeTime::try_from(row)?))
    }

    async fn find_performance(
        &self,
        tee_time_id: Uuid,
    ) -> Result<Option<Performance>, RepoError> {
        let row = sqlx::query_as::<_, PerformanceRow>(
            "SELECT id, tee_time_id, player_count, unit_fee, revenue, notes, \
             recorded_by, created_at FROM performances WHERE tee_time_id = $1",
        )
        .bind(tee_time_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Performance::from))
    }

    async fn expired_holds(&self, cutoff: DateTime<Utc>) -> Result<Vec<Uuid>, RepoError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM tee_times WHERE status = 'RESERVED' AND reserved_at < $1",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
