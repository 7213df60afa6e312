use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tee-time status in the reservation lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeeTimeStatus {
    Available,
    Reserved,
    Confirmed,
    Completed,
    Cancelled,
}

impl TeeTimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeeTimeStatus::Available => "AVAILABLE",
            TeeTimeStatus::Reserved => "RESERVED",
            TeeTimeStatus::Confirmed => "CONFIRMED",
            TeeTimeStatus::Completed => "COMPLETED",
            TeeTimeStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<TeeTimeStatus> {
        match s {
            "AVAILABLE" => Some(TeeTimeStatus::Available),
            "RESERVED" => Some(TeeTimeStatus::Reserved),
            "CONFIRMED" => Some(TeeTimeStatus::Confirmed),
            "COMPLETED" => Some(TeeTimeStatus::Completed),
            "CANCELLED" => Some(TeeTimeStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for TeeTimeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tee-sheet part of the day. Hour 10 and 15 open their own part.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeSlot {
    First,
    Second,
    Third,
}

impl TimeSlot {
    /// Tee-sheet label as shown on the matrix grid ("1부" / "2부" / "3부")
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::First => "1부",
            TimeSlot::Second => "2부",
            TimeSlot::Third => "3부",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::First => "FIRST",
            TimeSlot::Second => "SECOND",
            TimeSlot::Third => "THIRD",
        }
    }

    pub fn parse(s: &str) -> Option<TimeSlot> {
        match s {
            "FIRST" => Some(TimeSlot::First),
            "SECOND" => Some(TimeSlot::Second),
            "THIRD" => Some(TimeSlot::Third),
            _ => None,
        }
    }
}

/// A full four-ball books the slot outright; smaller parties join one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    Booking,
    Join,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Booking => "BOOKING",
            BookingType::Join => "JOIN",
        }
    }

    pub fn parse(s: &str) -> Option<BookingType> {
        match s {
            "BOOKING" => Some(BookingType::Booking),
            "JOIN" => Some(BookingType::Join),
            _ => None,
        }
    }
}

/// A bookable golf-course slot, the single aggregate under the
/// reservation state machine's control.
///
/// Descriptive fields (course, date, fee, party size) are fixed at
/// registration; only the status block mutates, and only through the
/// state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeeTime {
    pub id: Uuid,
    pub course_id: Uuid,
    pub tee_date: NaiveDate,
    pub tee_off: NaiveTime,
    pub green_fee: i64,
    pub party_size: i32,
    pub time_slot: TimeSlot,
    pub booking_type: BookingType,
    pub status: TeeTimeStatus,
    pub holder_id: Option<Uuid>,
    /// Team of the holder at reserve time; lets the same-team
    /// team-leader rule run without a user lookup.
    pub holder_team_id: Option<Uuid>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeeTime {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        course_id: Uuid,
        tee_date: NaiveDate,
        tee_off: NaiveTime,
        green_fee: i64,
        party_size: i32,
        time_slot: TimeSlot,
        booking_type: BookingType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_id,
            tee_date,
            tee_off,
            green_fee,
            party_size,
            time_slot,
            booking_type,
            status: TeeTimeStatus::Available,
            holder_id: None,
            holder_team_id: None,
            reserved_at: None,
            confirmed_at: None,
            confirmed_by: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Settlement record written exactly once when a tee-time completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Performance {
    pub id: Uuid,
    pub tee_time_id: Uuid,
    pub player_count: i32,
    pub unit_fee: i64,
    pub revenue: i64,
    pub notes: Option<String>,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Performance {
    pub fn new(
        tee_time_id: Uuid,
        player_count: i32,
        unit_fee: i64,
        notes: Option<String>,
        recorded_by: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tee_time_id,
            player_count,
            unit_fee,
            revenue: i64::from(player_count) * unit_fee,
            notes,
            recorded_by,
            created_at: now,
        }
    }
}
