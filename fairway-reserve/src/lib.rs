pub mod hold;
pub mod manager;
pub mod slots;

pub use hold::{HoldPolicy, TimerStatus, DEFAULT_HOLD_SECONDS};
pub use manager::{HoldGrant, ReservationError, ReservationManager};
pub use slots::{classify_time_slot, determine_booking_type};
