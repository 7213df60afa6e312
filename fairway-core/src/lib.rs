pub mod clock;
pub mod principal;
pub mod repository;
pub mod tee_time;

pub use clock::{Clock, ManualClock, SystemClock};
pub use principal::{Principal, Role};
pub use repository::{CompleteOutcome, TeeTimeRepository};
pub use tee_time::{BookingType, Performance, TeeTime, TeeTimeStatus, TimeSlot};
