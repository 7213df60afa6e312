use chrono::{NaiveTime, Timelike};
use fairway_core::{BookingType, TimeSlot};

/// Classify a tee-off time into its tee-sheet part.
///
/// Before 10:00 is part 1, 10:00 up to (not including) 15:00 is part 2,
/// 15:00 onward is part 3. The 10 o'clock and 15 o'clock hours open
/// their own part.
pub fn classify_time_slot(tee_off: NaiveTime) -> TimeSlot {
    match tee_off.hour() {
        0..=9 => TimeSlot::First,
        10..=14 => TimeSlot::Second,
        _ => TimeSlot::Third,
    }
}

/// A full four-ball takes the whole slot (BOOKING); anything smaller is
/// sold as a join-in (JOIN).
pub fn determine_booking_type(player_count: u32) -> BookingType {
    if player_count == 4 {
        BookingType::Booking
    } else {
        BookingType::Join
    }
}
