pub mod availability;
pub mod calendar;
pub mod slots;

pub use availability::{available_slots, day_window_utc, local_instant, slot_is_available};
pub use calendar::resolve_day;
pub use slots::generate_slots;
