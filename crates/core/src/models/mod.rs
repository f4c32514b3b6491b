pub mod booking;
pub mod staff;
pub mod time_slot;
