pub mod booking;
pub mod service;
pub mod staff;
