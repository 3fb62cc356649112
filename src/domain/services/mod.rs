pub mod booking_engine;
pub mod calendar;
pub mod day_slots;
pub mod reservations;
pub mod season_manager;
