pub mod golfers;
pub mod health;
pub mod reservations;
pub mod seasons;
pub mod tee_times;
