pub mod golfer;
pub mod reservation;
pub mod reserved_day;
pub mod season;
