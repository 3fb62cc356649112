pub mod records;

pub mod sqlite_golfer_repo;
pub mod sqlite_reservation_repo;
pub mod sqlite_season_repo;

pub mod postgres_golfer_repo;
pub mod postgres_reservation_repo;
pub mod postgres_season_repo;
