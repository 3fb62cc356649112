use std::sync::Arc;
use chrono_tz::Tz;
use crate::config::Config;
use crate::domain::ports::{GolferRepository, ReservationRepository, SeasonRepository, SolarTimeService};
use crate::domain::services::booking_engine::BookingEngine;
use crate::domain::services::season_manager::SeasonManager;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub golfer_repo: Arc<dyn GolferRepository>,
    pub season_manager: Arc<SeasonManager>,
    pub engine: Arc<BookingEngine>,
}

impl AppState {
    pub fn new(
        config: Config,
        season_repo: Arc<dyn SeasonRepository>,
        reservation_repo: Arc<dyn ReservationRepository>,
        golfer_repo: Arc<dyn GolferRepository>,
        solar_service: Arc<dyn SolarTimeService>,
    ) -> Self {
        let season_manager = Arc::new(SeasonManager::new(season_repo, solar_service, config.course.clone()));
        let engine = Arc::new(BookingEngine::new(season_manager.clone(), reservation_repo));

        Self { config, golfer_repo, season_manager, engine }
    }

    pub fn course_tz(&self) -> Tz {
        self.config.course.timezone
    }
}
