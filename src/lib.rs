pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    candidate_service::CandidateService, catalog_service::CatalogService,
    notification_service::NotificationService, onboard_service::OnboardService,
    outcome_service::OutcomeService, schedule_service::ScheduleService,
    suggestion_service::{DayWindow, SuggestionService},
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub catalog_service: CatalogService,
    pub candidate_service: CandidateService,
    pub schedule_service: ScheduleService,
    pub outcome_service: OutcomeService,
    pub suggestion_service: SuggestionService,
    pub onboard_service: OnboardService,
}

impl AppState {
    pub fn new(pool: SqlitePool, day_window: DayWindow, notify_webhook_url: Option<String>) -> Self {
        let notification_service = NotificationService::new(notify_webhook_url);

        let catalog_service = CatalogService::new(pool.clone());
        let candidate_service = CandidateService::new(pool.clone());
        let schedule_service = ScheduleService::new(pool.clone(), notification_service.clone());
        let outcome_service = OutcomeService::new(pool.clone());
        let suggestion_service = SuggestionService::new(pool.clone(), day_window);
        let onboard_service = OnboardService::new(pool.clone(), notification_service);

        Self {
            pool,
            catalog_service,
            candidate_service,
            schedule_service,
            outcome_service,
            suggestion_service,
            onboard_service,
        }
    }

    /// Wires the state from the process-wide config; `init_config` must
    /// have run.
    pub fn from_config(pool: SqlitePool) -> Self {
        let config = crate::config::get_config();
        Self::new(
            pool,
            DayWindow {
                start: config.work_day_start,
                end: config.work_day_end,
            },
            config.notify_webhook_url.clone(),
        )
    }
}
