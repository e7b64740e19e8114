pub mod candidate_service;
pub mod catalog_service;
pub mod notification_service;
pub mod onboard_service;
pub mod outcome_service;
pub mod schedule_service;
pub mod suggestion_service;
