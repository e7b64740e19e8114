pub mod candidate_dto;
pub mod catalog_dto;
pub mod onboard_dto;
pub mod outcome_dto;
pub mod schedule_dto;
pub mod suggestion_dto;
