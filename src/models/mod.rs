pub mod candidate;
pub mod onboard;
pub mod outcome;
pub mod position;
pub mod schedule;
pub mod stage;
