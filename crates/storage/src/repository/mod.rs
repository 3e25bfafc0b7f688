pub mod league;
pub mod prediction;
pub mod race_event;
pub mod race_result;
pub mod score;
pub mod scoring_rules;
pub mod standings;
pub mod user;
