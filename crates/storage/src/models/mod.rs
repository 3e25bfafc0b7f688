mod category;
mod league;
mod prediction;
mod race_event;
mod race_result;
mod score;
mod scoring;
mod user;

pub use category::{OutcomeCategory, ScoreKey, UnknownCategory};
pub use league::{League, LeagueMember};
pub use prediction::{PredictionEntry, UserPrediction};
pub use race_event::{PREDICTION_LOCK_MINUTES, RaceEvent, predictions_open_from};
pub use race_result::ResultEntry;
pub use score::{ScoreBreakdown, ScoreRecord};
pub use scoring::{PointTable, ScoringRuleSet, resolve_rules};
pub use user::{ROLE_ADMIN, ROLE_USER, User};
