pub mod calendar;
pub mod error;
pub mod seeding;

pub use calendar::{CalendarFile, CalendarValidator};
pub use error::{Result, SeederError};
pub use seeding::{CalendarSeeder, ResetSummary, SeedSummary};
