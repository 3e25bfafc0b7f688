pub mod entry;
pub mod league;
pub mod race_event;
pub mod scoring;
pub mod standings;
