mod scheduler;
mod settings;
mod tracker;

#[cfg(test)]
mod scheduler_tests;

pub use scheduler::ChunkScheduler;
pub use settings::{MAX_WORKERS, SettingsPatch, TrackerSettings};
pub use tracker::Tracker;
