pub mod combat;
pub mod context;
pub mod debug_log;
pub mod patterns;
pub mod registry;
pub mod serde_defaults;

// Re-exports for convenience
pub use combat::{
    AttackMatch, ChunkCorrelator, CombatEvent, CorrelatorOptions, CreatureRef, CritWound,
    LineParser, StatusAction, StatusChange, UcsSignal, persist_event, process_chunk,
};
pub use context::{ChunkScheduler, MAX_WORKERS, SettingsPatch, Tracker, TrackerSettings};
pub use patterns::{PatternConfig, PatternError, PatternSet};
pub use registry::{BodyPart, Creature, CreatureHandle, CreatureRegistry, normalize_location};
