//! Combat stream parsing.
//!
//! `markup` scans lines for entity links and boundaries, `parser` extracts
//! per-line matches from the pattern tables, and `correlator` reassembles
//! them into per-target combat events, one chunk at a time.

pub mod correlator;
pub mod event;
pub mod markup;
pub mod parser;

#[cfg(test)]
mod correlator_tests;

pub use correlator::{ChunkCorrelator, CorrelatorOptions, persist_event, process_chunk};
pub use event::{
    AttackMatch, CombatEvent, CreatureRef, CritWound, StatusAction, StatusChange, UcsSignal,
};
pub use parser::LineParser;
