//! Pattern table definitions loaded from TOML.
//!
//! Tables are versioned data. Adding attack, damage, crit or status types
//! is a table edit, never a pipeline change.

use serde::Deserialize;

use crate::serde_defaults::{default_rank, default_true, default_version};

/// Highest table format version this build understands.
pub const PATTERN_TABLE_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Ordered: first match wins.
    #[serde(default)]
    pub attack: Vec<AttackPatternDef>,
    /// Damage matchers; each must carry an `amount` capture.
    #[serde(default)]
    pub damage: Vec<String>,
    #[serde(default)]
    pub crit: Vec<CritPatternDef>,
    #[serde(default)]
    pub status: Vec<StatusPatternDef>,
    #[serde(default)]
    pub ucs: Vec<UcsPatternDef>,
}

/// One attack matcher. An optional `target` capture isolates the span
/// holding the struck creature's entity link.
#[derive(Debug, Clone, Deserialize)]
pub struct AttackPatternDef {
    pub pattern: String,
    /// Canonical attack name recorded on the event.
    pub name: String,
    #[serde(default = "default_true")]
    pub damaging: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CritPatternDef {
    /// Must carry a `location` capture.
    pub pattern: String,
    pub damage_type: String,
    #[serde(default = "default_rank")]
    pub rank: u8,
    #[serde(default = "default_rank")]
    pub wound_rank: u8,
    #[serde(default)]
    pub fatal: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusPatternDef {
    pub pattern: String,
    pub status: String,
    /// Matches announce the status ending rather than starting.
    #[serde(default)]
    pub remove: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UcsPatternKind {
    Position,
    Tierup,
    Smite,
    ClearSmite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UcsPatternDef {
    pub pattern: String,
    pub kind: UcsPatternKind,
}
