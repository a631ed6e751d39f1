//! Compiled pattern tables.
//!
//! The raw tables arrive as TOML (`PatternConfig`); compilation turns them
//! into ordered regex matcher lists plus combined pre-filter sets used by
//! the tracker to cheaply reject irrelevant chunks.

mod config;
mod defaults;

pub use config::{
    AttackPatternDef, CritPatternDef, PATTERN_TABLE_VERSION, PatternConfig, StatusPatternDef,
    UcsPatternDef, UcsPatternKind,
};

use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::{Regex, RegexSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("failed to read pattern table {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern table {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported pattern table version {found} (this build understands {supported})")]
    Version { found: u32, supported: u32 },

    #[error("invalid pattern `{pattern}`")]
    Compile {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
pub struct AttackPattern {
    pub matcher: Regex,
    pub name: String,
    pub damaging: bool,
}

#[derive(Debug, Clone)]
pub struct CritPattern {
    pub matcher: Regex,
    pub damage_type: String,
    pub rank: u8,
    pub wound_rank: u8,
    pub fatal: bool,
}

#[derive(Debug, Clone)]
pub struct StatusPattern {
    pub matcher: Regex,
    pub status: String,
    pub remove: bool,
}

#[derive(Debug, Clone)]
pub struct UcsPattern {
    pub matcher: Regex,
    pub kind: UcsPatternKind,
}

/// One compiled pattern table.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub(crate) attacks: Vec<AttackPattern>,
    pub(crate) damage: Vec<Regex>,
    pub(crate) crits: Vec<CritPattern>,
    pub(crate) statuses: Vec<StatusPattern>,
    pub(crate) ucs: Vec<UcsPattern>,
    any_attack: RegexSet,
    any_damage: RegexSet,
}

fn compile(pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError::Compile {
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_set(patterns: impl IntoIterator<Item = impl AsRef<str>>) -> Result<RegexSet, PatternError> {
    RegexSet::new(patterns).map_err(|source| PatternError::Compile {
        pattern: "<combined pre-filter>".to_string(),
        source,
    })
}

impl PatternSet {
    pub fn compile(config: PatternConfig) -> Result<Self, PatternError> {
        if config.version > PATTERN_TABLE_VERSION {
            return Err(PatternError::Version {
                found: config.version,
                supported: PATTERN_TABLE_VERSION,
            });
        }

        let mut attacks = Vec::with_capacity(config.attack.len());
        for def in &config.attack {
            attacks.push(AttackPattern {
                matcher: compile(&def.pattern)?,
                name: def.name.clone(),
                damaging: def.damaging,
            });
        }

        let mut damage = Vec::with_capacity(config.damage.len());
        for pattern in &config.damage {
            damage.push(compile(pattern)?);
        }

        let mut crits = Vec::with_capacity(config.crit.len());
        for def in &config.crit {
            crits.push(CritPattern {
                matcher: compile(&def.pattern)?,
                damage_type: def.damage_type.clone(),
                rank: def.rank,
                wound_rank: def.wound_rank,
                fatal: def.fatal,
            });
        }

        let mut statuses = Vec::with_capacity(config.status.len());
        for def in &config.status {
            statuses.push(StatusPattern {
                matcher: compile(&def.pattern)?,
                status: def.status.clone(),
                remove: def.remove,
            });
        }

        let mut ucs = Vec::with_capacity(config.ucs.len());
        for def in &config.ucs {
            ucs.push(UcsPattern {
                matcher: compile(&def.pattern)?,
                kind: def.kind,
            });
        }

        let any_attack = compile_set(config.attack.iter().map(|d| d.pattern.as_str()))?;
        let any_damage = compile_set(config.damage.iter().map(String::as_str))?;

        Ok(Self {
            attacks,
            damage,
            crits,
            statuses,
            ucs,
            any_attack,
            any_damage,
        })
    }

    /// The bundled default table.
    pub fn builtin() -> Arc<PatternSet> {
        static BUILTIN: OnceLock<Arc<PatternSet>> = OnceLock::new();
        Arc::clone(BUILTIN.get_or_init(|| {
            let config =
                toml::from_str(defaults::BUILTIN_TABLE).expect("builtin pattern table is valid TOML");
            Arc::new(PatternSet::compile(config).expect("builtin pattern table compiles"))
        }))
    }

    /// Load an externally maintained table.
    pub fn from_toml_file(path: &Path) -> Result<Self, PatternError> {
        let content = std::fs::read_to_string(path).map_err(|source| PatternError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: PatternConfig =
            toml::from_str(&content).map_err(|source| PatternError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Self::compile(config)
    }

    /// Combined pre-filter: does this line look like any known attack?
    pub fn is_attack_line(&self, line: &str) -> bool {
        self.any_attack.is_match(line)
    }

    /// Combined pre-filter: does this line look like a damage report?
    pub fn is_damage_line(&self, line: &str) -> bool {
        self.any_damage.is_match(line)
    }
}
