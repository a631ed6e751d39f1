//! Tracker settings: persisted per account+character scope, mergeable.
//!
//! Out-of-range values are clamped to safe bounds, never rejected; a
//! missing or unreadable settings file yields the defaults.

use serde::{Deserialize, Serialize};

use crate::combat::CorrelatorOptions;

const APP_NAME: &str = "quarry";

/// Hard ceiling on parse workers regardless of configuration.
pub const MAX_WORKERS: usize = 8;
const MIN_BUFFER_LINES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub enabled: bool,
    pub track_damage: bool,
    pub track_wounds: bool,
    pub track_statuses: bool,
    pub track_ucs: bool,
    pub max_threads: usize,
    pub debug: bool,
    /// Upper bound on buffered lines between update boundaries.
    pub buffer_size: usize,
    /// Health denominator for creatures whose maximum is unknown.
    pub fallback_max_hp: i32,
    /// Registry cleanup cadence, counted in dispatched chunks.
    pub cleanup_interval: u32,
    /// Creatures idle longer than this are culled, in seconds.
    pub cleanup_max_age: i64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            track_damage: true,
            track_wounds: true,
            track_statuses: true,
            track_ucs: true,
            max_threads: 2,
            debug: false,
            buffer_size: 500,
            fallback_max_hp: 400,
            cleanup_interval: 20,
            cleanup_max_age: 300,
        }
    }
}

impl TrackerSettings {
    /// Load persisted settings for a scope, merged over defaults.
    pub fn load(scope: &str) -> Self {
        let mut settings: Self = confy::load(APP_NAME, scope).unwrap_or_default();
        settings.clamp();
        settings
    }

    pub fn save(&self, scope: &str) {
        if let Err(err) = confy::store(APP_NAME, scope, self) {
            tracing::warn!(%err, scope, "failed to persist tracker settings");
        }
    }

    /// Pull out-of-range values back into safe bounds.
    pub fn clamp(&mut self) {
        self.max_threads = self.max_threads.clamp(1, MAX_WORKERS);
        self.buffer_size = self.buffer_size.max(MIN_BUFFER_LINES);
        self.cleanup_interval = self.cleanup_interval.max(1);
        self.cleanup_max_age = self.cleanup_max_age.max(0);
        self.fallback_max_hp = self.fallback_max_hp.max(1);
    }

    /// Merge a partial update, then re-clamp.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.track_damage {
            self.track_damage = v;
        }
        if let Some(v) = patch.track_wounds {
            self.track_wounds = v;
        }
        if let Some(v) = patch.track_statuses {
            self.track_statuses = v;
        }
        if let Some(v) = patch.track_ucs {
            self.track_ucs = v;
        }
        if let Some(v) = patch.max_threads {
            self.max_threads = v;
        }
        if let Some(v) = patch.debug {
            self.debug = v;
        }
        if let Some(v) = patch.buffer_size {
            self.buffer_size = v;
        }
        if let Some(v) = patch.fallback_max_hp {
            self.fallback_max_hp = v;
        }
        if let Some(v) = patch.cleanup_interval {
            self.cleanup_interval = v;
        }
        if let Some(v) = patch.cleanup_max_age {
            self.cleanup_max_age = v;
        }
        self.clamp();
    }

    pub fn correlator_options(&self) -> CorrelatorOptions {
        CorrelatorOptions {
            track_damage: self.track_damage,
            track_wounds: self.track_wounds,
            track_statuses: self.track_statuses,
            track_ucs: self.track_ucs,
        }
    }
}

/// Partial settings for merge-style configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub enabled: Option<bool>,
    pub track_damage: Option<bool>,
    pub track_wounds: Option<bool>,
    pub track_statuses: Option<bool>,
    pub track_ucs: Option<bool>,
    pub max_threads: Option<usize>,
    pub debug: Option<bool>,
    pub buffer_size: Option<usize>,
    pub fallback_max_hp: Option<i32>,
    pub cleanup_interval: Option<u32>,
    pub cleanup_max_age: Option<i64>,
}
