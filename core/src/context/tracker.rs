//! Tracker lifecycle and chunk dispatch.
//!
//! One `Tracker` is constructed per process and owns the line buffer, the
//! settings, and the scheduler handle; the parse pipeline receives shared
//! handles rather than reading ambient state.

use std::sync::Arc;

use crate::combat::{self, markup};
use crate::debug_log;
use crate::patterns::PatternSet;
use crate::registry::CreatureRegistry;

use super::scheduler::ChunkScheduler;
use super::settings::{SettingsPatch, TrackerSettings};

pub struct Tracker {
    settings: TrackerSettings,
    scope: String,
    persist: bool,
    buffer: Vec<String>,
    chunks_dispatched: u64,
    scheduler: Option<ChunkScheduler>,
    patterns: Arc<PatternSet>,
    registry: Arc<CreatureRegistry>,
}

impl Tracker {
    /// Create a tracker bound to a persisted settings scope
    /// (account+character).
    pub fn new(
        scope: impl Into<String>,
        patterns: Arc<PatternSet>,
        registry: Arc<CreatureRegistry>,
    ) -> Self {
        let scope = scope.into();
        let settings = TrackerSettings::load(&scope);
        Self::build(scope, settings, true, patterns, registry)
    }

    /// Create a tracker that never touches persisted settings, for hosts
    /// that manage configuration themselves.
    pub fn ephemeral(
        mut settings: TrackerSettings,
        patterns: Arc<PatternSet>,
        registry: Arc<CreatureRegistry>,
    ) -> Self {
        settings.clamp();
        Self::build(String::new(), settings, false, patterns, registry)
    }

    fn build(
        scope: String,
        settings: TrackerSettings,
        persist: bool,
        patterns: Arc<PatternSet>,
        registry: Arc<CreatureRegistry>,
    ) -> Self {
        debug_log::set_enabled(settings.debug);
        let scheduler = (settings.enabled && settings.max_threads > 1)
            .then(|| ChunkScheduler::new(settings.max_threads));
        Self {
            settings,
            scope,
            persist,
            buffer: Vec::new(),
            chunks_dispatched: 0,
            scheduler,
            patterns,
            registry,
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<CreatureRegistry> {
        &self.registry
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn buffered_lines(&self) -> usize {
        self.buffer.len()
    }

    pub fn worker_capacity(&self) -> Option<usize> {
        self.scheduler.as_ref().map(ChunkScheduler::capacity)
    }

    pub fn active_workers(&self) -> usize {
        self.scheduler
            .as_ref()
            .map_or(0, ChunkScheduler::active_count)
    }

    /// Idempotent. Persists the flag and (re)arms the worker pool.
    pub async fn enable(&mut self) {
        if self.settings.enabled {
            return;
        }
        self.settings.enabled = true;
        self.persist_settings();
        self.rebuild_scheduler().await;
        self.buffer.clear();
        crate::debug_log!("tracker enabled");
    }

    /// Idempotent. Drains in-flight chunks before returning.
    pub async fn disable(&mut self) {
        if !self.settings.enabled {
            return;
        }
        self.settings.enabled = false;
        self.persist_settings();
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.shutdown().await;
        }
        self.buffer.clear();
        crate::debug_log!("tracker disabled");
    }

    /// Merge a partial settings update. Re-persists, and rebuilds the
    /// worker pool when the effective thread count changed.
    pub async fn configure(&mut self, patch: &SettingsPatch) {
        let before = (self.settings.enabled, self.settings.max_threads);
        self.settings.apply(patch);
        self.persist_settings();
        debug_log::set_enabled(self.settings.debug);
        if (self.settings.enabled, self.settings.max_threads) != before {
            self.rebuild_scheduler().await;
        }
    }

    /// Drain all in-flight work.
    pub async fn shutdown(&mut self) {
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.shutdown().await;
        }
    }

    async fn rebuild_scheduler(&mut self) {
        if let Some(mut old) = self.scheduler.take() {
            old.shutdown().await;
        }
        if self.settings.enabled && self.settings.max_threads > 1 {
            self.scheduler = Some(ChunkScheduler::new(self.settings.max_threads));
        }
    }

    fn persist_settings(&self) {
        if self.persist {
            self.settings.save(&self.scope);
        }
    }

    /// Ingest one transcript line. Buffers until the update boundary, then
    /// segments and dispatches the chunk.
    pub async fn feed_line(&mut self, line: &str) {
        if !self.settings.enabled {
            return;
        }
        self.buffer.push(line.to_string());

        if markup::is_update_boundary(line) {
            let chunk: Vec<String> = self.buffer.drain(..).collect();
            self.dispatch(chunk).await;
            return;
        }

        // Bound memory between boundaries; most recent lines win
        if self.buffer.len() > self.settings.buffer_size {
            let excess = self.buffer.len() - self.settings.buffer_size;
            self.buffer.drain(..excess);
        }
    }

    async fn dispatch(&mut self, chunk: Vec<String>) {
        if !self.is_combat_relevant(&chunk) {
            crate::debug_log!("chunk skipped, no combat content ({} lines)", chunk.len());
            return;
        }
        // Creature marker gate: no emphasized entity, no dispatch
        if !chunk.iter().any(|line| markup::has_bold_entity(line)) {
            crate::debug_log!("chunk skipped, no creature marker");
            return;
        }

        self.chunks_dispatched += 1;
        if self.chunks_dispatched % u64::from(self.settings.cleanup_interval) == 0 {
            let removed = self.registry.cleanup_old(self.settings.cleanup_max_age);
            if removed > 0 {
                tracing::debug!(removed, "culled idle creatures");
            }
        }

        let opts = self.settings.correlator_options();
        match self.scheduler.as_mut() {
            Some(scheduler) => {
                let patterns = Arc::clone(&self.patterns);
                let registry = Arc::clone(&self.registry);
                scheduler
                    .process_async(chunk, move |lines| {
                        combat::process_chunk(lines, &patterns, &registry, opts);
                    })
                    .await;
            }
            None => {
                combat::process_chunk(&chunk, &self.patterns, &self.registry, opts);
            }
        }
    }

    /// Cheap pre-filter: skip chunks with no attack or damage keywords and
    /// no emphasized creature link anywhere.
    fn is_combat_relevant(&self, chunk: &[String]) -> bool {
        chunk.iter().any(|line| {
            self.patterns.is_attack_line(line)
                || self.patterns.is_damage_line(line)
                || markup::has_bold_entity(line)
        })
    }
}
