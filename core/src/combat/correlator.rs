//! Per-chunk event correlation.
//!
//! Reconstructs discrete per-target combat events from an ordered line
//! stream. The machine is built fresh for every chunk; nothing survives a
//! chunk boundary. Line order within a chunk is causal and must stay
//! sequential: crit attribution looks ahead a few lines.

use crate::patterns::PatternSet;
use crate::registry::{CreatureHandle, CreatureRegistry, normalize_location};

use super::event::{CombatEvent, CreatureRef, CritWound, StatusAction, StatusChange, UcsSignal};
use super::markup;
use super::parser::LineParser;

/// How many lines past a damage report to search for its critical wound.
const CRIT_LOOKAHEAD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CorrelatorState {
    SeekingAttack,
    SeekingDamage,
}

/// Tracking toggles, snapshotted from settings at dispatch time.
#[derive(Debug, Clone, Copy)]
pub struct CorrelatorOptions {
    pub track_damage: bool,
    pub track_wounds: bool,
    pub track_statuses: bool,
    pub track_ucs: bool,
}

impl Default for CorrelatorOptions {
    fn default() -> Self {
        Self {
            track_damage: true,
            track_wounds: true,
            track_statuses: true,
            track_ucs: true,
        }
    }
}

pub struct ChunkCorrelator<'a> {
    parser: LineParser<'a>,
    registry: &'a CreatureRegistry,
    opts: CorrelatorOptions,
    state: CorrelatorState,
    open: Option<CombatEvent>,
    completed: Vec<CombatEvent>,
}

impl<'a> ChunkCorrelator<'a> {
    pub fn new(
        patterns: &'a PatternSet,
        registry: &'a CreatureRegistry,
        opts: CorrelatorOptions,
    ) -> Self {
        Self {
            parser: LineParser::new(patterns, opts.track_statuses, opts.track_ucs),
            registry,
            opts,
            state: CorrelatorState::SeekingAttack,
            open: None,
            completed: Vec::new(),
        }
    }

    /// Consume the chunk, returning completed events in order.
    pub fn run(mut self, lines: &[String]) -> Vec<CombatEvent> {
        for (idx, line) in lines.iter().enumerate() {
            self.apply_side_effects(line);
            self.check_target_switch(line);
            match self.state {
                CorrelatorState::SeekingAttack => self.seek_attack(line),
                CorrelatorState::SeekingDamage => self.seek_damage(lines, idx),
            }
        }
        self.flush_open();
        self.completed
    }

    /// Status and assist signals run on every line regardless of state and
    /// apply immediately; they are not buffered into the event list.
    fn apply_side_effects(&mut self, line: &str) {
        if let Some(change) = self.parser.parse_status(line) {
            self.apply_status(change);
        }
        if let Some(signal) = self.parser.parse_ucs(line) {
            self.apply_ucs(signal);
        }
    }

    /// Resolve by link id first, falling back to a fuzzy name match.
    fn resolve(&self, target: Option<&CreatureRef>) -> Option<CreatureHandle> {
        let target = target?;
        if target.id > 0
            && let Some(handle) = self.registry.lookup(target.id)
        {
            return Some(handle);
        }
        self.registry.find_by_name(&target.name)
    }

    fn apply_status(&mut self, change: StatusChange) {
        match self.resolve(change.target.as_ref()) {
            Some(handle) => {
                if let Ok(mut creature) = handle.lock() {
                    match change.action {
                        StatusAction::Add => creature.add_status(&change.status),
                        StatusAction::Remove => creature.remove_status(&change.status),
                    }
                    crate::debug_log!("status {} {:?} -> #{}", change.status, change.action, creature.id);
                }
            }
            // Bare tag with no resolvable creature: ride along with the
            // open event and persist against its target. Removals without
            // a target have nothing to act on.
            None => {
                if change.action == StatusAction::Add
                    && let Some(open) = self.open.as_mut()
                {
                    open.statuses.push(change.status);
                }
            }
        }
    }

    fn apply_ucs(&mut self, signal: UcsSignal) {
        match signal {
            UcsSignal::Position { target, value } => {
                if let Some(handle) = self.resolve(target.as_ref())
                    && let Ok(mut creature) = handle.lock()
                {
                    creature.set_ucs_position(value);
                }
            }
            UcsSignal::Tierup { target, value } => {
                if let Some(handle) = self.resolve(target.as_ref())
                    && let Ok(mut creature) = handle.lock()
                {
                    creature.set_ucs_tierup(value);
                }
            }
            UcsSignal::Smite { target } => {
                if let Some(handle) = self.resolve(target.as_ref())
                    && let Ok(mut creature) = handle.lock()
                {
                    creature.smite();
                }
            }
            UcsSignal::ClearSmite { target } => {
                if let Some(handle) = self.resolve(target.as_ref())
                    && let Ok(mut creature) = handle.lock()
                {
                    creature.clear_smite();
                }
            }
        }
    }

    /// A new emphasized creature mid-sequence means the same attack struck
    /// another target: close out the current tally and continue under the
    /// inherited attack name. The first target of a sequence just attaches.
    fn check_target_switch(&mut self, line: &str) {
        if self.state == CorrelatorState::SeekingAttack || self.open.is_none() {
            return;
        }
        let Some(found) = markup::first_bold_entity(line) else {
            return;
        };

        let current_id = self
            .open
            .as_ref()
            .and_then(|ev| ev.target.as_ref())
            .map(|t| t.id);

        match current_id {
            None => {
                if let Some(open) = self.open.as_mut() {
                    open.target = Some(found);
                }
            }
            Some(id) if id != found.id => {
                let name = self
                    .open
                    .as_ref()
                    .map(|ev| ev.attack_name.clone())
                    .unwrap_or_default();
                self.flush_open();
                self.open = Some(CombatEvent::open(name, Some(found)));
            }
            Some(_) => {}
        }
    }

    fn seek_attack(&mut self, line: &str) {
        let Some(attack) = self.parser.parse_attack(line) else {
            return;
        };
        crate::debug_log!(
            "attack `{}` opens event (target {:?})",
            attack.name,
            attack.target.as_ref().map(|t| t.name.as_str())
        );
        self.flush_open();
        self.open = Some(CombatEvent::open(attack.name, attack.target));
        if attack.damaging {
            self.state = CorrelatorState::SeekingDamage;
        }
    }

    fn seek_damage(&mut self, lines: &[String], idx: usize) {
        let line = &lines[idx];

        if self.opts.track_damage
            && let Some(amount) = self.parser.parse_damage(line)
        {
            if let Some(open) = self.open.as_mut() {
                open.damages.push(amount);
            }
            if self.opts.track_wounds
                && let Some(crit) = self.lookahead_crit(lines, idx)
            {
                if let Some(open) = self.open.as_mut() {
                    open.crits.push(crit);
                }
            }
            return;
        }

        // Not a damage line: it may open the next attack sequence instead
        self.seek_attack(line);
    }

    /// Scan the next few lines for the critical wound tied to this damage
    /// report. An intervening damage line ends the search early since its
    /// wound belongs to that hit, not this one. At most one crit per
    /// damage line.
    fn lookahead_crit(&self, lines: &[String], damage_idx: usize) -> Option<CritWound> {
        for offset in 1..=CRIT_LOOKAHEAD {
            let line = lines.get(damage_idx + offset)?;
            if self.parser.parse_damage(line).is_some() {
                return None;
            }
            if let Some(crit) = self.parser.parse_crit(line) {
                return Some(crit);
            }
        }
        None
    }

    fn flush_open(&mut self) {
        let Some(event) = self.open.take() else {
            return;
        };
        if event.target.is_some() && event.has_effects() {
            self.completed.push(event);
        } else {
            crate::debug_log!("discarding empty event `{}`", event.attack_name);
        }
    }
}

/// Apply one completed event to the registry. Lookup misses are expected
/// (the creature may already be dead and culled) and logged at debug only.
pub fn persist_event(event: &CombatEvent, registry: &CreatureRegistry) {
    let Some(target) = &event.target else {
        return;
    };
    let Some(handle) = registry.lookup(target.id) else {
        tracing::debug!(id = target.id, name = %target.name, "combat event for unknown creature");
        return;
    };
    let Ok(mut creature) = handle.lock() else {
        return;
    };

    for &amount in &event.damages {
        creature.add_damage(amount);
    }
    for crit in &event.crits {
        match normalize_location(&crit.location) {
            Some(part) => creature.add_injury(part, crit.wound_rank),
            None => tracing::debug!(location = %crit.location, "unmapped crit location"),
        }
        if crit.fatal {
            creature.mark_fatal_crit();
        }
    }
    for status in &event.statuses {
        creature.add_status(status);
    }
}

/// Full pipeline for one chunk: correlate, then persist each event.
/// Returns how many events were persisted.
pub fn process_chunk(
    lines: &[String],
    patterns: &PatternSet,
    registry: &CreatureRegistry,
    opts: CorrelatorOptions,
) -> usize {
    let events = ChunkCorrelator::new(patterns, registry, opts).run(lines);
    for event in &events {
        persist_event(event, registry);
    }
    events.len()
}
