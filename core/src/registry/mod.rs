//! Creature state registry.
//!
//! Pure storage, safe for concurrent additive mutation by parse workers.
//! Routing decisions live in the correlator; the registry only records what
//! it is told.

pub mod body_parts;

pub use body_parts::{BODY_PARTS, BodyPart, normalize_location};

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use hashbrown::{HashMap, HashSet};

use crate::combat::CreatureRef;

/// Mutable combat state for one creature.
#[derive(Debug, Clone)]
pub struct Creature {
    pub id: i64,
    pub noun: String,
    pub name: String,
    /// Known maximum health, when the host has learned it.
    pub max_hp: Option<i32>,
    damage_taken: i64,
    wounds: HashMap<BodyPart, u8>,
    statuses: HashSet<String>,
    fatal_crit: bool,
    ucs_position: Option<String>,
    ucs_tierup: Option<String>,
    smited: bool,
    last_update: DateTime<Utc>,
}

impl Creature {
    fn from_ref(sighting: &CreatureRef) -> Self {
        Self {
            id: sighting.id,
            noun: sighting.noun.clone(),
            name: sighting.name.clone(),
            max_hp: None,
            damage_taken: 0,
            wounds: HashMap::new(),
            statuses: HashSet::new(),
            fatal_crit: false,
            ucs_position: None,
            ucs_tierup: None,
            smited: false,
            last_update: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.last_update = Utc::now();
    }

    pub fn add_damage(&mut self, amount: i32) {
        self.damage_taken += i64::from(amount);
        self.touch();
    }

    pub fn damage_taken(&self) -> i64 {
        self.damage_taken
    }

    /// Record a wound; an existing worse wound on the same part stands.
    pub fn add_injury(&mut self, part: BodyPart, wound_rank: u8) {
        let rank = self.wounds.entry(part).or_insert(0);
        *rank = (*rank).max(wound_rank);
        self.touch();
    }

    pub fn wound(&self, part: BodyPart) -> Option<u8> {
        self.wounds.get(&part).copied()
    }

    pub fn wounds(&self) -> &HashMap<BodyPart, u8> {
        &self.wounds
    }

    pub fn mark_fatal_crit(&mut self) {
        self.fatal_crit = true;
        self.touch();
    }

    pub fn has_fatal_crit(&self) -> bool {
        self.fatal_crit
    }

    pub fn add_status(&mut self, status: &str) {
        self.statuses.insert(status.to_string());
        self.touch();
    }

    pub fn remove_status(&mut self, status: &str) {
        self.statuses.remove(status);
        self.touch();
    }

    pub fn has_status(&self, status: &str) -> bool {
        self.statuses.contains(status)
    }

    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.statuses.iter().map(String::as_str)
    }

    pub fn set_ucs_position(&mut self, value: impl Into<String>) {
        self.ucs_position = Some(value.into());
        self.touch();
    }

    pub fn ucs_position(&self) -> Option<&str> {
        self.ucs_position.as_deref()
    }

    pub fn set_ucs_tierup(&mut self, value: impl Into<String>) {
        self.ucs_tierup = Some(value.into());
        self.touch();
    }

    pub fn ucs_tierup(&self) -> Option<&str> {
        self.ucs_tierup.as_deref()
    }

    pub fn smite(&mut self) {
        self.smited = true;
        self.touch();
    }

    pub fn clear_smite(&mut self) {
        self.smited = false;
        self.touch();
    }

    pub fn is_smited(&self) -> bool {
        self.smited
    }

    /// Estimated remaining health fraction. Unknown maximums fall back to
    /// the configured default so the estimate stays usable.
    pub fn health_estimate(&self, fallback_max_hp: i32) -> f32 {
        let max = self.max_hp.unwrap_or(fallback_max_hp).max(1) as f32;
        ((max - self.damage_taken as f32) / max).clamp(0.0, 1.0)
    }

    fn age_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_update).num_seconds()
    }
}

/// Shared handle to one creature's state.
pub type CreatureHandle = Arc<Mutex<Creature>>;

/// Id-keyed store of creature combat state.
///
/// Lock order is always map before creature; handles are cloned out so
/// creature locks are never held under the map lock by callers.
#[derive(Debug, Default)]
pub struct CreatureRegistry {
    creatures: Mutex<HashMap<i64, CreatureHandle>>,
}

impl CreatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a sighting. Refreshes the last-update timestamp either way.
    pub fn observe(&self, sighting: &CreatureRef) {
        if sighting.id <= 0 {
            return;
        }
        let Ok(mut map) = self.creatures.lock() else {
            return;
        };
        let handle = map
            .entry(sighting.id)
            .or_insert_with(|| Arc::new(Mutex::new(Creature::from_ref(sighting))));
        let handle = Arc::clone(handle);
        drop(map);
        if let Ok(mut creature) = handle.lock() {
            creature.touch();
        }
    }

    pub fn lookup(&self, id: i64) -> Option<CreatureHandle> {
        let map = self.creatures.lock().ok()?;
        map.get(&id).cloned()
    }

    /// Fuzzy lookup for lines that name a creature without an entity link.
    /// Case-insensitive containment against display name and noun.
    pub fn find_by_name(&self, text: &str) -> Option<CreatureHandle> {
        let needle = text.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        let map = self.creatures.lock().ok()?;
        map.values()
            .find(|handle| {
                handle
                    .lock()
                    .map(|c| {
                        let name = c.name.to_ascii_lowercase();
                        name.contains(&needle)
                            || needle.contains(&name)
                            || needle.contains(&c.noun.to_ascii_lowercase())
                    })
                    .unwrap_or(false)
            })
            .cloned()
    }

    /// Drop creatures not updated within `max_age_seconds`. Returns how
    /// many were removed.
    pub fn cleanup_old(&self, max_age_seconds: i64) -> usize {
        let now = Utc::now();
        let Ok(mut map) = self.creatures.lock() else {
            return 0;
        };
        let before = map.len();
        map.retain(|_, handle| {
            handle
                .lock()
                .map(|c| c.age_seconds(now) < max_age_seconds)
                .unwrap_or(false)
        });
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.creatures.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time copy of every creature, for display.
    pub fn snapshot(&self) -> Vec<Creature> {
        let Ok(map) = self.creatures.lock() else {
            return Vec::new();
        };
        map.values()
            .filter_map(|handle| handle.lock().ok().map(|c| c.clone()))
            .collect()
    }
}
