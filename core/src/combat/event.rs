//! Data types flowing through the combat pipeline.

/// Reference to a creature embedded in transcript markup.
///
/// This is a lookup key only; creature state lives in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureRef {
    pub id: i64,
    pub noun: String,
    pub name: String,
}

/// A critical wound attached to a specific damage instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CritWound {
    pub damage_type: String,
    /// Location text as captured from the line; normalized to a canonical
    /// body part at persistence time.
    pub location: String,
    pub rank: u8,
    pub wound_rank: u8,
    pub fatal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Add,
    Remove,
}

/// A status effect observed on a line.
///
/// Bare status tags parse with `target: None`; the correlator decides
/// whether to apply immediately or ride along with the open event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: String,
    pub target: Option<CreatureRef>,
    pub action: StatusAction,
}

/// Secondary combat-assist signals, independent of the damage pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UcsSignal {
    Position {
        target: Option<CreatureRef>,
        value: String,
    },
    Tierup {
        target: Option<CreatureRef>,
        value: String,
    },
    Smite {
        target: Option<CreatureRef>,
    },
    ClearSmite {
        target: Option<CreatureRef>,
    },
}

/// Attack initiation extracted from a single line.
#[derive(Debug, Clone)]
pub struct AttackMatch {
    pub name: String,
    pub target: Option<CreatureRef>,
    pub damaging: bool,
}

/// The damages, crits and statuses attributed to one target during one
/// attack sequence.
#[derive(Debug, Clone, Default)]
pub struct CombatEvent {
    pub attack_name: String,
    pub target: Option<CreatureRef>,
    pub damages: Vec<i32>,
    pub crits: Vec<CritWound>,
    pub statuses: Vec<String>,
}

impl CombatEvent {
    pub fn open(name: impl Into<String>, target: Option<CreatureRef>) -> Self {
        Self {
            attack_name: name.into(),
            target,
            ..Default::default()
        }
    }

    /// Events with nothing accumulated are dropped at flush time.
    pub fn has_effects(&self) -> bool {
        !self.damages.is_empty() || !self.crits.is_empty() || !self.statuses.is_empty()
    }
}
