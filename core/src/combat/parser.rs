//! Stateless per-line extraction.
//!
//! Every function returns `None` on a miss. Misses are the common case on
//! a live transcript, not errors.

use crate::patterns::{PatternSet, UcsPatternKind};

use super::event::{AttackMatch, CritWound, StatusAction, StatusChange, UcsSignal};
use super::markup;

/// Lines are clamped before regex evaluation; pathological lengths would
/// otherwise dominate matching cost.
const MAX_MATCH_LEN: usize = 2048;

pub struct LineParser<'a> {
    patterns: &'a PatternSet,
    track_statuses: bool,
    track_ucs: bool,
}

impl<'a> LineParser<'a> {
    pub fn new(patterns: &'a PatternSet, track_statuses: bool, track_ucs: bool) -> Self {
        Self {
            patterns,
            track_statuses,
            track_ucs,
        }
    }

    fn clamp(line: &str) -> &str {
        if line.len() <= MAX_MATCH_LEN {
            return line;
        }
        let mut end = MAX_MATCH_LEN;
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        &line[..end]
    }

    /// Attack initiation. First match in table order wins. The target comes
    /// from the pattern's `target` capture when present, falling back to an
    /// emphasis-wrapped entity scan of the whole line.
    pub fn parse_attack(&self, line: &str) -> Option<AttackMatch> {
        let line = Self::clamp(line);
        for attack in &self.patterns.attacks {
            let Some(caps) = attack.matcher.captures(line) else {
                continue;
            };
            let target = caps
                .name("target")
                .and_then(|m| markup::first_entity(m.as_str()))
                .or_else(|| markup::first_bold_entity(line));
            return Some(AttackMatch {
                name: attack.name.clone(),
                target,
                damaging: attack.damaging,
            });
        }
        None
    }

    /// Damage amount reported on the line.
    pub fn parse_damage(&self, line: &str) -> Option<i32> {
        let line = Self::clamp(line);
        for matcher in &self.patterns.damage {
            if let Some(caps) = matcher.captures(line) {
                return caps.name("amount")?.as_str().parse::<i32>().ok();
            }
        }
        None
    }

    /// Critical wound on the line, location text carried verbatim.
    pub fn parse_crit(&self, line: &str) -> Option<CritWound> {
        let line = Self::clamp(line);
        for crit in &self.patterns.crits {
            let Some(caps) = crit.matcher.captures(line) else {
                continue;
            };
            return Some(CritWound {
                damage_type: crit.damage_type.clone(),
                location: caps.name("location")?.as_str().trim().to_string(),
                rank: crit.rank,
                wound_rank: crit.wound_rank,
                fatal: crit.fatal,
            });
        }
        None
    }

    /// Status effect starting or ending on the line.
    pub fn parse_status(&self, line: &str) -> Option<StatusChange> {
        if !self.track_statuses {
            return None;
        }
        let line = Self::clamp(line);
        for status in &self.patterns.statuses {
            if status.matcher.is_match(line) {
                return Some(StatusChange {
                    status: status.status.clone(),
                    target: markup::first_bold_entity(line),
                    action: if status.remove {
                        StatusAction::Remove
                    } else {
                        StatusAction::Add
                    },
                });
            }
        }
        None
    }

    /// Unarmed-combat assist signal on the line.
    pub fn parse_ucs(&self, line: &str) -> Option<UcsSignal> {
        if !self.track_ucs {
            return None;
        }
        let line = Self::clamp(line);
        for ucs in &self.patterns.ucs {
            let Some(caps) = ucs.matcher.captures(line) else {
                continue;
            };
            let target = markup::first_bold_entity(line);
            let value = caps
                .name("value")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            return Some(match ucs.kind {
                UcsPatternKind::Position => UcsSignal::Position { target, value },
                UcsPatternKind::Tierup => UcsSignal::Tierup { target, value },
                UcsPatternKind::Smite => UcsSignal::Smite { target },
                UcsPatternKind::ClearSmite => UcsSignal::ClearSmite { target },
            });
        }
        None
    }
}
