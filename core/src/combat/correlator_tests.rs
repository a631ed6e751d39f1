use crate::patterns::PatternSet;
use crate::registry::{BodyPart, CreatureRegistry};

use super::correlator::{ChunkCorrelator, CorrelatorOptions, persist_event, process_chunk};
use super::event::{CombatEvent, CreatureRef};

fn bold(id: i64, noun: &str, name: &str) -> String {
    format!(r#"<pushBold/><a exist="{id}" noun="{noun}">{name}</a><popBold/>"#)
}

const PROMPT: &str = r#"<prompt time="1700000000">&gt;</prompt>"#;

fn troll_ref() -> CreatureRef {
    CreatureRef {
        id: 4221,
        noun: "troll".to_string(),
        name: "a forest troll".to_string(),
    }
}

fn troll() -> String {
    bold(4221, "troll", "a forest troll")
}

fn rat() -> String {
    bold(7, "rat", "a sewer rat")
}

fn chunk(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn run(lines: &[String], registry: &CreatureRegistry) -> Vec<CombatEvent> {
    let patterns = PatternSet::builtin();
    ChunkCorrelator::new(&patterns, registry, CorrelatorOptions::default()).run(lines)
}

#[test]
fn test_attack_then_damage_yields_one_event() {
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The heavy blade bites deep, inflicting 5 points of damage!",
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].attack_name, "swing");
    assert_eq!(events[0].target.as_ref().unwrap().id, 4221);
    assert_eq!(events[0].damages, vec![5]);
    assert!(events[0].crits.is_empty());
}

#[test]
fn test_consecutive_damages_get_no_crit_attribution() {
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The first hit inflicts 5 points of damage!",
        "The second hit inflicts 7 points of damage!",
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].damages, vec![5, 7]);
    assert!(events[0].crits.is_empty());
}

#[test]
fn test_crit_attributed_within_lookahead_window() {
    // Crit at offsets 1, 2 and 3 past the damage line
    for gap in 0..=2usize {
        let registry = CreatureRegistry::new();
        let mut parts: Vec<String> = vec![
            format!("You swing a broadsword at {}!", troll()),
            "The blow inflicts 9 points of damage!".to_string(),
        ];
        for _ in 0..gap {
            parts.push("The troll staggers backward.".to_string());
        }
        parts.push("The impact cripples the right arm!".to_string());
        parts.push(PROMPT.to_string());

        let events = run(&parts, &registry);
        assert_eq!(events.len(), 1, "gap {gap}");
        assert_eq!(events[0].crits.len(), 1, "gap {gap}");
        assert_eq!(events[0].crits[0].location, "right arm");
        assert_eq!(events[0].crits[0].wound_rank, 2);
    }
}

#[test]
fn test_crit_beyond_lookahead_window_ignored() {
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The blow inflicts 9 points of damage!",
        "The troll staggers backward.",
        "It hisses in anger.",
        "Its eyes narrow.",
        "The impact cripples the right arm!",
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert_eq!(events.len(), 1);
    assert!(events[0].crits.is_empty());
}

#[test]
fn test_intervening_damage_ends_crit_search() {
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The first hit inflicts 5 points of damage!",
        "The second hit inflicts 7 points of damage!",
        "The impact cripples the right arm!",
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].damages, vec![5, 7]);
    // The crit belongs to the second hit only
    assert_eq!(events[0].crits.len(), 1);
}

#[test]
fn test_target_switch_yields_two_events() {
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The blow inflicts 5 points of damage!",
        &format!("You swing a broadsword at {}!", rat()),
        "The blow inflicts 7 points of damage!",
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].target.as_ref().unwrap().id, 4221);
    assert_eq!(events[0].damages, vec![5]);
    assert_eq!(events[1].target.as_ref().unwrap().id, 7);
    assert_eq!(events[1].damages, vec![7]);
}

#[test]
fn test_area_attack_inherits_attack_name() {
    // A second creature appears without the attack re-announcing itself
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The blow inflicts 5 points of damage!",
        &format!("{} is caught in the follow-through!", rat()),
        "The blow inflicts 7 points of damage!",
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].attack_name, "swing");
    assert_eq!(events[1].attack_name, "swing");
    assert_eq!(events[1].target.as_ref().unwrap().id, 7);
    assert_eq!(events[1].damages, vec![7]);
}

#[test]
fn test_empty_event_discarded_regardless_of_mentions() {
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        &format!("{} snarls.", troll()),
        &format!("{} circles warily.", troll()),
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert!(events.is_empty());
}

#[test]
fn test_event_without_target_never_emitted() {
    // Damage accumulates but no creature was ever identified
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        "You sweep your staff in a wide arc!",
        "The blow inflicts 5 points of damage!",
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert!(events.is_empty());
}

#[test]
fn test_damage_tracking_disabled_accumulates_nothing() {
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The blow inflicts 5 points of damage!",
        PROMPT,
    ]);

    let patterns = PatternSet::builtin();
    let opts = CorrelatorOptions {
        track_damage: false,
        ..Default::default()
    };
    let events = ChunkCorrelator::new(&patterns, &registry, opts).run(&lines);
    assert!(events.is_empty());
}

#[test]
fn test_statuses_apply_immediately_without_an_attack() {
    let registry = CreatureRegistry::new();
    registry.observe(&troll_ref());

    let lines = chunk(&[&format!("{} reels and falls stunned!", troll()), PROMPT]);
    let events = run(&lines, &registry);
    assert!(events.is_empty());

    let handle = registry.lookup(4221).unwrap();
    assert!(handle.lock().unwrap().has_status("stunned"));
}

#[test]
fn test_status_removal_applies() {
    let registry = CreatureRegistry::new();
    registry.observe(&troll_ref());

    let lines = chunk(&[
        &format!("{} reels and falls stunned!", troll()),
        &format!("{} shakes off the stun.", troll()),
        PROMPT,
    ]);
    run(&lines, &registry);

    let handle = registry.lookup(4221).unwrap();
    assert!(!handle.lock().unwrap().has_status("stunned"));
}

#[test]
fn test_bare_status_rides_with_open_event() {
    // No creatures registered, so "dizzy" cannot resolve and attaches
    let registry = CreatureRegistry::new();
    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The blow inflicts 5 points of damage!",
        "It wobbles dizzily.",
        PROMPT,
    ]);

    let events = run(&lines, &registry);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].statuses, vec!["dizzy".to_string()]);
}

#[test]
fn test_ucs_signals_update_registry() {
    let registry = CreatureRegistry::new();
    registry.observe(&troll_ref());

    let lines = chunk(&[
        &format!("You maneuver into an advantageous position against {}.", troll()),
        &format!("Your holy fury smites {}!", troll()),
        PROMPT,
    ]);
    run(&lines, &registry);

    let handle = registry.lookup(4221).unwrap();
    {
        let creature = handle.lock().unwrap();
        assert_eq!(creature.ucs_position(), Some("advantageous"));
        assert!(creature.is_smited());
    }

    let lines = chunk(&[&format!("The smiting wrath fades from {}.", troll()), PROMPT]);
    run(&lines, &registry);
    assert!(!handle.lock().unwrap().is_smited());
}

// persistence

#[test]
fn test_persist_event_applies_all_effects() {
    let registry = CreatureRegistry::new();
    registry.observe(&troll_ref());

    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The blow inflicts 5 points of damage!",
        "The impact cripples the right arm!",
        PROMPT,
    ]);
    let persisted = process_chunk(&lines, &PatternSet::builtin(), &registry, CorrelatorOptions::default());
    assert_eq!(persisted, 1);

    let handle = registry.lookup(4221).unwrap();
    let creature = handle.lock().unwrap();
    assert_eq!(creature.damage_taken(), 5);
    assert_eq!(creature.wound(BodyPart::RightArm), Some(2));
    assert!(!creature.has_fatal_crit());
}

#[test]
fn test_persist_fatal_crit() {
    let registry = CreatureRegistry::new();
    registry.observe(&troll_ref());

    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The blow inflicts 50 points of damage!",
        "It is a brutally fatal blow to the neck!",
        PROMPT,
    ]);
    process_chunk(&lines, &PatternSet::builtin(), &registry, CorrelatorOptions::default());

    let handle = registry.lookup(4221).unwrap();
    let creature = handle.lock().unwrap();
    assert_eq!(creature.wound(BodyPart::Neck), Some(5));
    assert!(creature.has_fatal_crit());
}

#[test]
fn test_persist_unknown_creature_is_a_noop() {
    let registry = CreatureRegistry::new();
    let event = CombatEvent {
        attack_name: "swing".to_string(),
        target: Some(troll_ref()),
        damages: vec![5],
        ..Default::default()
    };
    persist_event(&event, &registry);
    assert!(registry.is_empty());
}

#[test]
fn test_persist_unmapped_location_skipped() {
    let registry = CreatureRegistry::new();
    registry.observe(&troll_ref());

    let mut event = CombatEvent::open("swing", Some(troll_ref()));
    event.damages.push(3);
    event.crits.push(crate::combat::CritWound {
        damage_type: "slash".to_string(),
        location: "tentacle".to_string(),
        rank: 2,
        wound_rank: 2,
        fatal: false,
    });
    persist_event(&event, &registry);

    let handle = registry.lookup(4221).unwrap();
    let creature = handle.lock().unwrap();
    assert_eq!(creature.damage_taken(), 3);
    assert!(creature.wounds().is_empty());
}

// end to end

#[test]
fn test_forest_troll_end_to_end() {
    let registry = CreatureRegistry::new();
    registry.observe(&troll_ref());

    let lines = chunk(&[
        &format!("You swing a broadsword at {}!", troll()),
        "The heavy blade bites deep, inflicting 5 points of damage!",
        "The impact cripples the right arm!",
        PROMPT,
    ]);
    let persisted = process_chunk(&lines, &PatternSet::builtin(), &registry, CorrelatorOptions::default());
    assert_eq!(persisted, 1);

    let handle = registry.lookup(4221).unwrap();
    let creature = handle.lock().unwrap();
    assert_eq!(creature.damage_taken(), 5);
    assert!(creature.wound(BodyPart::RightArm).unwrap() > 0);
}
