//! Bundled default pattern table.
//!
//! Ships as TOML so the built-in defaults and on-disk overrides share one
//! document shape. Override with `PatternSet::from_toml_file`.

pub(super) const BUILTIN_TABLE: &str = r#"
version = 1

damage = [
    '(?P<amount>\d+) points? of damage',
    'strikes? for (?P<amount>\d+) damage',
]

# ── Attacks ─────────────────────────────────────────────────────────────

[[attack]]
pattern = 'You swing (?:an? |your )?.+? at (?P<target><pushBold/>.+?<popBold/>)'
name = "swing"

[[attack]]
pattern = 'You (?:lunge|drive) (?:forward )?at (?P<target><pushBold/>.+?<popBold/>)'
name = "lunge"

[[attack]]
pattern = 'You thrust (?:an? |your )?.+? at (?P<target><pushBold/>.+?<popBold/>)'
name = "thrust"

[[attack]]
pattern = 'You (?:chop|slice) (?:an? |your )?.+? at (?P<target><pushBold/>.+?<popBold/>)'
name = "chop"

[[attack]]
pattern = 'You (?:fire|aim) (?:an? |your )?.+? at (?P<target><pushBold/>.+?<popBold/>)'
name = "fire"

[[attack]]
pattern = 'You sweep (?:an? |your )?.+? in a wide arc'
name = "sweep"

[[attack]]
pattern = 'You (?:punch|jab) (?:at )?(?P<target><pushBold/>.+?<popBold/>)'
name = "punch"

[[attack]]
pattern = 'You kick (?:at )?(?P<target><pushBold/>.+?<popBold/>)'
name = "kick"

# ── Critical wounds ─────────────────────────────────────────────────────

[[crit]]
pattern = 'crippl(?:es|ing) the (?P<location>[a-z ]+)'
damage_type = "bone"
rank = 2
wound_rank = 2

[[crit]]
pattern = 'tears? a (?:gruesome|jagged) gash (?:across|along) the (?P<location>[a-z ]+)'
damage_type = "slash"
rank = 1
wound_rank = 1

[[crit]]
pattern = 'shatters? the (?P<location>[a-z ]+)'
damage_type = "bone"
rank = 3
wound_rank = 3

[[crit]]
pattern = 'punctures? deep into the (?P<location>[a-z ]+)'
damage_type = "puncture"
rank = 2
wound_rank = 2

[[crit]]
pattern = 'leaves? the (?P<location>[a-z ]+) a mangled ruin'
damage_type = "impact"
rank = 4
wound_rank = 4

[[crit]]
pattern = 'a brutally fatal (?:strike|blow) to the (?P<location>[a-z ]+)'
damage_type = "impact"
rank = 5
wound_rank = 5
fatal = true

[[crit]]
pattern = 'the (?P<location>[a-z ]+) is utterly destroyed'
damage_type = "slash"
rank = 5
wound_rank = 5
fatal = true

# ── Status effects ──────────────────────────────────────────────────────

[[status]]
pattern = 'reels? and falls? stunned'
status = "stunned"

[[status]]
pattern = 'shakes? off the stun'
status = "stunned"
remove = true

[[status]]
pattern = 'is knocked to the ground'
status = "prone"

[[status]]
pattern = '(?:clambers|struggles) back (?:up )?to (?:its|his|her) feet'
status = "prone"
remove = true

[[status]]
pattern = 'begins? to bleed profusely'
status = "bleeding"

[[status]]
pattern = 'bleeding slows and stops'
status = "bleeding"
remove = true

[[status]]
pattern = 'is entangled in sticky webbing'
status = "webbed"

[[status]]
pattern = 'wobbles? dizzily'
status = "dizzy"

# ── Unarmed combat assists ──────────────────────────────────────────────

[[ucs]]
pattern = 'You maneuver into an? (?P<value>[a-z]+) position against'
kind = "position"

[[ucs]]
pattern = 'You press your advantage, moving up to (?P<value>[a-z]+)'
kind = "tierup"

[[ucs]]
pattern = 'Your (?:holy|righteous) fury smites'
kind = "smite"

[[ucs]]
pattern = 'The smiting (?:wrath|fury) fades from'
kind = "clear_smite"
"#;
