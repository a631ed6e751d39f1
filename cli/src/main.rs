use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use quarry_core::combat::markup;
use quarry_core::{CreatureRegistry, PatternSet, SettingsPatch, Tracker, TrackerSettings};

#[derive(Parser)]
#[command(version, about = "Replay a game transcript through the creature tracker")]
struct Cli {
    /// Transcript file to replay; stdin when omitted
    path: Option<PathBuf>,

    /// Worker pool size
    #[arg(short, long)]
    threads: Option<usize>,

    /// Pattern table override (TOML)
    #[arg(short, long)]
    patterns: Option<PathBuf>,

    /// Persisted settings scope (account-character); defaults are used
    /// without persistence when omitted
    #[arg(short, long)]
    scope: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let patterns = match &cli.patterns {
        Some(path) => Arc::new(PatternSet::from_toml_file(path).map_err(|e| e.to_string())?),
        None => PatternSet::builtin(),
    };
    let registry = Arc::new(CreatureRegistry::new());

    let mut tracker = match &cli.scope {
        Some(scope) => Tracker::new(scope.clone(), patterns, Arc::clone(&registry)),
        None => Tracker::ephemeral(
            TrackerSettings {
                enabled: true,
                ..Default::default()
            },
            patterns,
            Arc::clone(&registry),
        ),
    };
    tracker.enable().await;
    if let Some(threads) = cli.threads {
        let patch = SettingsPatch {
            max_threads: Some(threads),
            ..Default::default()
        };
        tracker.configure(&patch).await;
    }

    let reader: Box<dyn BufRead> = match &cli.path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut fed = 0u64;
    for line in reader.lines() {
        let line = line.map_err(|e| e.to_string())?;
        // Register sightings so the summary has creatures to report on
        if let Some(sighting) = markup::first_bold_entity(&line) {
            registry.observe(&sighting);
        }
        tracker.feed_line(&line).await;
        fed += 1;
    }
    tracker.shutdown().await;

    println!("{fed} lines replayed, {} creatures tracked", registry.len());
    let fallback = tracker.settings().fallback_max_hp;
    let mut creatures = registry.snapshot();
    creatures.sort_by_key(|c| c.id);
    for creature in creatures {
        let statuses: Vec<&str> = creature.statuses().collect();
        println!(
            "  #{} {} | {} damage taken | ~{:.0}% health | {} wounds | statuses: [{}]{}",
            creature.id,
            creature.name,
            creature.damage_taken(),
            creature.health_estimate(fallback) * 100.0,
            creature.wounds().len(),
            statuses.join(", "),
            if creature.has_fatal_crit() {
                " | fatal crit"
            } else {
                ""
            },
        );
    }

    Ok(())
}
