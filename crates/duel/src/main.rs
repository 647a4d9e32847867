//! Headless duel driver.
//!
//! Composition root that assembles:
//! 1. Content (combat config and archetypes) from TOML/RON, or built-in defaults
//! 2. A `CombatWorld` with one scripted pilot per entrant
//! 3. A cone-overlap arena standing in for physics
//!
//! # Examples
//!
//! ```bash
//! RUST_LOG=combat_core=debug duel --ticks 3600 --seed 7 \
//!     --config crates/combat/content/data/combat.toml \
//!     --archetype crates/combat/content/data/archetypes/fighter.ron \
//!     --opponent crates/combat/content/data/archetypes/duelist.ron
//! ```

mod arena;
mod pilot;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use combat_content::{Archetype, ArchetypeLoader, ConfigLoader};
use combat_core::{CombatConfig, Faction};

use session::{Entrant, Session};

/// Run a scripted headless duel and print per-actor summaries
#[derive(Parser, Debug)]
#[command(name = "duel")]
#[command(version)]
struct Cli {
    /// Simulation ticks to run
    #[arg(long, default_value_t = 3600)]
    ticks: u32,

    /// Ticks per second
    #[arg(long, default_value_t = 60)]
    rate: u32,

    /// Rounds before stopping early
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Combat configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Archetype of the first combatant (RON)
    #[arg(long)]
    archetype: Option<PathBuf>,

    /// Archetype of the second combatant (RON); defaults to `--archetype`
    #[arg(long)]
    opponent: Option<PathBuf>,

    /// Seed for the scripted pilots
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load(path).context("loading combat config")?,
        None => CombatConfig::default(),
    };
    let first = load_archetype(cli.archetype.as_ref())?;
    let second = match &cli.opponent {
        Some(path) => load_archetype(Some(path))?,
        None => first.clone(),
    };

    tracing::info!(
        ticks = cli.ticks,
        rate = cli.rate,
        seed = cli.seed,
        first = %first.name,
        second = %second.name,
        "starting duel"
    );

    let entrants = vec![
        Entrant {
            label: format!("{} (1)", first.name),
            spec: first.spec(Faction::Player),
        },
        Entrant {
            label: format!("{} (2)", second.name),
            spec: second.spec(Faction::Enemy),
        },
    ];
    let mut session = Session::new(config, entrants, cli.seed, cli.rate);
    let rounds = session.run(cli.ticks, cli.rounds);

    println!("== rounds ==");
    if rounds.is_empty() {
        println!("  no knockout");
    }
    for round in &rounds {
        let winner = round.winner.map_or("draw", |id| session.label(id));
        println!("  round {} at tick {}: {}", round.round, round.tick, winner);
    }

    println!("== combatants ==");
    for actor in session.world().actors().iter() {
        let tally = actor.tally();
        println!(
            "  {:<16} {:<7} hp {:>6.1}/{:<6.1} stamina {:>5.1} state {:<12} \
             hits {}/{} parries {}+{} blocks {} dodges {} deaths {}",
            session.label(actor.id()),
            actor.faction(),
            actor.health(),
            actor.stats().max_health,
            actor.stamina().current(),
            actor.state_kind(),
            tally.hits_landed,
            tally.hits_taken,
            tally.perfect_parries,
            tally.partial_parries,
            tally.blocks,
            tally.dodges,
            tally.deaths,
        );
    }

    let log = session.log();
    println!("== events ==");
    println!(
        "  hits {} perfect parries {} partial parries {} poise breaks {} guard breaks {} hitstops {} deaths {}",
        log.hits,
        log.perfect_parries,
        log.partial_parries,
        log.poise_breaks,
        log.guard_breaks,
        log.hitstops,
        log.deaths.len(),
    );
    Ok(())
}

fn load_archetype(path: Option<&PathBuf>) -> Result<Archetype> {
    match path {
        Some(path) => ArchetypeLoader::load(path)
            .with_context(|| format!("loading archetype {}", path.display())),
        None => Ok(Archetype::default()),
    }
}
