//! Headless Skirmish Runner
//!
//! Runs a small two-faction skirmish under default AI and prints a summary.

use std::path::PathBuf;

use clap::Parser;
use glam::{IVec3, Vec3};
use serde::Serialize;
use skirmish_core::battle::{
    BattleContext, BattleMap, BattleMode, Combatant, EquippedItem, ItemDefinition, PartKind,
    SampleId, Skirmish, SkirmishEventType, TracingSound, PART_HEIGHT_UNITS,
};
use skirmish_core::core::{FactionId, Result, SkirmishConfig, UnitId};

/// Headless Skirmish Runner - default AI and item physics without a renderer
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Run a headless skirmish and output a JSON or text summary")]
struct Args {
    /// TOML file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Run in turn-based mode with faction 0 holding the turn
    #[arg(long)]
    turn_based: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every event as it happens
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct UnitSummary {
    id: UnitId,
    faction: FactionId,
    position: Vec3,
    facing: Vec3,
    conscious: bool,
}

#[derive(Serialize)]
struct ItemSummary {
    name: String,
    position: Vec3,
    supported: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct SkirmishResult {
    ticks: u64,
    seed: u64,
    attacks: usize,
    turns: usize,
    moves: usize,
    items_landed: usize,
    items_destroyed: usize,
    units: Vec<UnitSummary>,
    items: Vec<ItemSummary>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skirmish_core=info".into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => SkirmishConfig::load_from_toml(path)?,
        None => SkirmishConfig::default(),
    };

    let mode = if args.turn_based {
        BattleMode::TurnBased
    } else {
        BattleMode::RealTime
    };
    let context = BattleContext::new(mode, FactionId(0), seed);
    let mut skirmish = Skirmish::new(create_test_map(), context, config, TracingSound);

    let (friendly, enemy) = deploy_factions(&mut skirmish);
    tracing::info!(
        "Skirmish started: {} vs {} units, seed {}",
        friendly.len(),
        enemy.len(),
        seed
    );

    // A grenade bounces off the crate line, a clip drops at a soldier's feet
    let thrower = friendly[1];
    skirmish.drop_item(
        ItemDefinition::new("grenade"),
        Vec3::new(4.5, 6.5, 2.2),
        Vec3::new(48.0, 0.0, 20.0),
        Some(thrower),
    )?;
    skirmish.drop_item(
        ItemDefinition::new("clip"),
        Vec3::new(17.5, 4.5, 1.6),
        Vec3::ZERO,
        Some(enemy[0]),
    )?;

    for _ in 0..args.ticks {
        let events = skirmish.run_tick();
        if args.verbose {
            for event in &events.events {
                eprintln!(
                    "  [{}] {:?}: {}",
                    event.tick, event.event_type, event.description
                );
            }
        }
    }

    let count = |predicate: fn(&SkirmishEventType) -> bool| {
        skirmish
            .battle_log
            .iter()
            .filter(|e| predicate(&e.event_type))
            .count()
    };

    let result = SkirmishResult {
        ticks: skirmish.context.tick,
        seed,
        attacks: count(|e| matches!(e, SkirmishEventType::UnitAttacked { .. })),
        turns: count(|e| matches!(e, SkirmishEventType::UnitTurned { .. })),
        moves: count(|e| matches!(e, SkirmishEventType::UnitMoved { .. })),
        items_landed: count(|e| matches!(e, SkirmishEventType::ItemLanded { .. })),
        items_destroyed: count(|e| matches!(e, SkirmishEventType::ItemDestroyed { .. })),
        units: skirmish
            .roster
            .iter()
            .map(|u| UnitSummary {
                id: u.id,
                faction: u.owner,
                position: u.position,
                facing: u.facing,
                conscious: u.conscious,
            })
            .collect(),
        items: skirmish
            .items
            .iter()
            .map(|item| ItemSummary {
                name: item.definition.name.clone(),
                position: item.position,
                supported: item.supported,
            })
            .collect(),
    };

    match args.format.as_str() {
        "text" => print_text(&result),
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn print_text(result: &SkirmishResult) {
    println!("Skirmish Result");
    println!("===============");
    println!("Ticks: {}", result.ticks);
    println!("Attacks: {}", result.attacks);
    println!("Turns: {}", result.turns);
    println!("Moves: {}", result.moves);
    println!(
        "Items landed/destroyed: {}/{}",
        result.items_landed, result.items_destroyed
    );
    println!();
    for unit in &result.units {
        println!(
            "  Faction {} unit at ({:.1},{:.1},{:.1}) conscious={}",
            unit.faction.0, unit.position.x, unit.position.y, unit.position.z, unit.conscious
        );
    }
    for item in &result.items {
        println!(
            "  {} at ({:.2},{:.2},{:.2}) supported={}",
            item.name, item.position.x, item.position.y, item.position.z, item.supported
        );
    }
    println!();
    println!("Seed: {}", result.seed);
}

/// Flat 24x12 field with a line of crates across the middle and a wall stub
fn create_test_map() -> BattleMap {
    let mut map = BattleMap::flat(24, 12, 4);
    for y in 3..9 {
        map.add_part(IVec3::new(11, y, 1), PartKind::Feature, 16);
    }
    map.add_part(IVec3::new(12, 2, 1), PartKind::LeftWall, PART_HEIGHT_UNITS);
    for x in 0..24 {
        for y in 0..12 {
            map.set_drop_sound(IVec3::new(x, y, 0), SampleId::new("drop_dirt"));
        }
    }
    map
}

/// Three soldiers per side, the last of the enemies under an enzyme debuff
fn deploy_factions(skirmish: &mut Skirmish<TracingSound>) -> (Vec<UnitId>, Vec<UnitId>) {
    let mut friendly = Vec::new();
    let mut enemy = Vec::new();
    for (i, y) in [4.5, 6.5, 8.5].into_iter().enumerate() {
        let mut unit = Combatant::new(UnitId::new(), FactionId(0), Vec3::new(3.5, y, 1.0));
        unit.right_hand = Some(EquippedItem::weapon("rifle", 18.0));
        if i == 2 {
            unit.right_hand = Some(EquippedItem::tool("motion scanner"));
        }
        friendly.push(skirmish.add_unit(unit));

        let mut unit = Combatant::new(UnitId::new(), FactionId(1), Vec3::new(19.5, y, 1.0));
        unit.right_hand = Some(EquippedItem::weapon("laser pistol", 12.0));
        unit.left_hand = Some(EquippedItem::weapon("laser pistol", 12.0));
        if i == 2 {
            unit.enzyme_debuff_intensity = 5;
        }
        enemy.push(skirmish.add_unit(unit));
    }
    (friendly, enemy)
}
