//! Skirmish benchmarks: default AI decisions and falling items

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec3;
use skirmish_core::battle::{
    BattleContext, BattleMap, BattleMode, Combatant, DecisionContext, DefaultUnitAi,
    EquippedItem, ItemDefinition, RecordingSound, Skirmish, UnitAi,
};
use skirmish_core::core::{AiConfig, FactionId, SkirmishConfig, UnitId};

fn setup_skirmish(per_side: usize) -> Skirmish<RecordingSound> {
    let mut skirmish = Skirmish::new(
        BattleMap::flat(40, 40, 4),
        BattleContext::new(BattleMode::RealTime, FactionId(0), 7),
        SkirmishConfig::default(),
        RecordingSound::default(),
    );
    for i in 0..per_side {
        let y = (i % 40) as f32 + 0.5;
        let x = (i / 40) as f32 + 0.5;
        for (faction, column) in [(0, x), (1, 39.0 - x)] {
            let position = Vec3::new(column, y, 1.0);
            let mut unit = Combatant::new(UnitId::new(), FactionId(faction), position);
            unit.right_hand = Some(EquippedItem::weapon("rifle", 30.0));
            skirmish.add_unit(unit);
        }
    }
    skirmish
}

fn bench_think(c: &mut Criterion) {
    let mut skirmish = setup_skirmish(40);
    let vision_range = skirmish.config().battle.vision_range;
    skirmish.roster.refresh_visibility(&skirmish.map, vision_range);
    let units: Vec<Combatant> = skirmish.roster.iter().cloned().collect();

    c.bench_function("default_ai_think_80_units", |b| {
        b.iter(|| {
            let view = DecisionContext::new(&skirmish.roster, &skirmish.map);
            let mut decided = 0;
            for unit in &units {
                let mut ai = DefaultUnitAi::new(AiConfig::default());
                if ai.think(&mut skirmish.context, &view, unit, false).1 {
                    decided += 1;
                }
            }
            decided
        })
    });
}

fn bench_items(c: &mut Criterion) {
    c.bench_function("item_fall_500_items", |b| {
        b.iter_batched(
            || {
                let mut skirmish = setup_skirmish(0);
                for i in 0..500 {
                    let position = Vec3::new((i % 40) as f32 + 0.5, (i / 40) as f32 + 0.5, 3.5);
                    let _ = skirmish.drop_item(
                        ItemDefinition::new("clip"),
                        position,
                        Vec3::new(6.0, -3.0, 0.0),
                        None,
                    );
                }
                skirmish
            },
            |mut skirmish| {
                for _ in 0..60 {
                    skirmish.run_tick();
                }
                skirmish
            },
            BatchSize::PerIteration,
        )
    });
}

criterion_group!(benches, bench_think, bench_items);
criterion_main!(benches);
