//! Integration tests for whole moons of Clan life.
//!
//! Exercises: generation → advance_moon (every system in order) → queries
//! → save/load, checking the rules that must hold after any moon.

use clangen_core::generation::ClanSetup;
use clangen_core::prelude::*;
use clangen_logic::relation::{Stat, STAT_MAX};
use proptest::prelude::*;

// ── Helpers ────────────────────────────────────────────────────────────

fn seeded(seed: u64) -> ClanEngine {
    let mut engine = ClanEngine::with_seed(ClanConfig::default(), seed).unwrap();
    engine.generate(ClanSetup::default()).unwrap();
    engine
}

/// Every rule that must hold between moons. Returns the first broken one.
fn check_invariants(engine: &mut ClanEngine) -> Result<(), String> {
    let living = engine.living();

    for status in [Status::Leader, Status::Deputy] {
        let holders = living
            .iter()
            .filter(|&&id| engine.cat(id).is_ok_and(|c| c.status == status))
            .count();
        if holders > 1 {
            return Err(format!("{holders} living cats hold {status:?}"));
        }
    }

    for id in engine.clan.ids() {
        let cat = engine.cat(id).map_err(|e| e.to_string())?;
        if !cat.is_alive() {
            if cat.lineage.mentor.is_some() || !cat.lineage.apprentices.is_empty() {
                return Err(format!("dead cat {id} still in a mentorship"));
            }
            if !engine.clan.relationships.mates_of(id).is_empty() {
                return Err(format!("dead cat {id} still has a mate"));
            }
            continue;
        }

        if let Some(mentor) = cat.lineage.mentor {
            let m = engine.cat(mentor).map_err(|e| e.to_string())?;
            if !m.is_alive() || !m.status.can_mentor(cat.status) {
                return Err(format!("{id} has invalid mentor {mentor} ({:?})", m.status));
            }
        }
        if cat.status != Status::Leader && cat.leader_lives != 0 {
            return Err(format!("non-leader {id} has lives"));
        }
        if cat.status == Status::Leader && cat.leader_lives > engine.clan.config.leader_lives {
            return Err(format!("leader {id} has too many lives"));
        }
        if cat.alters.is_some() && !cat.conditions.grants_alters() {
            return Err(format!("{id} has alters without a condition for them"));
        }
        for (other, stats) in &cat.relationships {
            for stat in Stat::ALL {
                if stats.get(stat) > STAT_MAX {
                    return Err(format!("{id} -> {other} {stat:?} out of range"));
                }
            }
        }
        for parent in cat.lineage.all_parents() {
            if !engine.clan.contains(parent) && !engine.clan.faded.contains(parent) {
                return Err(format!("{id} has a parent {parent} nobody remembers"));
            }
        }
    }

    for (a, b, bond) in engine.clan.relationships.bonds() {
        if bond == Bond::Mates {
            let min = engine.clan.config.mate_min_moons;
            for id in [a, b] {
                if engine.cat(id).map_or(0, |c| c.moons) < min {
                    return Err(format!("mate {id} is too young"));
                }
            }
        }
    }

    for faded in engine.clan.faded.iter() {
        if engine.clan.contains(faded.id) {
            return Err(format!("faded cat {} is still in the world", faded.id));
        }
    }
    Ok(())
}

// ── Moon cycle ─────────────────────────────────────────────────────────

#[test]
fn invariants_hold_over_many_moons() {
    let mut engine = seeded(2024);
    check_invariants(&mut engine).unwrap();
    for _ in 0..60 {
        let report = engine.advance_moon();
        if let Err(broken) = check_invariants(&mut engine) {
            panic!("moon {}: {broken}", report.moon);
        }
    }
}

#[test]
fn clan_is_led_after_generation() {
    let mut engine = seeded(7);
    let statuses: Vec<Status> = engine
        .living()
        .into_iter()
        .map(|id| engine.cat(id).unwrap().status)
        .collect();
    assert!(statuses.contains(&Status::Leader));
    assert!(statuses.contains(&Status::Deputy));
    assert!(statuses.contains(&Status::MedicineCat));
    check_invariants(&mut engine).unwrap();
}

#[test]
fn moons_pass_for_everyone() {
    let mut engine = seeded(11);
    let ages: Vec<(CatId, u32)> = engine
        .living()
        .into_iter()
        .map(|id| (id, engine.cat(id).unwrap().moons))
        .collect();
    engine.advance_moon();
    for (id, moons) in ages {
        let cat = engine.cat(id).unwrap();
        if cat.is_alive() {
            assert_eq!(cat.moons, moons + 1, "{id} did not age");
        }
    }
}

#[test]
fn every_cat_has_a_thought_after_a_moon() {
    let mut engine = seeded(12);
    engine.advance_moon();
    for id in engine.clan.ids() {
        let cat = engine.cat(id).unwrap();
        assert!(!cat.thought.is_empty(), "{id} has nothing on their mind");
        assert!(!cat.thought.contains("{other}"));
    }
}

#[test]
fn same_seed_same_clan() {
    let run = |seed| {
        let mut engine = seeded(seed);
        for _ in 0..15 {
            engine.advance_moon();
        }
        engine.export_json().unwrap()
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn dead_cats_fade_eventually() {
    let config = ClanConfig {
        fade_after_moons: 2,
        ..Default::default()
    };
    let mut engine = ClanEngine::with_seed(config, 13).unwrap();
    engine.generate(ClanSetup::default()).unwrap();
    let victim = engine.living()[0];
    let mut outcome = engine.kill(victim, "a rockfall").unwrap();
    while !matches!(outcome, clangen_core::clan::DeathOutcome::Died(_)) {
        outcome = engine.kill(victim, "a rockfall").unwrap();
    }

    engine.advance_moon();
    assert!(engine.clan.contains(victim));
    engine.advance_moon();
    assert!(!engine.clan.contains(victim));
    assert!(engine.clan.faded.contains(victim));
    assert!(engine.name_of(victim).is_some());
    assert!(engine.log().any(|e| e.kind == EventKind::Fade && e.involves(victim)));
}

// ── Persistence ────────────────────────────────────────────────────────

#[test]
fn save_and_load_mid_story() {
    let mut engine = seeded(31);
    for _ in 0..6 {
        engine.advance_moon();
    }
    let mut bytes = Vec::new();
    engine.save(&mut bytes).unwrap();

    let mut loaded = ClanEngine::default();
    loaded.load(bytes.as_slice()).unwrap();
    assert_eq!(loaded.export_json().unwrap(), engine.export_json().unwrap());

    for _ in 0..6 {
        let a = engine.advance_moon();
        let b = loaded.advance_moon();
        assert_eq!(a, b);
    }
    check_invariants(&mut loaded).unwrap();
}

#[test]
fn load_rejects_garbage() {
    let mut engine = ClanEngine::default();
    assert!(engine.load(&b"not a clan"[..]).is_err());
    assert!(engine.import_json("{\"version\": 1}").is_err());
}

// ── Properties ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn invariants_hold_for_any_seed(seed in any::<u64>()) {
        let mut engine = seeded(seed);
        for _ in 0..24 {
            engine.advance_moon();
            let checked = check_invariants(&mut engine);
            prop_assert!(checked.is_ok(), "{:?}", checked);
        }
    }

    #[test]
    fn populated_setups_generate(warriors in 2usize..12, apprentices in 0usize..4, elders in 0usize..3) {
        let setup = ClanSetup { warriors, apprentices, elders, ..Default::default() };
        let mut engine = ClanEngine::with_seed(ClanConfig::default(), 5).unwrap();
        let cats = engine.generate(setup).unwrap();
        prop_assert!(cats.len() >= warriors + apprentices + elders);
        prop_assert!(check_invariants(&mut engine).is_ok());
    }
}
