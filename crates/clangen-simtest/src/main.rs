//! Clangen Headless Simulation Harness
//!
//! Generates a Clan, runs it for many moons and checks the rules every
//! Clan must keep. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p clangen-simtest
//!   cargo run -p clangen-simtest -- --verbose --moons 240 --seed 7
//!   cargo run -p clangen-simtest -- --config clan.json
//!
//! Set `RUST_LOG=info` to see the Clan's story as it happens.

use std::collections::BTreeMap;

use clangen_core::clan::DeathOutcome;
use clangen_core::generation::{CatBuilder, ClanSetup};
use clangen_core::prelude::*;
use clangen_logic::config::validate_config;
use clangen_logic::relation::{Stat, STAT_MAX};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    moons: u32,
    seed: u64,
    config: Option<String>,
}

fn parse_args() -> Options {
    let mut options = Options {
        verbose: false,
        moons: 120,
        seed: 42,
        config: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => options.verbose = true,
            "--moons" => {
                if let Some(n) = args.next().and_then(|v| v.parse().ok()) {
                    options.moons = n;
                }
            }
            "--seed" => {
                if let Some(s) = args.next().and_then(|v| v.parse().ok()) {
                    options.seed = s;
                }
            }
            "--config" => options.config = args.next(),
            other => log::warn!("Ignoring unknown argument {other}"),
        }
    }
    options
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let options = parse_args();
    println!("=== Clangen Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    results.extend(validate_config_handling(&options));

    // 2. Clan generation
    results.extend(validate_generation(&options));

    // 3. Moon cycle
    results.extend(validate_moon_cycle(&options));

    // 4. Determinism
    results.extend(validate_determinism(&options));

    // 5. Persistence
    results.extend(validate_persistence(&options));

    // 6. Engine operations
    results.extend(validate_operations(&options));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, total, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn config_for(options: &Options) -> Result<ClanConfig, String> {
    let mut config = match &options.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
            ClanConfig::from_json(&json).map_err(|e| format!("{path}: {e}"))?
        }
        None => ClanConfig::default(),
    };
    if config.seed.is_none() {
        config.seed = Some(options.seed);
    }
    Ok(config)
}

fn new_clan(options: &Options) -> Result<ClanEngine, String> {
    let config = config_for(options)?;
    let mut engine = ClanEngine::new(config).map_err(|e| e.to_string())?;
    engine.generate(ClanSetup::default()).map_err(|e| e.to_string())?;
    Ok(engine)
}

/// The rules that must hold between moons. Returns what was broken.
fn broken_rules(engine: &ClanEngine) -> Vec<String> {
    let mut broken = Vec::new();
    let mut leaders = 0;
    let mut deputies = 0;

    for id in engine.clan.ids() {
        let Ok(cat) = engine.cat(id) else {
            broken.push(format!("{id} is registered but unreadable"));
            continue;
        };
        if !cat.is_alive() {
            if cat.lineage.mentor.is_some() || !cat.lineage.apprentices.is_empty() {
                broken.push(format!("dead {} is still in a mentorship", cat.display_name));
            }
            continue;
        }
        match cat.status {
            Status::Leader => leaders += 1,
            Status::Deputy => deputies += 1,
            _ => {}
        }
        if let Some(mentor) = cat.lineage.mentor {
            let valid = engine
                .cat(mentor)
                .is_ok_and(|m| m.is_alive() && m.status.can_mentor(cat.status));
            if !valid {
                broken.push(format!("{} has an invalid mentor", cat.display_name));
            }
        }
        if cat.alters.is_some() && !cat.conditions.grants_alters() {
            broken.push(format!("{} has alters without cause", cat.display_name));
        }
        let out_of_range = cat
            .relationships
            .iter()
            .any(|(_, s)| Stat::ALL.iter().any(|&stat| s.get(stat) > STAT_MAX));
        if out_of_range {
            broken.push(format!("{} has feelings out of range", cat.display_name));
        }
    }
    for (status, count) in [(Status::Leader, leaders), (Status::Deputy, deputies)] {
        if count > 1 {
            broken.push(format!("{count} living cats hold {}", status.label()));
        }
    }
    broken
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config_handling(options: &Options) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    match config_for(options) {
        Ok(config) => {
            let errors = validate_config(&config);
            results.push(TestResult {
                name: "config_valid".into(),
                passed: errors.is_empty(),
                detail: if errors.is_empty() {
                    format!("{}Clan, seed {:?}", config.clan_name, config.seed)
                } else {
                    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
                },
            });

            let roundtrip = config
                .to_json()
                .ok()
                .and_then(|json| ClanConfig::from_json(&json).ok());
            results.push(TestResult {
                name: "config_json_roundtrip".into(),
                passed: roundtrip.as_ref() == Some(&config),
                detail: "config survives JSON".into(),
            });
        }
        Err(e) => results.push(TestResult {
            name: "config_load".into(),
            passed: false,
            detail: e,
        }),
    }

    let bad = ClanConfig {
        leader_lives: 0,
        litter_min: 4,
        litter_max: 2,
        ..Default::default()
    };
    results.push(TestResult {
        name: "config_rejects_nonsense".into(),
        passed: matches!(ClanEngine::new(bad), Err(ClanError::InvalidConfig(_))),
        detail: "zero lives and backwards litter sizes are refused".into(),
    });

    results
}

// ── 2. Generation ───────────────────────────────────────────────────────

fn validate_generation(options: &Options) -> Vec<TestResult> {
    println!("--- Clan Generation ---");
    let mut results = Vec::new();

    let mut engine = match new_clan(options) {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult {
                name: "generation_runs".into(),
                passed: false,
                detail: e,
            });
            return results;
        }
    };

    let statuses: Vec<Status> = engine
        .living()
        .into_iter()
        .filter_map(|id| engine.cat(id).ok().map(|c| c.status))
        .collect();
    let setup = ClanSetup::default();
    results.push(TestResult {
        name: "generation_population".into(),
        passed: statuses.len() >= setup.warriors + setup.apprentices + setup.elders,
        detail: format!("{} cats generated", statuses.len()),
    });

    let led = statuses.contains(&Status::Leader) && statuses.contains(&Status::Deputy);
    results.push(TestResult {
        name: "generation_leadership".into(),
        passed: led,
        detail: "leader and deputy present".into(),
    });

    let unmentored = engine
        .living()
        .into_iter()
        .filter_map(|id| engine.cat(id).ok())
        .filter(|c| c.status.needs_mentor() && c.lineage.mentor.is_none())
        .count();
    results.push(TestResult {
        name: "generation_mentors".into(),
        passed: unmentored == 0,
        detail: format!("{unmentored} apprentices without a mentor"),
    });

    let broken = broken_rules(&engine);
    results.push(TestResult {
        name: "generation_rules".into(),
        passed: broken.is_empty(),
        detail: broken.first().cloned().unwrap_or_else(|| "all rules hold".into()),
    });

    results.push(TestResult {
        name: "generation_only_once".into(),
        passed: matches!(
            engine.generate(ClanSetup::default()),
            Err(ClanError::AlreadyGenerated)
        ),
        detail: "a second generate is refused".into(),
    });

    results
}

// ── 3. Moon Cycle ───────────────────────────────────────────────────────

fn validate_moon_cycle(options: &Options) -> Vec<TestResult> {
    println!("--- Moon Cycle ({} moons) ---", options.moons);
    let mut results = Vec::new();
    let Ok(mut engine) = new_clan(options) else {
        return results;
    };

    let mut births = 0;
    let mut deaths = 0;
    let mut peak = engine.living().len();
    let mut first_broken: Option<String> = None;
    let mut event_counts: BTreeMap<String, usize> = BTreeMap::new();

    for _ in 0..options.moons {
        let report = engine.advance_moon();
        births += report.births;
        deaths += report.deaths;
        peak = peak.max(report.living);
        for event in &report.events {
            *event_counts.entry(format!("{:?}", event.kind)).or_default() += 1;
            if options.verbose {
                println!("  [moon {}] {}", event.moon, event.text);
            }
        }
        if first_broken.is_none() {
            first_broken = broken_rules(&engine)
                .into_iter()
                .next()
                .map(|rule| format!("moon {}: {rule}", report.moon));
        }
    }

    results.push(TestResult {
        name: "cycle_rules_hold".into(),
        passed: first_broken.is_none(),
        detail: first_broken.unwrap_or_else(|| "all rules held every moon".into()),
    });
    results.push(TestResult {
        name: "cycle_moon_count".into(),
        passed: engine.moon() == options.moons,
        detail: format!("reached moon {}", engine.moon()),
    });
    results.push(TestResult {
        name: "cycle_life_goes_on".into(),
        passed: options.moons < 24 || births > 0,
        detail: format!(
            "{births} born, {deaths} died, peak {peak}, {} living now, {} faded",
            engine.living().len(),
            engine.clan.faded.len()
        ),
    });
    let summary = event_counts
        .iter()
        .map(|(k, n)| format!("{k}={n}"))
        .collect::<Vec<_>>()
        .join(" ");
    results.push(TestResult {
        name: "cycle_events".into(),
        passed: options.moons == 0 || !event_counts.is_empty(),
        detail: summary,
    });

    results
}

// ── 4. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(options: &Options) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let run = || -> Option<String> {
        let mut engine = new_clan(options).ok()?;
        for _ in 0..options.moons.min(36) {
            engine.advance_moon();
        }
        engine.export_json().ok()
    };
    let (a, b) = (run(), run());
    results.push(TestResult {
        name: "determinism_same_seed".into(),
        passed: a.is_some() && a == b,
        detail: format!("seed {} replays identically", options.seed),
    });

    results
}

// ── 5. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(options: &Options) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();
    let Ok(mut engine) = new_clan(options) else {
        return results;
    };
    for _ in 0..12 {
        engine.advance_moon();
    }

    let mut bytes = Vec::new();
    let saved = engine.save(&mut bytes);
    let mut loaded = ClanEngine::default();
    let restored = saved.is_ok() && loaded.load(bytes.as_slice()).is_ok();
    results.push(TestResult {
        name: "persist_binary_roundtrip".into(),
        passed: restored && loaded.export_json().ok() == engine.export_json().ok(),
        detail: format!("{} bytes", bytes.len()),
    });

    let mut same = restored;
    for _ in 0..6 {
        same &= engine.advance_moon() == loaded.advance_moon();
    }
    results.push(TestResult {
        name: "persist_continues_identically".into(),
        passed: same,
        detail: "loaded Clan lives the same next six moons".into(),
    });

    let json_ok = engine
        .export_json()
        .ok()
        .and_then(|json| {
            let mut copy = ClanEngine::default();
            copy.import_json(&json).ok().map(|_| copy.count())
        })
        == Some(engine.count());
    results.push(TestResult {
        name: "persist_json_roundtrip".into(),
        passed: json_ok,
        detail: format!("{} cats", engine.count()),
    });

    let dir = std::env::temp_dir().join(format!("clangen-simtest-{}", std::process::id()));
    let faded = engine
        .dead()
        .first()
        .copied()
        .map(|id| engine.fade(id).is_ok())
        .unwrap_or(true);
    let archived = std::fs::create_dir_all(&dir).is_ok()
        && engine.save_faded(&dir).is_ok()
        && ClanEngine::with_seed(engine.clan.config.clone(), options.seed)
            .is_ok_and(|mut fresh| fresh.load_faded(&dir).is_ok_and(|n| n == engine.clan.faded.len()));
    let _ = std::fs::remove_dir_all(&dir);
    results.push(TestResult {
        name: "persist_faded_archive".into(),
        passed: faded && archived,
        detail: format!("{} faded cats archived", engine.clan.faded.len()),
    });

    results
}

// ── 6. Engine Operations ────────────────────────────────────────────────

fn validate_operations(options: &Options) -> Vec<TestResult> {
    println!("--- Engine Operations ---");
    let mut results = Vec::new();
    let Ok(mut engine) = ClanEngine::with_seed(ClanConfig::default(), options.seed) else {
        return results;
    };
    let make = |engine: &mut ClanEngine, status: Status, moons: u32| {
        engine.create_cat(CatBuilder::new().status(status).moons(moons))
    };
    let (Ok(leader), Ok(deputy), Ok(mediator), Ok(a), Ok(b), Ok(kit)) = (
        make(&mut engine, Status::Leader, 60),
        make(&mut engine, Status::Deputy, 40),
        make(&mut engine, Status::Mediator, 30),
        make(&mut engine, Status::Warrior, 30),
        make(&mut engine, Status::Warrior, 30),
        make(&mut engine, Status::Kitten, 3),
    ) else {
        results.push(TestResult {
            name: "ops_create_cats".into(),
            passed: false,
            detail: "cat creation failed".into(),
        });
        return results;
    };

    results.push(TestResult {
        name: "ops_unique_leader".into(),
        passed: matches!(engine.change_status(a, Status::Leader), Err(ClanError::RoleTaken(_))),
        detail: "a second leader is refused".into(),
    });
    results.push(TestResult {
        name: "ops_kits_grow_by_aging".into(),
        passed: matches!(
            engine.change_status(kit, Status::Warrior),
            Err(ClanError::TransitionDenied { .. })
        ),
        detail: "a kit cannot be made a warrior".into(),
    });

    let lives = engine.clan.config.leader_lives;
    let life_lost = matches!(engine.kill(leader, "a fall"), Ok(DeathOutcome::LostLife { .. }));
    results.push(TestResult {
        name: "ops_leader_lives".into(),
        passed: lives <= 1 || life_lost,
        detail: format!("leader starts with {lives} lives"),
    });

    let feud = engine.set_enemies(a, b).is_ok();
    let no_mates = matches!(engine.set_mates(a, b), Err(ClanError::BondDenied { .. }));
    results.push(TestResult {
        name: "ops_enemies_not_mates".into(),
        passed: feud && no_mates,
        detail: "enemies must make peace before becoming mates".into(),
    });

    let first = engine.mediate(mediator, a, b, false);
    let second = engine.mediate(mediator, a, b, false);
    results.push(TestResult {
        name: "ops_mediation_once_per_moon".into(),
        passed: first.is_ok() && matches!(second, Err(ClanError::AlreadyMediated(_))),
        detail: first
            .map(|m| format!("dislike {:+}, feud ended: {}", m.delta.dislike, m.ended_feud))
            .unwrap_or_else(|e| e.to_string()),
    });

    let adopted = engine.adopt(kit, deputy).is_ok() && engine.is_related(kit, deputy);
    results.push(TestResult {
        name: "ops_adoption".into(),
        passed: adopted,
        detail: "adoptive parents count as family".into(),
    });

    results.push(TestResult {
        name: "ops_unknown_condition".into(),
        passed: matches!(
            engine.add_condition(a, "moonsickness"),
            Err(ClanError::UnknownCondition(_))
        ),
        detail: "made-up conditions are refused".into(),
    });

    results
}
