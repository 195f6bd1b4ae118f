//! Simulation engine - main entry point for running the simulation

use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clangen_logic::conditions::lookup;
use clangen_logic::config::{validate_config, ClanConfig};
use clangen_logic::names::clan_name_for;
use clangen_logic::pelt::{predict_offspring, Accessory, OffspringForecast};
use clangen_logic::relation::{mediation_effect, Bond, StatDelta};
use clangen_logic::skills::SkillPath;
use clangen_logic::status::{join_allowed, transition_allowed, Status};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clan::{Clan, DeathOutcome};
use crate::components::*;
use crate::error::{ClanError, SaveError};
use crate::events::{EventKind, MoonEvent};
use crate::generation::{generate_clan, introduce, CatBuilder, ClanSetup};
use crate::inheritance::Inheritance;
use crate::persistence::{self, FadedArchive, FadedCat};
use crate::systems::*;

pub use crate::persistence::CatRecord;

/// Litters rolled when forecasting kits' pelts.
const FORECAST_SAMPLES: u32 = 200;

/// What happened during one call to [`ClanEngine::advance_moon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoonReport {
    pub moon: u32,
    pub events: Vec<MoonEvent>,
    pub living: usize,
    pub dead: usize,
    pub births: usize,
    pub deaths: usize,
}

/// Outcome of a mediation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mediation {
    /// Change applied to both cats' feelings for each other
    pub delta: StatDelta,
    /// The pair stopped being enemies
    pub ended_feud: bool,
}

/// Mix the Clan seed with the moon number so each moon draws from its own
/// stream, whatever operations ran in between.
fn moon_seed(seed: u64, moon: u32) -> u64 {
    seed ^ u64::from(moon).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Main simulation engine
pub struct ClanEngine {
    /// Clan state: ECS world, relationships, family trees, log
    pub clan: Clan,
    seed: u64,
    rng: StdRng,
}

impl ClanEngine {
    /// Create an empty Clan. The seed comes from the config, or is drawn at
    /// random when unset.
    pub fn new(config: ClanConfig) -> Result<Self, ClanError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: ClanConfig, seed: u64) -> Result<Self, ClanError> {
        let errors = validate_config(&config);
        if !errors.is_empty() {
            let message = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
            log::warn!("Rejected config: {message}");
            return Err(ClanError::InvalidConfig(message));
        }
        Ok(Self::build(config, seed))
    }

    /// Read a JSON config file and create an engine from it.
    pub fn load_config(path: impl AsRef<Path>) -> Result<Self, ClanError> {
        let json = std::fs::read_to_string(path).map_err(SaveError::from)?;
        let config = ClanConfig::from_json(&json).map_err(SaveError::from)?;
        Self::new(config)
    }

    fn build(config: ClanConfig, seed: u64) -> Self {
        Self {
            clan: Clan::new(config),
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Populate the Clan. Only works on an empty Clan.
    pub fn generate(&mut self, setup: ClanSetup) -> Result<Vec<CatId>, ClanError> {
        let cats = generate_clan(&mut self.clan, &setup, &mut self.rng)?;
        log::info!("{}Clan founded with {} cats", self.clan.config.clan_name, cats.len());
        Ok(cats)
    }

    /// Advance the simulation by one moon
    pub fn advance_moon(&mut self) -> MoonReport {
        self.clan.moon += 1;
        let moon = self.clan.moon;
        self.rng = StdRng::seed_from_u64(moon_seed(self.seed, moon));
        self.clan.moon_state.mediated.clear();
        let first_new_id = self.clan.next_id;

        let clan = &mut self.clan;
        let rng = &mut self.rng;
        aging_system(clan, rng);
        mentors_system(clan, rng);
        relationships_system(clan, rng);
        births_system(clan, rng);
        health_system(clan, rng);
        deaths_system(clan, rng);
        grief_system(clan, rng);
        alters_system(clan, rng);
        fading_system(clan);
        thoughts_system(clan, rng);
        clan.log.prune(moon);

        let events: Vec<MoonEvent> = clan.log.for_moon(moon).cloned().collect();
        let died: BTreeSet<CatId> = events
            .iter()
            .filter(|e| e.kind == EventKind::Death)
            .filter_map(|e| e.cats.first().copied())
            .filter(|&id| !clan.is_alive(id))
            .collect();
        let report = MoonReport {
            moon,
            living: clan.living().len(),
            dead: clan.dead().len(),
            births: (clan.next_id - first_new_id) as usize,
            deaths: died.len(),
            events,
        };
        log::info!(
            "Moon {moon}: {} living, {} births, {} deaths",
            report.living,
            report.births,
            report.deaths
        );
        report
    }

    // ── Cats ───────────────────────────────────────────────────────────

    pub fn create_cat(&mut self, builder: CatBuilder) -> Result<CatId, ClanError> {
        builder.build(&mut self.clan, &mut self.rng)
    }

    /// Deal a fatal blow, then fill any seat the death left empty.
    pub fn kill(&mut self, id: CatId, cause: &str) -> Result<DeathOutcome, ClanError> {
        let outcome = self.clan.record_death(id, cause, &mut self.rng)?;
        self.clan.ensure_leadership(&mut self.rng);
        Ok(outcome)
    }

    pub fn fade(&mut self, id: CatId) -> Result<FadedCat, ClanError> {
        self.clan.fade(id)
    }

    fn living_cat(&self, id: CatId) -> Result<(), ClanError> {
        self.clan.entity(id)?;
        if !self.clan.is_alive(id) {
            return Err(ClanError::DeadCat(id));
        }
        Ok(())
    }

    /// Hold a ceremony moving a cat to a new status.
    pub fn change_status(&mut self, id: CatId, status: Status) -> Result<(), ClanError> {
        self.living_cat(id)?;
        let from = self.clan.status(id).ok_or(ClanError::UnknownCat(id))?;
        let moons = self.clan.moons(id).unwrap_or(0);
        transition_allowed(from, status, moons).map_err(|reason| ClanError::TransitionDenied {
            id,
            from,
            to: status,
            reason,
        })?;
        if matches!(status, Status::Leader | Status::Deputy) && self.clan.holder_of(status).is_some() {
            return Err(ClanError::RoleTaken(status));
        }

        let old_name = self.clan.display_name(id);
        let role = if status == Status::Leader {
            Role::leader(self.clan.config.leader_lives)
        } else {
            Role::new(status)
        };
        self.clan.with_mut::<Role, _>(id, |r| *r = role);
        self.settle_mentorships(id, from, status);
        if from.is_kit() {
            let rng = &mut self.rng;
            self.clan.with_mut::<Personality, _>(id, |p| p.grow_up(rng));
        }

        let text = format!("{old_name} is now {}, {}", self.clan.display_name(id), status.label());
        log::info!("{text}");
        self.clan.event(EventKind::Ceremony, vec![id], text);
        Ok(())
    }

    /// Send a cat out of the Clan.
    pub fn exile(&mut self, id: CatId) -> Result<(), ClanError> {
        self.living_cat(id)?;
        let from = self.clan.status(id).ok_or(ClanError::UnknownCat(id))?;
        if from.is_outside() {
            return Err(ClanError::TransitionDenied {
                id,
                from,
                to: Status::Exiled,
                reason: clangen_logic::status::TransitionDenied::OutsideStatus,
            });
        }
        let name = self.clan.display_name(id);
        self.clan.with_mut::<Role, _>(id, |r| *r = Role::new(Status::Exiled));
        self.clan.end_mentorship(id);
        let released = self.clan.release_apprentices(id);
        self.clan.relationships.clear_bonds_of(id);
        if !released.is_empty() {
            assign_missing_mentors(&mut self.clan, &mut self.rng);
        }
        self.clan.ensure_leadership(&mut self.rng);

        let text = format!("{name} has been exiled from the Clan");
        log::info!("{text}");
        self.clan.event(EventKind::Ceremony, vec![id], text);
        Ok(())
    }

    /// Welcome an outsider (loner, rogue, kittypet or exile) into the Clan.
    /// Single-word names gain a Clan suffix.
    pub fn join(&mut self, id: CatId, status: Status) -> Result<(), ClanError> {
        self.living_cat(id)?;
        let from = self.clan.status(id).ok_or(ClanError::UnknownCat(id))?;
        let moons = self.clan.moons(id).unwrap_or(0);
        join_allowed(from, status, moons).map_err(|reason| ClanError::TransitionDenied {
            id,
            from,
            to: status,
            reason,
        })?;

        let old_name = self.clan.display_name(id);
        let pelt = self.clan.read::<Pelt>(id);
        if let Some(name) = self.clan.read::<Name>(id) {
            let clan_name = clan_name_for(&name, pelt.as_ref(), &mut self.rng);
            self.clan.with_mut::<Name, _>(id, |n| *n = clan_name);
        }
        self.clan.with_mut::<Role, _>(id, |r| *r = Role::new(status));
        introduce(&mut self.clan, id, &mut self.rng);
        if status.needs_mentor() {
            assign_missing_mentors(&mut self.clan, &mut self.rng);
        }

        let text = format!(
            "{old_name} has joined the Clan as {}, {}",
            self.clan.display_name(id),
            status.label()
        );
        log::info!("{text}");
        self.clan.event(EventKind::Ceremony, vec![id], text);
        Ok(())
    }

    /// Give a cat an accessory to wear, or take it away.
    pub fn set_accessory(&mut self, id: CatId, accessory: Option<Accessory>) -> Result<(), ClanError> {
        self.clan
            .with_mut::<Pelt, _>(id, |p| p.set_accessory(accessory))
            .ok_or(ClanError::UnknownCat(id))?;
        log::debug!("{} now wears {accessory:?}", self.clan.display_name(id));
        Ok(())
    }

    /// Mentorships after `id` went from `from` to `to`.
    fn settle_mentorships(&mut self, id: CatId, from: Status, to: Status) {
        let mut reassign = to.needs_mentor();
        if from.is_apprentice() {
            self.clan.end_mentorship(id);
        }
        let apprentices = self.clan.read::<Lineage>(id).map(|l| l.apprentices).unwrap_or_default();
        for app in apprentices {
            let app_status = self.clan.status(app).unwrap_or(Status::Apprentice);
            if !can_mentor_now(&self.clan, id, app_status) {
                self.clan.end_mentorship(app);
                reassign = true;
            }
        }
        if reassign {
            assign_missing_mentors(&mut self.clan, &mut self.rng);
        }
    }

    pub fn assign_mentor(&mut self, apprentice: CatId, mentor: CatId) -> Result<(), ClanError> {
        if apprentice == mentor {
            return Err(ClanError::SelfRelation(apprentice));
        }
        self.living_cat(apprentice)?;
        self.clan.entity(mentor)?;
        let status = self.clan.status(apprentice).ok_or(ClanError::UnknownCat(apprentice))?;
        let in_clan = |id| self.clan.read::<Role>(id).is_some_and(|r| r.in_clan());
        if !status.needs_mentor() || !in_clan(mentor) || !can_mentor_now(&self.clan, mentor, status) {
            return Err(ClanError::InvalidMentor { apprentice, mentor });
        }

        self.clan.set_mentor(apprentice, mentor);
        let text = format!(
            "{} is now mentoring {}",
            self.clan.display_name(mentor),
            self.clan.display_name(apprentice)
        );
        log::info!("{text}");
        self.clan.event(EventKind::Mentor, vec![apprentice, mentor], text);
        Ok(())
    }

    /// Bring a cat into a family as an adoptive kit.
    pub fn adopt(&mut self, kit: CatId, parent: CatId) -> Result<(), ClanError> {
        if kit == parent {
            return Err(ClanError::SelfRelation(kit));
        }
        self.clan.entity(kit)?;
        self.living_cat(parent)?;
        let lineage = self.clan.read::<Lineage>(kit).unwrap_or_default();
        if lineage.all_parents().contains(&parent) {
            return Err(ClanError::AlreadyParent { kit, parent });
        }

        self.clan.with_mut::<Lineage, _>(kit, |l| l.adoptive_parents.push(parent));
        self.clan.inheritance.add_adoptive(kit, parent);
        let text = format!(
            "{} has adopted {}",
            self.clan.display_name(parent),
            self.clan.display_name(kit)
        );
        log::info!("{text}");
        self.clan.event(EventKind::Adoption, vec![kit, parent], text);
        Ok(())
    }

    /// Give a living cat a named condition. Returns false if they already
    /// have it.
    pub fn add_condition(&mut self, id: CatId, name: &str) -> Result<bool, ClanError> {
        self.living_cat(id)?;
        let def = lookup(name).ok_or_else(|| ClanError::UnknownCondition(name.to_string()))?;
        Ok(give_condition(&mut self.clan, id, def, true, &mut self.rng))
    }

    pub fn predict_offspring(&mut self, a: CatId, b: CatId) -> Result<OffspringForecast, ClanError> {
        let pa = self.clan.read::<Pelt>(a).ok_or(ClanError::UnknownCat(a))?;
        let pb = self.clan.read::<Pelt>(b).ok_or(ClanError::UnknownCat(b))?;
        Ok(predict_offspring(&pa, &pb, FORECAST_SAMPLES, &mut self.rng))
    }

    // ── Bonds ──────────────────────────────────────────────────────────

    pub fn set_mates(&mut self, a: CatId, b: CatId) -> Result<(), ClanError> {
        self.clan.form_bond(a, b, Bond::Mates)
    }

    pub fn set_besties(&mut self, a: CatId, b: CatId) -> Result<(), ClanError> {
        self.clan.form_bond(a, b, Bond::Besties)
    }

    pub fn set_enemies(&mut self, a: CatId, b: CatId) -> Result<(), ClanError> {
        self.clan.form_bond(a, b, Bond::Enemies)
    }

    pub fn clear_bond(&mut self, a: CatId, b: CatId) -> Option<Bond> {
        self.clan.break_bond(a, b)
    }

    /// A mediator talks two cats through their differences. Sabotage turns
    /// the session against them. Each mediator works once per moon.
    pub fn mediate(&mut self, mediator: CatId, a: CatId, b: CatId, sabotage: bool) -> Result<Mediation, ClanError> {
        if a == b {
            return Err(ClanError::SelfRelation(a));
        }
        if mediator == a || mediator == b {
            return Err(ClanError::SelfRelation(mediator));
        }
        for id in [mediator, a, b] {
            self.living_cat(id)?;
        }
        if !matches!(
            self.clan.status(mediator),
            Some(Status::Mediator | Status::MediatorApprentice)
        ) {
            return Err(ClanError::NotAMediator(mediator));
        }
        if self.clan.moon_state.mediated.contains(&mediator) {
            return Err(ClanError::AlreadyMediated(mediator));
        }

        let tier = self
            .clan
            .read::<CatSkills>(mediator)
            .map_or(0, |s| s.tier_in(SkillPath::Mediator));
        let delta = mediation_effect(tier, sabotage, &mut self.rng);
        self.clan.relationships.apply(a, b, &delta)?;
        self.clan.relationships.apply(b, a, &delta)?;
        self.clan.moon_state.mediated.insert(mediator);

        let breakup = self.clan.config.bonds.breakup;
        let calm = |from, to| self.clan.relationships.get(from, to).is_some_and(|s| s.dislike < breakup);
        let ended_feud =
            self.clan.relationships.bond(a, b) == Some(Bond::Enemies) && calm(a, b) && calm(b, a);
        if ended_feud {
            self.clan.break_bond(a, b);
        }

        let verb = if sabotage { "sabotaged" } else { "mediated" };
        let text = format!(
            "{} {verb} a dispute between {} and {}",
            self.clan.display_name(mediator),
            self.clan.display_name(a),
            self.clan.display_name(b)
        );
        log::info!("{text}");
        self.clan.event(EventKind::Mediation, vec![mediator, a, b], text);
        Ok(Mediation { delta, ended_feud })
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn cat(&self, id: CatId) -> Result<CatRecord, ClanError> {
        persistence::cat_record(&self.clan, id).ok_or(ClanError::UnknownCat(id))
    }

    pub fn living(&self) -> Vec<CatId> {
        self.clan.living()
    }

    pub fn dead(&self) -> Vec<CatId> {
        self.clan.dead()
    }

    /// Cats in the world, living and dead
    pub fn count(&self) -> usize {
        self.clan.ids().len()
    }

    pub fn name_of(&self, id: CatId) -> Option<String> {
        self.clan.name_of(id)
    }

    /// Family tree of a cat, faded cats included.
    pub fn inheritance(&mut self, id: CatId) -> Result<Inheritance, ClanError> {
        if !self.clan.contains(id) && !self.clan.faded.contains(id) {
            return Err(ClanError::UnknownCat(id));
        }
        Ok(self.clan.inheritance.get(id).clone())
    }

    pub fn is_related(&mut self, a: CatId, b: CatId) -> bool {
        self.clan.is_related(a, b)
    }

    pub fn moon(&self) -> u32 {
        self.clan.moon
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn log(&self) -> impl Iterator<Item = &MoonEvent> {
        self.clan.log.iter()
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Save simulation state to a writer
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_clan(writer, &self.clan, self.seed)
    }

    /// Load simulation state from a reader, replacing the current Clan
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let (clan, seed) = persistence::load_clan(reader)?;
        self.replace(clan, seed);
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, SaveError> {
        persistence::export_clan_json(&self.clan, self.seed)
    }

    pub fn import_json(&mut self, json: &str) -> Result<(), SaveError> {
        let (clan, seed) = persistence::import_clan_json(json)?;
        self.replace(clan, seed);
        Ok(())
    }

    fn replace(&mut self, clan: Clan, seed: u64) {
        self.rng = StdRng::seed_from_u64(moon_seed(seed, clan.moon));
        self.clan = clan;
        self.seed = seed;
        log::info!(
            "Loaded {}Clan at moon {} ({} cats)",
            self.clan.config.clan_name,
            self.clan.moon,
            self.clan.ids().len()
        );
    }

    /// Write the faded archive next to other Clan files. Returns its path.
    pub fn save_faded(&self, dir: impl AsRef<Path>) -> Result<PathBuf, SaveError> {
        let path = FadedArchive::path_in(dir.as_ref(), &self.clan.config.clan_name);
        self.clan.faded.save(&path)?;
        Ok(path)
    }

    /// Merge this Clan's faded archive from `dir`. Returns how many cats
    /// were new.
    pub fn load_faded(&mut self, dir: impl AsRef<Path>) -> Result<usize, SaveError> {
        let path = FadedArchive::path_in(dir.as_ref(), &self.clan.config.clan_name);
        let archive = FadedArchive::load(&path)?;
        Ok(persistence::merge_faded(&mut self.clan, archive))
    }
}

impl Default for ClanEngine {
    fn default() -> Self {
        Self::build(ClanConfig::default(), rand::random())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clangen_logic::relation::RelationshipStats;

    fn engine(seed: u64) -> ClanEngine {
        ClanEngine::with_seed(ClanConfig::default(), seed).unwrap()
    }

    fn cat(engine: &mut ClanEngine, status: Status, moons: u32) -> CatId {
        engine
            .create_cat(CatBuilder::new().status(status).moons(moons))
            .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClanConfig {
            clan_name: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(ClanEngine::new(config), Err(ClanError::InvalidConfig(_))));
    }

    #[test]
    fn test_seed_from_config() {
        let config = ClanConfig {
            seed: Some(77),
            ..Default::default()
        };
        assert_eq!(ClanEngine::new(config).unwrap().seed(), 77);
    }

    #[test]
    fn test_advance_moon_reports() {
        let mut engine = engine(1);
        engine.generate(ClanSetup::default()).unwrap();
        let before = engine.living().len();
        let report = engine.advance_moon();
        assert_eq!(report.moon, 1);
        assert_eq!(engine.moon(), 1);
        assert_eq!(report.living, engine.living().len());
        assert_eq!(report.living + report.deaths, before + report.births);
        assert!(report.events.iter().all(|e| e.moon == 1));
    }

    #[test]
    fn test_same_seed_same_story() {
        let run = |seed| {
            let mut engine = engine(seed);
            engine.generate(ClanSetup::default()).unwrap();
            (0..10).flat_map(|_| engine.advance_moon().events).map(|e| e.text).collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_change_status_checks() {
        let mut engine = engine(2);
        let leader = cat(&mut engine, Status::Leader, 40);
        let warrior = cat(&mut engine, Status::Warrior, 30);
        let kit = cat(&mut engine, Status::Kitten, 3);

        assert!(matches!(
            engine.change_status(warrior, Status::Leader),
            Err(ClanError::RoleTaken(Status::Leader))
        ));
        assert!(matches!(
            engine.change_status(kit, Status::Warrior),
            Err(ClanError::TransitionDenied { .. })
        ));
        engine.change_status(warrior, Status::Deputy).unwrap();
        assert_eq!(engine.cat(warrior).unwrap().status, Status::Deputy);

        engine.change_status(leader, Status::Elder).unwrap();
        let record = engine.cat(leader).unwrap();
        assert_eq!(record.status, Status::Elder);
        assert_eq!(record.leader_lives, 0);
    }

    #[test]
    fn test_new_leader_gets_lives() {
        let mut engine = engine(3);
        let warrior = cat(&mut engine, Status::Warrior, 30);
        engine.change_status(warrior, Status::Leader).unwrap();
        let record = engine.cat(warrior).unwrap();
        assert_eq!(record.leader_lives, engine.clan.config.leader_lives);
        assert!(record.display_name.ends_with("star"));
    }

    #[test]
    fn test_apprentice_ceremony_finds_mentor() {
        let mut engine = engine(4);
        let warrior = cat(&mut engine, Status::Warrior, 30);
        let kit = cat(&mut engine, Status::Kitten, 7);
        engine.change_status(kit, Status::Apprentice).unwrap();
        assert_eq!(engine.cat(kit).unwrap().lineage.mentor, Some(warrior));

        engine.change_status(kit, Status::Warrior).unwrap_err();
        let record = engine.cat(warrior).unwrap();
        assert_eq!(record.lineage.apprentices, vec![kit]);
    }

    #[test]
    fn test_assign_mentor_rules() {
        let mut engine = engine(5);
        let healer = cat(&mut engine, Status::MedicineCat, 40);
        let warrior = cat(&mut engine, Status::Warrior, 30);
        let app = cat(&mut engine, Status::Apprentice, 7);
        engine.clan.end_mentorship(app);

        assert!(matches!(
            engine.assign_mentor(app, healer),
            Err(ClanError::InvalidMentor { .. })
        ));
        assert!(matches!(engine.assign_mentor(app, app), Err(ClanError::SelfRelation(_))));
        engine.assign_mentor(app, warrior).unwrap();
        assert_eq!(engine.cat(app).unwrap().lineage.mentor, Some(warrior));
    }

    #[test]
    fn test_kill_leader_spends_life_then_succession() {
        let mut engine = ClanEngine::with_seed(
            ClanConfig {
                leader_lives: 2,
                ..Default::default()
            },
            6,
        )
        .unwrap();
        let leader = cat(&mut engine, Status::Warrior, 50);
        engine.change_status(leader, Status::Leader).unwrap();
        let deputy = cat(&mut engine, Status::Deputy, 30);

        assert_eq!(
            engine.kill(leader, "a badger").unwrap(),
            DeathOutcome::LostLife { lives_left: 1 }
        );
        assert!(matches!(engine.kill(leader, "a badger").unwrap(), DeathOutcome::Died(_)));
        assert_eq!(engine.cat(deputy).unwrap().status, Status::Leader);
        assert!(matches!(engine.kill(leader, "again"), Err(ClanError::DeadCat(_))));
    }

    #[test]
    fn test_bond_operations() {
        let mut engine = engine(7);
        let a = cat(&mut engine, Status::Warrior, 30);
        let b = cat(&mut engine, Status::Warrior, 30);
        let kit = cat(&mut engine, Status::Kitten, 2);

        engine.set_enemies(a, b).unwrap();
        assert!(matches!(engine.set_mates(a, b), Err(ClanError::BondDenied { .. })));
        assert_eq!(engine.clear_bond(a, b), Some(Bond::Enemies));
        if !engine.is_related(a, b) {
            engine.set_mates(a, b).unwrap();
            assert_eq!(engine.clan.relationships.mates_of(a), vec![b]);
        }
        assert!(matches!(engine.set_mates(a, kit), Err(ClanError::BondDenied { .. })));
        assert!(matches!(engine.set_besties(a, a), Err(ClanError::SelfRelation(_))));
    }

    #[test]
    fn test_mediation() {
        let mut engine = engine(8);
        let mediator = cat(&mut engine, Status::Mediator, 30);
        let warrior = cat(&mut engine, Status::Warrior, 30);
        let a = cat(&mut engine, Status::Warrior, 30);
        let b = cat(&mut engine, Status::Warrior, 30);
        let feud = RelationshipStats {
            dislike: 22,
            ..Default::default()
        };
        engine.clan.relationships.insert(a, b, feud);
        engine.clan.relationships.insert(b, a, feud);
        engine.clan.relationships.set_bond(a, b, Bond::Enemies).unwrap();

        assert!(matches!(
            engine.mediate(warrior, a, b, false),
            Err(ClanError::NotAMediator(_))
        ));
        let outcome = engine.mediate(mediator, a, b, false).unwrap();
        assert!(outcome.delta.dislike <= -5);
        assert!(outcome.ended_feud);
        assert_eq!(engine.clan.relationships.bond(a, b), None);
        assert!(matches!(
            engine.mediate(mediator, a, b, false),
            Err(ClanError::AlreadyMediated(_))
        ));

        engine.advance_moon();
        if engine.clan.is_alive(mediator) && engine.clan.is_alive(a) && engine.clan.is_alive(b) {
            let sabotage = engine.mediate(mediator, a, b, true).unwrap();
            assert!(sabotage.delta.dislike > 0);
        }
    }

    #[test]
    fn test_adopt() {
        let mut engine = engine(9);
        let parent = cat(&mut engine, Status::Warrior, 30);
        let kit = cat(&mut engine, Status::Kitten, 2);
        engine.adopt(kit, parent).unwrap();
        assert!(engine.is_related(kit, parent));
        assert!(engine.inheritance(kit).unwrap().parents.contains(&parent));
        assert!(matches!(
            engine.adopt(kit, parent),
            Err(ClanError::AlreadyParent { .. })
        ));
    }

    #[test]
    fn test_add_condition() {
        let mut engine = engine(10);
        let a = cat(&mut engine, Status::Warrior, 30);
        assert!(engine.add_condition(a, "sprain").unwrap());
        assert!(!engine.add_condition(a, "sprain").unwrap());
        assert!(matches!(
            engine.add_condition(a, "made up"),
            Err(ClanError::UnknownCondition(_))
        ));
        assert!(engine.cat(a).unwrap().conditions.has("sprain"));
    }

    #[test]
    fn test_predict_offspring() {
        let mut engine = engine(11);
        let a = cat(&mut engine, Status::Warrior, 30);
        let b = cat(&mut engine, Status::Warrior, 30);
        let forecast = engine.predict_offspring(a, b).unwrap();
        assert_eq!(forecast.samples, FORECAST_SAMPLES);
        assert!(engine.predict_offspring(a, CatId(999)).is_err());
    }

    #[test]
    fn test_exile() {
        let mut engine = engine(12);
        let leader = cat(&mut engine, Status::Leader, 40);
        let deputy = cat(&mut engine, Status::Deputy, 30);
        cat(&mut engine, Status::Warrior, 30);
        engine.exile(leader).unwrap();
        assert_eq!(engine.cat(leader).unwrap().status, Status::Exiled);
        assert_eq!(engine.cat(deputy).unwrap().status, Status::Leader);
        assert!(engine.exile(leader).is_err());
    }

    #[test]
    fn test_outsider_joins() {
        let mut engine = engine(18);
        let warrior = cat(&mut engine, Status::Warrior, 30);
        let smudge = engine
            .create_cat(
                CatBuilder::new()
                    .status(Status::Kittypet)
                    .moons(20)
                    .name(Name::single("Smudge")),
            )
            .unwrap();
        assert!(engine.clan.relationships.get(smudge, warrior).is_none());
        assert!(matches!(
            engine.join(smudge, Status::Deputy),
            Err(ClanError::TransitionDenied { .. })
        ));

        engine.join(smudge, Status::Warrior).unwrap();
        let record = engine.cat(smudge).unwrap();
        assert_eq!(record.status, Status::Warrior);
        assert_eq!(record.name.prefix, "Smudge");
        assert!(!record.name.suffix.is_empty());
        assert!(engine.clan.relationships.get(smudge, warrior).is_some());
        assert!(engine.clan.relationships.get(warrior, smudge).is_some());
        assert!(matches!(
            engine.join(warrior, Status::Warrior),
            Err(ClanError::TransitionDenied { .. })
        ));
    }

    #[test]
    fn test_exile_can_rejoin() {
        let mut engine = engine(19);
        let a = cat(&mut engine, Status::Warrior, 30);
        let b = cat(&mut engine, Status::Warrior, 30);
        let before = *engine.clan.relationships.get(b, a).unwrap();
        engine.exile(a).unwrap();
        engine.join(a, Status::Warrior).unwrap();
        assert_eq!(engine.cat(a).unwrap().status, Status::Warrior);
        assert_eq!(*engine.clan.relationships.get(b, a).unwrap(), before);
    }

    #[test]
    fn test_set_accessory() {
        let mut engine = engine(20);
        let a = cat(&mut engine, Status::Warrior, 30);
        engine.set_accessory(a, Some(Accessory::Holly)).unwrap();
        assert_eq!(engine.cat(a).unwrap().pelt.accessory, Some(Accessory::Holly));
        engine.set_accessory(a, None).unwrap();
        assert_eq!(engine.cat(a).unwrap().pelt.accessory, None);
        assert!(matches!(
            engine.set_accessory(CatId(999), None),
            Err(ClanError::UnknownCat(_))
        ));
    }

    #[test]
    fn test_save_load_continues_identically() {
        let mut engine = engine(13);
        engine.generate(ClanSetup::default()).unwrap();
        for _ in 0..3 {
            engine.advance_moon();
        }
        let mut bytes = Vec::new();
        engine.save(&mut bytes).unwrap();

        let mut copy = ClanEngine::default();
        copy.load(bytes.as_slice()).unwrap();
        assert_eq!(copy.seed(), engine.seed());
        assert_eq!(copy.moon(), 3);

        let a: Vec<String> = engine.advance_moon().events.into_iter().map(|e| e.text).collect();
        let b: Vec<String> = copy.advance_moon().events.into_iter().map(|e| e.text).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_save_after_kill_keeps_grief() {
        let config = ClanConfig {
            grief_chance: 100,
            ..Default::default()
        };
        let mut original = ClanEngine::with_seed(config, 17).unwrap();
        let friend = cat(&mut original, Status::Warrior, 30);
        let dead = cat(&mut original, Status::Warrior, 30);
        let close = RelationshipStats {
            platonic_like: 90,
            ..Default::default()
        };
        original.clan.relationships.insert(friend, dead, close);
        original.kill(dead, "a fox").unwrap();

        let mut bytes = Vec::new();
        original.save(&mut bytes).unwrap();
        let mut loaded = ClanEngine::default();
        loaded.load(bytes.as_slice()).unwrap();

        let a = original.advance_moon();
        let b = loaded.advance_moon();
        assert_eq!(a, b);
        if loaded.clan.is_alive(friend) {
            let grieved = b.events.iter().filter(|e| e.kind == EventKind::Grief).count();
            assert_eq!(grieved, 1);
        }
    }

    #[test]
    fn test_json_export_import() {
        let mut engine = engine(14);
        engine.generate(ClanSetup::default()).unwrap();
        engine.advance_moon();
        let json = engine.export_json().unwrap();
        let mut copy = ClanEngine::default();
        copy.import_json(&json).unwrap();
        assert_eq!(copy.count(), engine.count());
        for id in engine.living() {
            assert_eq!(copy.name_of(id), engine.name_of(id));
        }
    }

    #[test]
    fn test_faded_archive_roundtrip() {
        let dir = std::env::temp_dir().join(format!("clangen-engine-faded-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut original = engine(15);
        let elder = cat(&mut original, Status::Elder, 150);
        original.kill(elder, "old age").unwrap();
        original.fade(elder).unwrap();
        let path = original.save_faded(&dir).unwrap();
        assert!(path.exists());

        let mut fresh = engine(16);
        assert_eq!(fresh.load_faded(&dir).unwrap(), 1);
        assert_eq!(fresh.load_faded(&dir).unwrap(), 0);
        assert!(fresh.name_of(elder).is_some());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
