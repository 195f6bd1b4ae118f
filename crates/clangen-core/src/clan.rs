//! Clan state shared by the engine, generation and every system
//!
//! [`Clan`] owns the ECS world plus everything that is not a per-cat
//! component: the id registry, the relationship graph, family trees, the
//! herb store, the event log and the faded archive. Cross-cutting
//! operations that several systems need (deaths, succession, mentorship,
//! bonds, fading) live here so each rule is written once.

use std::collections::{BTreeMap, BTreeSet};

use clangen_logic::config::ClanConfig;
use clangen_logic::health::HerbStore;
use clangen_logic::personality::Trait;
use clangen_logic::relation::Bond;
use clangen_logic::status::{Afterlife, Status, FULL_ROLE_MIN_MOONS};
use hecs::{Component, Entity, World};
use serde::{Deserialize, Serialize};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::*;
use crate::error::{BondDenial, ClanError};
use crate::events::{EventKind, MoonLog};
use crate::inheritance::InheritanceCache;
use crate::persistence::{FadedArchive, FadedCat};
use crate::relationships::RelationshipGraph;

/// Scratch state carried between systems within one moon, and from
/// operations between moons into the next one. Saved with the Clan so a
/// death dealt by [`kill`](crate::engine::ClanEngine::kill) is still
/// grieved after a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonState {
    /// Deaths not yet grieved
    pub died: Vec<CatId>,
    /// Cats that went through something awful, for alter splits
    pub trauma: BTreeSet<CatId>,
    /// Griever -> the cat they are mourning
    pub grieving: BTreeMap<CatId, CatId>,
    /// Mediators who already worked this moon
    pub mediated: BTreeSet<CatId>,
}

/// What happened when a cat was dealt a fatal blow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// A leader spent one of their lives.
    LostLife { lives_left: u8 },
    Died(Afterlife),
}

pub struct Clan {
    pub world: World,
    pub config: ClanConfig,
    pub moon: u32,
    pub relationships: RelationshipGraph,
    pub inheritance: InheritanceCache,
    pub herbs: HerbStore,
    pub log: MoonLog,
    pub faded: FadedArchive,
    pub(crate) registry: BTreeMap<CatId, Entity>,
    pub(crate) next_id: u32,
    pub(crate) moon_state: MoonState,
}

impl Clan {
    pub fn new(config: ClanConfig) -> Self {
        Self {
            world: World::new(),
            log: MoonLog::new(config.log_moons),
            config,
            moon: 0,
            relationships: RelationshipGraph::new(),
            inheritance: InheritanceCache::new(),
            herbs: HerbStore::default(),
            faded: FadedArchive::default(),
            registry: BTreeMap::new(),
            next_id: 1,
            moon_state: MoonState::default(),
        }
    }

    pub(crate) fn next_cat_id(&mut self) -> CatId {
        let id = CatId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn register(&mut self, id: CatId, entity: Entity) {
        self.registry.insert(id, entity);
        self.next_id = self.next_id.max(id.0 + 1);
    }

    pub fn entity(&self, id: CatId) -> Result<Entity, ClanError> {
        self.registry.get(&id).copied().ok_or(ClanError::UnknownCat(id))
    }

    pub fn contains(&self, id: CatId) -> bool {
        self.registry.contains_key(&id)
    }

    /// Copy of one component.
    pub fn read<T: Component + Clone>(&self, id: CatId) -> Option<T> {
        let entity = *self.registry.get(&id)?;
        self.world.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    /// Mutate one component in place.
    pub fn with_mut<T: Component, R>(&mut self, id: CatId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let entity = *self.registry.get(&id)?;
        let mut component = self.world.get::<&mut T>(entity).ok()?;
        Some(f(&mut *component))
    }

    /// Every cat in the world, living and dead, in id order.
    pub fn ids(&self) -> Vec<CatId> {
        self.registry.keys().copied().collect()
    }

    pub fn is_alive(&self, id: CatId) -> bool {
        self.read::<Life>(id).is_some_and(|l| l.is_alive())
    }

    pub fn living(&self) -> Vec<CatId> {
        self.ids().into_iter().filter(|&id| self.is_alive(id)).collect()
    }

    /// Living cats that belong to the Clan (not outsiders).
    pub fn living_in_clan(&self) -> Vec<CatId> {
        self.living()
            .into_iter()
            .filter(|&id| self.read::<Role>(id).is_some_and(|r| r.in_clan()))
            .collect()
    }

    pub fn dead(&self) -> Vec<CatId> {
        self.ids().into_iter().filter(|&id| !self.is_alive(id)).collect()
    }

    pub fn status(&self, id: CatId) -> Option<Status> {
        self.read::<Role>(id).map(|r| r.status)
    }

    pub fn moons(&self, id: CatId) -> Option<u32> {
        self.read::<Age>(id).map(|a| a.moons)
    }

    /// Name as currently shown. Faded cats answer from the archive.
    pub fn name_of(&self, id: CatId) -> Option<String> {
        match (self.read::<Name>(id), self.status(id)) {
            (Some(name), Some(status)) => Some(name.display(status)),
            _ => self.faded.get(id).map(|f| f.display_name.clone()),
        }
    }

    pub(crate) fn display_name(&self, id: CatId) -> String {
        self.name_of(id).unwrap_or_else(|| id.to_string())
    }

    pub(crate) fn event(&mut self, kind: EventKind, cats: Vec<CatId>, text: impl Into<String>) {
        self.log.push(self.moon, kind, cats, text);
    }

    /// The living cat holding a unique status.
    pub fn holder_of(&self, status: Status) -> Option<CatId> {
        self.living().into_iter().find(|&id| self.status(id) == Some(status))
    }

    pub fn living_with(&self, status: Status) -> Vec<CatId> {
        self.living()
            .into_iter()
            .filter(|&id| self.status(id) == Some(status))
            .collect()
    }

    pub fn is_related(&mut self, a: CatId, b: CatId) -> bool {
        self.inheritance.is_related(a, b)
    }

    // ── Mentorship ─────────────────────────────────────────────────────

    pub(crate) fn set_mentor(&mut self, apprentice: CatId, mentor: CatId) {
        self.end_mentorship(apprentice);
        self.with_mut::<Lineage, _>(apprentice, |l| l.mentor = Some(mentor));
        self.with_mut::<Lineage, _>(mentor, |l| {
            if !l.apprentices.contains(&apprentice) {
                l.apprentices.push(apprentice);
            }
        });
    }

    /// Drop an apprentice's current mentor on both sides.
    pub(crate) fn end_mentorship(&mut self, apprentice: CatId) -> Option<CatId> {
        let mentor = self.with_mut::<Lineage, _>(apprentice, |l| l.end_mentorship())??;
        self.with_mut::<Lineage, _>(mentor, |l| l.release_apprentice(apprentice));
        Some(mentor)
    }

    pub(crate) fn release_apprentices(&mut self, mentor: CatId) -> Vec<CatId> {
        let apprentices = self.read::<Lineage>(mentor).map(|l| l.apprentices).unwrap_or_default();
        for &app in &apprentices {
            self.end_mentorship(app);
        }
        apprentices
    }

    // ── Bonds ──────────────────────────────────────────────────────────

    /// Check whether two cats may take up `bond`.
    pub fn check_bond(&mut self, a: CatId, b: CatId, bond: Bond) -> Result<(), ClanError> {
        if a == b {
            return Err(ClanError::SelfRelation(a));
        }
        for id in [a, b] {
            self.entity(id)?;
            if !self.is_alive(id) {
                return Err(ClanError::DeadCat(id));
            }
        }
        let denied = |reason| ClanError::BondDenied { a, b, bond, reason };
        if [a, b].iter().any(|&id| self.read::<Role>(id).is_some_and(|r| !r.in_clan())) {
            return Err(denied(BondDenial::NotInClan));
        }
        if let Some(existing) = self.relationships.bond(a, b) {
            if existing != bond {
                return Err(denied(BondDenial::Conflicting(existing)));
            }
        }
        if bond == Bond::Mates {
            let min = self.config.mate_min_moons;
            if [a, b].iter().any(|&id| self.moons(id).unwrap_or(0) < min) {
                return Err(denied(BondDenial::TooYoung));
            }
            if !self.config.allow_related_mates && self.is_related(a, b) {
                return Err(denied(BondDenial::Related));
            }
            let la = self.read::<Lineage>(a).unwrap_or_default();
            let lb = self.read::<Lineage>(b).unwrap_or_default();
            if la.mentor == Some(b) || lb.mentor == Some(a) {
                return Err(denied(BondDenial::MentorPair));
            }
        }
        Ok(())
    }

    /// Validate and record a bond, logging the new standing.
    pub fn form_bond(&mut self, a: CatId, b: CatId, bond: Bond) -> Result<(), ClanError> {
        self.check_bond(a, b, bond)?;
        if self.relationships.bond(a, b) == Some(bond) {
            return Ok(());
        }
        self.relationships.set_bond(a, b, bond)?;
        let text = format!(
            "{} and {} are now {}",
            self.display_name(a),
            self.display_name(b),
            bond.label()
        );
        log::info!("{text}");
        self.event(EventKind::Bond, vec![a, b], text);
        Ok(())
    }

    pub fn break_bond(&mut self, a: CatId, b: CatId) -> Option<Bond> {
        let bond = self.relationships.clear_bond(a, b)?;
        let text = format!(
            "{} and {} are no longer {}",
            self.display_name(a),
            self.display_name(b),
            bond.label()
        );
        self.event(EventKind::Bond, vec![a, b], text);
        Some(bond)
    }

    // ── Death and succession ───────────────────────────────────────────

    /// Deal a fatal blow. Leaders with lives to spare lose one and wake up
    /// healed; everyone else dies.
    pub fn record_death(&mut self, id: CatId, cause: &str, rng: &mut impl Rng) -> Result<DeathOutcome, ClanError> {
        let entity = self.entity(id)?;
        if !self.is_alive(id) {
            return Err(ClanError::DeadCat(id));
        }
        let name = self.display_name(id);
        let role = self.read::<Role>(id).unwrap_or(Role::new(Status::Warrior));

        if role.status == Status::Leader && role.leader_lives > 1 {
            let lives_left = role.leader_lives - 1;
            self.with_mut::<Role, _>(id, |r| r.leader_lives = lives_left);
            self.with_mut::<Conditions, _>(id, |c| c.clear_temporary());
            self.moon_state.trauma.insert(id);
            let text = format!("{name} lost a life to {cause} and has {lives_left} left");
            log::info!("{text}");
            self.event(EventKind::Death, vec![id], text);
            return Ok(DeathOutcome::LostLife { lives_left });
        }

        let cruel = self
            .read::<Personality>(id)
            .is_some_and(|p| matches!(p.trait_kind, Trait::Bloodthirsty | Trait::Vengeful));
        let afterlife = Afterlife::choose(role.status, cruel, rng);
        self.with_mut::<Life, _>(id, |l| {
            *l = Life::Dead {
                moons_dead: 0,
                cause: cause.to_string(),
                afterlife,
            }
        });
        self.with_mut::<Role, _>(id, |r| r.leader_lives = 0);
        let _ = self.world.remove_one::<Pregnancy>(entity);

        self.end_mentorship(id);
        self.release_apprentices(id);
        self.relationships.clear_bonds_of(id);
        self.moon_state.died.push(id);

        let text = format!("{name} died of {cause} and now walks in {}", afterlife.label());
        log::info!("{text}");
        self.event(EventKind::Death, vec![id], text);
        Ok(DeathOutcome::Died(afterlife))
    }

    fn promote(&mut self, id: CatId, role: Role) {
        let old = self.display_name(id);
        self.with_mut::<Role, _>(id, |r| *r = role);
        let new = self.display_name(id);
        let text = if role.status == Status::Leader {
            format!("{old} has received nine lives from StarClan and is now {new}, leader of the Clan")
        } else {
            format!("{new} has been named the new {}", role.status.label())
        };
        log::info!("{text}");
        self.event(EventKind::Ceremony, vec![id], text);
    }

    /// Fill an empty leader or deputy seat. The deputy steps up to lead;
    /// failing that the oldest warrior. A new deputy is drawn from
    /// warriors, preferring those who have trained apprentices.
    pub fn ensure_leadership(&mut self, rng: &mut impl Rng) {
        if self.holder_of(Status::Leader).is_none() {
            let heir = self.holder_of(Status::Deputy).or_else(|| {
                self.living_with(Status::Warrior)
                    .into_iter()
                    .max_by_key(|&id| (self.moons(id).unwrap_or(0), std::cmp::Reverse(id)))
            });
            if let Some(heir) = heir {
                self.promote(heir, Role::leader(self.config.leader_lives));
            }
        }
        if self.holder_of(Status::Deputy).is_none() && self.holder_of(Status::Leader).is_some() {
            let warriors: Vec<CatId> = self
                .living_with(Status::Warrior)
                .into_iter()
                .filter(|&id| self.moons(id).unwrap_or(0) >= FULL_ROLE_MIN_MOONS)
                .collect();
            let experienced: Vec<CatId> = warriors
                .iter()
                .copied()
                .filter(|&id| {
                    self.read::<Lineage>(id)
                        .is_some_and(|l| !l.apprentices.is_empty() || !l.former_apprentices.is_empty())
                })
                .collect();
            let pool = if experienced.is_empty() { &warriors } else { &experienced };
            if let Some(&deputy) = pool.choose(rng) {
                self.promote(deputy, Role::new(Status::Deputy));
            }
        }
    }

    // ── Fading ─────────────────────────────────────────────────────────

    /// Move a dead cat into the faded archive and out of the world.
    pub fn fade(&mut self, id: CatId) -> Result<FadedCat, ClanError> {
        let entity = self.entity(id)?;
        let life = self.read::<Life>(id).unwrap_or_default();
        let Life::Dead { cause, afterlife, moons_dead } = life else {
            return Err(ClanError::NotDead(id));
        };
        let lineage = self.read::<Lineage>(id).unwrap_or_default();
        let identity = self.read::<Identity>(id);
        let faded = FadedCat {
            id,
            name: self.read::<Name>(id).unwrap_or_else(|| Name::single(id.to_string())),
            display_name: self.display_name(id),
            status: self.status(id).unwrap_or(Status::Warrior),
            gender: identity.map_or(Gender::Female, |i| i.gender),
            moons: self.moons(id).unwrap_or(0),
            parents: lineage.blood_parents(),
            adoptive_parents: lineage.adoptive_parents.clone(),
            cause,
            afterlife,
            moons_dead,
            faded_moon: self.moon,
        };

        self.relationships.remove_cat(id);
        let _ = self.world.despawn(entity);
        self.registry.remove(&id);
        self.inheritance.invalidate();
        self.faded.insert(faded.clone());

        let text = format!("{} has faded from memory", faded.display_name);
        log::info!("{text}");
        self.event(EventKind::Fade, vec![id], text);
        Ok(faded)
    }
}
