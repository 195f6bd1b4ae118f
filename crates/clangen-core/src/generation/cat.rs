//! Single-cat generation

use clangen_logic::age::AgeGroup;
use clangen_logic::config::ClanConfig;
use clangen_logic::names::{random_loner_name, unique_name};
use clangen_logic::personality::compatibility;
use clangen_logic::relation::RelationshipStats;
use clangen_logic::status::{Status, TransitionDenied, APPRENTICE_MIN_MOONS, FULL_ROLE_MIN_MOONS};
use rand::Rng;

use crate::clan::Clan;
use crate::components::*;
use crate::error::ClanError;

/// Youngest age a cat may hold `status` at.
pub fn min_moons_for(status: Status) -> u32 {
    if status.is_kit() || status.is_outside() {
        0
    } else if status.is_apprentice() {
        APPRENTICE_MIN_MOONS
    } else {
        FULL_ROLE_MIN_MOONS
    }
}

/// Starting feelings between `id` and every living Clan cat it does not
/// know yet, in both directions.
pub fn introduce(clan: &mut Clan, id: CatId, rng: &mut impl Rng) {
    let Some(personality) = clan.read::<Personality>(id) else {
        return;
    };
    for other in clan.living_in_clan() {
        if other == id || clan.relationships.get(id, other).is_some() {
            continue;
        }
        let Some(theirs) = clan.read::<Personality>(other) else {
            continue;
        };
        let compat = compatibility(&personality, &theirs);
        let kin = clan.is_related(id, other);
        let mine = RelationshipStats::starting(compat, kin, rng);
        let back = RelationshipStats::starting(compat, kin, rng);
        clan.relationships.insert(id, other, mine);
        clan.relationships.insert(other, id, back);
    }
}

/// Status a Clan cat of this age starts with, using the Clan's ceremony ages.
pub fn default_status(moons: u32, config: &ClanConfig) -> Status {
    if moons == 0 {
        Status::Newborn
    } else if moons < config.apprentice_moons {
        Status::Kitten
    } else if moons < config.warrior_moons {
        Status::Apprentice
    } else if moons < config.elder_moons {
        Status::Warrior
    } else {
        Status::Elder
    }
}

/// Random age that suits `status`.
pub fn moons_for(status: Status, config: &ClanConfig, rng: &mut impl Rng) -> u32 {
    let grown = config.warrior_moons.max(FULL_ROLE_MIN_MOONS);
    let elder = config.elder_moons.max(grown + 1);
    match status {
        Status::Newborn => 0,
        Status::Kitten => rng.gen_range(1..=config.apprentice_moons.saturating_sub(1).max(1)),
        s if s.is_apprentice() => {
            let lo = config.apprentice_moons.max(APPRENTICE_MIN_MOONS);
            rng.gen_range(lo..grown.max(lo + 1))
        }
        Status::Leader | Status::Deputy => rng.gen_range((grown + 12).min(elder - 1)..elder),
        Status::Elder => rng.gen_range(elder..elder + 40),
        s if s.is_outside() => rng.gen_range(grown..elder),
        _ => rng.gen_range(grown..elder),
    }
}

/// Builder for one cat. Anything left unset is rolled.
///
/// ```rust,no_run
/// # use clangen_core::prelude::*;
/// # use clangen_core::generation::CatBuilder;
/// # use rand::SeedableRng;
/// # let mut engine = ClanEngine::new(ClanConfig::default()).unwrap();
/// # let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let id = CatBuilder::new()
///     .status(Status::Warrior)
///     .moons(30)
///     .build(&mut engine.clan, &mut rng)
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatBuilder {
    name: Option<Name>,
    gender: Option<Gender>,
    gender_align: Option<GenderAlign>,
    moons: Option<u32>,
    status: Option<Status>,
    parent1: Option<CatId>,
    parent2: Option<CatId>,
    pelt: Option<Pelt>,
    personality: Option<Personality>,
    skills: Option<CatSkills>,
}

impl CatBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: Name) -> Self {
        self.name = Some(name);
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn gender_align(mut self, align: GenderAlign) -> Self {
        self.gender_align = Some(align);
        self
    }

    pub fn moons(mut self, moons: u32) -> Self {
        self.moons = Some(moons);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn parents(mut self, parent1: CatId, parent2: Option<CatId>) -> Self {
        self.parent1 = Some(parent1);
        self.parent2 = parent2;
        self
    }

    pub fn pelt(mut self, pelt: Pelt) -> Self {
        self.pelt = Some(pelt);
        self
    }

    pub fn personality(mut self, personality: Personality) -> Self {
        self.personality = Some(personality);
        self
    }

    pub fn skills(mut self, skills: CatSkills) -> Self {
        self.skills = Some(skills);
        self
    }

    /// Spawn the cat into the Clan and give it starting feelings about
    /// every living Clanmate.
    pub fn build(self, clan: &mut Clan, rng: &mut impl Rng) -> Result<CatId, ClanError> {
        let parents: Vec<CatId> = self.parent1.iter().chain(self.parent2.iter()).copied().collect();
        for &p in &parents {
            if !clan.contains(p) && !clan.faded.contains(p) {
                return Err(ClanError::UnknownCat(p));
            }
        }

        let moons = match (self.moons, self.status) {
            (Some(m), _) => m,
            (None, Some(s)) => moons_for(s, &clan.config, rng),
            (None, None) => rng.gen_range(1..clan.config.elder_moons.max(2)),
        };
        let status = self.status.unwrap_or_else(|| default_status(moons, &clan.config));

        let required = min_moons_for(status);
        if moons < required {
            return Err(ClanError::TransitionDenied {
                id: CatId(clan.next_id),
                from: Status::default_for_moons(moons),
                to: status,
                reason: TransitionDenied::TooYoung { required },
            });
        }
        if matches!(status, Status::Leader | Status::Deputy) && clan.holder_of(status).is_some() {
            return Err(ClanError::RoleTaken(status));
        }

        let gender = self.gender.unwrap_or_else(|| Gender::random(rng));
        let gender_align = self.gender_align.unwrap_or_else(|| GenderAlign::random(gender, rng));

        let parent_pelts: Vec<Pelt> = parents.iter().filter_map(|&p| clan.read::<Pelt>(p)).collect();
        let pelt = match self.pelt {
            Some(pelt) => pelt,
            None if parent_pelts.is_empty() => Pelt::random(gender, rng),
            None => Pelt::inherit(&parent_pelts.iter().collect::<Vec<_>>(), gender, rng),
        };

        let parent_personalities: Vec<Personality> =
            parents.iter().filter_map(|&p| clan.read::<Personality>(p)).collect();
        let personality = match self.personality {
            Some(p) => p,
            None if parent_personalities.is_empty() => Personality::random(status.is_kit(), rng),
            None => Personality::inherit(&parent_personalities.iter().collect::<Vec<_>>(), status.is_kit(), rng),
        };

        let name = match self.name {
            Some(name) => name,
            None if status.is_outside() => random_loner_name(rng),
            None => {
                let taken: Vec<Name> = clan.world.query::<&Name>().iter().map(|(_, n)| n.clone()).collect();
                unique_name(Some(&pelt), &taken, rng)
            }
        };

        let skills = self
            .skills
            .unwrap_or_else(|| CatSkills::random_for(AgeGroup::from_moons(moons), &clan.config.skills, rng));
        let role = if status == Status::Leader {
            Role::leader(clan.config.leader_lives)
        } else {
            Role::new(status)
        };

        let id = clan.next_cat_id();
        let entity = clan.world.spawn((
            Cat,
            Identity {
                id,
                gender,
                gender_align,
            },
            name,
            Age::new(moons),
            role,
            pelt,
            personality,
            skills,
            Conditions::default(),
            Lineage::with_parents(self.parent1, self.parent2),
            Life::Alive,
            Thought::default(),
        ));
        clan.register(id, entity);
        clan.inheritance.register(id, &parents);

        if role.in_clan() {
            introduce(clan, id, rng);
        }

        log::debug!("Created {} {} ({} moons)", status.label(), clan.display_name(id), moons);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults_follow_age() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut clan = Clan::new(ClanConfig::default());
        let kit = CatBuilder::new().moons(3).build(&mut clan, &mut rng).unwrap();
        let app = CatBuilder::new().moons(8).build(&mut clan, &mut rng).unwrap();
        let elder = CatBuilder::new().moons(130).build(&mut clan, &mut rng).unwrap();
        assert_eq!(clan.status(kit), Some(Status::Kitten));
        assert_eq!(clan.status(app), Some(Status::Apprentice));
        assert_eq!(clan.status(elder), Some(Status::Elder));
        assert!(clan.name_of(kit).unwrap().ends_with("kit"));
        assert!(clan.name_of(app).unwrap().ends_with("paw"));
    }

    #[test]
    fn test_status_picks_fitting_age() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = ClanConfig::default();
        for _ in 0..50 {
            for status in Status::CLAN_ROLES {
                let moons = moons_for(status, &config, &mut rng);
                assert!(moons >= min_moons_for(status), "{status:?} at {moons}");
            }
        }
    }

    #[test]
    fn test_rejects_too_young_and_duplicate_leader() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut clan = Clan::new(ClanConfig::default());
        assert!(matches!(
            CatBuilder::new().status(Status::Warrior).moons(4).build(&mut clan, &mut rng),
            Err(ClanError::TransitionDenied { .. })
        ));
        CatBuilder::new().status(Status::Leader).build(&mut clan, &mut rng).unwrap();
        assert!(matches!(
            CatBuilder::new().status(Status::Leader).build(&mut clan, &mut rng),
            Err(ClanError::RoleTaken(Status::Leader))
        ));
        assert!(matches!(
            CatBuilder::new().parents(CatId(99), None).build(&mut clan, &mut rng),
            Err(ClanError::UnknownCat(CatId(99)))
        ));
    }

    #[test]
    fn test_new_cat_knows_clanmates_and_kin() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut clan = Clan::new(ClanConfig::default());
        let mum = CatBuilder::new().status(Status::Warrior).gender(Gender::Female).build(&mut clan, &mut rng).unwrap();
        let other = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        let kit = CatBuilder::new().moons(0).parents(mum, None).build(&mut clan, &mut rng).unwrap();

        assert!(clan.relationships.get(kit, mum).is_some());
        assert!(clan.relationships.get(mum, kit).is_some());
        assert!(clan.relationships.get(kit, other).is_some());
        assert!(clan.is_related(kit, mum));
        assert_eq!(clan.read::<Lineage>(kit).unwrap().parent1, Some(mum));
    }

    #[test]
    fn test_outsiders_stay_out_of_clan_feelings() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut clan = Clan::new(ClanConfig::default());
        let warrior = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        let loner = CatBuilder::new().status(Status::Loner).build(&mut clan, &mut rng).unwrap();
        assert!(clan.relationships.get(loner, warrior).is_none());
        assert!(clan.living_in_clan().iter().all(|&id| id != loner));
    }
}
