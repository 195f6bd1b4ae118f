//! Founding a new Clan

use clangen_logic::pelt::Gender;
use clangen_logic::relation::{Bond, Stat, StatDelta};
use clangen_logic::status::Status;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{generate_litter, CatBuilder};
use crate::clan::Clan;
use crate::components::*;
use crate::error::ClanError;
use crate::events::EventKind;
use crate::systems::assign_missing_mentors;

/// How many of each kind of cat a new Clan starts with. The leader and
/// deputy are always created on top of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClanSetup {
    pub warriors: usize,
    pub apprentices: usize,
    pub medicine_cats: usize,
    pub medicine_apprentices: usize,
    pub mediators: usize,
    pub elders: usize,
    /// Warrior couples who start as mates.
    pub mated_pairs: usize,
    /// Litters in the nursery, born to the first mated pairs.
    pub litters: usize,
    pub loners: usize,
}

impl Default for ClanSetup {
    fn default() -> Self {
        Self {
            warriors: 8,
            apprentices: 3,
            medicine_cats: 1,
            medicine_apprentices: 0,
            mediators: 1,
            elders: 2,
            mated_pairs: 2,
            litters: 1,
            loners: 0,
        }
    }
}

/// Populate an empty Clan. Returns every cat created.
pub fn generate_clan(clan: &mut Clan, setup: &ClanSetup, rng: &mut impl Rng) -> Result<Vec<CatId>, ClanError> {
    if !clan.registry.is_empty() || !clan.faded.is_empty() {
        return Err(ClanError::AlreadyGenerated);
    }

    let mut created = Vec::new();
    let leader = spawn_many(clan, Status::Leader, 1, rng)?;
    let deputy = spawn_many(clan, Status::Deputy, 1, rng)?;
    let warriors = spawn_many(clan, Status::Warrior, setup.warriors, rng)?;
    created.extend(&leader);
    created.extend(&deputy);
    created.extend(&warriors);
    created.extend(spawn_many(clan, Status::MedicineCat, setup.medicine_cats, rng)?);
    created.extend(spawn_many(clan, Status::MedicineCatApprentice, setup.medicine_apprentices, rng)?);
    created.extend(spawn_many(clan, Status::Mediator, setup.mediators, rng)?);
    created.extend(spawn_many(clan, Status::Apprentice, setup.apprentices, rng)?);
    created.extend(spawn_many(clan, Status::Elder, setup.elders, rng)?);
    created.extend(spawn_many(clan, Status::Loner, setup.loners, rng)?);

    let adults: Vec<CatId> = leader.iter().chain(&deputy).chain(&warriors).copied().collect();
    let pairs = pair_mates(clan, &adults, setup.mated_pairs, rng);

    for i in 0..setup.litters {
        let (mother, father) = match pairs.get(i) {
            Some(&(m, f)) => (m, Some(f)),
            None => match warriors.get(i) {
                Some(&w) => (w, None),
                None => break,
            },
        };
        let kits = generate_litter(clan, mother, father, rng)?;
        // Nursery kits are a few moons old at founding.
        let moons = rng.gen_range(1..clan.config.apprentice_moons.max(2));
        for &kit in &kits {
            clan.with_mut::<Age, _>(kit, |a| a.moons = moons);
            clan.with_mut::<Role, _>(kit, |r| r.status = Status::Kitten);
        }
        created.extend(kits);
    }

    assign_missing_mentors(clan, rng);

    if clan.holder_of(Status::MedicineCat).is_some() {
        for _ in 0..3 {
            clan.herbs.gather(1, rng);
        }
    }

    let text = format!(
        "{}Clan was founded with {} cats",
        clan.config.clan_name,
        clan.living_in_clan().len()
    );
    log::info!("{text}");
    clan.event(EventKind::Ceremony, leader, text);
    Ok(created)
}

fn spawn_many(clan: &mut Clan, status: Status, count: usize, rng: &mut impl Rng) -> Result<Vec<CatId>, ClanError> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(CatBuilder::new().status(status).build(clan, rng)?);
    }
    Ok(ids)
}

/// Pair off unrelated she-cats and toms as mates, with feelings to match.
fn pair_mates(clan: &mut Clan, adults: &[CatId], wanted: usize, rng: &mut impl Rng) -> Vec<(CatId, CatId)> {
    let gender_of = |clan: &Clan, id| clan.read::<Identity>(id).map(|i| i.gender);
    let she_cats: Vec<CatId> = adults.iter().copied().filter(|&id| gender_of(clan, id) == Some(Gender::Female)).collect();
    let mut toms: Vec<CatId> = adults.iter().copied().filter(|&id| gender_of(clan, id) == Some(Gender::Male)).collect();

    let mut pairs = Vec::new();
    for she in she_cats {
        if pairs.len() >= wanted {
            break;
        }
        let Some(pos) = toms.iter().position(|&tom| clan.check_bond(she, tom, Bond::Mates).is_ok()) else {
            continue;
        };
        let tom = toms.remove(pos);
        let mut love = StatDelta::only(Stat::RomanticLove, rng.gen_range(60..=80));
        love.set(Stat::Comfortable, rng.gen_range(40..=60));
        love.set(Stat::Trust, rng.gen_range(30..=50));
        let _ = clan.relationships.apply(she, tom, &love);
        let _ = clan.relationships.apply(tom, she, &love);
        if clan.form_bond(she, tom, Bond::Mates).is_ok() {
            pairs.push((she, tom));
        }
    }
    pairs
}
