//! Births system - pregnancies and litters

use clangen_logic::relation::Bond;
use clangen_logic::weighted::percent;
use rand::Rng;

use crate::clan::Clan;
use crate::components::*;
use crate::events::EventKind;
use crate::generation::generate_litter;

pub fn births_system(clan: &mut Clan, rng: &mut impl Rng) {
    deliver_litters(clan, rng);
    new_pregnancies(clan, rng);
}

/// Count down pregnancies and deliver the ones that are due.
fn deliver_litters(clan: &mut Clan, rng: &mut impl Rng) {
    let mut expecting: Vec<(CatId, Pregnancy)> = clan
        .world
        .query::<(&Identity, &Pregnancy, &Life)>()
        .iter()
        .filter(|(_, (_, _, life))| life.is_alive())
        .map(|(_, (identity, pregnancy, _))| (identity.id, *pregnancy))
        .collect();
    expecting.sort_by_key(|&(id, _)| id);

    for (mother, pregnancy) in expecting {
        if pregnancy.moons_left > 1 {
            clan.with_mut::<Pregnancy, _>(mother, |p| p.moons_left -= 1);
            continue;
        }
        if let Ok(entity) = clan.entity(mother) {
            let _ = clan.world.remove_one::<Pregnancy>(entity);
        }
        let father = pregnancy.other_parent.filter(|&f| clan.contains(f) || clan.faded.contains(f));
        if let Err(e) = generate_litter(clan, mother, father, rng) {
            log::warn!("Litter for {} failed: {e}", clan.display_name(mother));
        }
    }
}

/// Mated she-cat/tom pairs may start expecting kits.
fn new_pregnancies(clan: &mut Clan, rng: &mut impl Rng) {
    let min_moons = clan.config.mate_min_moons;
    let max_moons = clan.config.elder_moons;
    let chance = clan.config.pregnancy_chance;

    for (a, b, bond) in clan.relationships.bonds() {
        if bond != Bond::Mates || !clan.is_alive(a) || !clan.is_alive(b) {
            continue;
        }
        let (Some(ia), Some(ib)) = (clan.read::<Identity>(a), clan.read::<Identity>(b)) else {
            continue;
        };
        let (mother, father) = match (ia.gender, ib.gender) {
            (Gender::Female, Gender::Male) => (a, b),
            (Gender::Male, Gender::Female) => (b, a),
            _ => continue,
        };
        let in_clan = [mother, father]
            .iter()
            .all(|&id| clan.read::<Role>(id).is_some_and(|r| r.in_clan()));
        let mother_moons = clan.moons(mother).unwrap_or(0);
        if !in_clan
            || mother_moons < min_moons
            || mother_moons >= max_moons
            || clan.read::<Pregnancy>(mother).is_some()
            || !percent(chance, rng)
        {
            continue;
        }

        let Ok(entity) = clan.entity(mother) else {
            continue;
        };
        let _ = clan.world.insert_one(
            entity,
            Pregnancy {
                other_parent: Some(father),
                moons_left: clan.config.pregnancy_moons.max(1),
            },
        );
        let text = format!(
            "{} is expecting {}'s kits",
            clan.display_name(mother),
            clan.display_name(father)
        );
        log::info!("{text}");
        clan.event(EventKind::Birth, vec![mother, father], text);
    }
}
