//! Social system - interactions that shift feelings, and the bonds that
//! form or fall apart as a result

use std::collections::BTreeMap;

use clangen_logic::personality::compatibility;
use clangen_logic::relation::{
    bond_breaks, random_interaction, wants_bestie, wants_enemy, wants_mate, Bond, InteractionKind, Stat,
    StatDelta,
};
use clangen_logic::weighted::pick;
use rand::Rng;

use crate::clan::Clan;
use crate::components::*;

/// Every living Clan cat starts a few interactions with Clanmates, then
/// bonds are re-evaluated for every pair.
pub fn relationships_system(clan: &mut Clan, rng: &mut impl Rng) {
    let cats = clan.living_in_clan();
    if cats.len() < 2 {
        return;
    }
    let personalities: BTreeMap<CatId, Personality> = cats
        .iter()
        .filter_map(|&id| clan.read::<Personality>(id).map(|p| (id, p)))
        .collect();

    for &id in &cats {
        for _ in 0..clan.config.interactions_per_moon {
            let Some(other) = pick_partner(clan, id, &cats, rng) else {
                break;
            };
            let (Some(mine), Some(theirs)) = (personalities.get(&id), personalities.get(&other)) else {
                continue;
            };
            let compat = compatibility(mine, theirs);
            let romance = clan.check_bond(id, other, Bond::Mates).is_ok();
            let interaction = random_interaction(compat, romance, rng);
            let delta = interaction.delta(compat);

            // The receiving cat feels it fully, the initiator at half strength.
            let _ = clan.relationships.apply(other, id, &delta);
            let _ = clan.relationships.apply(id, other, &delta.scaled(1, 2));
            log::trace!(
                "{} {} {}",
                clan.display_name(other),
                interaction.describe(),
                clan.display_name(id)
            );

            if interaction.kind == InteractionKind::Romantic && interaction.positive {
                stir_jealousy(clan, id, other);
            }
        }
    }

    update_bonds(clan, &cats);
}

/// Partners are weighted towards cats `id` already likes or knows well.
fn pick_partner(clan: &Clan, id: CatId, cats: &[CatId], rng: &mut impl Rng) -> Option<CatId> {
    let table: Vec<(CatId, u32)> = cats
        .iter()
        .filter(|&&other| other != id)
        .map(|&other| {
            let familiarity = clan.relationships.get(id, other).map_or(0, |s| {
                u32::from(s.platonic_like) + u32::from(s.romantic_love) + u32::from(s.comfortable) / 2
            });
            (other, 10 + familiarity)
        })
        .collect();
    pick(&table, rng)
}

/// `id`'s mates notice the moment `id` shared with someone else.
fn stir_jealousy(clan: &mut Clan, id: CatId, other: CatId) {
    for mate in clan.relationships.mates_of(id) {
        if mate == other {
            continue;
        }
        let _ = clan.relationships.apply(mate, other, &StatDelta::only(Stat::Jealousy, 5));
        let _ = clan.relationships.apply(mate, id, &StatDelta::only(Stat::Trust, -3));
    }
}

/// Break bonds whose feelings have faded, then form new ones. Both cats
/// must want a bond for it to form; either side can end it.
pub fn update_bonds(clan: &mut Clan, cats: &[CatId]) {
    let thresholds = clan.config.bonds;
    for (i, &a) in cats.iter().enumerate() {
        for &b in &cats[i + 1..] {
            let (Some(ab), Some(ba)) = (
                clan.relationships.get(a, b).copied(),
                clan.relationships.get(b, a).copied(),
            ) else {
                continue;
            };

            match clan.relationships.bond(a, b) {
                Some(bond) => {
                    if bond_breaks(bond, &ab, &thresholds) || bond_breaks(bond, &ba, &thresholds) {
                        clan.break_bond(a, b);
                    }
                }
                None => {
                    let unmated = clan.relationships.mates_of(a).is_empty() && clan.relationships.mates_of(b).is_empty();
                    let bond = if unmated && wants_mate(&ab, &thresholds) && wants_mate(&ba, &thresholds) {
                        Some(Bond::Mates)
                    } else if wants_enemy(&ab, &thresholds) && wants_enemy(&ba, &thresholds) {
                        Some(Bond::Enemies)
                    } else if wants_bestie(&ab, &thresholds) && wants_bestie(&ba, &thresholds) {
                        Some(Bond::Besties)
                    } else {
                        None
                    };
                    if let Some(bond) = bond {
                        if let Err(e) = clan.form_bond(a, b, bond) {
                            log::trace!("Bond refused: {e}");
                        }
                    }
                }
            }
        }
    }
}
