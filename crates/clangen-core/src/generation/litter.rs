//! Litters: kits born to Clan parents

use clangen_logic::health::{congenital_roll, ActiveCondition};
use clangen_logic::status::Status;
use rand::Rng;

use super::CatBuilder;
use crate::clan::Clan;
use crate::components::*;
use crate::error::ClanError;
use crate::events::EventKind;

/// Generate a litter for `parent1` (and `parent2`, if known).
///
/// Kits inherit pelt and personality from their parents and may be born
/// with a congenital condition.
pub fn generate_litter(
    clan: &mut Clan,
    parent1: CatId,
    parent2: Option<CatId>,
    rng: &mut impl Rng,
) -> Result<Vec<CatId>, ClanError> {
    clan.entity(parent1)?;
    if let Some(p) = parent2 {
        if !clan.contains(p) && !clan.faded.contains(p) {
            return Err(ClanError::UnknownCat(p));
        }
    }

    let lo = clan.config.litter_min.max(1);
    let hi = clan.config.litter_max.max(lo);
    let size = rng.gen_range(lo..=hi);

    let mut kits = Vec::with_capacity(size as usize);
    for _ in 0..size {
        let kit = CatBuilder::new()
            .status(Status::Newborn)
            .moons(0)
            .parents(parent1, parent2)
            .build(clan, rng)?;

        if let Some(def) = congenital_roll(clan.config.congenital_chance, rng) {
            let condition = ActiveCondition::congenital(def, rng);
            let showing = !condition.is_dormant();
            clan.with_mut::<Conditions, _>(kit, |c| c.add(condition));
            if showing {
                let text = format!("{} was born {}", clan.display_name(kit), born_with(def.name));
                clan.event(EventKind::Condition, vec![kit], text);
            }
        }
        kits.push(kit);
    }

    let names: Vec<String> = kits.iter().map(|&k| clan.display_name(k)).collect();
    let parent_names = match parent2 {
        Some(p) => format!("{} and {}", clan.display_name(parent1), clan.display_name(p)),
        None => clan.display_name(parent1),
    };
    let text = if kits.len() == 1 {
        format!("{parent_names} welcomed a single kit, {}", names.join(""))
    } else {
        format!("{parent_names} welcomed a litter of {} kits: {}", kits.len(), names.join(", "))
    };
    log::info!("{text}");
    let mut cats = vec![parent1];
    cats.extend(parent2);
    cats.extend(kits.iter().copied());
    clan.event(EventKind::Birth, cats, text);

    Ok(kits)
}

fn born_with(condition: &str) -> String {
    if condition.starts_with("born") {
        condition.trim_start_matches("born ").to_string()
    } else {
        format!("with {condition}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clangen_logic::config::ClanConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_litter_size_and_parents() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut clan = Clan::new(ClanConfig {
            litter_min: 2,
            litter_max: 4,
            ..Default::default()
        });
        let mum = CatBuilder::new().status(Status::Warrior).gender(Gender::Female).build(&mut clan, &mut rng).unwrap();
        let dad = CatBuilder::new().status(Status::Warrior).gender(Gender::Male).build(&mut clan, &mut rng).unwrap();

        let kits = generate_litter(&mut clan, mum, Some(dad), &mut rng).unwrap();
        assert!((2..=4).contains(&kits.len()));
        for &kit in &kits {
            assert_eq!(clan.status(kit), Some(Status::Newborn));
            assert_eq!(clan.read::<Lineage>(kit).unwrap().blood_parents(), vec![mum, dad]);
        }
        if kits.len() > 1 {
            assert_eq!(clan.inheritance.get(kits[0]).siblings.len(), kits.len() - 1);
        }
        assert_eq!(clan.log.of_kind(EventKind::Birth).count(), 1);
    }

    #[test]
    fn test_congenital_conditions() {
        let mut rng = StdRng::seed_from_u64(22);
        let mut clan = Clan::new(ClanConfig {
            congenital_chance: 1,
            litter_min: 3,
            litter_max: 3,
            ..Default::default()
        });
        let mum = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        let kits = generate_litter(&mut clan, mum, None, &mut rng).unwrap();
        for kit in kits {
            let conditions = clan.read::<Conditions>(kit).unwrap();
            assert_eq!(conditions.permanent.len(), 1);
            assert!(conditions.permanent[0].born_with);
        }
    }

    #[test]
    fn test_unknown_parent() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut clan = Clan::new(ClanConfig::default());
        assert!(matches!(
            generate_litter(&mut clan, CatId(7), None, &mut rng),
            Err(ClanError::UnknownCat(CatId(7)))
        ));
    }
}
