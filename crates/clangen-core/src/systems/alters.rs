//! Alters system - plural cats gain alters after trauma and switch fronts

use rand::Rng;

use crate::clan::Clan;
use crate::components::*;
use crate::events::EventKind;

pub fn alters_system(clan: &mut Clan, rng: &mut impl Rng) {
    let trauma = std::mem::take(&mut clan.moon_state.trauma);
    let config = clan.config.alters.clone();
    let moon = clan.moon;

    for id in clan.living() {
        let Ok(entity) = clan.entity(id) else {
            continue;
        };
        let grants = clan.read::<Conditions>(id).is_some_and(|c| c.grants_alters());
        let has_system = clan.world.get::<&AlterSystem>(entity).is_ok();
        if !grants {
            if has_system {
                let _ = clan.world.remove_one::<AlterSystem>(entity);
            }
            continue;
        }

        let host = clan.read::<Name>(id).map(|n| n.full()).unwrap_or_default();
        if !has_system {
            let _ = clan.world.insert_one(entity, AlterSystem::new_with_host(host.clone(), moon));
        }

        let split = clan
            .with_mut::<AlterSystem, _>(id, |sys| {
                sys.normalise(&host);
                sys.try_split(trauma.contains(&id), moon, &config, rng).cloned()
            })
            .flatten();
        let name = clan.display_name(id);
        if let Some(alter) = split {
            let text = format!("A new alter, {} ({}), has formed within {name}", alter.name, alter.role.label());
            log::info!("{text}");
            clan.event(EventKind::Alter, vec![id], text);
        }

        let switched = clan
            .with_mut::<AlterSystem, _>(id, |sys| {
                let front = sys.maybe_switch(&config, rng)?;
                sys.alters().iter().find(|a| a.id == front).map(|a| a.name.clone())
            })
            .flatten();
        if let Some(front) = switched {
            clan.event(EventKind::Alter, vec![id], format!("{front} is fronting for {name}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::CatBuilder;
    use crate::systems::give_condition;
    use clangen_logic::alters::AlterConfig;
    use clangen_logic::conditions::lookup;
    use clangen_logic::config::ClanConfig;
    use clangen_logic::status::Status;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_alters_follow_condition() {
        let mut rng = StdRng::seed_from_u64(111);
        let mut clan = Clan::new(ClanConfig {
            alters: AlterConfig {
                split_chance: 100,
                ..Default::default()
            },
            ..Default::default()
        });
        let cat = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        let plain = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        give_condition(&mut clan, cat, lookup("shattered soul").unwrap(), true, &mut rng);

        alters_system(&mut clan, &mut rng);

        let system = clan.read::<AlterSystem>(cat).unwrap();
        assert!(system.len() >= 2);
        assert_eq!(system.host().unwrap().name, clan.read::<Name>(cat).unwrap().full());
        assert!(clan.read::<AlterSystem>(plain).is_none());

        clan.with_mut::<Conditions, _>(cat, |c| c.remove("shattered soul"));
        alters_system(&mut clan, &mut rng);
        assert!(clan.read::<AlterSystem>(cat).is_none());
    }

    #[test]
    fn test_alter_count_is_capped() {
        let mut rng = StdRng::seed_from_u64(112);
        let mut clan = Clan::new(ClanConfig {
            alters: AlterConfig {
                split_chance: 100,
                max_alters: 3,
                ..Default::default()
            },
            ..Default::default()
        });
        let cat = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        give_condition(&mut clan, cat, lookup("shattered soul").unwrap(), true, &mut rng);
        for _ in 0..20 {
            alters_system(&mut clan, &mut rng);
        }
        assert_eq!(clan.read::<AlterSystem>(cat).unwrap().len(), 3);
    }
}
