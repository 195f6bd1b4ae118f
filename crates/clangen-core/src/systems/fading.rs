//! Fading system - long-dead cats leave the world for the faded archive

use crate::clan::Clan;
use crate::components::*;

pub fn fading_system(clan: &mut Clan) {
    let limit = clan.config.fade_after_moons;
    let due: Vec<CatId> = clan
        .dead()
        .into_iter()
        .filter(|&id| clan.read::<Life>(id).is_some_and(|l| l.moons_dead() >= limit))
        .collect();
    for id in due {
        if let Err(e) = clan.fade(id) {
            log::warn!("Could not fade {id}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::CatBuilder;
    use crate::systems::afterlife_system;
    use clangen_logic::config::ClanConfig;
    use clangen_logic::status::Status;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cats_fade_after_limit() {
        let mut rng = StdRng::seed_from_u64(121);
        let mut clan = Clan::new(ClanConfig {
            fade_after_moons: 3,
            ..Default::default()
        });
        let ghost = CatBuilder::new().status(Status::Elder).build(&mut clan, &mut rng).unwrap();
        let living = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        clan.record_death(ghost, "old age", &mut rng).unwrap();

        for _ in 0..2 {
            afterlife_system(&mut clan.world);
            fading_system(&mut clan);
        }
        assert!(clan.contains(ghost));

        afterlife_system(&mut clan.world);
        fading_system(&mut clan);
        assert!(!clan.contains(ghost));
        assert!(clan.faded.contains(ghost));
        assert!(clan.contains(living));
    }
}
