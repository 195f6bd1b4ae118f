//! Aging system - moons pass, ceremonies happen, skills grow

use clangen_logic::age::AgeGroup;
use clangen_logic::skills::SkillPath;
use clangen_logic::status::Status;
use clangen_logic::weighted::one_in;
use hecs::World;
use rand::Rng;

use crate::clan::Clan;
use crate::components::*;
use crate::events::EventKind;

/// Count another moon for every dead cat.
pub fn afterlife_system(world: &mut World) {
    for (_, life) in world.query_mut::<&mut Life>() {
        if let Life::Dead { moons_dead, .. } = life {
            *moons_dead += 1;
        }
    }
}

/// Age every living cat by one moon and hold the ceremonies that age
/// brings: newborns open their eyes, kits become apprentices, apprentices
/// graduate and old warriors retire.
pub fn aging_system(clan: &mut Clan, rng: &mut impl Rng) {
    afterlife_system(&mut clan.world);

    for id in clan.living() {
        let Some(moons) = clan.with_mut::<Age, _>(id, |a| {
            a.moons += 1;
            a.moons
        }) else {
            continue;
        };
        let Some(status) = clan.status(id) else {
            continue;
        };
        let (apprentice_moons, warrior_moons, elder_moons) = (
            clan.config.apprentice_moons,
            clan.config.warrior_moons,
            clan.config.elder_moons,
        );

        match status {
            s if s.is_kit() && moons >= apprentice_moons => apprentice_ceremony(clan, id, rng),
            Status::Newborn => {
                clan.with_mut::<Role, _>(id, |r| r.status = Status::Kitten);
            }
            s if s.is_apprentice() && moons >= warrior_moons => graduation(clan, id, s),
            Status::Warrior | Status::Mediator if moons >= elder_moons => retirement(clan, id),
            _ => {}
        }

        let mentor_skills = clan
            .read::<Lineage>(id)
            .and_then(|l| l.mentor)
            .and_then(|m| clan.read::<CatSkills>(m));
        let skill_config = clan.config.skills.clone();
        let group = AgeGroup::from_moons(moons);
        let tiered = clan
            .with_mut::<CatSkills, _>(id, |s| s.progress(group, mentor_skills.as_ref(), &skill_config, rng))
            .flatten();
        if let Some((path, tier)) = tiered {
            log::debug!("{} reached tier {} in {}", clan.display_name(id), tier, path.noun());
        }
    }
}

fn apprentice_ceremony(clan: &mut Clan, id: CatId, rng: &mut impl Rng) {
    let healer = clan.read::<CatSkills>(id).is_some_and(|s| s.has_path(SkillPath::Healer));
    let medicine_cats = clan.living_with(Status::MedicineCat).len();
    let medicine_apps = clan.living_with(Status::MedicineCatApprentice).len();
    let mediators = clan.living_with(Status::Mediator).len();

    let new_status = if medicine_cats > 0 && medicine_apps == 0 && one_in(if healer { 2 } else { 6 }, rng) {
        Status::MedicineCatApprentice
    } else if mediators > 0 && one_in(12, rng) {
        Status::MediatorApprentice
    } else {
        Status::Apprentice
    };

    let old_name = clan.display_name(id);
    clan.with_mut::<Role, _>(id, |r| r.status = new_status);
    clan.with_mut::<Personality, _>(id, |p| p.grow_up(rng));
    let text = format!(
        "{old_name} has reached {} moons and begins training as a {}: {}",
        clan.moons(id).unwrap_or(0),
        new_status.label(),
        clan.display_name(id)
    );
    log::info!("{text}");
    clan.event(EventKind::Ceremony, vec![id], text);
}

fn graduation(clan: &mut Clan, id: CatId, status: Status) {
    let Some(new_status) = status.graduate() else {
        return;
    };
    let old_name = clan.display_name(id);
    let mentor = clan.end_mentorship(id);
    clan.with_mut::<Role, _>(id, |r| r.status = new_status);
    let new_name = clan.display_name(id);

    let text = match mentor {
        Some(m) => format!(
            "{old_name} has earned their name, {new_name}, as a full {}. {} is proud of them",
            new_status.label(),
            clan.display_name(m)
        ),
        None => format!("{old_name} has earned their name, {new_name}, as a full {}", new_status.label()),
    };
    log::info!("{text}");
    let mut cats = vec![id];
    cats.extend(mentor);
    clan.event(EventKind::Ceremony, cats, text);
}

fn retirement(clan: &mut Clan, id: CatId) {
    clan.release_apprentices(id);
    clan.with_mut::<Role, _>(id, |r| r.status = Status::Elder);
    let text = format!("{} has retired to the elders' den", clan.display_name(id));
    log::info!("{text}");
    clan.event(EventKind::Ceremony, vec![id], text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::CatBuilder;
    use clangen_logic::config::ClanConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_newborn_opens_eyes() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut clan = Clan::new(ClanConfig::default());
        let kit = CatBuilder::new().moons(0).build(&mut clan, &mut rng).unwrap();
        aging_system(&mut clan, &mut rng);
        assert_eq!(clan.moons(kit), Some(1));
        assert_eq!(clan.status(kit), Some(Status::Kitten));
    }

    #[test]
    fn test_kit_becomes_apprentice() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut clan = Clan::new(ClanConfig::default());
        let kit = CatBuilder::new().status(Status::Kitten).moons(5).build(&mut clan, &mut rng).unwrap();
        aging_system(&mut clan, &mut rng);
        assert!(clan.status(kit).unwrap().is_apprentice());
        assert!(!clan.read::<Personality>(kit).unwrap().is_kit());
        assert!(clan.name_of(kit).unwrap().ends_with("paw"));
        assert_eq!(clan.log.of_kind(EventKind::Ceremony).count(), 1);
    }

    #[test]
    fn test_apprentice_graduates_and_leaves_mentor() {
        let mut rng = StdRng::seed_from_u64(43);
        let mut clan = Clan::new(ClanConfig::default());
        let mentor = CatBuilder::new().status(Status::Warrior).moons(40).build(&mut clan, &mut rng).unwrap();
        let app = CatBuilder::new().status(Status::Apprentice).moons(11).build(&mut clan, &mut rng).unwrap();
        clan.set_mentor(app, mentor);

        aging_system(&mut clan, &mut rng);

        assert_eq!(clan.status(app), Some(Status::Warrior));
        let lineage = clan.read::<Lineage>(app).unwrap();
        assert_eq!(lineage.mentor, None);
        assert_eq!(lineage.former_mentors, vec![mentor]);
        assert_eq!(clan.read::<Lineage>(mentor).unwrap().former_apprentices, vec![app]);
    }

    #[test]
    fn test_warrior_retires_and_dead_count_moons() {
        let mut rng = StdRng::seed_from_u64(44);
        let mut clan = Clan::new(ClanConfig::default());
        let old = CatBuilder::new().status(Status::Warrior).moons(119).build(&mut clan, &mut rng).unwrap();
        let ghost = CatBuilder::new().status(Status::Warrior).moons(50).build(&mut clan, &mut rng).unwrap();
        clan.record_death(ghost, "a fall", &mut rng).unwrap();

        aging_system(&mut clan, &mut rng);

        assert_eq!(clan.status(old), Some(Status::Elder));
        assert_eq!(clan.moons(ghost), Some(50));
        assert_eq!(clan.read::<Life>(ghost).unwrap().moons_dead(), 1);
    }
}
