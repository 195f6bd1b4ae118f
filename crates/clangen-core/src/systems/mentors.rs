//! Mentor system - keep every apprentice paired with a valid mentor

use clangen_logic::status::{Status, FULL_ROLE_MIN_MOONS};
use clangen_logic::weighted::percent;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::clan::Clan;
use crate::components::*;
use crate::events::EventKind;

pub fn mentors_system(clan: &mut Clan, rng: &mut impl Rng) {
    drop_invalid_mentors(clan);
    assign_missing_mentors(clan, rng);
    mentor_influence(clan, rng);
}

/// Whether `mentor` can train an apprentice of `apprentice_status` right now.
pub fn can_mentor_now(clan: &Clan, mentor: CatId, apprentice_status: Status) -> bool {
    clan.is_alive(mentor)
        && clan.moons(mentor).unwrap_or(0) >= FULL_ROLE_MIN_MOONS
        && clan.status(mentor).is_some_and(|s| s.can_mentor(apprentice_status))
}

/// End mentorships that no longer make sense: the apprentice graduated or
/// left, or the mentor died or changed role.
pub fn drop_invalid_mentors(clan: &mut Clan) {
    for id in clan.living() {
        let Some(status) = clan.status(id) else {
            continue;
        };
        let Some(mentor) = clan.read::<Lineage>(id).and_then(|l| l.mentor) else {
            continue;
        };
        if status.needs_mentor() && can_mentor_now(clan, mentor, status) {
            continue;
        }
        clan.end_mentorship(id);
        if status.needs_mentor() {
            let text = format!(
                "{} is no longer training under {}",
                clan.display_name(id),
                clan.display_name(mentor)
            );
            clan.event(EventKind::Mentor, vec![id, mentor], text);
        }
    }
}

/// Give every apprentice without a mentor the eligible Clanmate with the
/// fewest apprentices. Ties are broken at random. Returns the new pairs.
pub fn assign_missing_mentors(clan: &mut Clan, rng: &mut impl Rng) -> Vec<(CatId, CatId)> {
    let mut assigned = Vec::new();
    for app in clan.living_in_clan() {
        let Some(status) = clan.status(app) else {
            continue;
        };
        if !status.needs_mentor() || clan.read::<Lineage>(app).is_some_and(|l| l.mentor.is_some()) {
            continue;
        }

        let mut candidates: Vec<CatId> = clan
            .living_in_clan()
            .into_iter()
            .filter(|&c| c != app && can_mentor_now(clan, c, status))
            .collect();
        candidates.shuffle(rng);
        let Some(mentor) = candidates
            .into_iter()
            .min_by_key(|&c| clan.read::<Lineage>(c).map_or(0, |l| l.apprentices.len()))
        else {
            log::debug!("No mentor available for {}", clan.display_name(app));
            continue;
        };

        clan.set_mentor(app, mentor);
        let text = format!("{} is now mentoring {}", clan.display_name(mentor), clan.display_name(app));
        log::info!("{text}");
        clan.event(EventKind::Mentor, vec![app, mentor], text);
        assigned.push((app, mentor));
    }
    assigned
}

/// Mentors rub off on their apprentices' personality and skills.
fn mentor_influence(clan: &mut Clan, rng: &mut impl Rng) {
    let chance = clan.config.mentor_influence_chance;
    for app in clan.living() {
        let Some(mentor) = clan.read::<Lineage>(app).and_then(|l| l.mentor) else {
            continue;
        };
        if !percent(chance, rng) {
            continue;
        }
        if let Some(theirs) = clan.read::<Personality>(mentor) {
            if let Some(Some(facet)) = clan.with_mut::<Personality, _>(app, |p| p.mentor_influence(&theirs, rng)) {
                log::debug!("{} picked up {:?} from their mentor", clan.display_name(app), facet);
            }
        }
        if let Some(theirs) = clan.read::<CatSkills>(mentor) {
            if let Some(Some(path)) = clan.with_mut::<CatSkills, _>(app, |s| s.mentor_influence(&theirs, rng)) {
                log::debug!("{} learned {} from their mentor", clan.display_name(app), path.noun());
            }
        }
    }
}
