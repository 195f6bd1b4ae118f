//! Thoughts system - every cat, living or dead, gets a new thought each moon

use clangen_logic::thoughts::{fill_other, pick_thought, ThoughtContext};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::clan::Clan;
use crate::components::*;

pub fn thoughts_system(clan: &mut Clan, rng: &mut impl Rng) {
    let grieving = std::mem::take(&mut clan.moon_state.grieving);

    for id in clan.ids() {
        let (Some(role), Some(personality), Some(age), Some(life)) = (
            clan.read::<Role>(id),
            clan.read::<Personality>(id),
            clan.read::<Age>(id),
            clan.read::<Life>(id),
        ) else {
            continue;
        };
        let conditions = clan.read::<Conditions>(id).unwrap_or_default();
        let has_mentor = clan.read::<Lineage>(id).is_some_and(|l| l.mentor.is_some());

        let mourned = grieving.get(&id).copied();
        let other = mourned.or_else(|| {
            let known: Vec<CatId> = clan
                .relationships
                .known_by(id)
                .map(|(other, _)| other)
                .filter(|&other| clan.contains(other))
                .collect();
            known.choose(rng).copied()
        });

        let ctx = ThoughtContext {
            status: role.status,
            trait_kind: personality.trait_kind,
            age: age.group(),
            grieving: mourned.is_some(),
            ill: conditions.is_ill(),
            injured: conditions.is_injured(),
            afterlife: life.afterlife(),
            has_mentor,
            knows_other: other.is_some(),
        };
        let template = pick_thought(&ctx, rng);
        let text = match other {
            Some(other) => fill_other(&template, &clan.display_name(other)),
            None => template,
        };
        clan.with_mut::<Thought, _>(id, |t| *t = Thought::new(text));
    }
}
