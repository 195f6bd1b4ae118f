//! Deaths system - old age, then making sure the Clan is led

use clangen_logic::health::old_age_death_chance;
use clangen_logic::weighted::percent;
use rand::Rng;

use crate::clan::Clan;
use crate::components::Role;

pub fn deaths_system(clan: &mut Clan, rng: &mut impl Rng) {
    let start = clan.config.old_age_start;
    for id in clan.living() {
        let chance = old_age_death_chance(clan.moons(id).unwrap_or(0), start);
        if chance > 0 && percent(chance, rng) {
            // Old age takes every life a leader has left.
            clan.with_mut::<Role, _>(id, |r| r.leader_lives = 0);
            if let Err(e) = clan.record_death(id, "old age", rng) {
                log::warn!("Could not record death of {id}: {e}");
            }
        }
    }
    clan.ensure_leadership(rng);
}
