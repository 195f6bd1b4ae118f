//! Grief system - Clanmates close to a cat who died this moon may be
//! grief stricken

use clangen_logic::conditions::lookup;
use clangen_logic::health::ActiveCondition;
use clangen_logic::weighted::percent;
use rand::Rng;

use crate::clan::Clan;
use crate::components::*;
use crate::events::EventKind;

const GRIEF: &str = "grief stricken";

pub fn grief_system(clan: &mut Clan, rng: &mut impl Rng) {
    let died = std::mem::take(&mut clan.moon_state.died);
    let radius = clan.config.grief_radius;
    let chance = clan.config.grief_chance;

    for dead in died {
        if clan.is_alive(dead) {
            continue;
        }
        let dead_name = clan.display_name(dead);
        let kin = clan.inheritance.get(dead).all_kin();

        for id in clan.living_in_clan() {
            let close = kin.contains(&id)
                || clan
                    .relationships
                    .get(id, dead)
                    .is_some_and(|s| s.platonic_like >= radius || s.romantic_love >= radius);
            if !close || !percent(chance, rng) {
                continue;
            }
            mourn(clan, id, dead, &dead_name, rng);
        }
    }
}

fn mourn(clan: &mut Clan, id: CatId, dead: CatId, dead_name: &str, rng: &mut impl Rng) {
    clan.moon_state.grieving.insert(id, dead);
    clan.moon_state.trauma.insert(id);
    if let Some(def) = lookup(GRIEF) {
        let mut condition = ActiveCondition::new(def, rng);
        condition.event_triggered = true;
        clan.with_mut::<Conditions, _>(id, |c| c.add(condition));
    }
    let text = format!("{} is grief stricken by the loss of {dead_name}", clan.display_name(id));
    log::info!("{text}");
    clan.event(EventKind::Grief, vec![id, dead], text);
}
