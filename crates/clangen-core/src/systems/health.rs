//! Health system - conditions progress, heal, kill, spread, and get treated

use clangen_logic::conditions::{ConditionDef, ConditionKind, Severity};
use clangen_logic::health::{
    death_roll, heals, infection_roll, lasting_consequence, random_illness, random_injury, risk_roll,
    ActiveCondition, InfectionModifiers,
};
use clangen_logic::pelt::Scar;
use clangen_logic::skills::SkillPath;
use clangen_logic::weighted::{one_in, pick_uniform};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::clan::Clan;
use crate::components::*;
use crate::events::EventKind;

const SCARS: [Scar; 9] = [
    Scar::NickedEar,
    Scar::TornEar,
    Scar::FaceScar,
    Scar::ChestScar,
    Scar::LegScar,
    Scar::BackScar,
    Scar::TailScar,
    Scar::BlindEye,
    Scar::BurnMark,
];

/// Clanmates a contagious cat is in close contact with each moon.
const CLOSE_CONTACTS: usize = 3;

pub fn health_system(clan: &mut Clan, rng: &mut impl Rng) {
    gather_herbs(clan, rng);
    for id in clan.living() {
        progress_conditions(clan, id, rng);
    }
    if has_healer(clan) {
        for id in clan.living_in_clan() {
            treat(clan, id);
        }
    }
    for id in clan.living() {
        roll_new_conditions(clan, id, rng);
    }
    spread_contagion(clan, rng);
}

fn has_healer(clan: &Clan) -> bool {
    clan.living_in_clan()
        .into_iter()
        .any(|id| clan.status(id).is_some_and(|s| s.is_medicine()))
}

/// Give a cat a condition. Returns false if they already have it.
pub fn give_condition(
    clan: &mut Clan,
    id: CatId,
    def: &ConditionDef,
    event_triggered: bool,
    rng: &mut impl Rng,
) -> bool {
    let mut condition = ActiveCondition::new(def, rng);
    condition.event_triggered = event_triggered;
    let added = clan.with_mut::<Conditions, _>(id, |c| c.add(condition)).unwrap_or(false);
    if !added {
        return false;
    }
    if def.severity == Severity::Severe || def.grants_alters {
        clan.moon_state.trauma.insert(id);
    }
    let text = match def.kind {
        ConditionKind::Injury => format!("{} was hurt: {}", clan.display_name(id), def.name),
        _ => format!("{} has {}", clan.display_name(id), def.name),
    };
    clan.event(EventKind::Condition, vec![id], text);
    true
}

fn gather_herbs(clan: &mut Clan, rng: &mut impl Rng) {
    if !clan.config.herb_gathering {
        return;
    }
    for id in clan.living_in_clan() {
        if !clan.status(id).is_some_and(|s| s.is_medicine()) {
            continue;
        }
        let tier = clan.read::<CatSkills>(id).map_or(0, |s| s.tier_in(SkillPath::Healer));
        let found = clan.herbs.gather(tier, rng);
        log::debug!("{} gathered {} herbs", clan.display_name(id), found.len());
    }
}

/// Tick every condition a cat has, then apply what came of it: deaths,
/// recoveries, complications, lasting consequences and onsets.
fn progress_conditions(clan: &mut Clan, id: CatId, rng: &mut impl Rng) {
    let Some(mut conditions) = clan.read::<Conditions>(id) else {
        return;
    };
    let Some(group) = clan.read::<Age>(id).map(|a| a.group()) else {
        return;
    };

    let mut fatal: Option<String> = None;
    let mut healed: Vec<(String, Severity, ConditionKind)> = Vec::new();
    let mut developed: Vec<&'static ConditionDef> = Vec::new();
    let mut onsets: Vec<String> = Vec::new();

    for cond in conditions.illnesses.iter_mut().chain(conditions.injuries.iter_mut()) {
        cond.tick();
        let Some(def) = cond.def() else {
            continue;
        };
        if fatal.is_none() && death_roll(def, group, cond.treated, rng) {
            fatal = Some(def.name.to_string());
            continue;
        }
        if heals(cond) {
            healed.push((cond.name.clone(), cond.severity, cond.kind));
            developed.extend(lasting_consequence(def, rng));
        } else {
            developed.extend(risk_roll(def, rng));
        }
    }
    for cond in conditions.permanent.iter_mut() {
        if cond.tick() {
            onsets.push(cond.name.clone());
            continue;
        }
        if cond.is_dormant() || fatal.is_some() {
            continue;
        }
        if let Some(def) = cond.def() {
            if death_roll(def, group, false, rng) {
                fatal = Some(def.name.to_string());
            }
        }
    }

    for (name, _, _) in &healed {
        conditions.remove(name);
    }
    clan.with_mut::<Conditions, _>(id, |c| *c = conditions);

    let name = clan.display_name(id);
    for (cond, severity, kind) in healed {
        clan.event(EventKind::Recovery, vec![id], format!("{name} has recovered from {cond}"));
        if kind == ConditionKind::Injury && severity != Severity::Minor && one_in(3, rng) {
            if let Some(scar) = pick_uniform(&SCARS, rng) {
                clan.with_mut::<Pelt, _>(id, |p| p.add_scar(scar));
                log::debug!("{name} was left with a {}", scar.label());
            }
        }
    }
    for cond in onsets {
        let text = format!("{name}'s {cond} has begun to show");
        clan.event(EventKind::Condition, vec![id], text);
    }
    for def in developed {
        give_condition(clan, id, def, false, rng);
    }

    if let Some(cause) = fatal {
        if let Err(e) = clan.record_death(id, &cause, rng) {
            log::warn!("Could not record death of {name}: {e}");
        }
    }
}

/// Spend herbs on untreated illnesses and injuries.
fn treat(clan: &mut Clan, id: CatId) {
    let Some(mut conditions) = clan.read::<Conditions>(id) else {
        return;
    };
    let mut treated = Vec::new();
    for cond in conditions.illnesses.iter_mut().chain(conditions.injuries.iter_mut()) {
        if cond.treated {
            continue;
        }
        let Some(def) = cond.def() else {
            continue;
        };
        if let Some(herb) = clan.herbs.treat(def) {
            cond.apply_treatment();
            treated.push((cond.name.clone(), herb));
        }
    }
    if treated.is_empty() {
        return;
    }
    clan.with_mut::<Conditions, _>(id, |c| *c = conditions);
    for (cond, herb) in treated {
        log::debug!("{}'s {} was treated with {}", clan.display_name(id), cond, herb.label());
    }
}

fn roll_new_conditions(clan: &mut Clan, id: CatId, rng: &mut impl Rng) {
    let (Some(status), Some(group)) = (clan.status(id), clan.read::<Age>(id).map(|a| a.group())) else {
        return;
    };
    if one_in(clan.config.illness_chance, rng) {
        if let Some(def) = random_illness(group, rng) {
            give_condition(clan, id, def, false, rng);
        }
    }
    if one_in(clan.config.injury_chance, rng) {
        if let Some(def) = random_injury(status, rng) {
            give_condition(clan, id, def, false, rng);
        }
    }
}

/// Contagious cats may pass their illness to a few close Clanmates.
fn spread_contagion(clan: &mut Clan, rng: &mut impl Rng) {
    let cats = clan.living_in_clan();
    let mut carriers: Vec<(CatId, &'static ConditionDef, bool)> = Vec::new();
    for &id in &cats {
        let Some(conditions) = clan.read::<Conditions>(id) else {
            continue;
        };
        for cond in &conditions.illnesses {
            if let Some(def) = cond.def().filter(|d| d.is_contagious()) {
                carriers.push((id, def, cond.treated));
            }
        }
    }

    let multiplier = clan.config.infection_multiplier;
    for (carrier, def, treated) in carriers {
        let others: Vec<CatId> = cats.iter().copied().filter(|&c| c != carrier).collect();
        let contacts: Vec<CatId> = others.choose_multiple(rng, CLOSE_CONTACTS).copied().collect();
        for other in contacts {
            if clan.read::<Conditions>(other).is_some_and(|c| c.has(def.name)) {
                continue;
            }
            let vulnerable = clan
                .read::<Age>(other)
                .is_some_and(|a| a.group().is_kit() || a.group().is_elderly());
            let modifiers = InfectionModifiers {
                multiplier,
                carrier_treated: treated,
                vulnerable,
            };
            if infection_roll(def.infectiousness, modifiers, rng) && give_condition(clan, other, def, false, rng) {
                log::debug!(
                    "{} caught {} from {}",
                    clan.display_name(other),
                    def.name,
                    clan.display_name(carrier)
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::CatBuilder;
    use clangen_logic::conditions::{lookup, Herb};
    use clangen_logic::config::ClanConfig;
    use clangen_logic::status::Status;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_config() -> ClanConfig {
        ClanConfig {
            illness_chance: 1_000_000,
            injury_chance: 1_000_000,
            herb_gathering: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_minor_condition_heals() {
        let mut rng = StdRng::seed_from_u64(81);
        let mut clan = Clan::new(quiet_config());
        let cat = CatBuilder::new().status(Status::Warrior).moons(30).build(&mut clan, &mut rng).unwrap();
        assert!(give_condition(&mut clan, cat, lookup("sprain").unwrap(), false, &mut rng));
        assert!(!give_condition(&mut clan, cat, lookup("sprain").unwrap(), false, &mut rng));

        for _ in 0..5 {
            health_system(&mut clan, &mut rng);
        }
        assert!(!clan.read::<Conditions>(cat).unwrap().has("sprain"));
        assert!(clan.is_alive(cat));
        assert_eq!(clan.log.of_kind(EventKind::Recovery).count(), 1);
    }

    #[test]
    fn test_herbs_treat_conditions() {
        let mut rng = StdRng::seed_from_u64(82);
        let mut clan = Clan::new(quiet_config());
        CatBuilder::new().status(Status::MedicineCat).build(&mut clan, &mut rng).unwrap();
        let patient = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        clan.herbs.add(Herb::Comfrey, 1);
        give_condition(&mut clan, patient, lookup("sprain").unwrap(), false, &mut rng);

        for id in clan.living_in_clan() {
            treat(&mut clan, id);
        }
        let conditions = clan.read::<Conditions>(patient).unwrap();
        assert!(conditions.injuries[0].treated);
        assert_eq!(clan.herbs.count(Herb::Comfrey), 0);
    }

    #[test]
    fn test_no_new_conditions_for_the_dead() {
        let mut rng = StdRng::seed_from_u64(83);
        let mut clan = Clan::new(ClanConfig {
            illness_chance: 1,
            injury_chance: 1,
            ..quiet_config()
        });
        let ghost = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        clan.record_death(ghost, "a fall", &mut rng).unwrap();
        health_system(&mut clan, &mut rng);
        let conditions = clan.read::<Conditions>(ghost).unwrap();
        assert!(conditions.illnesses.is_empty() && conditions.injuries.is_empty());
    }

    #[test]
    fn test_contagion_spreads_to_clanmates() {
        let mut rng = StdRng::seed_from_u64(84);
        let mut clan = Clan::new(ClanConfig {
            infection_multiplier: 1000,
            ..quiet_config()
        });
        let sick = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        let other = CatBuilder::new().status(Status::Warrior).build(&mut clan, &mut rng).unwrap();
        give_condition(&mut clan, sick, lookup("running nose").unwrap(), false, &mut rng);
        spread_contagion(&mut clan, &mut rng);
        assert!(clan.read::<Conditions>(other).unwrap().has("running nose"));
    }
}
