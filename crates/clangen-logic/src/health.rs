//! Pure health logic: live conditions, death rolls, contagion and herbs.
//!
//! Conditions on a cat are [`ActiveCondition`] values that point back at a
//! static [`ConditionDef`] by name. Everything that happens to them in a
//! moon (healing, worsening, killing, spreading, treatment) is a pure
//! function over those two plus an RNG.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::age::AgeGroup;
use crate::conditions::{self, ConditionDef, ConditionKind, Herb, Severity};
use crate::status::Status;
use crate::weighted::{choose_weighted, one_in, percent};

/// A condition a cat currently carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCondition {
    pub name: String,
    pub kind: ConditionKind,
    pub severity: Severity,
    pub moons_with: u32,
    /// Total moons before it heals. Zero for permanent conditions.
    pub duration: u32,
    /// Congenital conditions stay dormant until this reaches zero.
    pub moons_until_onset: u32,
    pub treated: bool,
    /// Set when the condition came from a story event rather than a roll.
    pub event_triggered: bool,
    pub born_with: bool,
}

impl ActiveCondition {
    /// Fresh condition with a rolled duration.
    pub fn new(def: &ConditionDef, rng: &mut impl Rng) -> Self {
        let (lo, hi) = def.duration;
        Self {
            name: def.name.to_string(),
            kind: def.kind,
            severity: def.severity,
            moons_with: 0,
            duration: if hi == 0 { 0 } else { rng.gen_range(lo..=hi) },
            moons_until_onset: 0,
            treated: false,
            event_triggered: false,
            born_with: false,
        }
    }

    /// A condition present from birth, possibly dormant for a while.
    pub fn congenital(def: &ConditionDef, rng: &mut impl Rng) -> Self {
        let (lo, hi) = def.onset;
        Self {
            moons_until_onset: rng.gen_range(lo..=hi),
            born_with: true,
            ..Self::new(def, rng)
        }
    }

    pub fn def(&self) -> Option<&'static ConditionDef> {
        conditions::lookup(&self.name)
    }

    pub fn is_dormant(&self) -> bool {
        self.moons_until_onset > 0
    }

    /// Advance one moon. Returns true when a dormant condition sets in.
    pub fn tick(&mut self) -> bool {
        if self.moons_until_onset > 0 {
            self.moons_until_onset -= 1;
            return self.moons_until_onset == 0;
        }
        self.moons_with += 1;
        false
    }

    pub fn moons_left(&self) -> u32 {
        self.duration.saturating_sub(self.moons_with)
    }

    /// Herbs halve the remaining time.
    pub fn apply_treatment(&mut self) {
        if self.treated || self.kind == ConditionKind::Permanent {
            return;
        }
        self.treated = true;
        let left = self.moons_left();
        self.duration = self.moons_with + left.div_ceil(2);
    }
}

/// Whether a non-permanent condition has run its course.
pub fn heals(cond: &ActiveCondition) -> bool {
    cond.kind != ConditionKind::Permanent && cond.moons_with >= cond.duration
}

/// Roll for death from a condition this moon. Treatment halves the chance.
pub fn death_roll(def: &ConditionDef, group: AgeGroup, treated: bool, rng: &mut impl Rng) -> bool {
    let n = def.mortality_for(group);
    if n == 0 {
        return false;
    }
    let n = if treated { n.saturating_mul(2) } else { n };
    one_in(n, rng)
}

/// Roll whether an active condition turns into one of its risks.
pub fn risk_roll(def: &ConditionDef, rng: &mut impl Rng) -> Option<&'static ConditionDef> {
    def.risks
        .iter()
        .find(|r| one_in(r.one_in, rng))
        .and_then(|r| conditions::lookup(r.leads_to))
}

/// Roll for a permanent condition left behind once `def` heals.
pub fn lasting_consequence(def: &ConditionDef, rng: &mut impl Rng) -> Option<&'static ConditionDef> {
    def.leaves
        .iter()
        .find(|r| one_in(r.one_in, rng))
        .and_then(|r| conditions::lookup(r.leads_to))
}

/// Things that raise or lower the chance of catching something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfectionModifiers {
    /// Clan-wide multiplier in percent (100 = unchanged).
    pub multiplier: u32,
    /// The carrier is being treated by a medicine cat.
    pub carrier_treated: bool,
    /// The exposed cat is a kit or senior.
    pub vulnerable: bool,
}

impl Default for InfectionModifiers {
    fn default() -> Self {
        Self {
            multiplier: 100,
            carrier_treated: false,
            vulnerable: false,
        }
    }
}

pub fn infection_chance(infectiousness: u32, modifiers: InfectionModifiers) -> u32 {
    let mut chance = infectiousness.saturating_mul(modifiers.multiplier) / 100;
    if modifiers.carrier_treated {
        chance /= 2;
    }
    if modifiers.vulnerable {
        chance += chance / 2;
    }
    chance.min(100)
}

pub fn infection_roll(infectiousness: u32, modifiers: InfectionModifiers, rng: &mut impl Rng) -> bool {
    infectiousness > 0 && percent(infection_chance(infectiousness, modifiers), rng)
}

/// Percent chance per moon of dying of old age.
///
/// Zero before `old_age_start`, then one more percent every four moons,
/// capped at 50.
pub fn old_age_death_chance(moons: u32, old_age_start: u32) -> u32 {
    if moons < old_age_start {
        return 0;
    }
    (1 + (moons - old_age_start) / 4).min(50)
}

static KIT_ILLNESSES: &[(&str, u32)] = &[
    ("whitecough", 20),
    ("running nose", 20),
    ("stomachache", 15),
    ("diarrhea", 10),
    ("greencough", 5),
    ("fever", 5),
];

static ADULT_ILLNESSES: &[(&str, u32)] = &[
    ("whitecough", 15),
    ("running nose", 20),
    ("stomachache", 15),
    ("greencough", 6),
    ("yellowcough", 2),
    ("fever", 6),
    ("malnourished", 4),
];

static ELDER_ILLNESSES: &[(&str, u32)] = &[
    ("whitecough", 15),
    ("greencough", 12),
    ("yellowcough", 4),
    ("fever", 8),
    ("stomachache", 10),
    ("malnourished", 8),
];

/// Random illness appropriate to the cat's age.
pub fn random_illness(group: AgeGroup, rng: &mut impl Rng) -> Option<&'static ConditionDef> {
    let table = match group {
        AgeGroup::Newborn | AgeGroup::Kitten => KIT_ILLNESSES,
        AgeGroup::SeniorAdult | AgeGroup::Senior => ELDER_ILLNESSES,
        _ => ADULT_ILLNESSES,
    };
    choose_weighted(table, rng).and_then(|name| conditions::lookup(name))
}

static NURSERY_INJURIES: &[(&str, u32)] = &[("bruises", 20), ("sprain", 10), ("torn pelt", 5)];

static WARRIOR_INJURIES: &[(&str, u32)] = &[
    ("claw-wound", 20),
    ("bite-wound", 12),
    ("sprain", 12),
    ("torn pelt", 10),
    ("bruises", 10),
    ("cracked pads", 8),
    ("broken bone", 4),
    ("poisoned", 3),
    ("head damage", 2),
    ("burn", 2),
];

static DEN_INJURIES: &[(&str, u32)] = &[
    ("cracked pads", 10),
    ("poisoned", 4),
    ("sprain", 6),
    ("bruises", 8),
];

static ELDER_INJURIES: &[(&str, u32)] = &[("joint pain", 20), ("sprain", 8), ("bruises", 8), ("broken bone", 2)];

/// Random injury fitting what a cat of this status does all day.
pub fn random_injury(status: Status, rng: &mut impl Rng) -> Option<&'static ConditionDef> {
    let table = match status {
        s if s.is_kit() => NURSERY_INJURIES,
        Status::Elder => ELDER_INJURIES,
        s if s.is_warrior_track() || s.is_outside() => WARRIOR_INJURIES,
        _ => DEN_INJURIES,
    };
    choose_weighted(table, rng).and_then(|name| conditions::lookup(name))
}

/// "1 in n" roll for a newborn to carry a congenital condition.
pub fn congenital_roll(one_in_n: u32, rng: &mut impl Rng) -> Option<&'static ConditionDef> {
    if one_in_n == 0 || !one_in(one_in_n, rng) {
        return None;
    }
    let options: Vec<&'static ConditionDef> = conditions::congenital().collect();
    if options.is_empty() {
        None
    } else {
        Some(options[rng.gen_range(0..options.len())])
    }
}

/// The medicine den's herb stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerbStore {
    pub counts: BTreeMap<Herb, u32>,
}

impl HerbStore {
    pub fn count(&self, herb: Herb) -> u32 {
        self.counts.get(&herb).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn add(&mut self, herb: Herb, amount: u32) {
        *self.counts.entry(herb).or_insert(0) += amount;
    }

    /// One gathering trip. Better healers (tier 1–3) make more finds; an
    /// untrained cat (tier 0) still finds one.
    pub fn gather(&mut self, tier: u8, rng: &mut impl Rng) -> Vec<(Herb, u32)> {
        let table: Vec<(Herb, u32)> = Herb::ALL.iter().map(|&h| (h, h.rarity_weight())).collect();
        let mut found = Vec::new();
        for _ in 0..(1 + tier as usize) {
            if let Some(&herb) = choose_weighted(&table, rng) {
                let amount = rng.gen_range(1..=2);
                self.add(herb, amount);
                found.push((herb, amount));
            }
        }
        found
    }

    /// Spend one dose of any herb that treats `def`.
    pub fn treat(&mut self, def: &ConditionDef) -> Option<Herb> {
        let herb = def.herbs.iter().copied().find(|&h| self.count(h) > 0)?;
        if let Some(n) = self.counts.get_mut(&herb) {
            *n -= 1;
            if *n == 0 {
                self.counts.remove(&herb);
            }
        }
        Some(herb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn def(name: &str) -> &'static ConditionDef {
        conditions::lookup(name).unwrap()
    }

    #[test]
    fn test_condition_heals_after_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cond = ActiveCondition::new(def("sprain"), &mut rng);
        assert!((1..=3).contains(&cond.duration));
        for _ in 0..cond.duration {
            assert!(!heals(&cond));
            cond.tick();
        }
        assert!(heals(&cond));
    }

    #[test]
    fn test_permanent_never_heals() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cond = ActiveCondition::new(def("blind"), &mut rng);
        for _ in 0..100 {
            cond.tick();
        }
        assert!(!heals(&cond));
        cond.apply_treatment();
        assert!(!cond.treated);
    }

    #[test]
    fn test_congenital_onset_countdown() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cond = ActiveCondition::congenital(def("budding spirit"), &mut rng);
        assert!(cond.born_with);
        assert!((2..=10).contains(&cond.moons_until_onset));
        let mut onset_moons = 0;
        while cond.is_dormant() {
            onset_moons += 1;
            let set_in = cond.tick();
            assert_eq!(set_in, !cond.is_dormant());
        }
        assert!(onset_moons >= 2);
        assert_eq!(cond.moons_with, 0);
    }

    #[test]
    fn test_treatment_halves_remaining() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cond = ActiveCondition::new(def("broken bone"), &mut rng);
        cond.duration = 8;
        cond.moons_with = 2;
        cond.apply_treatment();
        assert!(cond.treated);
        assert_eq!(cond.duration, 5);
        cond.apply_treatment();
        assert_eq!(cond.duration, 5);
    }

    #[test]
    fn test_death_roll_harmless_conditions() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            assert!(!death_roll(def("sprain"), AgeGroup::Adult, false, &mut rng));
            assert!(!death_roll(def("whitecough"), AgeGroup::Adult, false, &mut rng));
        }
    }

    #[test]
    fn test_treatment_lowers_deaths() {
        let mut rng = StdRng::seed_from_u64(12);
        let poison = def("poisoned");
        let untreated = (0..5000).filter(|_| death_roll(poison, AgeGroup::Adult, false, &mut rng)).count();
        let treated = (0..5000).filter(|_| death_roll(poison, AgeGroup::Adult, true, &mut rng)).count();
        assert!(treated < untreated, "treated={treated} untreated={untreated}");
    }

    #[test]
    fn test_infection_chance() {
        let base = InfectionModifiers::default();
        assert_eq!(infection_chance(20, base), 20);
        assert_eq!(infection_chance(20, InfectionModifiers { multiplier: 200, ..base }), 40);
        assert_eq!(infection_chance(20, InfectionModifiers { carrier_treated: true, ..base }), 10);
        assert_eq!(infection_chance(20, InfectionModifiers { vulnerable: true, ..base }), 30);
        assert_eq!(infection_chance(90, InfectionModifiers { multiplier: 500, ..base }), 100);
        assert_eq!(infection_chance(90, InfectionModifiers { multiplier: u32::MAX, ..base }), 100);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!infection_roll(0, base, &mut rng));
    }

    #[test]
    fn test_old_age() {
        assert_eq!(old_age_death_chance(100, 150), 0);
        assert_eq!(old_age_death_chance(150, 150), 1);
        assert_eq!(old_age_death_chance(170, 150), 6);
        assert_eq!(old_age_death_chance(1000, 150), 50);
    }

    #[test]
    fn test_random_tables_resolve() {
        let mut rng = StdRng::seed_from_u64(5);
        for group in AgeGroup::ALL {
            for _ in 0..30 {
                let d = random_illness(group, &mut rng).unwrap();
                assert_eq!(d.kind, ConditionKind::Illness);
            }
        }
        for status in [Status::Kitten, Status::Warrior, Status::MedicineCat, Status::Elder, Status::Loner] {
            for _ in 0..30 {
                let d = random_injury(status, &mut rng).unwrap();
                assert_eq!(d.kind, ConditionKind::Injury);
            }
        }
    }

    #[test]
    fn test_congenital_roll() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(congenital_roll(0, &mut rng).is_none());
        for _ in 0..20 {
            let d = congenital_roll(1, &mut rng).unwrap();
            assert!(d.is_permanent());
            assert_ne!(d.congenital, conditions::Congenital::Never);
        }
    }

    #[test]
    fn test_herb_store() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut store = HerbStore::default();
        assert_eq!(store.treat(def("claw-wound")), None);
        let found = store.gather(3, &mut rng);
        assert_eq!(found.len(), 4);
        assert_eq!(store.total(), found.iter().map(|(_, n)| n).sum::<u32>());

        let mut store = HerbStore::default();
        store.add(Herb::Marigold, 1);
        assert_eq!(store.treat(def("claw-wound")), Some(Herb::Marigold));
        assert_eq!(store.count(Herb::Marigold), 0);
        assert_eq!(store.treat(def("claw-wound")), None);
    }
}
