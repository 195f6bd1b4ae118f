//! Static condition table: illnesses, injuries and permanent conditions.
//!
//! Every condition a cat can carry is described once here as a
//! [`ConditionDef`]. Live conditions on a cat (see [`crate::health`]) refer
//! back to these entries by name, so the rules for a condition never drift
//! between cats.

use serde::{Deserialize, Serialize};

use crate::age::AgeGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    Illness,
    Injury,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Major,
    Severe,
}

/// Whether a permanent condition can be present from birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Congenital {
    /// Only ever acquired later in life.
    Never,
    /// Either at birth or acquired.
    Sometimes,
    /// Only at birth.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Herb {
    Cobwebs,
    Marigold,
    Catmint,
    Burdock,
    Poppy,
    Honey,
    Yarrow,
    Tansy,
    Comfrey,
    Goldenrod,
    Horsetail,
    Chervil,
    Juniper,
    Lavender,
    Borage,
}

impl Herb {
    pub const ALL: [Herb; 15] = [
        Herb::Cobwebs,
        Herb::Marigold,
        Herb::Catmint,
        Herb::Burdock,
        Herb::Poppy,
        Herb::Honey,
        Herb::Yarrow,
        Herb::Tansy,
        Herb::Comfrey,
        Herb::Goldenrod,
        Herb::Horsetail,
        Herb::Chervil,
        Herb::Juniper,
        Herb::Lavender,
        Herb::Borage,
    ];

    /// Herbs that are harder to find get lower weights when gathering.
    pub fn rarity_weight(self) -> u32 {
        match self {
            Herb::Catmint | Herb::Honey | Herb::Goldenrod => 2,
            Herb::Cobwebs | Herb::Poppy => 8,
            _ => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Herb::Cobwebs => "cobwebs",
            Herb::Marigold => "marigold",
            Herb::Catmint => "catmint",
            Herb::Burdock => "burdock root",
            Herb::Poppy => "poppy seeds",
            Herb::Honey => "honey",
            Herb::Yarrow => "yarrow",
            Herb::Tansy => "tansy",
            Herb::Comfrey => "comfrey root",
            Herb::Goldenrod => "goldenrod",
            Herb::Horsetail => "horsetail",
            Herb::Chervil => "chervil",
            Herb::Juniper => "juniper berries",
            Herb::Lavender => "lavender",
            Herb::Borage => "borage leaves",
        }
    }
}

/// A chance for one condition to cause another ("1 in `one_in`" per moon,
/// or on healing for permanent consequences).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Risk {
    pub leads_to: &'static str,
    pub one_in: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionDef {
    pub name: &'static str,
    pub kind: ConditionKind,
    pub severity: Severity,
    /// "1 in N" death chance per moon for young cats, grown cats and
    /// elderly cats. Zero means the condition cannot kill.
    pub mortality: [u32; 3],
    /// Inclusive range of moons the condition lasts. `(0, 0)` for permanent.
    pub duration: (u32, u32),
    /// Base percent chance per moon of spreading to another cat.
    pub infectiousness: u32,
    pub herbs: &'static [Herb],
    /// Conditions this one can turn into while active.
    pub risks: &'static [Risk],
    /// Permanent conditions this one can leave behind once it heals.
    pub leaves: &'static [Risk],
    pub congenital: Congenital,
    /// Inclusive range of moons before a congenital condition shows.
    pub onset: (u32, u32),
    /// Cats with this condition may develop alters.
    pub grants_alters: bool,
}

impl ConditionDef {
    pub fn mortality_for(&self, group: AgeGroup) -> u32 {
        match group {
            AgeGroup::Newborn | AgeGroup::Kitten | AgeGroup::Adolescent => self.mortality[0],
            AgeGroup::YoungAdult | AgeGroup::Adult => self.mortality[1],
            AgeGroup::SeniorAdult | AgeGroup::Senior => self.mortality[2],
        }
    }

    pub fn is_contagious(&self) -> bool {
        self.infectiousness > 0
    }

    pub fn can_kill(&self) -> bool {
        self.mortality.iter().any(|&m| m > 0)
    }

    pub fn is_permanent(&self) -> bool {
        self.kind == ConditionKind::Permanent
    }
}

const NO_HERBS: &[Herb] = &[];
const NO_RISKS: &[Risk] = &[];

const fn illness(
    name: &'static str,
    severity: Severity,
    mortality: [u32; 3],
    duration: (u32, u32),
    infectiousness: u32,
    herbs: &'static [Herb],
    risks: &'static [Risk],
    leaves: &'static [Risk],
) -> ConditionDef {
    ConditionDef {
        name,
        kind: ConditionKind::Illness,
        severity,
        mortality,
        duration,
        infectiousness,
        herbs,
        risks,
        leaves,
        congenital: Congenital::Never,
        onset: (0, 0),
        grants_alters: false,
    }
}

const fn injury(
    name: &'static str,
    severity: Severity,
    mortality: [u32; 3],
    duration: (u32, u32),
    herbs: &'static [Herb],
    risks: &'static [Risk],
    leaves: &'static [Risk],
) -> ConditionDef {
    ConditionDef {
        name,
        kind: ConditionKind::Injury,
        severity,
        mortality,
        duration,
        infectiousness: 0,
        herbs,
        risks,
        leaves,
        congenital: Congenital::Never,
        onset: (0, 0),
        grants_alters: false,
    }
}

const fn permanent(
    name: &'static str,
    severity: Severity,
    mortality: [u32; 3],
    congenital: Congenital,
    onset: (u32, u32),
    grants_alters: bool,
) -> ConditionDef {
    ConditionDef {
        name,
        kind: ConditionKind::Permanent,
        severity,
        mortality,
        duration: (0, 0),
        infectiousness: 0,
        herbs: NO_HERBS,
        risks: NO_RISKS,
        leaves: NO_RISKS,
        congenital,
        onset,
        grants_alters,
    }
}

use self::Severity::{Major, Minor, Severe};

#[rustfmt::skip]
pub static CONDITIONS: &[ConditionDef] = &[
    // Illnesses
    illness("whitecough", Minor, [60, 0, 40], (3, 5), 15, &[Herb::Catmint, Herb::Borage], &[Risk { leads_to: "greencough", one_in: 10 }], NO_RISKS),
    illness("greencough", Major, [10, 30, 8], (4, 7), 20, &[Herb::Catmint], &[Risk { leads_to: "fever", one_in: 10 }, Risk { leads_to: "yellowcough", one_in: 15 }], NO_RISKS),
    illness("yellowcough", Severe, [6, 15, 5], (5, 8), 25, &[Herb::Catmint, Herb::Honey], NO_RISKS, NO_RISKS),
    illness("running nose", Minor, [0, 0, 0], (1, 3), 30, &[Herb::Honey], &[Risk { leads_to: "whitecough", one_in: 15 }], NO_RISKS),
    illness("stomachache", Minor, [0, 0, 0], (1, 2), 0, &[Herb::Juniper, Herb::Chervil], NO_RISKS, NO_RISKS),
    illness("diarrhea", Minor, [40, 0, 50], (1, 3), 0, &[Herb::Chervil], NO_RISKS, NO_RISKS),
    illness("fever", Major, [20, 50, 15], (2, 4), 0, &[Herb::Borage], NO_RISKS, NO_RISKS),
    illness("infected wound", Major, [15, 30, 12], (3, 6), 0, &[Herb::Burdock, Herb::Marigold], &[Risk { leads_to: "fever", one_in: 8 }], NO_RISKS),
    illness("grief stricken", Minor, [0, 0, 0], (2, 5), 0, &[Herb::Lavender, Herb::Poppy], NO_RISKS, &[Risk { leads_to: "lasting grief", one_in: 20 }]),
    illness("shock", Minor, [0, 0, 0], (1, 2), 0, &[Herb::Poppy, Herb::Lavender], NO_RISKS, &[Risk { leads_to: "recurring shock", one_in: 25 }]),
    illness("malnourished", Major, [20, 40, 15], (2, 4), 0, &[Herb::Honey], NO_RISKS, NO_RISKS),
    // Injuries
    injury("claw-wound", Minor, [50, 0, 60], (2, 4), &[Herb::Cobwebs, Herb::Marigold], &[Risk { leads_to: "infected wound", one_in: 8 }], NO_RISKS),
    injury("bite-wound", Major, [30, 0, 40], (3, 5), &[Herb::Cobwebs, Herb::Marigold, Herb::Burdock], &[Risk { leads_to: "infected wound", one_in: 6 }], &[Risk { leads_to: "weak leg", one_in: 30 }]),
    injury("sprain", Minor, [0, 0, 0], (1, 3), &[Herb::Comfrey], NO_RISKS, NO_RISKS),
    injury("broken bone", Major, [25, 60, 20], (6, 9), &[Herb::Comfrey], NO_RISKS, &[Risk { leads_to: "weak leg", one_in: 8 }, Risk { leads_to: "lost a leg", one_in: 40 }]),
    injury("torn pelt", Minor, [0, 0, 0], (2, 3), &[Herb::Cobwebs, Herb::Marigold], &[Risk { leads_to: "infected wound", one_in: 10 }], NO_RISKS),
    injury("bruises", Minor, [0, 0, 0], (1, 2), &[Herb::Goldenrod], NO_RISKS, NO_RISKS),
    injury("cracked pads", Minor, [0, 0, 0], (1, 3), &[Herb::Horsetail], NO_RISKS, NO_RISKS),
    injury("poisoned", Severe, [5, 10, 4], (1, 3), &[Herb::Yarrow], NO_RISKS, NO_RISKS),
    injury("head damage", Severe, [10, 25, 8], (3, 6), &[Herb::Poppy], NO_RISKS, &[Risk { leads_to: "persistent headaches", one_in: 6 }, Risk { leads_to: "one bad eye", one_in: 12 }, Risk { leads_to: "deaf", one_in: 20 }]),
    injury("burn", Major, [20, 40, 15], (3, 5), &[Herb::Comfrey, Herb::Burdock], &[Risk { leads_to: "infected wound", one_in: 10 }], &[Risk { leads_to: "one bad eye", one_in: 25 }]),
    injury("joint pain", Minor, [0, 0, 0], (2, 4), &[Herb::Comfrey, Herb::Tansy], NO_RISKS, &[Risk { leads_to: "constant joint pain", one_in: 10 }]),
    // Permanent conditions
    permanent("born without a tail", Minor, [0, 0, 0], Congenital::Always, (0, 0), false),
    permanent("lost a leg", Major, [0, 0, 0], Congenital::Sometimes, (0, 0), false),
    permanent("blind", Major, [0, 0, 0], Congenital::Sometimes, (0, 12), false),
    permanent("deaf", Minor, [0, 0, 0], Congenital::Sometimes, (0, 0), false),
    permanent("one bad eye", Minor, [0, 0, 0], Congenital::Sometimes, (0, 6), false),
    permanent("weak leg", Minor, [0, 0, 0], Congenital::Sometimes, (0, 4), false),
    permanent("shattered soul", Major, [0, 0, 0], Congenital::Never, (0, 0), true),
    permanent("budding spirit", Minor, [0, 0, 0], Congenital::Sometimes, (2, 10), true),
    permanent("recurring shock", Minor, [0, 0, 0], Congenital::Never, (0, 0), false),
    permanent("constant joint pain", Major, [0, 0, 80], Congenital::Never, (0, 0), false),
    permanent("persistent headaches", Minor, [0, 0, 0], Congenital::Never, (0, 0), false),
    permanent("lasting grief", Minor, [0, 0, 0], Congenital::Never, (0, 0), false),
];

/// Find a condition by name (case-insensitive).
pub fn lookup(name: &str) -> Option<&'static ConditionDef> {
    CONDITIONS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

pub fn of_kind(kind: ConditionKind) -> impl Iterator<Item = &'static ConditionDef> {
    CONDITIONS.iter().filter(move |c| c.kind == kind)
}

/// Permanent conditions a kit can be born with.
pub fn congenital() -> impl Iterator<Item = &'static ConditionDef> {
    of_kind(ConditionKind::Permanent).filter(|c| c.congenital != Congenital::Never)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let def = lookup("Greencough").unwrap();
        assert_eq!(def.kind, ConditionKind::Illness);
        assert!(def.is_contagious());
        assert!(lookup("dragon pox").is_none());
    }

    #[test]
    fn test_names_unique() {
        for (i, a) in CONDITIONS.iter().enumerate() {
            for b in &CONDITIONS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_all_references_resolve() {
        for def in CONDITIONS {
            for r in def.risks.iter().chain(def.leaves) {
                assert!(lookup(r.leads_to).is_some(), "{} -> {}", def.name, r.leads_to);
                assert!(r.one_in > 0);
            }
            for r in def.leaves {
                assert!(lookup(r.leads_to).unwrap().is_permanent(), "{}", def.name);
            }
        }
    }

    #[test]
    fn test_table_shape() {
        assert!(of_kind(ConditionKind::Illness).count() >= 10);
        assert!(of_kind(ConditionKind::Injury).count() >= 10);
        assert!(of_kind(ConditionKind::Permanent).count() >= 10);
        for def in CONDITIONS {
            match def.kind {
                ConditionKind::Permanent => {
                    assert_eq!(def.duration, (0, 0));
                    assert!(def.onset.0 <= def.onset.1);
                }
                _ => {
                    assert!(def.duration.0 >= 1 && def.duration.0 <= def.duration.1);
                    assert!(!def.herbs.is_empty(), "{} has no treatment", def.name);
                    assert!(!def.grants_alters);
                }
            }
        }
    }

    #[test]
    fn test_alter_conditions() {
        let granting: Vec<_> = CONDITIONS.iter().filter(|c| c.grants_alters).map(|c| c.name).collect();
        assert_eq!(granting, vec!["shattered soul", "budding spirit"]);
        assert!(congenital().any(|c| c.name == "budding spirit"));
        assert!(!congenital().any(|c| c.name == "shattered soul"));
    }

    #[test]
    fn test_mortality_by_age() {
        let def = lookup("whitecough").unwrap();
        assert_eq!(def.mortality_for(AgeGroup::Kitten), 60);
        assert_eq!(def.mortality_for(AgeGroup::Adult), 0);
        assert_eq!(def.mortality_for(AgeGroup::Senior), 40);
        assert!(!lookup("sprain").unwrap().can_kill());
    }
}
