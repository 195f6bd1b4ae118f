//! Name generation and status-dependent display.
//!
//! Clan names are a prefix plus a suffix ("Fire" + "heart"). The displayed
//! name depends on status: kits are "-kit", apprentices "-paw" and the
//! leader "-star". The stored suffix is kept so a cat regains it after
//! graduating.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pelt::{ColourGroup, Pelt, PeltColour};
use crate::status::Status;
use crate::weighted::{percent, pick_uniform};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    pub prefix: String,
    /// Empty for outside cats that go by a single name.
    pub suffix: String,
}

impl Name {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// A single-word name, as used by kittypets and loners.
    pub fn single(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// Name as shown for a cat with the given status.
    pub fn display(&self, status: Status) -> String {
        match status {
            Status::Newborn | Status::Kitten => format!("{}kit", self.prefix),
            s if s.is_apprentice() => format!("{}paw", self.prefix),
            Status::Leader => format!("{}star", self.prefix),
            _ => format!("{}{}", self.prefix, self.suffix),
        }
    }

    /// Name with the stored suffix regardless of status.
    pub fn full(&self) -> String {
        format!("{}{}", self.prefix, self.suffix)
    }
}

static GREY_PREFIXES: &[&str] = &["Ash", "Smoke", "Stone", "Silver", "Mist", "Storm", "Dove", "Flint"];
static BLACK_PREFIXES: &[&str] = &["Crow", "Night", "Raven", "Shadow", "Soot", "Coal", "Dark", "Beetle"];
static WHITE_PREFIXES: &[&str] = &["Snow", "Frost", "Cloud", "Ice", "Swan", "Pale", "Lily", "Blizzard"];
static GINGER_PREFIXES: &[&str] = &["Fire", "Flame", "Rust", "Fox", "Amber", "Sun", "Ember", "Copper"];
static BROWN_PREFIXES: &[&str] = &["Bark", "Oak", "Mud", "Hazel", "Acorn", "Mouse", "Fawn", "Bramble"];
static GENERAL_PREFIXES: &[&str] = &[
    "Leaf", "Fern", "Moss", "Thistle", "Holly", "Swift", "Brave", "Quail", "Lark", "Pebble", "Rain",
    "Wind", "Berry", "Dapple", "Sparrow", "Ivy", "Bright", "Hollow", "Sedge", "Rowan", "Heather",
    "Briar", "Minnow", "Wren", "Cedar", "Juniper", "Poppy", "Reed", "Bird", "Yew",
];

static SUFFIXES: &[&str] = &[
    "heart", "claw", "fur", "pelt", "tail", "whisker", "leaf", "storm", "foot", "stripe", "fang",
    "flight", "song", "shade", "breeze", "eye", "nose", "step", "wing", "cloud", "blaze", "spots",
    "frost", "mist", "ear", "fall", "jaw", "flower", "dapple", "stream",
];

static LONER_NAMES: &[&str] = &[
    "Smudge", "Tiny", "Jasper", "Pepper", "Bella", "Oreo", "Max", "Socks", "Ziggy", "Mittens",
    "Biscuit", "Rocky", "Luna", "Milo", "Clover", "Noodle", "Tigger", "Maple",
];

fn colour_prefixes(colour: PeltColour) -> &'static [&'static str] {
    match colour.group() {
        ColourGroup::White => WHITE_PREFIXES,
        ColourGroup::Grey => GREY_PREFIXES,
        ColourGroup::Black => BLACK_PREFIXES,
        ColourGroup::Ginger => GINGER_PREFIXES,
        ColourGroup::Brown => BROWN_PREFIXES,
    }
}

/// Random prefix, themed on the pelt colour about a third of the time.
pub fn random_prefix(pelt: Option<&Pelt>, rng: &mut impl Rng) -> String {
    let table = match pelt {
        Some(p) if percent(35, rng) => colour_prefixes(p.dominant_colour()),
        _ => GENERAL_PREFIXES,
    };
    pick_uniform(table, rng).unwrap_or("Pebble").to_string()
}

/// Whether a suffix makes sense for the pelt ("spots" needs spots).
pub fn suffix_fits(suffix: &str, prefix: &str, pelt: Option<&Pelt>) -> bool {
    if suffix.eq_ignore_ascii_case(prefix) {
        return false;
    }
    match (suffix, pelt) {
        ("stripe", Some(p)) => p.kind.is_striped(),
        ("spots", Some(p)) | ("dapple", Some(p)) => p.kind.is_spotted(),
        _ => true,
    }
}

/// Random suffix that fits the prefix and pelt.
pub fn random_suffix(prefix: &str, pelt: Option<&Pelt>, rng: &mut impl Rng) -> String {
    for _ in 0..20 {
        if let Some(s) = pick_uniform(SUFFIXES, rng) {
            if suffix_fits(s, prefix, pelt) {
                return s.to_string();
            }
        }
    }
    "heart".to_string()
}

/// Random Clan name (prefix + suffix).
pub fn random_name(pelt: Option<&Pelt>, rng: &mut impl Rng) -> Name {
    let prefix = random_prefix(pelt, rng);
    let suffix = random_suffix(&prefix, pelt, rng);
    Name::new(prefix, suffix)
}

/// Random single name for a cat born outside the Clan.
pub fn random_loner_name(rng: &mut impl Rng) -> Name {
    Name::single(pick_uniform(LONER_NAMES, rng).unwrap_or("Smudge"))
}

/// Random name that does not collide with any of `taken`.
///
/// Gives up after a bounded number of rerolls and returns the last roll.
pub fn unique_name(pelt: Option<&Pelt>, taken: &[Name], rng: &mut impl Rng) -> Name {
    let mut name = random_name(pelt, rng);
    for _ in 0..50 {
        if !is_name_taken(&name, taken) {
            break;
        }
        name = random_name(pelt, rng);
    }
    name
}

pub fn is_name_taken(name: &Name, taken: &[Name]) -> bool {
    taken
        .iter()
        .any(|n| n.prefix.eq_ignore_ascii_case(&name.prefix) && n.suffix.eq_ignore_ascii_case(&name.suffix))
}

/// Clan name given to an outsider who joins the Clan. Single-word names
/// become the prefix.
pub fn clan_name_for(name: &Name, pelt: Option<&Pelt>, rng: &mut impl Rng) -> Name {
    if !name.suffix.is_empty() {
        return name.clone();
    }
    let suffix = random_suffix(&name.prefix, pelt, rng);
    Name::new(name.prefix.clone(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pelt::{Gender, PeltKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_display_by_status() {
        let name = Name::new("Fire", "heart");
        assert_eq!(name.display(Status::Kitten), "Firekit");
        assert_eq!(name.display(Status::Newborn), "Firekit");
        assert_eq!(name.display(Status::Apprentice), "Firepaw");
        assert_eq!(name.display(Status::MedicineCatApprentice), "Firepaw");
        assert_eq!(name.display(Status::Warrior), "Fireheart");
        assert_eq!(name.display(Status::Leader), "Firestar");
        assert_eq!(name.display(Status::Elder), "Fireheart");
        assert_eq!(Name::single("Smudge").display(Status::Kittypet), "Smudge");
    }

    #[test]
    fn test_suffix_rules() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pelt = Pelt::random(Gender::Male, &mut rng);
        pelt.kind = PeltKind::SingleColour;
        assert!(!suffix_fits("stripe", "Ash", Some(&pelt)));
        assert!(!suffix_fits("spots", "Ash", Some(&pelt)));
        assert!(suffix_fits("heart", "Ash", Some(&pelt)));
        assert!(!suffix_fits("leaf", "Leaf", None));
        pelt.kind = PeltKind::Spotted;
        assert!(suffix_fits("spots", "Ash", Some(&pelt)));
    }

    #[test]
    fn test_random_names_never_repeat_prefix() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..500 {
            let name = random_name(None, &mut rng);
            assert!(!name.suffix.eq_ignore_ascii_case(&name.prefix));
            assert!(!name.prefix.is_empty());
            assert!(!name.suffix.is_empty());
        }
    }

    #[test]
    fn test_unique_name_avoids_taken() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut taken = Vec::new();
        for _ in 0..40 {
            let name = unique_name(None, &taken, &mut rng);
            assert!(!is_name_taken(&name, &taken));
            taken.push(name);
        }
    }

    #[test]
    fn test_outsider_gets_suffix_on_joining() {
        let mut rng = StdRng::seed_from_u64(1);
        let loner = random_loner_name(&mut rng);
        assert!(loner.suffix.is_empty());
        let joined = clan_name_for(&loner, None, &mut rng);
        assert_eq!(joined.prefix, loner.prefix);
        assert!(!joined.suffix.is_empty());
    }
}
