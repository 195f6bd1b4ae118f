//! Personality traits and the four facets underneath them.
//!
//! Every cat has four facets (lawfulness, sociability, aggression,
//! stability), each `0..=FACET_MAX`. A trait is a label for a region of
//! facet space: each trait declares an inclusive range per facet. Kits use
//! a separate, smaller set of traits and swap to an adult trait when they
//! become apprentices.
//!
//! Facets are the source of truth. Traits are re-derived from them whenever
//! facets drift out of the trait's region (inheritance, mentor influence).

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const FACET_MAX: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facet {
    Lawfulness,
    Sociability,
    Aggression,
    Stability,
}

impl Facet {
    pub const ALL: [Facet; 4] = [
        Facet::Lawfulness,
        Facet::Sociability,
        Facet::Aggression,
        Facet::Stability,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub lawfulness: u8,
    pub sociability: u8,
    pub aggression: u8,
    pub stability: u8,
}

impl Facets {
    /// Build facets, clamping every value to `0..=FACET_MAX`.
    pub fn new(lawfulness: u8, sociability: u8, aggression: u8, stability: u8) -> Self {
        Self {
            lawfulness: lawfulness.min(FACET_MAX),
            sociability: sociability.min(FACET_MAX),
            aggression: aggression.min(FACET_MAX),
            stability: stability.min(FACET_MAX),
        }
    }

    pub fn get(&self, facet: Facet) -> u8 {
        match facet {
            Facet::Lawfulness => self.lawfulness,
            Facet::Sociability => self.sociability,
            Facet::Aggression => self.aggression,
            Facet::Stability => self.stability,
        }
    }

    pub fn set(&mut self, facet: Facet, value: u8) {
        let v = value.min(FACET_MAX);
        match facet {
            Facet::Lawfulness => self.lawfulness = v,
            Facet::Sociability => self.sociability = v,
            Facet::Aggression => self.aggression = v,
            Facet::Stability => self.stability = v,
        }
    }

    /// Sum of absolute differences across all facets (0..=60).
    pub fn distance(&self, other: &Facets) -> u32 {
        Facet::ALL
            .iter()
            .map(|&f| (self.get(f) as i32 - other.get(f) as i32).unsigned_abs())
            .sum()
    }
}

/// Inclusive facet ranges a trait occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitRanges {
    pub lawfulness: (u8, u8),
    pub sociability: (u8, u8),
    pub aggression: (u8, u8),
    pub stability: (u8, u8),
}

impl TraitRanges {
    pub fn range(&self, facet: Facet) -> (u8, u8) {
        match facet {
            Facet::Lawfulness => self.lawfulness,
            Facet::Sociability => self.sociability,
            Facet::Aggression => self.aggression,
            Facet::Stability => self.stability,
        }
    }

    pub fn contains(&self, facets: &Facets) -> bool {
        self.miss(facets) == 0
    }

    /// How far the facets sit outside these ranges, summed over facets.
    pub fn miss(&self, facets: &Facets) -> u32 {
        Facet::ALL
            .iter()
            .map(|&f| {
                let (lo, hi) = self.range(f);
                let v = facets.get(f);
                if v < lo {
                    (lo - v) as u32
                } else if v > hi {
                    (v - hi) as u32
                } else {
                    0
                }
            })
            .sum()
    }

    fn roll(&self, rng: &mut impl Rng) -> Facets {
        let mut facets = Facets::new(0, 0, 0, 0);
        for f in Facet::ALL {
            let (lo, hi) = self.range(f);
            facets.set(f, rng.gen_range(lo..=hi));
        }
        facets
    }
}

const fn ranges(l: (u8, u8), s: (u8, u8), a: (u8, u8), st: (u8, u8)) -> TraitRanges {
    TraitRanges {
        lawfulness: l,
        sociability: s,
        aggression: a,
        stability: st,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trait {
    // Adult traits
    Adventurous,
    Ambitious,
    Bloodthirsty,
    Calm,
    Charismatic,
    Childish,
    Cold,
    Confident,
    Faithful,
    Fierce,
    Insecure,
    Lonesome,
    Loyal,
    Nervous,
    Playful,
    Responsible,
    Righteous,
    Sneaky,
    Strange,
    Thoughtful,
    Vengeful,
    Wise,
    // Kit traits
    AttentionSeeker,
    Bossy,
    Bouncy,
    Bullying,
    Charming,
    Daring,
    Impulsive,
    Inquisitive,
    Noisy,
    Quiet,
    Shy,
    Sweet,
}

impl Trait {
    pub const ADULT: [Trait; 22] = [
        Trait::Adventurous,
        Trait::Ambitious,
        Trait::Bloodthirsty,
        Trait::Calm,
        Trait::Charismatic,
        Trait::Childish,
        Trait::Cold,
        Trait::Confident,
        Trait::Faithful,
        Trait::Fierce,
        Trait::Insecure,
        Trait::Lonesome,
        Trait::Loyal,
        Trait::Nervous,
        Trait::Playful,
        Trait::Responsible,
        Trait::Righteous,
        Trait::Sneaky,
        Trait::Strange,
        Trait::Thoughtful,
        Trait::Vengeful,
        Trait::Wise,
    ];

    pub const KIT: [Trait; 12] = [
        Trait::AttentionSeeker,
        Trait::Bossy,
        Trait::Bouncy,
        Trait::Bullying,
        Trait::Charming,
        Trait::Daring,
        Trait::Impulsive,
        Trait::Inquisitive,
        Trait::Noisy,
        Trait::Quiet,
        Trait::Shy,
        Trait::Sweet,
    ];

    pub fn is_kit_trait(self) -> bool {
        Self::KIT.contains(&self)
    }

    pub fn ranges(self) -> TraitRanges {
        match self {
            Trait::Adventurous => ranges((4, 11), (8, 15), (4, 11), (6, 15)),
            Trait::Ambitious => ranges((6, 11), (6, 11), (9, 15), (6, 15)),
            Trait::Bloodthirsty => ranges((0, 4), (0, 9), (12, 15), (0, 9)),
            Trait::Calm => ranges((6, 15), (4, 11), (0, 4), (10, 15)),
            Trait::Charismatic => ranges((6, 11), (12, 15), (0, 8), (8, 15)),
            Trait::Childish => ranges((0, 8), (9, 15), (0, 8), (0, 8)),
            Trait::Cold => ranges((0, 8), (0, 4), (9, 15), (8, 15)),
            Trait::Confident => ranges((6, 11), (9, 15), (6, 11), (10, 15)),
            Trait::Faithful => ranges((12, 15), (6, 11), (0, 8), (8, 15)),
            Trait::Fierce => ranges((6, 11), (6, 11), (12, 15), (6, 11)),
            Trait::Insecure => ranges((4, 11), (0, 8), (0, 6), (0, 4)),
            Trait::Lonesome => ranges((4, 11), (0, 4), (0, 8), (0, 8)),
            Trait::Loyal => ranges((12, 15), (9, 15), (6, 11), (6, 15)),
            Trait::Nervous => ranges((4, 11), (4, 11), (0, 4), (0, 5)),
            Trait::Playful => ranges((0, 8), (12, 15), (0, 6), (6, 15)),
            Trait::Responsible => ranges((12, 15), (4, 11), (0, 8), (9, 15)),
            Trait::Righteous => ranges((12, 15), (0, 8), (9, 15), (6, 15)),
            Trait::Sneaky => ranges((0, 4), (0, 8), (4, 11), (6, 15)),
            Trait::Strange => ranges((0, 8), (0, 8), (0, 8), (0, 8)),
            Trait::Thoughtful => ranges((9, 15), (4, 11), (0, 6), (9, 15)),
            Trait::Vengeful => ranges((0, 8), (0, 8), (12, 15), (0, 8)),
            Trait::Wise => ranges((9, 15), (6, 11), (0, 6), (12, 15)),
            Trait::AttentionSeeker => ranges((0, 8), (9, 15), (4, 11), (0, 8)),
            Trait::Bossy => ranges((6, 15), (9, 15), (9, 15), (6, 15)),
            Trait::Bouncy => ranges((0, 8), (9, 15), (0, 8), (6, 15)),
            Trait::Bullying => ranges((0, 5), (4, 11), (12, 15), (0, 8)),
            Trait::Charming => ranges((6, 15), (12, 15), (0, 6), (8, 15)),
            Trait::Daring => ranges((0, 8), (6, 15), (8, 15), (6, 15)),
            Trait::Impulsive => ranges((0, 5), (4, 11), (4, 11), (0, 6)),
            Trait::Inquisitive => ranges((4, 11), (6, 15), (0, 8), (6, 15)),
            Trait::Noisy => ranges((0, 8), (12, 15), (4, 11), (0, 8)),
            Trait::Quiet => ranges((6, 15), (0, 5), (0, 6), (6, 15)),
            Trait::Shy => ranges((6, 15), (0, 5), (0, 6), (0, 6)),
            Trait::Sweet => ranges((9, 15), (6, 15), (0, 4), (8, 15)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trait::Adventurous => "adventurous",
            Trait::Ambitious => "ambitious",
            Trait::Bloodthirsty => "bloodthirsty",
            Trait::Calm => "calm",
            Trait::Charismatic => "charismatic",
            Trait::Childish => "childish",
            Trait::Cold => "cold",
            Trait::Confident => "confident",
            Trait::Faithful => "faithful",
            Trait::Fierce => "fierce",
            Trait::Insecure => "insecure",
            Trait::Lonesome => "lonesome",
            Trait::Loyal => "loyal",
            Trait::Nervous => "nervous",
            Trait::Playful => "playful",
            Trait::Responsible => "responsible",
            Trait::Righteous => "righteous",
            Trait::Sneaky => "sneaky",
            Trait::Strange => "strange",
            Trait::Thoughtful => "thoughtful",
            Trait::Vengeful => "vengeful",
            Trait::Wise => "wise",
            Trait::AttentionSeeker => "attention-seeker",
            Trait::Bossy => "bossy",
            Trait::Bouncy => "bouncy",
            Trait::Bullying => "bullying",
            Trait::Charming => "charming",
            Trait::Daring => "daring",
            Trait::Impulsive => "impulsive",
            Trait::Inquisitive => "inquisitive",
            Trait::Noisy => "noisy",
            Trait::Quiet => "quiet",
            Trait::Shy => "shy",
            Trait::Sweet => "sweet",
        }
    }
}

/// Pick the trait whose region best fits `facets`.
///
/// Traits that contain the facets win outright; otherwise the traits with
/// the smallest miss distance are candidates. Ties are broken randomly.
pub fn choose_trait(facets: &Facets, kit: bool, rng: &mut impl Rng) -> Trait {
    let pool: &[Trait] = if kit { &Trait::KIT } else { &Trait::ADULT };
    let best = pool
        .iter()
        .map(|t| t.ranges().miss(facets))
        .min()
        .unwrap_or(0);
    let candidates: Vec<Trait> = pool
        .iter()
        .copied()
        .filter(|t| t.ranges().miss(facets) == best)
        .collect();
    candidates[rng.gen_range(0..candidates.len())]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub trait_kind: Trait,
    pub facets: Facets,
}

impl Personality {
    /// Random trait, with facets rolled inside its region.
    pub fn random(kit: bool, rng: &mut impl Rng) -> Self {
        let pool: &[Trait] = if kit { &Trait::KIT } else { &Trait::ADULT };
        let trait_kind = pool[rng.gen_range(0..pool.len())];
        Self {
            trait_kind,
            facets: trait_kind.ranges().roll(rng),
        }
    }

    /// Facets averaged from the parents with ±2 noise, then a fitting trait.
    /// No parents falls back to a random personality.
    pub fn inherit(parents: &[&Personality], kit: bool, rng: &mut impl Rng) -> Self {
        if parents.is_empty() {
            return Self::random(kit, rng);
        }
        let mut facets = Facets::new(0, 0, 0, 0);
        for f in Facet::ALL {
            let sum: u32 = parents.iter().map(|p| p.facets.get(f) as u32).sum();
            let avg = (sum / parents.len() as u32) as i32;
            let noisy = (avg + rng.gen_range(-2..=2)).clamp(0, FACET_MAX as i32);
            facets.set(f, noisy as u8);
        }
        Self {
            trait_kind: choose_trait(&facets, kit, rng),
            facets,
        }
    }

    pub fn is_kit(&self) -> bool {
        self.trait_kind.is_kit_trait()
    }

    /// Swap a kit trait for an adult one. Facets shift by up to one point
    /// each as the kit matures.
    pub fn grow_up(&mut self, rng: &mut impl Rng) {
        if !self.is_kit() {
            return;
        }
        for f in Facet::ALL {
            let v = self.facets.get(f) as i32 + rng.gen_range(-1..=1);
            self.facets.set(f, v.clamp(0, FACET_MAX as i32) as u8);
        }
        self.trait_kind = choose_trait(&self.facets, false, rng);
    }

    /// Nudge one random facet a step toward the mentor's value.
    ///
    /// Returns the facet that moved, or `None` when the chosen facet already
    /// matches. The trait is re-derived if the facets leave its region.
    pub fn mentor_influence(&mut self, mentor: &Personality, rng: &mut impl Rng) -> Option<Facet> {
        let facet = Facet::ALL[rng.gen_range(0..Facet::ALL.len())];
        let mine = self.facets.get(facet);
        let theirs = mentor.facets.get(facet);
        if mine == theirs {
            return None;
        }
        let next = if theirs > mine { mine + 1 } else { mine - 1 };
        self.facets.set(facet, next);
        if !self.trait_kind.ranges().contains(&self.facets) {
            self.trait_kind = choose_trait(&self.facets, self.is_kit(), rng);
        }
        Some(facet)
    }
}

/// How well two personalities get along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compatibility {
    Positive,
    Neutral,
    Negative,
}

const COMPATIBLE_DISTANCE: u32 = 10;
const CLASH_DISTANCE: u32 = 28;

pub fn compatibility(a: &Personality, b: &Personality) -> Compatibility {
    // Two hot-headed cats always clash.
    if a.facets.aggression >= 12 && b.facets.aggression >= 12 {
        return Compatibility::Negative;
    }
    let d = a.facets.distance(&b.facets);
    if d <= COMPATIBLE_DISTANCE {
        Compatibility::Positive
    } else if d >= CLASH_DISTANCE {
        Compatibility::Negative
    } else {
        Compatibility::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_facets_inside_trait() {
        let mut rng = StdRng::seed_from_u64(21);
        for kit in [true, false] {
            for _ in 0..200 {
                let p = Personality::random(kit, &mut rng);
                assert_eq!(p.is_kit(), kit);
                assert!(p.trait_kind.ranges().contains(&p.facets), "{p:?}");
            }
        }
    }

    #[test]
    fn test_all_ranges_valid() {
        for t in Trait::ADULT.iter().chain(Trait::KIT.iter()) {
            for f in Facet::ALL {
                let (lo, hi) = t.ranges().range(f);
                assert!(lo <= hi && hi <= FACET_MAX, "{t:?} {f:?}");
            }
        }
    }

    #[test]
    fn test_choose_trait_prefers_containing_region() {
        let mut rng = StdRng::seed_from_u64(2);
        let wise = Facets::new(14, 8, 2, 14);
        for _ in 0..20 {
            let t = choose_trait(&wise, false, &mut rng);
            assert!(t.ranges().contains(&wise));
        }
        let t = choose_trait(&Facets::new(14, 8, 2, 14), true, &mut rng);
        assert!(t.is_kit_trait());
    }

    #[test]
    fn test_grow_up_gives_adult_trait() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = Personality::random(true, &mut rng);
        p.grow_up(&mut rng);
        assert!(!p.is_kit());
        let before = p;
        p.grow_up(&mut rng);
        assert_eq!(p, before);
    }

    #[test]
    fn test_mentor_influence_moves_toward_mentor() {
        let mut rng = StdRng::seed_from_u64(9);
        let mentor = Personality {
            trait_kind: Trait::Calm,
            facets: Facets::new(15, 15, 0, 15),
        };
        let mut apprentice = Personality {
            trait_kind: Trait::Strange,
            facets: Facets::new(0, 0, 8, 0),
        };
        let start = apprentice.facets.distance(&mentor.facets);
        let moved = (0..10)
            .filter(|_| apprentice.mentor_influence(&mentor, &mut rng).is_some())
            .count() as u32;
        assert!(moved > 0);
        assert_eq!(apprentice.facets.distance(&mentor.facets), start - moved);
        assert!(apprentice.trait_kind.ranges().miss(&apprentice.facets) <= Trait::Strange.ranges().miss(&apprentice.facets));
    }

    #[test]
    fn test_identical_personality_cannot_be_influenced() {
        let mut rng = StdRng::seed_from_u64(1);
        let mentor = Personality::random(false, &mut rng);
        let mut copy = mentor;
        assert_eq!(copy.mentor_influence(&mentor, &mut rng), None);
    }

    #[test]
    fn test_compatibility() {
        let calm = Personality {
            trait_kind: Trait::Calm,
            facets: Facets::new(10, 8, 2, 12),
        };
        let similar = Personality {
            trait_kind: Trait::Thoughtful,
            facets: Facets::new(11, 7, 3, 13),
        };
        let opposite = Personality {
            trait_kind: Trait::Bloodthirsty,
            facets: Facets::new(1, 1, 15, 2),
        };
        assert_eq!(compatibility(&calm, &similar), Compatibility::Positive);
        assert_eq!(compatibility(&calm, &opposite), Compatibility::Negative);
        assert_eq!(compatibility(&opposite, &opposite), Compatibility::Negative);
    }

    #[test]
    fn test_inherit_stays_near_parents() {
        let mut rng = StdRng::seed_from_u64(30);
        let a = Personality {
            trait_kind: Trait::Loyal,
            facets: Facets::new(14, 12, 8, 10),
        };
        let b = Personality {
            trait_kind: Trait::Faithful,
            facets: Facets::new(12, 10, 6, 12),
        };
        for _ in 0..50 {
            let kit = Personality::inherit(&[&a, &b], true, &mut rng);
            assert!(kit.is_kit());
            assert!((11..=15).contains(&kit.facets.lawfulness));
            assert!((4..=9).contains(&kit.facets.aggression));
        }
    }
}
