//! Age groups derived from a cat's age in moons.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Life stage of a cat. Every moon-based rule keys off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Newborn,
    Kitten,
    Adolescent,
    YoungAdult,
    Adult,
    SeniorAdult,
    Senior,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 7] = [
        AgeGroup::Newborn,
        AgeGroup::Kitten,
        AgeGroup::Adolescent,
        AgeGroup::YoungAdult,
        AgeGroup::Adult,
        AgeGroup::SeniorAdult,
        AgeGroup::Senior,
    ];

    pub fn from_moons(moons: u32) -> Self {
        match moons {
            0 => AgeGroup::Newborn,
            1..=5 => AgeGroup::Kitten,
            6..=11 => AgeGroup::Adolescent,
            12..=47 => AgeGroup::YoungAdult,
            48..=95 => AgeGroup::Adult,
            96..=119 => AgeGroup::SeniorAdult,
            _ => AgeGroup::Senior,
        }
    }

    /// Inclusive moon range covered by this group. Seniors are capped at 200
    /// for random rolls.
    pub fn moon_range(self) -> (u32, u32) {
        match self {
            AgeGroup::Newborn => (0, 0),
            AgeGroup::Kitten => (1, 5),
            AgeGroup::Adolescent => (6, 11),
            AgeGroup::YoungAdult => (12, 47),
            AgeGroup::Adult => (48, 95),
            AgeGroup::SeniorAdult => (96, 119),
            AgeGroup::Senior => (120, 200),
        }
    }

    /// Random age inside the group.
    pub fn random_moons(self, rng: &mut impl Rng) -> u32 {
        let (lo, hi) = self.moon_range();
        rng.gen_range(lo..=hi)
    }

    pub fn is_kit(self) -> bool {
        matches!(self, AgeGroup::Newborn | AgeGroup::Kitten)
    }

    /// Old enough to take a mate.
    pub fn is_grown(self) -> bool {
        self >= AgeGroup::YoungAdult
    }

    pub fn is_elderly(self) -> bool {
        self >= AgeGroup::SeniorAdult
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Newborn => "newborn",
            AgeGroup::Kitten => "kitten",
            AgeGroup::Adolescent => "adolescent",
            AgeGroup::YoungAdult => "young adult",
            AgeGroup::Adult => "adult",
            AgeGroup::SeniorAdult => "senior adult",
            AgeGroup::Senior => "senior",
        }
    }
}
