//! Identity components: Cat, CatId, Identity, Age, Role, Thought

use std::fmt;

use clangen_logic::age::AgeGroup;
use clangen_logic::pelt::Gender;
use clangen_logic::status::Status;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as a cat
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Cat;

/// Stable cat id. Survives save/load and fading, unlike `hecs::Entity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatId(pub u32);

impl fmt::Display for CatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a cat identifies, separate from the sex used for pelt genetics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderAlign {
    Female,
    Male,
    TransFemale,
    TransMale,
    Nonbinary,
}

impl GenderAlign {
    /// Most cats align with their sex; a few don't.
    pub fn random(gender: Gender, rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..100) {
            0..=3 => GenderAlign::Nonbinary,
            4..=7 => match gender {
                Gender::Female => GenderAlign::TransMale,
                Gender::Male => GenderAlign::TransFemale,
            },
            _ => match gender {
                Gender::Female => GenderAlign::Female,
                Gender::Male => GenderAlign::Male,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GenderAlign::Female => "she-cat",
            GenderAlign::Male => "tom",
            GenderAlign::TransFemale => "trans she-cat",
            GenderAlign::TransMale => "trans tom",
            GenderAlign::Nonbinary => "nonbinary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: CatId,
    pub gender: Gender,
    pub gender_align: GenderAlign,
}

/// Age in moons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    pub moons: u32,
}

impl Age {
    pub fn new(moons: u32) -> Self {
        Self { moons }
    }

    pub fn group(&self) -> AgeGroup {
        AgeGroup::from_moons(self.moons)
    }
}

/// Rank in (or outside) the Clan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub status: Status,
    /// Only leaders hold more than zero.
    pub leader_lives: u8,
}

impl Role {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            leader_lives: 0,
        }
    }

    pub fn leader(lives: u8) -> Self {
        Self {
            status: Status::Leader,
            leader_lives: lives,
        }
    }

    pub fn in_clan(&self) -> bool {
        !self.status.is_outside()
    }
}

/// What the cat is thinking this moon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    pub text: String,
}

impl Thought {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
