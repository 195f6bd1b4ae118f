//! Errors returned by engine operations and persistence

use std::fmt;

use clangen_logic::relation::Bond;
use clangen_logic::status::{Status, TransitionDenied};
use thiserror::Error;

use crate::components::CatId;

/// Why a bond was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondDenial {
    TooYoung,
    Related,
    MentorPair,
    /// The pair already holds a different bond. Clear it first.
    Conflicting(Bond),
    NotInClan,
}

impl fmt::Display for BondDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondDenial::TooYoung => write!(f, "one of them is too young"),
            BondDenial::Related => write!(f, "they are related"),
            BondDenial::MentorPair => write!(f, "one is mentoring the other"),
            BondDenial::Conflicting(bond) => write!(f, "they are already {}", bond.label()),
            BondDenial::NotInClan => write!(f, "one of them is not in the Clan"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClanError {
    #[error("no cat with id {0}")]
    UnknownCat(CatId),
    #[error("cat {0} is dead")]
    DeadCat(CatId),
    #[error("cat {0} is still alive")]
    NotDead(CatId),
    #[error("the Clan already has a living {}", .0.label())]
    RoleTaken(Status),
    #[error("cat {id} cannot go from {} to {}: {reason}", .from.label(), .to.label())]
    TransitionDenied {
        id: CatId,
        from: Status,
        to: Status,
        reason: TransitionDenied,
    },
    #[error("cat {mentor} cannot mentor {apprentice}")]
    InvalidMentor { apprentice: CatId, mentor: CatId },
    #[error("cats {a} and {b} cannot become {}: {reason}", .bond.label())]
    BondDenied {
        a: CatId,
        b: CatId,
        bond: Bond,
        reason: BondDenial,
    },
    #[error("cat {0} cannot have a relationship with itself")]
    SelfRelation(CatId),
    #[error("unknown condition {0:?}")]
    UnknownCondition(String),
    #[error("cat {0} is not a mediator")]
    NotAMediator(CatId),
    #[error("cat {0} has already mediated this moon")]
    AlreadyMediated(CatId),
    #[error("cat {parent} is already a parent of {kit}")]
    AlreadyParent { kit: CatId, parent: CatId },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("the Clan has already been generated")]
    AlreadyGenerated,
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Corrupt save: {0}")]
    Corrupt(String),
}
