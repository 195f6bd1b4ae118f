//! Clan ranks and the rules for moving between them.
//!
//! Status covers both Clan roles (kits, apprentices, warriors, leadership,
//! elders) and the outside statuses cats can hold beyond the borders.
//! Role changes requested by the player go through [`transition_allowed`];
//! aging promotions use [`Status::graduate`] and [`Status::default_for_moons`].

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Minimum age for any apprentice role.
pub const APPRENTICE_MIN_MOONS: u32 = 6;
/// Minimum age for full Clan roles, leadership and mates.
pub const FULL_ROLE_MIN_MOONS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Newborn,
    Kitten,
    Apprentice,
    Warrior,
    MediatorApprentice,
    Mediator,
    MedicineCatApprentice,
    MedicineCat,
    Deputy,
    Leader,
    Elder,
    Loner,
    Rogue,
    Kittypet,
    Exiled,
}

impl Status {
    pub const CLAN_ROLES: [Status; 11] = [
        Status::Newborn,
        Status::Kitten,
        Status::Apprentice,
        Status::Warrior,
        Status::MediatorApprentice,
        Status::Mediator,
        Status::MedicineCatApprentice,
        Status::MedicineCat,
        Status::Deputy,
        Status::Leader,
        Status::Elder,
    ];

    pub fn is_kit(self) -> bool {
        matches!(self, Status::Newborn | Status::Kitten)
    }

    pub fn is_apprentice(self) -> bool {
        matches!(
            self,
            Status::Apprentice | Status::MediatorApprentice | Status::MedicineCatApprentice
        )
    }

    pub fn is_outside(self) -> bool {
        matches!(self, Status::Loner | Status::Rogue | Status::Kittypet | Status::Exiled)
    }

    pub fn is_medicine(self) -> bool {
        matches!(self, Status::MedicineCat | Status::MedicineCatApprentice)
    }

    /// Warrior-track roles that go on patrols and fight.
    pub fn is_warrior_track(self) -> bool {
        matches!(self, Status::Apprentice | Status::Warrior | Status::Deputy | Status::Leader)
    }

    /// Roles a graduated cat can hold.
    pub fn is_full_role(self) -> bool {
        matches!(
            self,
            Status::Warrior | Status::Mediator | Status::MedicineCat | Status::Deputy | Status::Leader
        )
    }

    /// Statuses that need a mentor while training.
    pub fn needs_mentor(self) -> bool {
        self.is_apprentice()
    }

    /// The role an apprentice becomes at their ceremony.
    pub fn graduate(self) -> Option<Status> {
        match self {
            Status::Apprentice => Some(Status::Warrior),
            Status::MediatorApprentice => Some(Status::Mediator),
            Status::MedicineCatApprentice => Some(Status::MedicineCat),
            _ => None,
        }
    }

    /// Statuses allowed to mentor an apprentice of this status.
    pub fn mentor_statuses(self) -> &'static [Status] {
        match self {
            Status::Apprentice => &[Status::Warrior, Status::Deputy, Status::Leader],
            Status::MediatorApprentice => &[Status::Mediator],
            Status::MedicineCatApprentice => &[Status::MedicineCat],
            _ => &[],
        }
    }

    /// Whether a cat of this status can mentor `apprentice`.
    pub fn can_mentor(self, apprentice: Status) -> bool {
        apprentice.mentor_statuses().contains(&self)
    }

    /// Status a newly created Clan cat of this age gets by default.
    pub fn default_for_moons(moons: u32) -> Status {
        match moons {
            0 => Status::Newborn,
            1..=5 => Status::Kitten,
            6..=11 => Status::Apprentice,
            12..=119 => Status::Warrior,
            _ => Status::Elder,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Newborn => "newborn",
            Status::Kitten => "kitten",
            Status::Apprentice => "apprentice",
            Status::Warrior => "warrior",
            Status::MediatorApprentice => "mediator apprentice",
            Status::Mediator => "mediator",
            Status::MedicineCatApprentice => "medicine cat apprentice",
            Status::MedicineCat => "medicine cat",
            Status::Deputy => "deputy",
            Status::Leader => "leader",
            Status::Elder => "elder",
            Status::Loner => "loner",
            Status::Rogue => "rogue",
            Status::Kittypet => "kittypet",
            Status::Exiled => "exiled",
        }
    }
}

/// Why a requested role change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDenied {
    SameStatus,
    /// Kits only leave the nursery by aging into an apprenticeship.
    KitsOnlyByAging,
    TooYoung { required: u32 },
    /// Only kits and apprentices can start (or switch) an apprenticeship.
    NotAnApprenticeCandidate,
    /// Leadership is drawn from cats already holding a full role.
    NeedsFullRole,
    /// Outside statuses are handled by exile/join, not role changes.
    OutsideStatus,
    /// Only outsiders can join.
    AlreadyInClan,
}

impl std::fmt::Display for TransitionDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionDenied::SameStatus => write!(f, "cat already holds that status"),
            TransitionDenied::KitsOnlyByAging => write!(f, "kits only change status by aging"),
            TransitionDenied::TooYoung { required } => {
                write!(f, "cat must be at least {required} moons old")
            }
            TransitionDenied::NotAnApprenticeCandidate => {
                write!(f, "only kits and apprentices can begin an apprenticeship")
            }
            TransitionDenied::NeedsFullRole => write!(f, "leadership requires a full Clan role"),
            TransitionDenied::OutsideStatus => {
                write!(f, "outside statuses cannot be assigned as Clan roles")
            }
            TransitionDenied::AlreadyInClan => write!(f, "cat is already part of the Clan"),
        }
    }
}

/// Check a player-requested role change.
pub fn transition_allowed(from: Status, to: Status, moons: u32) -> Result<(), TransitionDenied> {
    if from == to {
        return Err(TransitionDenied::SameStatus);
    }
    if from.is_outside() || to.is_outside() {
        return Err(TransitionDenied::OutsideStatus);
    }
    if to.is_kit() {
        return Err(TransitionDenied::KitsOnlyByAging);
    }
    if to.is_apprentice() {
        if !(from.is_kit() || from.is_apprentice()) {
            return Err(TransitionDenied::NotAnApprenticeCandidate);
        }
        if moons < APPRENTICE_MIN_MOONS {
            return Err(if from.is_kit() {
                TransitionDenied::KitsOnlyByAging
            } else {
                TransitionDenied::TooYoung { required: APPRENTICE_MIN_MOONS }
            });
        }
        return Ok(());
    }
    if from.is_kit() {
        return Err(TransitionDenied::KitsOnlyByAging);
    }
    if moons < FULL_ROLE_MIN_MOONS {
        return Err(TransitionDenied::TooYoung { required: FULL_ROLE_MIN_MOONS });
    }
    if matches!(to, Status::Leader | Status::Deputy) && !from.is_full_role() {
        return Err(TransitionDenied::NeedsFullRole);
    }
    Ok(())
}

/// Check an outsider joining the Clan as `to`. Newcomers never join as
/// leader or deputy.
pub fn join_allowed(from: Status, to: Status, moons: u32) -> Result<(), TransitionDenied> {
    if !from.is_outside() {
        return Err(TransitionDenied::AlreadyInClan);
    }
    if to.is_outside() {
        return Err(TransitionDenied::OutsideStatus);
    }
    if matches!(to, Status::Leader | Status::Deputy) {
        return Err(TransitionDenied::NeedsFullRole);
    }
    let required = if to.is_kit() {
        0
    } else if to.is_apprentice() {
        APPRENTICE_MIN_MOONS
    } else {
        FULL_ROLE_MIN_MOONS
    };
    if moons < required {
        return Err(TransitionDenied::TooYoung { required });
    }
    Ok(())
}

/// Where a dead cat's spirit goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Afterlife {
    StarClan,
    DarkForest,
    /// Outsiders who never believed in StarClan.
    UnknownResidence,
}

impl Afterlife {
    /// Outside cats wander, cruel Clan cats usually end up in the Dark Forest.
    pub fn choose(status: Status, cruel: bool, rng: &mut impl Rng) -> Afterlife {
        if status.is_outside() {
            Afterlife::UnknownResidence
        } else if cruel && rng.gen_bool(0.75) {
            Afterlife::DarkForest
        } else if rng.gen_range(0..50) == 0 {
            Afterlife::DarkForest
        } else {
            Afterlife::StarClan
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Afterlife::StarClan => "StarClan",
            Afterlife::DarkForest => "the Dark Forest",
            Afterlife::UnknownResidence => "the Unknown Residence",
        }
    }
}
