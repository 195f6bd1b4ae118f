//! Life and health components: Life, Conditions, Pregnancy

use clangen_logic::conditions::ConditionKind;
use clangen_logic::health::ActiveCondition;
use clangen_logic::status::Afterlife;
use serde::{Deserialize, Serialize};

use super::CatId;

/// Whether a cat is alive, and where they went if not
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Life {
    #[default]
    Alive,
    Dead {
        moons_dead: u32,
        cause: String,
        afterlife: Afterlife,
    },
}

impl Life {
    pub fn is_alive(&self) -> bool {
        matches!(self, Life::Alive)
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    pub fn afterlife(&self) -> Option<Afterlife> {
        match self {
            Life::Alive => None,
            Life::Dead { afterlife, .. } => Some(*afterlife),
        }
    }

    pub fn moons_dead(&self) -> u32 {
        match self {
            Life::Alive => 0,
            Life::Dead { moons_dead, .. } => *moons_dead,
        }
    }
}

/// Everything a cat is currently suffering from, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    pub illnesses: Vec<ActiveCondition>,
    pub injuries: Vec<ActiveCondition>,
    pub permanent: Vec<ActiveCondition>,
}

impl Conditions {
    /// Add a condition to the list matching its kind. Returns false if the
    /// cat already has it.
    pub fn add(&mut self, condition: ActiveCondition) -> bool {
        if self.has(&condition.name) {
            return false;
        }
        self.list_mut(condition.kind).push(condition);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<ActiveCondition> {
        for list in [&mut self.illnesses, &mut self.injuries, &mut self.permanent] {
            if let Some(idx) = list.iter().position(|c| c.name == name) {
                return Some(list.remove(idx));
            }
        }
        None
    }

    pub fn has(&self, name: &str) -> bool {
        self.iter().any(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveCondition> {
        self.illnesses
            .iter()
            .chain(self.injuries.iter())
            .chain(self.permanent.iter())
    }

    pub fn list_mut(&mut self, kind: ConditionKind) -> &mut Vec<ActiveCondition> {
        match kind {
            ConditionKind::Illness => &mut self.illnesses,
            ConditionKind::Injury => &mut self.injuries,
            ConditionKind::Permanent => &mut self.permanent,
        }
    }

    pub fn is_ill(&self) -> bool {
        !self.illnesses.is_empty()
    }

    pub fn is_injured(&self) -> bool {
        !self.injuries.is_empty()
    }

    /// An active (not dormant) permanent condition grants alters.
    pub fn grants_alters(&self) -> bool {
        self.permanent
            .iter()
            .any(|c| !c.is_dormant() && c.def().is_some_and(|d| d.grants_alters))
    }

    /// Leaders who lose a life wake up healed of anything temporary.
    pub fn clear_temporary(&mut self) {
        self.illnesses.clear();
        self.injuries.clear();
    }
}

/// A cat expecting kits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pregnancy {
    pub other_parent: Option<CatId>,
    pub moons_left: u32,
}
