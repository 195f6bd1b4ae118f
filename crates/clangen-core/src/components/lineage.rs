//! Family and training links between cats

use serde::{Deserialize, Serialize};

use super::CatId;

/// Parents and mentorship. Wider kinship is derived by
/// [`InheritanceCache`](crate::inheritance::InheritanceCache).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub parent1: Option<CatId>,
    pub parent2: Option<CatId>,
    pub adoptive_parents: Vec<CatId>,
    pub mentor: Option<CatId>,
    pub former_mentors: Vec<CatId>,
    pub apprentices: Vec<CatId>,
    pub former_apprentices: Vec<CatId>,
}

impl Lineage {
    pub fn with_parents(parent1: Option<CatId>, parent2: Option<CatId>) -> Self {
        Self {
            parent1,
            parent2,
            ..Default::default()
        }
    }

    /// Blood parents only
    pub fn blood_parents(&self) -> Vec<CatId> {
        self.parent1.iter().chain(self.parent2.iter()).copied().collect()
    }

    /// Blood and adoptive parents
    pub fn all_parents(&self) -> Vec<CatId> {
        let mut out = self.blood_parents();
        for &p in &self.adoptive_parents {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        out
    }

    /// Drop the current mentor, remembering them.
    pub fn end_mentorship(&mut self) -> Option<CatId> {
        let mentor = self.mentor.take()?;
        if !self.former_mentors.contains(&mentor) {
            self.former_mentors.push(mentor);
        }
        Some(mentor)
    }

    /// Mentor side of [`end_mentorship`](Self::end_mentorship).
    pub fn release_apprentice(&mut self, apprentice: CatId) {
        self.apprentices.retain(|&a| a != apprentice);
        if !self.former_apprentices.contains(&apprentice) {
            self.former_apprentices.push(apprentice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_dedup() {
        let mut l = Lineage::with_parents(Some(CatId(1)), Some(CatId(2)));
        l.adoptive_parents = vec![CatId(2), CatId(3)];
        assert_eq!(l.blood_parents(), vec![CatId(1), CatId(2)]);
        assert_eq!(l.all_parents(), vec![CatId(1), CatId(2), CatId(3)]);
    }

    #[test]
    fn test_mentorship_history() {
        let mut app = Lineage {
            mentor: Some(CatId(5)),
            ..Default::default()
        };
        let mut mentor = Lineage {
            apprentices: vec![CatId(9)],
            ..Default::default()
        };
        assert_eq!(app.end_mentorship(), Some(CatId(5)));
        mentor.release_apprentice(CatId(9));
        assert_eq!(app.mentor, None);
        assert_eq!(app.former_mentors, vec![CatId(5)]);
        assert!(mentor.apprentices.is_empty());
        assert_eq!(mentor.former_apprentices, vec![CatId(9)]);
        assert_eq!(app.end_mentorship(), None);
    }
}
