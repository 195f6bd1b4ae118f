//! Relationship graph: directed feelings and symmetric bonds
//!
//! Feelings are directed (`from` → `to`): a cat can adore someone who barely
//! notices them. Bonds (mates, best friends, enemies) are stored once per
//! unordered pair, so a pair can never be mates and enemies at the same time.

use std::collections::BTreeMap;

use clangen_logic::relation::{Bond, RelationshipStats, StatDelta};
use serde::{Deserialize, Serialize};

use crate::components::CatId;
use crate::error::{BondDenial, ClanError};

fn ordered(a: CatId, b: CatId) -> (CatId, CatId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    stats: BTreeMap<CatId, BTreeMap<CatId, RelationshipStats>>,
    /// Keyed by the smaller id of the pair.
    bonds: BTreeMap<CatId, BTreeMap<CatId, Bond>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create `from`'s feelings towards `to`
    pub fn ensure(&mut self, from: CatId, to: CatId) -> &mut RelationshipStats {
        self.stats.entry(from).or_default().entry(to).or_default()
    }

    pub fn get(&self, from: CatId, to: CatId) -> Option<&RelationshipStats> {
        self.stats.get(&from)?.get(&to)
    }

    pub fn get_mut(&mut self, from: CatId, to: CatId) -> Option<&mut RelationshipStats> {
        self.stats.get_mut(&from)?.get_mut(&to)
    }

    /// Overwrite a relationship, e.g. starting feelings or a loaded record.
    pub fn insert(&mut self, from: CatId, to: CatId, stats: RelationshipStats) {
        if from != to {
            self.stats.entry(from).or_default().insert(to, stats);
        }
    }

    /// Shift `from`'s feelings towards `to`, creating them if needed.
    pub fn apply(&mut self, from: CatId, to: CatId, delta: &StatDelta) -> Result<(), ClanError> {
        if from == to {
            return Err(ClanError::SelfRelation(from));
        }
        self.ensure(from, to).apply(delta);
        Ok(())
    }

    /// Every cat `from` has feelings about.
    pub fn known_by(&self, from: CatId) -> impl Iterator<Item = (CatId, &RelationshipStats)> {
        self.stats
            .get(&from)
            .into_iter()
            .flat_map(|m| m.iter().map(|(&id, s)| (id, s)))
    }

    pub fn bond(&self, a: CatId, b: CatId) -> Option<Bond> {
        let (lo, hi) = ordered(a, b);
        self.bonds.get(&lo)?.get(&hi).copied()
    }

    /// Record a bond. Setting the bond the pair already has is a no-op; a
    /// different existing bond must be cleared first.
    pub fn set_bond(&mut self, a: CatId, b: CatId, bond: Bond) -> Result<(), ClanError> {
        if a == b {
            return Err(ClanError::SelfRelation(a));
        }
        match self.bond(a, b) {
            Some(existing) if existing == bond => Ok(()),
            Some(existing) => Err(ClanError::BondDenied {
                a,
                b,
                bond,
                reason: BondDenial::Conflicting(existing),
            }),
            None => {
                let (lo, hi) = ordered(a, b);
                self.bonds.entry(lo).or_default().insert(hi, bond);
                Ok(())
            }
        }
    }

    pub fn clear_bond(&mut self, a: CatId, b: CatId) -> Option<Bond> {
        let (lo, hi) = ordered(a, b);
        let inner = self.bonds.get_mut(&lo)?;
        let bond = inner.remove(&hi);
        if inner.is_empty() {
            self.bonds.remove(&lo);
        }
        bond
    }

    /// All cats holding `bond` with `id`, in id order.
    pub fn bonded(&self, id: CatId, bond: Bond) -> Vec<CatId> {
        let mut out: Vec<CatId> = self
            .bonds
            .iter()
            .flat_map(|(&lo, inner)| inner.iter().map(move |(&hi, &b)| (lo, hi, b)))
            .filter(|&(lo, hi, b)| b == bond && (lo == id || hi == id))
            .map(|(lo, hi, _)| if lo == id { hi } else { lo })
            .collect();
        out.sort();
        out
    }

    pub fn mates_of(&self, id: CatId) -> Vec<CatId> {
        self.bonded(id, Bond::Mates)
    }

    pub fn besties_of(&self, id: CatId) -> Vec<CatId> {
        self.bonded(id, Bond::Besties)
    }

    pub fn enemies_of(&self, id: CatId) -> Vec<CatId> {
        self.bonded(id, Bond::Enemies)
    }

    /// Every bond as `(smaller id, larger id, bond)`.
    pub fn bonds(&self) -> Vec<(CatId, CatId, Bond)> {
        self.bonds
            .iter()
            .flat_map(|(&lo, inner)| inner.iter().map(move |(&hi, &b)| (lo, hi, b)))
            .collect()
    }

    /// Drop every bond involving `id`.
    pub fn clear_bonds_of(&mut self, id: CatId) -> Vec<(CatId, Bond)> {
        let pairs: Vec<(CatId, Bond)> = self
            .bonds()
            .into_iter()
            .filter(|&(lo, hi, _)| lo == id || hi == id)
            .map(|(lo, hi, b)| (if lo == id { hi } else { lo }, b))
            .collect();
        for &(other, _) in &pairs {
            self.clear_bond(id, other);
        }
        pairs
    }

    /// Forget a cat entirely, in both directions.
    pub fn remove_cat(&mut self, id: CatId) {
        self.stats.remove(&id);
        for inner in self.stats.values_mut() {
            inner.remove(&id);
        }
        self.stats.retain(|_, inner| !inner.is_empty());
        self.clear_bonds_of(id);
    }

    pub fn relationship_count(&self) -> usize {
        self.stats.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clangen_logic::relation::{Stat, STAT_MAX};

    #[test]
    fn test_feelings_are_directed() {
        let mut g = RelationshipGraph::new();
        g.apply(CatId(1), CatId(2), &StatDelta::only(Stat::PlatonicLike, 30)).unwrap();
        assert_eq!(g.get(CatId(1), CatId(2)).unwrap().platonic_like, 30);
        assert!(g.get(CatId(2), CatId(1)).is_none());
    }

    #[test]
    fn test_apply_stays_bounded() {
        let mut g = RelationshipGraph::new();
        for _ in 0..10 {
            g.apply(CatId(1), CatId(2), &StatDelta::only(Stat::Dislike, 40)).unwrap();
        }
        assert_eq!(g.get(CatId(1), CatId(2)).unwrap().dislike, STAT_MAX);
    }

    #[test]
    fn test_self_relation_rejected() {
        let mut g = RelationshipGraph::new();
        assert!(matches!(
            g.apply(CatId(3), CatId(3), &StatDelta::default()),
            Err(ClanError::SelfRelation(_))
        ));
        assert!(g.set_bond(CatId(3), CatId(3), Bond::Besties).is_err());
    }

    #[test]
    fn test_bond_is_symmetric_and_exclusive() {
        let mut g = RelationshipGraph::new();
        g.set_bond(CatId(5), CatId(2), Bond::Mates).unwrap();
        assert_eq!(g.bond(CatId(2), CatId(5)), Some(Bond::Mates));
        assert_eq!(g.mates_of(CatId(2)), vec![CatId(5)]);
        assert_eq!(g.mates_of(CatId(5)), vec![CatId(2)]);

        // Idempotent, but a different bond is refused.
        g.set_bond(CatId(2), CatId(5), Bond::Mates).unwrap();
        assert!(matches!(
            g.set_bond(CatId(2), CatId(5), Bond::Enemies),
            Err(ClanError::BondDenied {
                reason: BondDenial::Conflicting(Bond::Mates),
                ..
            })
        ));

        assert_eq!(g.clear_bond(CatId(5), CatId(2)), Some(Bond::Mates));
        g.set_bond(CatId(2), CatId(5), Bond::Enemies).unwrap();
        assert_eq!(g.enemies_of(CatId(5)), vec![CatId(2)]);
        assert!(g.mates_of(CatId(5)).is_empty());
    }

    #[test]
    fn test_remove_cat() {
        let mut g = RelationshipGraph::new();
        g.ensure(CatId(1), CatId(2));
        g.ensure(CatId(2), CatId(1));
        g.ensure(CatId(3), CatId(1));
        g.ensure(CatId(3), CatId(2));
        g.set_bond(CatId(1), CatId(3), Bond::Besties).unwrap();
        g.remove_cat(CatId(1));
        assert_eq!(g.relationship_count(), 1);
        assert!(g.known_by(CatId(2)).next().is_none());
        assert!(g.known_by(CatId(3)).all(|(id, _)| id != CatId(1)));
        assert!(g.bonds().is_empty());
    }
}
