//! Derived family trees
//!
//! Only parent links are stored; everything else (siblings, cousins,
//! grandparents) is computed on first use and cached per cat. The parent
//! table keeps faded cats so their descendants still know their family.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::components::CatId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ParentLinks {
    blood: Vec<CatId>,
    adoptive: Vec<CatId>,
}

impl ParentLinks {
    fn all(&self) -> impl Iterator<Item = CatId> + '_ {
        self.blood.iter().chain(self.adoptive.iter()).copied()
    }
}

/// A cat's family, each list sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inheritance {
    /// Blood and adoptive parents
    pub parents: Vec<CatId>,
    pub grandparents: Vec<CatId>,
    /// Share every blood parent
    pub siblings: Vec<CatId>,
    /// Share some but not all blood parents
    pub half_siblings: Vec<CatId>,
    pub kits: Vec<CatId>,
    pub grandkits: Vec<CatId>,
    /// Parents' siblings
    pub aunts_uncles: Vec<CatId>,
    /// Siblings' kits
    pub siblings_kits: Vec<CatId>,
    pub cousins: Vec<CatId>,
}

impl Inheritance {
    pub fn all_kin(&self) -> BTreeSet<CatId> {
        [
            &self.parents,
            &self.grandparents,
            &self.siblings,
            &self.half_siblings,
            &self.kits,
            &self.grandkits,
            &self.aunts_uncles,
            &self.siblings_kits,
            &self.cousins,
        ]
        .into_iter()
        .flatten()
        .copied()
        .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InheritanceCache {
    links: BTreeMap<CatId, ParentLinks>,
    cache: BTreeMap<CatId, Inheritance>,
}

impl InheritanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cat's blood parents. Replaces earlier blood links.
    pub fn register(&mut self, id: CatId, blood: &[CatId]) {
        self.links.entry(id).or_default().blood = blood.to_vec();
        self.invalidate();
    }

    pub fn add_adoptive(&mut self, id: CatId, parent: CatId) {
        let links = self.links.entry(id).or_default();
        if !links.adoptive.contains(&parent) {
            links.adoptive.push(parent);
        }
        self.invalidate();
    }

    /// Forget every derived family tree.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn contains(&self, id: CatId) -> bool {
        self.links.contains_key(&id)
    }

    pub fn get(&mut self, id: CatId) -> &Inheritance {
        if !self.cache.contains_key(&id) {
            let computed = self.compute(id);
            self.cache.insert(id, computed);
        }
        &self.cache[&id]
    }

    pub fn is_related(&mut self, a: CatId, b: CatId) -> bool {
        a != b && self.get(a).all_kin().contains(&b)
    }

    fn blood_of(&self, id: CatId) -> &[CatId] {
        match self.links.get(&id) {
            Some(links) => &links.blood,
            None => &[],
        }
    }

    fn parents_of(&self, id: CatId) -> BTreeSet<CatId> {
        self.links.get(&id).map(|l| l.all().collect()).unwrap_or_default()
    }

    fn kits_of(&self, id: CatId) -> BTreeSet<CatId> {
        self.links
            .iter()
            .filter(|(_, l)| l.all().any(|p| p == id))
            .map(|(&k, _)| k)
            .collect()
    }

    /// (full siblings, half siblings) by blood
    fn siblings_of(&self, id: CatId) -> (BTreeSet<CatId>, BTreeSet<CatId>) {
        let mine: BTreeSet<CatId> = self.blood_of(id).iter().copied().collect();
        let mut full = BTreeSet::new();
        let mut half = BTreeSet::new();
        if mine.is_empty() {
            return (full, half);
        }
        for (&other, links) in &self.links {
            if other == id || links.blood.is_empty() {
                continue;
            }
            let theirs: BTreeSet<CatId> = links.blood.iter().copied().collect();
            if theirs == mine {
                full.insert(other);
            } else if !theirs.is_disjoint(&mine) {
                half.insert(other);
            }
        }
        (full, half)
    }

    fn compute(&self, id: CatId) -> Inheritance {
        let parents = self.parents_of(id);
        let grandparents: BTreeSet<CatId> = parents.iter().flat_map(|&p| self.parents_of(p)).collect();
        let (siblings, half_siblings) = self.siblings_of(id);
        let kits = self.kits_of(id);
        let grandkits: BTreeSet<CatId> = kits.iter().flat_map(|&k| self.kits_of(k)).collect();

        let mut aunts_uncles = BTreeSet::new();
        for &p in &parents {
            let (full, half) = self.siblings_of(p);
            aunts_uncles.extend(full);
            aunts_uncles.extend(half);
        }
        let siblings_kits: BTreeSet<CatId> = siblings
            .iter()
            .chain(half_siblings.iter())
            .flat_map(|&s| self.kits_of(s))
            .collect();
        let cousins: BTreeSet<CatId> = aunts_uncles.iter().flat_map(|&a| self.kits_of(a)).collect();

        let without_self = |set: BTreeSet<CatId>| set.into_iter().filter(|&c| c != id).collect::<Vec<_>>();
        Inheritance {
            parents: without_self(parents),
            grandparents: without_self(grandparents),
            siblings: without_self(siblings),
            half_siblings: without_self(half_siblings),
            kits: without_self(kits),
            grandkits: without_self(grandkits),
            aunts_uncles: without_self(aunts_uncles),
            siblings_kits: without_self(siblings_kits),
            cousins: without_self(cousins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> CatId {
        CatId(n)
    }

    /// 1 + 2 -> 3, 4 ; 1 + 5 -> 6 ; 3 + 7 -> 8 ; 4 + 9 -> 10
    fn family() -> InheritanceCache {
        let mut c = InheritanceCache::new();
        for n in [1, 2, 5, 7, 9] {
            c.register(id(n), &[]);
        }
        c.register(id(3), &[id(1), id(2)]);
        c.register(id(4), &[id(1), id(2)]);
        c.register(id(6), &[id(1), id(5)]);
        c.register(id(8), &[id(3), id(7)]);
        c.register(id(10), &[id(4), id(9)]);
        c
    }

    #[test]
    fn test_siblings_and_half_siblings() {
        let mut c = family();
        let inh = c.get(id(3)).clone();
        assert_eq!(inh.parents, vec![id(1), id(2)]);
        assert_eq!(inh.siblings, vec![id(4)]);
        assert_eq!(inh.half_siblings, vec![id(6)]);
        assert_eq!(inh.kits, vec![id(8)]);
    }

    #[test]
    fn test_extended_family() {
        let mut c = family();
        let inh = c.get(id(8)).clone();
        assert_eq!(inh.grandparents, vec![id(1), id(2)]);
        assert_eq!(inh.aunts_uncles, vec![id(4), id(6)]);
        assert_eq!(inh.cousins, vec![id(10)]);
        assert_eq!(c.get(id(1)).grandkits, vec![id(8), id(10)]);
        assert_eq!(c.get(id(4)).siblings_kits, vec![id(8)]);
    }

    #[test]
    fn test_is_related() {
        let mut c = family();
        assert!(c.is_related(id(8), id(10)));
        assert!(c.is_related(id(1), id(8)));
        assert!(!c.is_related(id(7), id(9)));
        assert!(!c.is_related(id(3), id(3)));
        assert!(!c.is_related(id(7), id(2)));
    }

    #[test]
    fn test_adoption_invalidates() {
        let mut c = family();
        assert!(c.get(id(9)).kits == vec![id(10)]);
        c.add_adoptive(id(6), id(9));
        assert_eq!(c.get(id(9)).kits, vec![id(6), id(10)]);
        assert!(c.get(id(6)).parents.contains(&id(9)));
    }
}
