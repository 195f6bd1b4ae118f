//! Plural systems: alters living alongside a host.
//!
//! Cats with an alter-granting permanent condition carry an
//! [`AlterSystem`]. The host is always alter 0 and can never be removed;
//! new alters split off over time (faster after trauma) and the fronting
//! alter switches now and then.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::names;
use crate::weighted::{percent, pick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlterRole {
    Host,
    Protector,
    Caregiver,
    Persecutor,
    Little,
    TraumaHolder,
    Fragment,
}

impl AlterRole {
    pub fn label(self) -> &'static str {
        match self {
            AlterRole::Host => "host",
            AlterRole::Protector => "protector",
            AlterRole::Caregiver => "caregiver",
            AlterRole::Persecutor => "persecutor",
            AlterRole::Little => "little",
            AlterRole::TraumaHolder => "trauma holder",
            AlterRole::Fragment => "fragment",
        }
    }
}

static CALM_ROLES: &[(AlterRole, u32)] = &[
    (AlterRole::Caregiver, 25),
    (AlterRole::Little, 25),
    (AlterRole::Fragment, 25),
    (AlterRole::Protector, 15),
    (AlterRole::Persecutor, 5),
    (AlterRole::TraumaHolder, 5),
];

static TRAUMA_ROLES: &[(AlterRole, u32)] = &[
    (AlterRole::Protector, 35),
    (AlterRole::TraumaHolder, 30),
    (AlterRole::Persecutor, 15),
    (AlterRole::Fragment, 10),
    (AlterRole::Little, 5),
    (AlterRole::Caregiver, 5),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alter {
    pub id: u32,
    pub name: String,
    pub role: AlterRole,
    pub formed_moon: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterConfig {
    /// Percent chance per moon of a new alter splitting off.
    pub split_chance: u32,
    /// Split chance multiplier in the moon after a trauma.
    pub trauma_multiplier: u32,
    /// Percent chance per moon of a switch in who is fronting.
    pub switch_chance: u32,
    /// Upper bound on alters, host included.
    pub max_alters: usize,
}

impl Default for AlterConfig {
    fn default() -> Self {
        Self {
            split_chance: 5,
            trauma_multiplier: 3,
            switch_chance: 20,
            max_alters: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterSystem {
    alters: Vec<Alter>,
    fronting: u32,
    next_id: u32,
}

impl AlterSystem {
    pub fn new_with_host(name: impl Into<String>, moon: u32) -> Self {
        Self {
            alters: vec![Alter {
                id: 0,
                name: name.into(),
                role: AlterRole::Host,
                formed_moon: moon,
            }],
            fronting: 0,
            next_id: 1,
        }
    }

    pub fn alters(&self) -> &[Alter] {
        &self.alters
    }

    pub fn len(&self) -> usize {
        self.alters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alters.is_empty()
    }

    pub fn host(&self) -> Option<&Alter> {
        self.alters.iter().find(|a| a.role == AlterRole::Host)
    }

    /// The alter currently fronting. Falls back to the host.
    pub fn front(&self) -> Option<&Alter> {
        self.alters
            .iter()
            .find(|a| a.id == self.fronting)
            .or_else(|| self.host())
    }

    /// Roll for a new alter this moon.
    pub fn try_split(&mut self, trauma: bool, moon: u32, config: &AlterConfig, rng: &mut impl Rng) -> Option<&Alter> {
        if self.alters.len() >= config.max_alters {
            return None;
        }
        let chance = if trauma {
            config.split_chance.saturating_mul(config.trauma_multiplier)
        } else {
            config.split_chance
        };
        if !percent(chance, rng) {
            return None;
        }
        let table = if trauma { TRAUMA_ROLES } else { CALM_ROLES };
        let role = pick(table, rng)?;
        let mut name = names::random_name(None, rng).full();
        for _ in 0..20 {
            if !self.alters.iter().any(|a| a.name == name) {
                break;
            }
            name = names::random_name(None, rng).full();
        }
        self.alters.push(Alter {
            id: self.next_id,
            name,
            role,
            formed_moon: moon,
        });
        self.next_id += 1;
        self.alters.last()
    }

    /// Roll for a switch. Returns the id of the new fronting alter.
    pub fn maybe_switch(&mut self, config: &AlterConfig, rng: &mut impl Rng) -> Option<u32> {
        if self.alters.len() < 2 || !percent(config.switch_chance, rng) {
            return None;
        }
        let others: Vec<u32> = self
            .alters
            .iter()
            .map(|a| a.id)
            .filter(|&id| id != self.fronting)
            .collect();
        let id = others[rng.gen_range(0..others.len())];
        self.fronting = id;
        Some(id)
    }

    /// Repair a system loaded from an older save: ensure a host exists and
    /// the fronting id points at a real alter.
    pub fn normalise(&mut self, host_name: &str) {
        if self.host().is_none() {
            self.alters.insert(
                0,
                Alter {
                    id: self.next_id,
                    name: host_name.to_string(),
                    role: AlterRole::Host,
                    formed_moon: 0,
                },
            );
            self.next_id += 1;
        }
        if !self.alters.iter().any(|a| a.id == self.fronting) {
            self.fronting = self.alters[0].id;
        }
        let max = self.alters.iter().map(|a| a.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn always() -> AlterConfig {
        AlterConfig {
            split_chance: 100,
            trauma_multiplier: 1,
            switch_chance: 100,
            max_alters: 4,
        }
    }

    #[test]
    fn test_host_fronts_at_start() {
        let sys = AlterSystem::new_with_host("Mistfur", 12);
        assert_eq!(sys.len(), 1);
        assert_eq!(sys.front().unwrap().role, AlterRole::Host);
        assert_eq!(sys.front().unwrap().name, "Mistfur");
    }

    #[test]
    fn test_split_respects_max() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sys = AlterSystem::new_with_host("Mistfur", 0);
        for moon in 1..10 {
            sys.try_split(false, moon, &always(), &mut rng);
        }
        assert_eq!(sys.len(), 4);
        assert_eq!(sys.host().unwrap().id, 0);
        let ids: Vec<u32> = sys.alters().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(sys.alters().iter().skip(1).all(|a| a.role != AlterRole::Host));
    }

    #[test]
    fn test_no_split_with_zero_chance() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = AlterConfig {
            split_chance: 0,
            ..AlterConfig::default()
        };
        let mut sys = AlterSystem::new_with_host("Mistfur", 0);
        for moon in 0..100 {
            assert!(sys.try_split(true, moon, &config, &mut rng).is_none());
        }
    }

    #[test]
    fn test_switch_changes_front() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sys = AlterSystem::new_with_host("Mistfur", 0);
        assert_eq!(sys.maybe_switch(&always(), &mut rng), None);
        sys.try_split(true, 1, &always(), &mut rng);
        let before = sys.front().unwrap().id;
        let after = sys.maybe_switch(&always(), &mut rng).unwrap();
        assert_ne!(before, after);
        assert_eq!(sys.front().unwrap().id, after);
    }

    #[test]
    fn test_normalise_repairs_front() {
        let mut sys = AlterSystem::new_with_host("Mistfur", 0);
        sys.fronting = 42;
        sys.normalise("Mistfur");
        assert_eq!(sys.front().unwrap().id, 0);
    }
}
