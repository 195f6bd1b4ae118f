//! Moon events - the narrative record of what happened to the Clan

use serde::{Deserialize, Serialize};

use crate::components::CatId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Birth,
    Death,
    Ceremony,
    Mentor,
    Bond,
    Condition,
    Recovery,
    Grief,
    Alter,
    Fade,
    Mediation,
    Adoption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonEvent {
    pub moon: u32,
    pub kind: EventKind,
    /// Cats involved, main cat first.
    pub cats: Vec<CatId>,
    pub text: String,
}

impl MoonEvent {
    pub fn involves(&self, id: CatId) -> bool {
        self.cats.contains(&id)
    }
}

/// Rolling event history covering the last `keep_moons` moons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonLog {
    events: Vec<MoonEvent>,
    keep_moons: u32,
}

impl Default for MoonLog {
    fn default() -> Self {
        Self::new(12)
    }
}

impl MoonLog {
    pub fn new(keep_moons: u32) -> Self {
        Self {
            events: Vec::new(),
            keep_moons: keep_moons.max(1),
        }
    }

    pub fn push(&mut self, moon: u32, kind: EventKind, cats: Vec<CatId>, text: impl Into<String>) {
        let text = text.into();
        log::debug!("[moon {moon}] {kind:?}: {text}");
        self.events.push(MoonEvent {
            moon,
            kind,
            cats,
            text,
        });
    }

    /// Forget events older than the window.
    pub fn prune(&mut self, current_moon: u32) {
        let oldest = current_moon.saturating_sub(self.keep_moons.saturating_sub(1));
        self.events.retain(|e| e.moon >= oldest);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoonEvent> {
        self.events.iter()
    }

    pub fn for_moon(&self, moon: u32) -> impl Iterator<Item = &MoonEvent> {
        self.events.iter().filter(move |e| e.moon == moon)
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &MoonEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn about(&self, id: CatId) -> impl Iterator<Item = &MoonEvent> {
        self.events.iter().filter(move |e| e.involves(id))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_keeps_window() {
        let mut log = MoonLog::new(3);
        for moon in 0..10 {
            log.push(moon, EventKind::Birth, vec![CatId(moon)], "kits!");
        }
        log.prune(9);
        let moons: Vec<u32> = log.iter().map(|e| e.moon).collect();
        assert_eq!(moons, vec![7, 8, 9]);
    }

    #[test]
    fn test_filters() {
        let mut log = MoonLog::default();
        log.push(1, EventKind::Death, vec![CatId(1), CatId(2)], "a");
        log.push(1, EventKind::Grief, vec![CatId(2)], "b");
        log.push(2, EventKind::Fade, vec![CatId(1)], "c");
        assert_eq!(log.for_moon(1).count(), 2);
        assert_eq!(log.of_kind(EventKind::Grief).count(), 1);
        assert_eq!(log.about(CatId(1)).count(), 2);
    }
}
