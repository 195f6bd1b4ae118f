//! Relationship math between two cats.
//!
//! Each cat holds directed [`RelationshipStats`] towards other cats: seven
//! stats, each `0..=100`. Interactions produce a [`StatDelta`] that is
//! applied with clamping. Whether two cats *want* to become mates, besties
//! or enemies is decided here from the stats and [`BondThresholds`]; the
//! bond itself is stored symmetrically by the engine.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::personality::Compatibility;
use crate::weighted::{percent, pick};

pub const STAT_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    RomanticLove,
    PlatonicLike,
    Dislike,
    Admiration,
    Comfortable,
    Jealousy,
    Trust,
}

impl Stat {
    pub const ALL: [Stat; 7] = [
        Stat::RomanticLove,
        Stat::PlatonicLike,
        Stat::Dislike,
        Stat::Admiration,
        Stat::Comfortable,
        Stat::Jealousy,
        Stat::Trust,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipStats {
    pub romantic_love: u8,
    pub platonic_like: u8,
    pub dislike: u8,
    pub admiration: u8,
    pub comfortable: u8,
    pub jealousy: u8,
    pub trust: u8,
}

impl RelationshipStats {
    pub fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::RomanticLove => self.romantic_love,
            Stat::PlatonicLike => self.platonic_like,
            Stat::Dislike => self.dislike,
            Stat::Admiration => self.admiration,
            Stat::Comfortable => self.comfortable,
            Stat::Jealousy => self.jealousy,
            Stat::Trust => self.trust,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u8) {
        let v = value.min(STAT_MAX);
        match stat {
            Stat::RomanticLove => self.romantic_love = v,
            Stat::PlatonicLike => self.platonic_like = v,
            Stat::Dislike => self.dislike = v,
            Stat::Admiration => self.admiration = v,
            Stat::Comfortable => self.comfortable = v,
            Stat::Jealousy => self.jealousy = v,
            Stat::Trust => self.trust = v,
        }
    }

    /// Apply a change, clamping every stat to `0..=STAT_MAX`.
    pub fn apply(&mut self, delta: &StatDelta) {
        for stat in Stat::ALL {
            let v = self.get(stat) as i32 + delta.get(stat) as i32;
            self.set(stat, v.clamp(0, STAT_MAX as i32) as u8);
        }
    }

    /// Starting feelings between two Clanmates.
    pub fn starting(compat: Compatibility, kin: bool, rng: &mut impl Rng) -> Self {
        let family = if kin { 20 } else { 0 };
        let mut stats = Self {
            platonic_like: rng.gen_range(0..=20) + family,
            comfortable: rng.gen_range(0..=20) + family,
            trust: rng.gen_range(0..=15) + family / 2,
            admiration: rng.gen_range(0..=10),
            dislike: rng.gen_range(0..=10),
            ..Default::default()
        };
        match compat {
            Compatibility::Positive => stats.platonic_like += 10,
            Compatibility::Negative => stats.dislike += 10,
            Compatibility::Neutral => {}
        }
        stats
    }
}

/// A signed change to relationship stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub romantic_love: i16,
    pub platonic_like: i16,
    pub dislike: i16,
    pub admiration: i16,
    pub comfortable: i16,
    pub jealousy: i16,
    pub trust: i16,
}

impl StatDelta {
    pub fn get(&self, stat: Stat) -> i16 {
        match stat {
            Stat::RomanticLove => self.romantic_love,
            Stat::PlatonicLike => self.platonic_like,
            Stat::Dislike => self.dislike,
            Stat::Admiration => self.admiration,
            Stat::Comfortable => self.comfortable,
            Stat::Jealousy => self.jealousy,
            Stat::Trust => self.trust,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i16) {
        match stat {
            Stat::RomanticLove => self.romantic_love = value,
            Stat::PlatonicLike => self.platonic_like = value,
            Stat::Dislike => self.dislike = value,
            Stat::Admiration => self.admiration = value,
            Stat::Comfortable => self.comfortable = value,
            Stat::Jealousy => self.jealousy = value,
            Stat::Trust => self.trust = value,
        }
    }

    pub fn only(stat: Stat, value: i16) -> Self {
        let mut d = Self::default();
        d.set(stat, value);
        d
    }

    /// Scale every component by `num / den`.
    pub fn scaled(&self, num: i16, den: i16) -> Self {
        let mut d = Self::default();
        for stat in Stat::ALL {
            d.set(stat, self.get(stat) * num / den);
        }
        d
    }

    pub fn is_zero(&self) -> bool {
        Stat::ALL.iter().all(|&s| self.get(s) == 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Romantic,
    Platonic,
    Argument,
    Admiration,
    Comfort,
    Jealousy,
    Trust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn points(self) -> i16 {
        match self {
            Intensity::Low => 3,
            Intensity::Medium => 6,
            Intensity::High => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub intensity: Intensity,
    /// The interaction went well for the cat on the receiving end.
    pub positive: bool,
}

impl Interaction {
    /// Stat change this interaction causes, adjusted for compatibility:
    /// compatible cats take good moments to heart, incompatible cats bad ones.
    pub fn delta(&self, compat: Compatibility) -> StatDelta {
        let x = self.intensity.points();
        let half = x / 2;
        let base = match (self.kind, self.positive) {
            (InteractionKind::Romantic, true) => StatDelta {
                romantic_love: x,
                comfortable: half,
                ..Default::default()
            },
            (InteractionKind::Romantic, false) => StatDelta {
                romantic_love: -x,
                dislike: half,
                ..Default::default()
            },
            (InteractionKind::Platonic, true) => StatDelta::only(Stat::PlatonicLike, x),
            (InteractionKind::Platonic, false) => StatDelta {
                platonic_like: -x,
                dislike: half,
                ..Default::default()
            },
            (InteractionKind::Argument, true) => StatDelta::only(Stat::Dislike, -x),
            (InteractionKind::Argument, false) => StatDelta {
                dislike: x,
                platonic_like: -half,
                ..Default::default()
            },
            (InteractionKind::Admiration, p) => StatDelta::only(Stat::Admiration, if p { x } else { -x }),
            (InteractionKind::Comfort, p) => StatDelta::only(Stat::Comfortable, if p { x } else { -x }),
            (InteractionKind::Jealousy, true) => StatDelta::only(Stat::Jealousy, -x),
            (InteractionKind::Jealousy, false) => StatDelta {
                jealousy: x,
                dislike: half,
                ..Default::default()
            },
            (InteractionKind::Trust, p) => StatDelta::only(Stat::Trust, if p { x } else { -x }),
        };
        match (compat, self.positive) {
            (Compatibility::Positive, true) | (Compatibility::Negative, false) => base.scaled(3, 2),
            (Compatibility::Positive, false) | (Compatibility::Negative, true) => base.scaled(1, 2),
            (Compatibility::Neutral, _) => base,
        }
    }

    pub fn describe(&self) -> &'static str {
        match (self.kind, self.positive) {
            (InteractionKind::Romantic, true) => "shared a tender moment with",
            (InteractionKind::Romantic, false) => "was rebuffed by",
            (InteractionKind::Platonic, true) => "shared tongues with",
            (InteractionKind::Platonic, false) => "was ignored by",
            (InteractionKind::Argument, true) => "made up with",
            (InteractionKind::Argument, false) => "argued with",
            (InteractionKind::Admiration, true) => "was impressed by",
            (InteractionKind::Admiration, false) => "was unimpressed by",
            (InteractionKind::Comfort, true) => "was comforted by",
            (InteractionKind::Comfort, false) => "felt uneasy around",
            (InteractionKind::Jealousy, true) => "stopped envying",
            (InteractionKind::Jealousy, false) => "grew jealous of",
            (InteractionKind::Trust, true) => "confided in",
            (InteractionKind::Trust, false) => "was let down by",
        }
    }
}

static INTENSITIES: &[(Intensity, u32)] = &[(Intensity::Low, 60), (Intensity::Medium, 30), (Intensity::High, 10)];

/// Random interaction between two cats. Romance is only rolled when the
/// caller allows it (both grown, not kin, not mentor/apprentice).
pub fn random_interaction(compat: Compatibility, romance_allowed: bool, rng: &mut impl Rng) -> Interaction {
    let kinds = [
        (InteractionKind::Platonic, 30),
        (InteractionKind::Comfort, 20),
        (InteractionKind::Admiration, 15),
        (InteractionKind::Trust, 15),
        (InteractionKind::Argument, 10),
        (InteractionKind::Jealousy, 5),
        (InteractionKind::Romantic, if romance_allowed { 8 } else { 0 }),
    ];
    let kind = pick(&kinds, rng).unwrap_or(InteractionKind::Platonic);
    let intensity = pick(INTENSITIES, rng).unwrap_or(Intensity::Low);
    let positive_chance = match compat {
        Compatibility::Positive => 85,
        Compatibility::Neutral => 70,
        Compatibility::Negative => 45,
    };
    Interaction {
        kind,
        intensity,
        positive: percent(positive_chance, rng),
    }
}

/// Standing between two cats. One per unordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bond {
    Mates,
    Besties,
    Enemies,
}

impl Bond {
    pub fn label(self) -> &'static str {
        match self {
            Bond::Mates => "mates",
            Bond::Besties => "best friends",
            Bond::Enemies => "enemies",
        }
    }
}

/// Stat levels at which bonds form and break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondThresholds {
    pub mate: u8,
    pub bestie: u8,
    pub enemy: u8,
    /// Mates/besties split when their defining stat falls below this;
    /// enemies reconcile when dislike does.
    pub breakup: u8,
}

impl Default for BondThresholds {
    fn default() -> Self {
        Self {
            mate: 60,
            bestie: 60,
            enemy: 60,
            breakup: 20,
        }
    }
}

/// Both directions must want a bond for it to form; callers check each.
pub fn wants_mate(stats: &RelationshipStats, t: &BondThresholds) -> bool {
    stats.romantic_love >= t.mate && stats.comfortable >= t.mate / 2 && stats.dislike < t.enemy / 2
}

pub fn wants_bestie(stats: &RelationshipStats, t: &BondThresholds) -> bool {
    stats.platonic_like >= t.bestie && stats.trust >= t.bestie / 2 && stats.dislike < t.enemy / 2
}

pub fn wants_enemy(stats: &RelationshipStats, t: &BondThresholds) -> bool {
    stats.dislike >= t.enemy
}

/// Whether an existing bond falls apart given one side's feelings.
pub fn bond_breaks(bond: Bond, stats: &RelationshipStats, t: &BondThresholds) -> bool {
    match bond {
        Bond::Mates => stats.romantic_love < t.breakup || stats.dislike >= t.enemy,
        Bond::Besties => stats.platonic_like < t.breakup || stats.dislike >= t.enemy,
        Bond::Enemies => stats.dislike < t.breakup,
    }
}

/// One-word summary of how a cat feels about another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opinion {
    Hates,
    Dislikes,
    InLove,
    Close,
    Friendly,
    Neutral,
}

impl Opinion {
    pub fn label(self) -> &'static str {
        match self {
            Opinion::Hates => "hates",
            Opinion::Dislikes => "dislikes",
            Opinion::InLove => "is in love with",
            Opinion::Close => "is close to",
            Opinion::Friendly => "is friendly with",
            Opinion::Neutral => "is neutral towards",
        }
    }
}

pub fn opinion(stats: &RelationshipStats) -> Opinion {
    if stats.dislike >= 70 {
        Opinion::Hates
    } else if stats.dislike >= 40 {
        Opinion::Dislikes
    } else if stats.romantic_love >= 60 {
        Opinion::InLove
    } else if stats.platonic_like >= 60 {
        Opinion::Close
    } else if stats.platonic_like >= 30 || stats.comfortable >= 30 {
        Opinion::Friendly
    } else {
        Opinion::Neutral
    }
}

/// Effect of a mediation session on each cat's feelings towards the other.
/// Better mediators (tier 1–3) do more; sabotage turns the effect around.
pub fn mediation_effect(tier: u8, sabotage: bool, rng: &mut impl Rng) -> StatDelta {
    let base = 5 + tier.min(3) as i16 * 5 + rng.gen_range(0..=5);
    let delta = StatDelta {
        dislike: -base,
        platonic_like: base / 2,
        trust: base / 3,
        jealousy: -base / 2,
        ..Default::default()
    };
    if sabotage {
        delta.scaled(-1, 1)
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_apply_clamps() {
        let mut stats = RelationshipStats {
            dislike: 95,
            trust: 3,
            ..Default::default()
        };
        stats.apply(&StatDelta {
            dislike: 20,
            trust: -10,
            ..Default::default()
        });
        assert_eq!(stats.dislike, 100);
        assert_eq!(stats.trust, 0);
    }

    #[test]
    fn test_compatibility_scales_delta() {
        let hug = Interaction {
            kind: InteractionKind::Platonic,
            intensity: Intensity::Medium,
            positive: true,
        };
        assert_eq!(hug.delta(Compatibility::Neutral).platonic_like, 6);
        assert_eq!(hug.delta(Compatibility::Positive).platonic_like, 9);
        assert_eq!(hug.delta(Compatibility::Negative).platonic_like, 3);

        let fight = Interaction {
            kind: InteractionKind::Argument,
            intensity: Intensity::High,
            positive: false,
        };
        assert_eq!(fight.delta(Compatibility::Negative).dislike, 15);
        assert_eq!(fight.delta(Compatibility::Positive).dislike, 5);
    }

    #[test]
    fn test_no_romance_when_disallowed() {
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..500 {
            let i = random_interaction(Compatibility::Positive, false, &mut rng);
            assert_ne!(i.kind, InteractionKind::Romantic);
        }
    }

    #[test]
    fn test_bond_thresholds() {
        let t = BondThresholds::default();
        let smitten = RelationshipStats {
            romantic_love: 70,
            comfortable: 40,
            ..Default::default()
        };
        assert!(wants_mate(&smitten, &t));
        assert!(!wants_bestie(&smitten, &t));
        assert!(!bond_breaks(Bond::Mates, &smitten, &t));

        let bitter = RelationshipStats {
            romantic_love: 70,
            comfortable: 40,
            dislike: 65,
            ..Default::default()
        };
        assert!(!wants_mate(&bitter, &t));
        assert!(wants_enemy(&bitter, &t));
        assert!(bond_breaks(Bond::Mates, &bitter, &t));
        assert!(!bond_breaks(Bond::Enemies, &bitter, &t));
        assert!(bond_breaks(Bond::Enemies, &RelationshipStats::default(), &t));
    }

    #[test]
    fn test_opinion() {
        assert_eq!(opinion(&RelationshipStats::default()), Opinion::Neutral);
        let friend = RelationshipStats {
            platonic_like: 35,
            ..Default::default()
        };
        assert_eq!(opinion(&friend), Opinion::Friendly);
        let hated = RelationshipStats {
            platonic_like: 90,
            dislike: 80,
            ..Default::default()
        };
        assert_eq!(opinion(&hated), Opinion::Hates);
    }

    #[test]
    fn test_mediation() {
        let mut rng = StdRng::seed_from_u64(3);
        let help = mediation_effect(3, false, &mut rng);
        assert!(help.dislike <= -20);
        assert!(help.trust > 0);
        let harm = mediation_effect(1, true, &mut rng);
        assert!(harm.dislike >= 10);
        assert!(harm.platonic_like < 0);
    }

    #[test]
    fn test_starting_stats_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let s = RelationshipStats::starting(Compatibility::Positive, true, &mut rng);
            assert!(s.platonic_like >= 30 && s.platonic_like <= 50);
            assert_eq!(s.romantic_love, 0);
            assert!(!wants_mate(&s, &BondThresholds::default()));
        }
    }
}
