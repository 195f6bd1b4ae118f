//! Skill paths, tiers and moon-by-moon progression.
//!
//! A cat has up to two skills (primary and secondary) plus an optional
//! hidden supernatural path. Each skill holds `0..=MAX_POINTS` points and
//! reads as tier 1–3. Kits only hold *interests*; an interest becomes a real
//! skill when the kit is apprenticed.
//!
//! # Progression
//!
//! ```
//! use clangen_logic::age::AgeGroup;
//! use clangen_logic::skills::{CatSkills, Skill, SkillConfig, SkillPath};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut skills = CatSkills::with_primary(Skill::new(SkillPath::Hunter, 4));
//! skills.progress(AgeGroup::Adolescent, None, &SkillConfig::default(), &mut rng);
//! assert!(skills.points_in(SkillPath::Hunter) > 4);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::age::AgeGroup;
use crate::weighted::{one_in, percent, pick_uniform};

pub const MAX_POINTS: u8 = 30;
/// Points at which a skill reaches tier 2 and tier 3.
pub const TIER_THRESHOLDS: [u8; 2] = [10, 20];
/// Kits' interests never grow past this.
const INTEREST_CAP: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillPath {
    Teacher,
    Hunter,
    Fighter,
    Runner,
    Climber,
    Swimmer,
    Speaker,
    Mediator,
    Clever,
    Insightful,
    Sense,
    KitSitter,
    Storyteller,
    LoreKeeper,
    CampKeeper,
    Healer,
    Star,
    Dark,
    Omen,
    Dream,
    Clairvoyant,
    Prophet,
    Ghost,
}

impl SkillPath {
    pub const ALL: [SkillPath; 23] = [
        SkillPath::Teacher,
        SkillPath::Hunter,
        SkillPath::Fighter,
        SkillPath::Runner,
        SkillPath::Climber,
        SkillPath::Swimmer,
        SkillPath::Speaker,
        SkillPath::Mediator,
        SkillPath::Clever,
        SkillPath::Insightful,
        SkillPath::Sense,
        SkillPath::KitSitter,
        SkillPath::Storyteller,
        SkillPath::LoreKeeper,
        SkillPath::CampKeeper,
        SkillPath::Healer,
        SkillPath::Star,
        SkillPath::Dark,
        SkillPath::Omen,
        SkillPath::Dream,
        SkillPath::Clairvoyant,
        SkillPath::Prophet,
        SkillPath::Ghost,
    ];

    /// Paths any cat can train in.
    pub const MUNDANE: [SkillPath; 16] = [
        SkillPath::Teacher,
        SkillPath::Hunter,
        SkillPath::Fighter,
        SkillPath::Runner,
        SkillPath::Climber,
        SkillPath::Swimmer,
        SkillPath::Speaker,
        SkillPath::Mediator,
        SkillPath::Clever,
        SkillPath::Insightful,
        SkillPath::Sense,
        SkillPath::KitSitter,
        SkillPath::Storyteller,
        SkillPath::LoreKeeper,
        SkillPath::CampKeeper,
        SkillPath::Healer,
    ];

    pub const SUPERNATURAL: [SkillPath; 7] = [
        SkillPath::Star,
        SkillPath::Dark,
        SkillPath::Omen,
        SkillPath::Dream,
        SkillPath::Clairvoyant,
        SkillPath::Prophet,
        SkillPath::Ghost,
    ];

    pub fn is_supernatural(self) -> bool {
        Self::SUPERNATURAL.contains(&self)
    }

    /// What a cat with this skill is called ("hunter", "storyteller").
    pub fn noun(self) -> &'static str {
        match self {
            SkillPath::Teacher => "teacher",
            SkillPath::Hunter => "hunter",
            SkillPath::Fighter => "fighter",
            SkillPath::Runner => "runner",
            SkillPath::Climber => "climber",
            SkillPath::Swimmer => "swimmer",
            SkillPath::Speaker => "speaker",
            SkillPath::Mediator => "mediator",
            SkillPath::Clever => "thinker",
            SkillPath::Insightful => "advisor",
            SkillPath::Sense => "tracker",
            SkillPath::KitSitter => "kit-sitter",
            SkillPath::Storyteller => "storyteller",
            SkillPath::LoreKeeper => "lore-keeper",
            SkillPath::CampKeeper => "camp-keeper",
            SkillPath::Healer => "healer",
            SkillPath::Star => "StarClan-touched cat",
            SkillPath::Dark => "Dark Forest-touched cat",
            SkillPath::Omen => "omen-seer",
            SkillPath::Dream => "dream-walker",
            SkillPath::Clairvoyant => "clairvoyant",
            SkillPath::Prophet => "prophet",
            SkillPath::Ghost => "ghost-seer",
        }
    }

    /// What a kit interested in this path is interested in.
    pub fn interest(self) -> &'static str {
        match self {
            SkillPath::Teacher => "teaching",
            SkillPath::Hunter => "hunting",
            SkillPath::Fighter => "play-fighting",
            SkillPath::Runner => "running",
            SkillPath::Climber => "climbing",
            SkillPath::Swimmer => "swimming",
            SkillPath::Speaker => "debating",
            SkillPath::Mediator => "making peace",
            SkillPath::Clever => "puzzles",
            SkillPath::Insightful => "giving advice",
            SkillPath::Sense => "scents",
            SkillPath::KitSitter => "younger kits",
            SkillPath::Storyteller => "stories",
            SkillPath::LoreKeeper => "the Clan's history",
            SkillPath::CampKeeper => "tidying the camp",
            SkillPath::Healer => "herbs",
            _ => "strange dreams",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub path: SkillPath,
    pub points: u8,
    /// Kits hold interests rather than trained skills.
    pub interest_only: bool,
}

impl Skill {
    pub fn new(path: SkillPath, points: u8) -> Self {
        Self {
            path,
            points: points.min(MAX_POINTS),
            interest_only: false,
        }
    }

    pub fn interest(path: SkillPath) -> Self {
        Self {
            path,
            points: 0,
            interest_only: true,
        }
    }

    /// Tier 1–3 from points.
    pub fn tier(&self) -> u8 {
        if self.points >= TIER_THRESHOLDS[1] {
            3
        } else if self.points >= TIER_THRESHOLDS[0] {
            2
        } else {
            1
        }
    }

    /// Add points, capped. Returns the new tier if it went up.
    fn gain(&mut self, points: u8, cap: u8) -> Option<u8> {
        let before = self.tier();
        self.points = self.points.saturating_add(points).min(cap);
        let after = self.tier();
        (after > before).then_some(after)
    }

    pub fn describe(&self) -> String {
        if self.interest_only {
            return format!("interested in {}", self.path.interest());
        }
        let grade = match self.tier() {
            1 => "novice",
            2 => "skilled",
            _ => "expert",
        };
        format!("{grade} {}", self.path.noun())
    }
}

/// Tunables for skill growth. Part of the Clan config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Points an apprentice gains per moon.
    pub apprentice_gain: u8,
    /// Extra points when the mentor shares the apprentice's path.
    pub mentor_bonus: u8,
    /// Percent chance per moon for a grown cat to gain a point.
    pub adult_gain_chance: u32,
    /// Above this many points adult gains happen half as often.
    pub diminishing_threshold: u8,
    /// "1 in N" chance per moon for a tier-3 cat to pick up a second path.
    pub secondary_chance: u32,
    /// "1 in N" chance for a newly rolled cat to carry a hidden path.
    pub hidden_chance: u32,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            apprentice_gain: 2,
            mentor_bonus: 1,
            adult_gain_chance: 30,
            diminishing_threshold: 20,
            secondary_chance: 20,
            hidden_chance: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatSkills {
    pub primary: Option<Skill>,
    pub secondary: Option<Skill>,
    pub hidden: Option<SkillPath>,
}

impl CatSkills {
    pub fn with_primary(skill: Skill) -> Self {
        Self {
            primary: Some(skill),
            ..Default::default()
        }
    }

    /// Starting skills for a cat of the given age.
    pub fn random_for(group: AgeGroup, config: &SkillConfig, rng: &mut impl Rng) -> Self {
        let mut skills = CatSkills::default();
        let path = pick_uniform(&SkillPath::MUNDANE, rng).unwrap_or(SkillPath::Hunter);
        skills.primary = match group {
            AgeGroup::Newborn => None,
            AgeGroup::Kitten => Some(Skill {
                points: rng.gen_range(0..=INTEREST_CAP),
                ..Skill::interest(path)
            }),
            AgeGroup::Adolescent => Some(Skill::new(path, rng.gen_range(1..=9))),
            AgeGroup::YoungAdult => Some(Skill::new(path, rng.gen_range(5..=15))),
            AgeGroup::Adult => Some(Skill::new(path, rng.gen_range(10..=25))),
            AgeGroup::SeniorAdult | AgeGroup::Senior => Some(Skill::new(path, rng.gen_range(15..=30))),
        };
        if group >= AgeGroup::YoungAdult && one_in(3, rng) {
            let other = pick_uniform(&SkillPath::MUNDANE, rng).unwrap_or(SkillPath::Runner);
            if other != path {
                skills.secondary = Some(Skill::new(other, rng.gen_range(1..=12)));
            }
        }
        if one_in(config.hidden_chance, rng) {
            skills.hidden = pick_uniform(&SkillPath::SUPERNATURAL, rng);
        }
        skills
    }

    /// Points held in a path (0 if the cat has no such skill).
    pub fn points_in(&self, path: SkillPath) -> u8 {
        [self.primary, self.secondary]
            .iter()
            .flatten()
            .filter(|s| s.path == path && !s.interest_only)
            .map(|s| s.points)
            .max()
            .unwrap_or(0)
    }

    /// Tier held in a path, 0 when untrained.
    pub fn tier_in(&self, path: SkillPath) -> u8 {
        [self.primary, self.secondary]
            .iter()
            .flatten()
            .filter(|s| s.path == path && !s.interest_only)
            .map(|s| s.tier())
            .max()
            .unwrap_or(0)
    }

    pub fn has_path(&self, path: SkillPath) -> bool {
        [self.primary, self.secondary]
            .iter()
            .flatten()
            .any(|s| s.path == path)
    }

    /// Advance skills by one moon.
    ///
    /// Kits only firm up an interest, apprentices train quickly (faster when
    /// the mentor shares the path), grown cats improve slowly and seniors
    /// stop. Returns the path and new tier when a skill tiers up.
    pub fn progress(
        &mut self,
        group: AgeGroup,
        mentor: Option<&CatSkills>,
        config: &SkillConfig,
        rng: &mut impl Rng,
    ) -> Option<(SkillPath, u8)> {
        match group {
            AgeGroup::Newborn | AgeGroup::Senior => None,
            AgeGroup::Kitten => {
                if let Some(skill) = self.primary.as_mut() {
                    if one_in(4, rng) {
                        skill.path = pick_uniform(&SkillPath::MUNDANE, rng).unwrap_or(skill.path);
                    } else {
                        skill.gain(1, INTEREST_CAP);
                    }
                } else {
                    self.primary = pick_uniform(&SkillPath::MUNDANE, rng).map(Skill::interest);
                }
                None
            }
            AgeGroup::Adolescent => {
                let skill = self.primary.get_or_insert_with(|| {
                    Skill::new(pick_uniform(&SkillPath::MUNDANE, rng).unwrap_or(SkillPath::Hunter), 0)
                });
                skill.interest_only = false;
                let shared = mentor.map_or(false, |m| m.has_path(skill.path));
                let gain = config.apprentice_gain + if shared { config.mentor_bonus } else { 0 };
                let path = skill.path;
                skill.gain(gain, MAX_POINTS).map(|t| (path, t))
            }
            AgeGroup::YoungAdult | AgeGroup::Adult | AgeGroup::SeniorAdult => {
                let mut chance = config.adult_gain_chance;
                if group == AgeGroup::SeniorAdult {
                    chance /= 2;
                }
                let skill = self.primary.as_mut()?;
                skill.interest_only = false;
                if skill.points >= config.diminishing_threshold {
                    chance /= 2;
                }
                let path = skill.path;
                let tiered = if percent(chance, rng) {
                    skill.gain(1, MAX_POINTS).map(|t| (path, t))
                } else {
                    None
                };
                if self.secondary.is_none() && skill.tier() == 3 && one_in(config.secondary_chance, rng) {
                    let other = pick_uniform(&SkillPath::MUNDANE, rng)?;
                    if other != path {
                        self.secondary = Some(Skill::new(other, 1));
                    }
                }
                tiered
            }
        }
    }

    /// A mentor either reinforces a shared path or opens a second one.
    /// Returns the path that changed.
    pub fn mentor_influence(&mut self, mentor: &CatSkills, rng: &mut impl Rng) -> Option<SkillPath> {
        let taught = mentor.primary.filter(|s| !s.interest_only)?;
        match self.primary.as_mut() {
            Some(own) if own.path == taught.path => {
                own.gain(1, MAX_POINTS);
                Some(taught.path)
            }
            Some(_) if self.secondary.is_none() && one_in(3, rng) => {
                self.secondary = Some(Skill::new(taught.path, 1));
                Some(taught.path)
            }
            None => {
                self.primary = Some(Skill::new(taught.path, 1));
                Some(taught.path)
            }
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = [self.primary, self.secondary]
            .iter()
            .flatten()
            .map(|s| s.describe())
            .collect();
        if parts.is_empty() {
            parts.push("no skills yet".to_string());
        }
        parts.join(", ")
    }
}
