//! Clan-wide tunables.
//!
//! Every chance, threshold and age limit the simulation uses lives in
//! [`ClanConfig`]. It loads from JSON, falls back to sensible defaults for
//! missing fields, and is checked with [`validate_config`] before a Clan is
//! generated.
//!
//! ```
//! use clangen_logic::config::{validate_config, ClanConfig};
//!
//! let mut config = ClanConfig::default();
//! config.clan_name = "Thunder".to_string();
//! config.leader_lives = 9;
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::alters::AlterConfig;
use crate::relation::BondThresholds;
use crate::skills::SkillConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClanConfig {
    /// Clan name without the "Clan" suffix.
    pub clan_name: String,
    /// RNG seed. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub leader_lives: u8,
    /// Minimum age for mates.
    pub mate_min_moons: u32,
    /// Allow kin to become mates.
    pub allow_related_mates: bool,
    pub bonds: BondThresholds,
    /// Random interactions each cat starts per moon.
    pub interactions_per_moon: u32,
    /// "1 in N" per cat per moon.
    pub illness_chance: u32,
    /// "1 in N" per cat per moon.
    pub injury_chance: u32,
    /// Contagion multiplier in percent.
    pub infection_multiplier: u32,
    /// Percent chance a close Clanmate is grief stricken by a death.
    pub grief_chance: u32,
    /// Platonic or romantic feeling needed to grieve a cat.
    pub grief_radius: u8,
    /// Age at which old-age deaths start.
    pub old_age_start: u32,
    /// Moons dead before a cat fades.
    pub fade_after_moons: u32,
    pub litter_min: u8,
    pub litter_max: u8,
    /// Percent chance per moon for a mated pair to expect kits.
    pub pregnancy_chance: u32,
    pub pregnancy_moons: u32,
    /// "1 in N" chance for a kit to be born with a permanent condition.
    pub congenital_chance: u32,
    pub apprentice_moons: u32,
    pub warrior_moons: u32,
    /// Warriors retire to the elders' den at this age.
    pub elder_moons: u32,
    /// Medicine cats gather herbs every moon.
    pub herb_gathering: bool,
    /// Percent chance per moon a mentor shapes their apprentice.
    pub mentor_influence_chance: u32,
    /// Moons of history the event log keeps.
    pub log_moons: u32,
    pub alters: AlterConfig,
    pub skills: SkillConfig,
}

impl Default for ClanConfig {
    fn default() -> Self {
        Self {
            clan_name: "Thunder".to_string(),
            seed: None,
            leader_lives: 9,
            mate_min_moons: 12,
            allow_related_mates: false,
            bonds: BondThresholds::default(),
            interactions_per_moon: 2,
            illness_chance: 25,
            injury_chance: 30,
            infection_multiplier: 100,
            grief_chance: 60,
            grief_radius: 40,
            old_age_start: 150,
            fade_after_moons: 100,
            litter_min: 1,
            litter_max: 5,
            pregnancy_chance: 15,
            pregnancy_moons: 2,
            congenital_chance: 40,
            apprentice_moons: 6,
            warrior_moons: 12,
            elder_moons: 120,
            herb_gathering: true,
            mentor_influence_chance: 40,
            log_moons: 12,
            alters: AlterConfig::default(),
            skills: SkillConfig::default(),
        }
    }
}

impl ClanConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Upper bound for percent multipliers such as `infection_multiplier`.
pub const MAX_MULTIPLIER: u32 = 1000;

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyClanName,
    /// Leaders hold between 1 and 9 lives.
    LeaderLivesOutOfRange(u8),
    MateAgeTooLow(u32),
    /// A "1 in N" chance of zero would fire every moon.
    ZeroOneIn(&'static str),
    PercentOver100(&'static str, u32),
    /// Percent multipliers stop at [`MAX_MULTIPLIER`].
    MultiplierTooHigh(&'static str, u32),
    ThresholdOver100(&'static str, u8),
    LitterSizeInvalid { min: u8, max: u8 },
    /// Apprentice, warrior and elder ages must be increasing.
    AgeLimitsOutOfOrder,
    FadeAfterZero,
    PregnancyTooShort,
    MaxAltersZero,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyClanName => write!(f, "clan name is empty"),
            ConfigError::LeaderLivesOutOfRange(n) => write!(f, "leader lives {n} not in 1..=9"),
            ConfigError::MateAgeTooLow(m) => write!(f, "mate age {m} below 12 moons"),
            ConfigError::ZeroOneIn(name) => write!(f, "{name} must be at least 1"),
            ConfigError::PercentOver100(name, v) => write!(f, "{name} is {v}%, over 100"),
            ConfigError::MultiplierTooHigh(name, v) => write!(f, "{name} is {v}%, over {MAX_MULTIPLIER}"),
            ConfigError::ThresholdOver100(name, v) => write!(f, "{name} threshold {v} over 100"),
            ConfigError::LitterSizeInvalid { min, max } => write!(f, "litter size {min}..={max} is invalid"),
            ConfigError::AgeLimitsOutOfOrder => write!(f, "apprentice, warrior and elder ages out of order"),
            ConfigError::FadeAfterZero => write!(f, "fade_after_moons must be at least 1"),
            ConfigError::PregnancyTooShort => write!(f, "pregnancy_moons must be at least 1"),
            ConfigError::MaxAltersZero => write!(f, "max_alters must be at least 1"),
        }
    }
}

/// Validate a Clan configuration, returning all errors found.
pub fn validate_config(config: &ClanConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.clan_name.trim().is_empty() {
        errors.push(ConfigError::EmptyClanName);
    }
    if !(1..=9).contains(&config.leader_lives) {
        errors.push(ConfigError::LeaderLivesOutOfRange(config.leader_lives));
    }
    if config.mate_min_moons < 12 {
        errors.push(ConfigError::MateAgeTooLow(config.mate_min_moons));
    }

    for (name, v) in [
        ("illness_chance", config.illness_chance),
        ("injury_chance", config.injury_chance),
        ("congenital_chance", config.congenital_chance),
        ("skills.secondary_chance", config.skills.secondary_chance),
        ("skills.hidden_chance", config.skills.hidden_chance),
    ] {
        if v == 0 {
            errors.push(ConfigError::ZeroOneIn(name));
        }
    }

    for (name, v) in [
        ("grief_chance", config.grief_chance),
        ("pregnancy_chance", config.pregnancy_chance),
        ("mentor_influence_chance", config.mentor_influence_chance),
        ("alters.split_chance", config.alters.split_chance),
        ("alters.switch_chance", config.alters.switch_chance),
        ("skills.adult_gain_chance", config.skills.adult_gain_chance),
    ] {
        if v > 100 {
            errors.push(ConfigError::PercentOver100(name, v));
        }
    }

    if config.infection_multiplier > MAX_MULTIPLIER {
        errors.push(ConfigError::MultiplierTooHigh("infection_multiplier", config.infection_multiplier));
    }

    for (name, v) in [
        ("mate", config.bonds.mate),
        ("bestie", config.bonds.bestie),
        ("enemy", config.bonds.enemy),
        ("breakup", config.bonds.breakup),
        ("grief_radius", config.grief_radius),
    ] {
        if v > 100 {
            errors.push(ConfigError::ThresholdOver100(name, v));
        }
    }

    if config.litter_min == 0 || config.litter_min > config.litter_max || config.litter_max > 8 {
        errors.push(ConfigError::LitterSizeInvalid {
            min: config.litter_min,
            max: config.litter_max,
        });
    }
    if !(config.apprentice_moons < config.warrior_moons && config.warrior_moons < config.elder_moons) {
        errors.push(ConfigError::AgeLimitsOutOfOrder);
    }
    if config.fade_after_moons == 0 {
        errors.push(ConfigError::FadeAfterZero);
    }
    if config.pregnancy_moons == 0 {
        errors.push(ConfigError::PregnancyTooShort);
    }
    if config.alters.max_alters == 0 {
        errors.push(ConfigError::MaxAltersZero);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let errors = validate_config(&ClanConfig::default());
        assert!(errors.is_empty(), "default config should be valid: {errors:?}");
    }

    #[test]
    fn leader_lives_range() {
        let mut config = ClanConfig::default();
        config.leader_lives = 0;
        assert!(validate_config(&config).contains(&ConfigError::LeaderLivesOutOfRange(0)));
        config.leader_lives = 10;
        assert!(validate_config(&config).contains(&ConfigError::LeaderLivesOutOfRange(10)));
    }

    #[test]
    fn zero_one_in_rejected() {
        let mut config = ClanConfig::default();
        config.illness_chance = 0;
        assert!(validate_config(&config).contains(&ConfigError::ZeroOneIn("illness_chance")));
    }

    #[test]
    fn litter_and_ages() {
        let mut config = ClanConfig::default();
        config.litter_min = 4;
        config.litter_max = 2;
        config.warrior_moons = 200;
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::LitterSizeInvalid { min: 4, max: 2 }));
        assert!(errors.contains(&ConfigError::AgeLimitsOutOfOrder));
    }

    #[test]
    fn percent_and_threshold_limits() {
        let mut config = ClanConfig::default();
        config.grief_chance = 150;
        config.bonds.mate = 120;
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::PercentOver100("grief_chance", 150)));
        assert!(errors.contains(&ConfigError::ThresholdOver100("mate", 120)));
    }

    #[test]
    fn infection_multiplier_is_bounded() {
        let mut config = ClanConfig::default();
        config.infection_multiplier = MAX_MULTIPLIER;
        assert!(validate_config(&config).is_empty());
        config.infection_multiplier = u32::MAX;
        assert!(validate_config(&config).contains(&ConfigError::MultiplierTooHigh("infection_multiplier", u32::MAX)));
    }

    #[test]
    fn json_roundtrip_with_missing_fields() {
        let config = ClanConfig::from_json(r#"{ "clan_name": "River", "leader_lives": 5 }"#).unwrap();
        assert_eq!(config.clan_name, "River");
        assert_eq!(config.leader_lives, 5);
        assert_eq!(config.fade_after_moons, ClanConfig::default().fade_after_moons);

        let json = config.to_json().unwrap();
        assert_eq!(ClanConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn empty_name_rejected() {
        let mut config = ClanConfig::default();
        config.clan_name = "   ".to_string();
        assert!(validate_config(&config).contains(&ConfigError::EmptyClanName));
    }
}
