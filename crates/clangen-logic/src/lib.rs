//! Pure Clan simulation rules.
//!
//! This crate contains the game rules that are independent of any ECS,
//! storage or UI. Functions take plain data plus an RNG and return results,
//! so every rule is unit-testable with a seeded generator.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`age`] | Age groups from moons |
//! | [`alters`] | Alter systems: host, splits, switching |
//! | [`conditions`] | Static illness / injury / permanent condition table, herbs |
//! | [`config`] | Clan-wide tunables and validation |
//! | [`health`] | Live conditions, death and contagion rolls, herb store |
//! | [`names`] | Prefix/suffix names and status-dependent display |
//! | [`pelt`] | Pelt generation, inheritance, descriptions, offspring forecast |
//! | [`personality`] | Traits, facets, mentor influence, compatibility |
//! | [`relation`] | Relationship stats, interactions, bond thresholds, mediation |
//! | [`skills`] | Skill paths, tiers, progression |
//! | [`status`] | Ranks, role-change rules, afterlives |
//! | [`thoughts`] | Situational thought lines |
//! | [`weighted`] | Weighted tables and "1 in N" rolls |

pub mod age;
pub mod alters;
pub mod conditions;
pub mod config;
pub mod health;
pub mod names;
pub mod pelt;
pub mod personality;
pub mod relation;
pub mod skills;
pub mod status;
pub mod thoughts;
pub mod weighted;
