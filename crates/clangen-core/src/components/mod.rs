//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to cat entities.
//! They have no behavior beyond small accessors - that lives in systems
//! and in `clangen-logic`.

mod cat;
mod life;
mod lineage;

pub use cat::*;
pub use life::*;
pub use lineage::*;

// Rule types from the logic crate that double as components.
pub use clangen_logic::alters::AlterSystem;
pub use clangen_logic::names::Name;
pub use clangen_logic::pelt::{Gender, Pelt};
pub use clangen_logic::personality::Personality;
pub use clangen_logic::skills::CatSkills;
