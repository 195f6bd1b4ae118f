//! Clangen Core - Clan life-simulation engine
//!
//! An ECS-based simulation of a Clan of cats, each with their own pelt,
//! personality, skills, health, lineage and feelings about one another,
//! advanced one moon at a time.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Cats, living and dead (faded cats leave the world)
//! - **Components**: Pure data attached to cats (Identity, Age, Role, Conditions, etc.)
//! - **Systems**: Per-moon logic that queries and updates components
//!
//! The rules themselves (weighted tables, condition definitions, relationship
//! math) live in `clangen-logic`; this crate owns state and ordering.
//!
//! # Example
//!
//! ```rust,no_run
//! use clangen_core::prelude::*;
//! use clangen_core::generation::ClanSetup;
//!
//! let mut engine = ClanEngine::new(ClanConfig::default()).unwrap();
//! engine.generate(ClanSetup::default()).unwrap();
//!
//! for _ in 0..12 {
//!     let report = engine.advance_moon();
//!     for event in &report.events {
//!         println!("{}", event.text);
//!     }
//! }
//! ```

pub mod clan;
pub mod components;
pub mod engine;
pub mod error;
pub mod events;
pub mod generation;
pub mod inheritance;
pub mod persistence;
pub mod relationships;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{CatRecord, ClanEngine, MoonReport};
    pub use crate::error::{ClanError, SaveError};
    pub use crate::events::{EventKind, MoonEvent};
    pub use clangen_logic::config::ClanConfig;
    pub use clangen_logic::relation::Bond;
    pub use clangen_logic::status::Status;
}
