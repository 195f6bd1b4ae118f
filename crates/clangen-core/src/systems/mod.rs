//! Systems - per-moon logic that operates on the Clan
//!
//! Each system is a free function over [`Clan`](crate::clan::Clan). The
//! engine runs them once per moon in this order: aging, mentors, social,
//! births, health, deaths, grief, alters, fading, thoughts.

mod aging;
mod alters;
mod births;
mod deaths;
mod fading;
mod grief;
mod health;
mod mentors;
mod social;
mod thoughts;

pub use aging::*;
pub use alters::*;
pub use births::*;
pub use deaths::*;
pub use fading::*;
pub use grief::*;
pub use health::*;
pub use mentors::*;
pub use social::*;
pub use thoughts::*;
