//! Generation - procedural creation of cats, litters and whole Clans

mod cat;
mod clan;
mod litter;

pub use cat::*;
pub use clan::*;
pub use litter::*;
