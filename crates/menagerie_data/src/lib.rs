//! Core data structures for the Menagerie simulation.
//!
//! Everything in here is plain data: genomes, individuals and their runtime
//! state. Behaviour lives in `menagerie_core`.

pub mod data;

pub use data::individual::{Individual, Position};
pub use data::traits::{Appearance, Pattern, Physique, Proportions, Rgb, Temperament, TraitSet};
