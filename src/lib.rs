//! Menagerie: a creature breeding and evolution sandbox.
//!
//! The rules live in `menagerie_core`, persistence in `menagerie_io`. This
//! crate owns the running population and drives it tick by tick.

pub mod report;
pub mod runner;
pub mod simulation;

pub use simulation::Simulation;
