//! # Menagerie Core
//!
//! The simulation rules for Menagerie: a population of procedurally-traited
//! creatures that feed, breed, mutate and get culled.
//!
//! This crate contains:
//! - Genome generation and inheritance with bounded mutation
//! - The individual energy lifecycle (decay, rest, feeding)
//! - Breeding eligibility and the reproduction transaction
//! - The autonomous evolution loop and natural selection
//! - Food sources and passive harvesting
//!
//! Nothing here owns the population. Every operation takes the working set
//! as an argument and hands back what it created or removed.
//!
//! ## Example
//!
//! ```
//! use menagerie_core::breeding::{breed, can_breed, BreedingContext};
//! use menagerie_core::config::AppConfig;
//! use menagerie_core::lifecycle::create_founder_with_rng;
//! use menagerie_core::random::RngSource;
//! use menagerie_data::Position;
//!
//! let config = AppConfig::default();
//! let mut rng = RngSource::seeded(42);
//! let mut a = create_founder_with_rng(Position::new(0.0, 0.0), 0, &mut rng);
//! let mut b = create_founder_with_rng(Position::new(2.0, 0.0), 0, &mut rng);
//! assert!(can_breed(&a, &b, &config.breeding));
//!
//! let mut ctx = BreedingContext {
//!     breeding: &config.breeding,
//!     genetics: &config.genetics,
//!     clock_ms: 0,
//!     rng: &mut rng,
//! };
//! let child = breed(&mut a, &mut b, &mut ctx).unwrap();
//! assert_eq!(child.generation, 2);
//! ```

/// Breeding eligibility rules and the reproduction transaction
pub mod breeding;
/// Configuration management for simulation parameters
pub mod config;
/// Autonomous evolution loop and natural selection
pub mod evolution;
/// Food sources and passive harvesting
pub mod feeding;
/// Genome generation, inheritance and colour blending
pub mod genetics;
/// Simulation events for the presentation layer
pub mod history;
/// Individual creation, energy decay, rest and wandering
pub mod lifecycle;
/// Ancestry graph over living and departed individuals
pub mod lineage_tree;
/// Tick metrics and logging setup
pub mod metrics;
/// Injectable random sources
pub mod random;

pub use breeding::{breeding_status, can_breed, BreedingError, BreedingStatus};
pub use evolution::{ControllerState, PopulationController, TickOutcome};
pub use metrics::{init_logging, Metrics};
pub use random::{RandomSource, RngSource, SeededRandom, SequenceSource};
