//! Breeding eligibility and the reproduction transaction.

use crate::config::{BreedingConfig, GeneticsConfig};
use crate::genetics;
use crate::lifecycle;
use crate::random::RandomSource;
use menagerie_data::{Individual, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Why a pair may or may not breed. `Ok` iff [`can_breed`] is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreedingStatus {
    Ok,
    /// Both sides are the same individual.
    SameIndividual,
    /// The first parent is under the energy floor.
    FirstParentExhausted,
    /// The second parent is under the energy floor.
    SecondParentExhausted,
    /// One is the direct parent of the other.
    DirectLineage,
}

impl BreedingStatus {
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == BreedingStatus::Ok
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreedingError {
    /// `breed` was called on a pair that fails [`breeding_status`].
    #[error("invalid breeding pair: {0:?}")]
    InvalidBreedingPair(BreedingStatus),
    /// The older parent is already at the last representable generation.
    #[error("generation counter exhausted")]
    GenerationOverflow,
}

fn has_breeding_energy(individual: &Individual, config: &BreedingConfig) -> bool {
    individual.energy >= config.energy_floor_ratio * individual.stamina()
}

/// Checks the breeding rules in order and reports the first that fails.
#[must_use]
pub fn breeding_status(a: &Individual, b: &Individual, config: &BreedingConfig) -> BreedingStatus {
    if a.id == b.id {
        return BreedingStatus::SameIndividual;
    }
    if !has_breeding_energy(a, config) {
        return BreedingStatus::FirstParentExhausted;
    }
    if !has_breeding_energy(b, config) {
        return BreedingStatus::SecondParentExhausted;
    }
    // Siblings and grandparents are allowed on purpose.
    if a.is_directly_related(b) {
        return BreedingStatus::DirectLineage;
    }
    BreedingStatus::Ok
}

#[must_use]
pub fn can_breed(a: &Individual, b: &Individual, config: &BreedingConfig) -> bool {
    breeding_status(a, b, config).is_ok()
}

/// Everything a breeding transaction needs besides the parents.
pub struct BreedingContext<'a, R: RandomSource + ?Sized> {
    pub breeding: &'a BreedingConfig,
    pub genetics: &'a GeneticsConfig,
    /// Simulation clock, stamped as the offspring's birth time.
    pub clock_ms: u64,
    pub rng: &'a mut R,
}

/// Breeds `a` with `b`.
///
/// Both parents pay `energy_cost_ratio` of their current energy; the
/// offspring starts with what they paid, capped at its own stamina. The
/// returned individual is not inserted anywhere.
pub fn breed<R: RandomSource + ?Sized>(
    a: &mut Individual,
    b: &mut Individual,
    ctx: &mut BreedingContext<'_, R>,
) -> Result<Individual, BreedingError> {
    let status = breeding_status(a, b, ctx.breeding);
    if !status.is_ok() {
        return Err(BreedingError::InvalidBreedingPair(status));
    }
    let generation = a
        .generation
        .max(b.generation)
        .checked_add(1)
        .ok_or(BreedingError::GenerationOverflow)?;

    let traits = genetics::inherit_with_config(&a.traits, &b.traits, ctx.genetics, &mut *ctx.rng);
    let jitter = ctx.breeding.placement_jitter;
    let mid = a.position.midpoint(&b.position);
    let position = Position::new(
        mid.x + ctx.rng.range(-jitter, jitter),
        mid.y + ctx.rng.range(-jitter, jitter),
    );

    let paid = lifecycle::charge_breeding(a, ctx.breeding.energy_cost_ratio)
        + lifecycle::charge_breeding(b, ctx.breeding.energy_cost_ratio);

    let offspring = Individual {
        id: Uuid::new_v4(),
        name: lifecycle::offspring_name(&a.name, &b.name),
        generation,
        energy: paid.min(traits.physique.stamina),
        traits,
        parent_ids: Some([a.id, b.id]),
        born_at_ms: ctx.clock_ms,
        position,
        resting: false,
        rest_elapsed_ms: 0.0,
        wander_target: None,
    };

    tracing::debug!(
        offspring = %offspring.id,
        first = %a.id,
        second = %b.id,
        generation = offspring.generation,
        "Offspring bred"
    );
    Ok(offspring)
}

/// Breeds two members of `population` by index without inserting the result.
pub fn breed_pair<R: RandomSource + ?Sized>(
    population: &mut [Individual],
    first: usize,
    second: usize,
    ctx: &mut BreedingContext<'_, R>,
) -> Result<Individual, BreedingError> {
    if first == second {
        return Err(BreedingError::InvalidBreedingPair(
            BreedingStatus::SameIndividual,
        ));
    }
    let (a, b) = pair_mut(population, first, second);
    breed(a, b, ctx)
}

/// Two distinct mutable references into one slice.
fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(first, second);
    if first < second {
        let (head, tail) = items.split_at_mut(second);
        (&mut head[first], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(first);
        (&mut tail[0], &mut head[second])
    }
}
