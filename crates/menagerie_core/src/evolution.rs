//! Autonomous evolution loop.
//!
//! The [`PopulationController`] is a two-state machine (`Idle` / `Active`)
//! driven by explicit elapsed time. While active it periodically breeds one
//! eligible pair and, with natural selection on, culls the weakest members
//! once the population passes its ceiling.

use crate::breeding::{self, BreedingContext, BreedingStatus};
use crate::config::EvolutionConfig;
use crate::random::{shuffle, RandomSource};
use menagerie_data::Individual;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Idle,
    Active,
}

/// A pair that was considered and turned down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub first: Uuid,
    pub second: Uuid,
    pub status: BreedingStatus,
}

/// What one controller tick changed.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// Whether a breeding attempt was due and made.
    pub attempted: bool,
    /// Copy of the offspring pushed onto the population, if any.
    pub offspring: Option<Individual>,
    pub rejections: Vec<Rejection>,
    /// Removed members, weakest first.
    pub culled: Vec<Individual>,
}

/// Mean of size, speed, stamina and energy ratio. Used only for culling.
#[must_use]
pub fn fitness(individual: &Individual) -> f64 {
    let p = &individual.traits.physique;
    (p.size + p.speed + p.stamina + individual.energy_ratio()) / 4.0
}

/// Removes the lowest-fitness members until `population.len() == target`,
/// at most `max_removals` at a time. Returns them weakest first.
pub fn natural_selection(
    population: &mut Vec<Individual>,
    target: usize,
    max_removals: usize,
) -> Vec<Individual> {
    let excess = population.len().saturating_sub(target).min(max_removals);
    if excess == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, f64)> = population
        .iter()
        .enumerate()
        .map(|(i, ind)| (i, fitness(ind)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    let doomed: HashSet<usize> = ranked.iter().take(excess).map(|(i, _)| *i).collect();

    let mut culled = Vec::with_capacity(excess);
    let survivors = std::mem::take(population);
    for (i, ind) in survivors.into_iter().enumerate() {
        if doomed.contains(&i) {
            culled.push(ind);
        } else {
            population.push(ind);
        }
    }
    culled.sort_by(|a, b| fitness(a).total_cmp(&fitness(b)));
    culled
}

#[derive(Debug, Clone)]
pub struct PopulationController {
    config: EvolutionConfig,
    since_last_attempt_ms: f64,
    lifetime_generations: u64,
}

impl PopulationController {
    #[must_use]
    pub fn new(config: EvolutionConfig) -> Self {
        Self {
            config,
            since_last_attempt_ms: 0.0,
            lifetime_generations: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Replaces the configuration. Turning the loop on resets the timer.
    pub fn set_config(&mut self, config: EvolutionConfig) {
        let enabled = config.enabled;
        self.config = EvolutionConfig {
            enabled: self.config.enabled,
            ..config
        };
        self.set_enabled(enabled);
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        if self.config.enabled {
            ControllerState::Active
        } else {
            ControllerState::Idle
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    /// `Idle -> Active`. Restarts the attempt timer so there is no burst.
    pub fn enable(&mut self) {
        if !self.config.enabled {
            self.config.enabled = true;
            self.since_last_attempt_ms = 0.0;
            tracing::info!("Evolution loop enabled");
        }
    }

    /// `Active -> Idle`, effective from the next tick.
    pub fn disable(&mut self) {
        if self.config.enabled {
            self.config.enabled = false;
            tracing::info!("Evolution loop disabled");
        }
    }

    /// Zeroes the lifetime counter and the attempt timer. The enabled flag
    /// and the population are left alone.
    pub fn reset(&mut self) {
        self.lifetime_generations = 0;
        self.since_last_attempt_ms = 0.0;
    }

    /// Milliseconds between breeding attempts.
    #[must_use]
    pub fn interval_ms(&self) -> f64 {
        60_000.0 / self.config.speed
    }

    #[must_use]
    pub fn lifetime_generations(&self) -> u64 {
        self.lifetime_generations
    }

    #[must_use]
    pub fn since_last_attempt_ms(&self) -> f64 {
        self.since_last_attempt_ms
    }

    /// Advances the loop by `elapsed_ms`.
    ///
    /// Breeding is applied before natural selection. At most one offspring is
    /// produced per tick.
    pub fn tick<R: RandomSource + ?Sized>(
        &mut self,
        population: &mut Vec<Individual>,
        elapsed_ms: f64,
        ctx: &mut BreedingContext<'_, R>,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if !self.config.enabled {
            return outcome;
        }

        self.since_last_attempt_ms += elapsed_ms.max(0.0);
        if self.config.auto_breed
            && self.since_last_attempt_ms >= self.interval_ms()
            && population.len() < self.config.target_population
        {
            self.since_last_attempt_ms = 0.0;
            outcome.attempted = true;
            self.attempt_breeding(population, ctx, &mut outcome);
        }

        if self.config.natural_selection && population.len() > self.config.population_ceiling {
            outcome.culled = natural_selection(
                population,
                self.config.target_population,
                self.config.max_culls_per_tick,
            );
            for ind in &outcome.culled {
                tracing::info!(id = %ind.id, fitness = fitness(ind), "Culled by natural selection");
            }
        }

        outcome
    }

    fn attempt_breeding<R: RandomSource + ?Sized>(
        &mut self,
        population: &mut Vec<Individual>,
        ctx: &mut BreedingContext<'_, R>,
        outcome: &mut TickOutcome,
    ) {
        let ratio = self.config.eligibility_ratio;
        let mut candidates: Vec<usize> = population
            .iter()
            .enumerate()
            .filter(|(_, ind)| ind.energy > ratio * ind.stamina())
            .map(|(i, _)| i)
            .collect();
        shuffle(&mut candidates, &mut *ctx.rng);

        for pair in candidates.windows(2) {
            let (i, j) = (pair[0], pair[1]);
            let status = breeding::breeding_status(&population[i], &population[j], ctx.breeding);
            if !status.is_ok() {
                tracing::debug!(
                    first = %population[i].id,
                    second = %population[j].id,
                    ?status,
                    "Pair rejected"
                );
                outcome.rejections.push(Rejection {
                    first: population[i].id,
                    second: population[j].id,
                    status,
                });
                continue;
            }

            match breeding::breed_pair(population, i, j, ctx) {
                Ok(offspring) => {
                    self.lifetime_generations += 1;
                    tracing::info!(
                        id = %offspring.id,
                        generation = offspring.generation,
                        lifetime = self.lifetime_generations,
                        "Autonomous breeding"
                    );
                    outcome.offspring = Some(offspring.clone());
                    population.push(offspring);
                }
                Err(err) => tracing::warn!(%err, "Eligible pair failed to breed"),
            }
            break;
        }
    }
}
