//! The simulation driver.
//!
//! [`Simulation`] is the only owner of the population list. Each tick runs
//! energy, wander, feeding, breeding and selection in that order and returns
//! the events it produced. Events from calls made between ticks (founding,
//! manual breeding, release, import) are queued and handed out by the next
//! tick, ahead of that tick's own events.

use anyhow::Result;
use menagerie_core::breeding::{self, BreedingContext, BreedingError};
use menagerie_core::config::AppConfig;
use menagerie_core::evolution::{fitness, PopulationController, TickOutcome};
use menagerie_core::feeding::FeedingGround;
use menagerie_core::history::{EventLog, SimEvent};
use menagerie_core::lifecycle;
use menagerie_core::lineage_tree::AncestryTree;
use menagerie_core::metrics::Metrics;
use menagerie_core::random::{RngSource, SeededRandom};
use menagerie_data::Individual;
use menagerie_io::persistence::{self, SaveFile};
use menagerie_io::{exchange, ImportReport, IoError, PoolFile};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

pub struct Simulation {
    pub population: Vec<Individual>,
    pub feeding: FeedingGround,
    pub controller: PopulationController,
    pub config: AppConfig,
    /// Members that were culled or released, kept for the family tree.
    pub departed: Vec<Individual>,
    pub log: EventLog,
    pub metrics: Metrics,
    pub tick: u64,
    pending: Vec<SimEvent>,
    clock_ms: f64,
    since_food_ms: f64,
    rng: SeededRandom,
}

impl Simulation {
    /// Validates `config` and seeds the world with founders.
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut sim = Self::empty(config)?;
        for _ in 0..sim.config.world.initial_population {
            sim.spawn_founder();
        }
        tracing::info!(
            population = sim.population.len(),
            seed = ?sim.config.world.seed,
            "Simulation initialised"
        );
        Ok(sim)
    }

    /// A world with no individuals.
    pub fn empty(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.world.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        };
        Ok(Self {
            population: Vec::new(),
            feeding: FeedingGround::new(config.feeding.capacity),
            controller: PopulationController::new(config.evolution.clone()),
            config,
            departed: Vec::new(),
            log: EventLog::default(),
            metrics: Metrics::new(),
            tick: 0,
            pending: Vec::new(),
            clock_ms: 0.0,
            since_food_ms: 0.0,
            rng,
        })
    }

    /// Simulation clock in whole milliseconds.
    #[must_use]
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms as u64
    }

    #[must_use]
    pub fn find(&self, id: &Uuid) -> Option<&Individual> {
        self.population.iter().find(|ind| &ind.id == id)
    }

    fn index_of(&self, id: &Uuid) -> Option<usize> {
        self.population.iter().position(|ind| &ind.id == id)
    }

    fn emit(&mut self, events: &mut Vec<SimEvent>, event: SimEvent) {
        self.log.record(event.clone());
        events.push(event);
    }

    /// Records an event raised outside `tick` for delivery with the next one.
    fn queue(&mut self, event: SimEvent) {
        self.log.record(event.clone());
        self.pending.push(event);
    }

    /// Events waiting for the next tick.
    #[must_use]
    pub fn pending_events(&self) -> &[SimEvent] {
        &self.pending
    }

    /// Adds a random founder and returns its id.
    pub fn spawn_founder(&mut self) -> Uuid {
        let founder = lifecycle::spawn_founder(&self.config.world, self.clock_ms(), &mut self.rng);
        let id = founder.id;
        self.queue(SimEvent::Founded {
            id,
            name: founder.name.clone(),
            tick: self.tick,
            timestamp: SimEvent::now(),
        });
        self.population.push(founder);
        id
    }

    /// Advances the world by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: f64) -> Vec<SimEvent> {
        let started = Instant::now();
        let elapsed_ms = elapsed_ms.max(0.0);
        let mut events = std::mem::take(&mut self.pending);
        self.tick += 1;
        self.clock_ms += elapsed_ms;

        // 1. Energy and movement
        for ind in &mut self.population {
            lifecycle::tick_energy(ind, elapsed_ms, &self.config.energy);
            lifecycle::wander(ind, elapsed_ms, &self.config.world, &mut self.rng);
        }

        // 2. Food spawning and feeding
        self.spawn_food(elapsed_ms);
        let mut meals = Vec::new();
        for ind in &mut self.population {
            if self.feeding.is_empty() {
                break;
            }
            if let Some(meal) =
                self.feeding
                    .try_feed(ind, self.config.feeding.proximity_radius, &self.config.energy)
            {
                meals.push((ind.id, meal.gained));
            }
        }
        for (id, gained) in meals {
            self.emit(&mut events, SimEvent::Fed { id, gained, tick: self.tick });
        }

        // 3. Breeding and natural selection
        let clock_ms = self.clock_ms();
        let outcome = {
            let mut ctx = BreedingContext {
                breeding: &self.config.breeding,
                genetics: &self.config.genetics,
                clock_ms,
                rng: &mut self.rng,
            };
            self.controller.tick(&mut self.population, elapsed_ms, &mut ctx)
        };
        self.apply_outcome(outcome, &mut events);

        self.metrics
            .record_tick(started.elapsed(), self.population.len(), self.feeding.len());
        events
    }

    fn spawn_food(&mut self, elapsed_ms: f64) {
        let interval = self.config.world.food_spawn_interval_ms;
        self.since_food_ms += elapsed_ms;
        while self.since_food_ms >= interval {
            self.since_food_ms -= interval;
            if self.feeding.is_full() {
                continue;
            }
            let position = lifecycle::random_position(&self.config.world, &mut self.rng);
            self.feeding.offer(position, self.config.feeding.nutrition);
        }
    }

    fn apply_outcome(&mut self, outcome: TickOutcome, events: &mut Vec<SimEvent>) {
        for rejection in outcome.rejections {
            let event = SimEvent::BreedingRejected {
                first: rejection.first,
                second: rejection.second,
                status: rejection.status,
                tick: self.tick,
            };
            self.emit(events, event);
        }
        if let Some(child) = outcome.offspring {
            self.metrics.increment_counter("births");
            self.emit(events, born_event(&child, self.tick));
        }
        for culled in outcome.culled {
            self.metrics.increment_counter("culls");
            let event = SimEvent::Culled {
                id: culled.id,
                fitness: fitness(&culled),
                tick: self.tick,
                timestamp: SimEvent::now(),
            };
            self.emit(events, event);
            self.departed.push(culled);
        }
    }

    /// Breeds two members by id and inserts the offspring.
    ///
    /// An ineligible pair queues a `BreedingRejected` event and returns a
    /// [`BreedingError`]. A refused breed leaves population and energy
    /// untouched.
    pub fn breed(&mut self, first: &Uuid, second: &Uuid) -> Result<Individual> {
        let i = self
            .index_of(first)
            .ok_or_else(|| anyhow::anyhow!("Unknown individual {first}"))?;
        let j = self
            .index_of(second)
            .ok_or_else(|| anyhow::anyhow!("Unknown individual {second}"))?;

        let clock_ms = self.clock_ms();
        let result = {
            let mut ctx = BreedingContext {
                breeding: &self.config.breeding,
                genetics: &self.config.genetics,
                clock_ms,
                rng: &mut self.rng,
            };
            breeding::breed_pair(&mut self.population, i, j, &mut ctx)
        };

        match result {
            Ok(child) => {
                self.metrics.increment_counter("births");
                self.queue(born_event(&child, self.tick));
                tracing::info!(id = %child.id, name = %child.name, "Offspring born");
                self.population.push(child.clone());
                Ok(child)
            }
            Err(BreedingError::InvalidBreedingPair(status)) => {
                self.queue(SimEvent::BreedingRejected {
                    first: *first,
                    second: *second,
                    status,
                    tick: self.tick,
                });
                Err(BreedingError::InvalidBreedingPair(status).into())
            }
            Err(err) => {
                tracing::warn!(%err, first = %first, second = %second, "Breeding failed");
                Err(err.into())
            }
        }
    }

    /// Removes a member from the population.
    pub fn release(&mut self, id: &Uuid) -> Option<Individual> {
        let index = self.index_of(id)?;
        let released = self.population.remove(index);
        self.queue(SimEvent::Released {
            id: released.id,
            tick: self.tick,
            timestamp: SimEvent::now(),
        });
        self.departed.push(released.clone());
        Some(released)
    }

    pub fn set_evolution_enabled(&mut self, enabled: bool) {
        self.controller.set_enabled(enabled);
        self.config.evolution.enabled = enabled;
    }

    #[must_use]
    pub fn ancestry(&self) -> AncestryTree {
        AncestryTree::build(&self.population, &self.departed)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = SaveFile::capture(&self.population, &self.config.fingerprint());
        persistence::save_population(&file, path)?;
        Ok(())
    }

    /// Replaces the population with a saved one. On any error the current
    /// population is left as it was. Returns non-fatal warnings.
    pub fn load_from<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<IoError>> {
        let loaded = persistence::load_population(path)?;
        if !loaded.config_fingerprint.is_empty()
            && loaded.config_fingerprint != self.config.fingerprint()
        {
            tracing::warn!("Save file was written under different rules");
        }

        let mut individuals = loaded.individuals;
        for ind in &mut individuals {
            ind.position = lifecycle::random_position(&self.config.world, &mut self.rng);
        }
        self.population = individuals;
        self.departed.clear();
        Ok(loaded.warnings)
    }

    pub fn export_pool(&self, ids: &[Uuid]) -> Result<PoolFile> {
        Ok(exchange::export_pool(&self.population, ids)?)
    }

    /// Adds every usable record as a new founder.
    pub fn import_pool(&mut self, file: &PoolFile) -> ImportReport {
        let report = exchange::import_pool(file, self.clock_ms(), &self.config.world, &mut self.rng);
        for ind in &report.imported {
            let event = SimEvent::Imported {
                id: ind.id,
                name: ind.name.clone(),
                tick: self.tick,
                timestamp: SimEvent::now(),
            };
            self.queue(event);
        }
        self.population.extend(report.imported.iter().cloned());
        report
    }

    pub fn import_pool_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportReport> {
        let file = exchange::read_pool(path)?;
        Ok(self.import_pool(&file))
    }
}

fn born_event(child: &Individual, tick: u64) -> SimEvent {
    SimEvent::Born {
        id: child.id,
        name: child.name.clone(),
        parents: child.parent_ids.unwrap_or_default(),
        generation: child.generation,
        tick,
        timestamp: SimEvent::now(),
    }
}
