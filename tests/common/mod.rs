pub mod macros;

use menagerie_core::config::AppConfig;
use menagerie_core::lifecycle::create_founder_with_rng;
use menagerie_core::random::RngSource;
use menagerie_data::{Individual, Position};
use menagerie_lib::Simulation;
use uuid::Uuid;

/// Builds a [`Simulation`] with no random founders unless asked for.
#[allow(dead_code)]
pub struct SimulationBuilder {
    config: AppConfig,
    individuals: Vec<Individual>,
}

#[allow(dead_code)]
impl SimulationBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_population = 0;
        config.world.seed = Some(42);
        Self {
            config,
            individuals: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_founders(mut self, count: usize) -> Self {
        self.config.world.initial_population = count;
        self
    }

    pub fn with_individual(mut self, individual: Individual) -> Self {
        self.individuals.push(individual);
        self
    }

    pub fn with_evolution(mut self) -> Self {
        self.config.evolution.enabled = true;
        self
    }

    pub fn build(self) -> Simulation {
        let mut sim = Simulation::new(self.config).expect("Failed to create simulation in test builder");
        sim.population.extend(self.individuals);
        sim
    }
}

/// Hand-shaped individual for scenario tests.
#[allow(dead_code)]
pub struct IndividualBuilder {
    name: String,
    stamina: f64,
    energy_ratio: f64,
    size: f64,
    speed: f64,
    generation: u32,
    parents: Option<[Uuid; 2]>,
    position: Position,
    seed: u64,
}

#[allow(dead_code)]
impl IndividualBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stamina: 1.0,
            energy_ratio: 1.0,
            size: 1.0,
            speed: 1.0,
            generation: 1,
            parents: None,
            position: Position::new(10.0, 10.0),
            seed: 1,
        }
    }

    pub fn stamina(mut self, stamina: f64) -> Self {
        self.stamina = stamina;
        self
    }

    /// Energy as a fraction of stamina.
    pub fn energy_ratio(mut self, ratio: f64) -> Self {
        self.energy_ratio = ratio;
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn child_of(mut self, a: &Individual, b: &Individual) -> Self {
        self.parents = Some([a.id, b.id]);
        self.generation = a.generation.max(b.generation) + 1;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Individual {
        let mut rng = RngSource::seeded(self.seed);
        let mut ind = create_founder_with_rng(self.position, 0, &mut rng);
        ind.name = self.name;
        ind.traits.physique.stamina = self.stamina;
        ind.traits.physique.size = self.size;
        ind.traits.physique.speed = self.speed;
        ind.energy = self.stamina * self.energy_ratio;
        ind.generation = self.generation;
        ind.parent_ids = self.parents;
        ind
    }
}
