//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections that map onto a `config.toml` file. Every field
//! has a default, so a partial file only overrides what it names.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! initial_population = 8
//! seed = 42
//!
//! [evolution]
//! enabled = true
//! speed = 6.0
//! target_population = 24
//! population_ceiling = 32
//! natural_selection = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// World bounds, starting population and food spawning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub initial_population: usize,
    pub seed: Option<u64>,
    /// One food source is offered every interval.
    pub food_spawn_interval_ms: f64,
    /// Distance walked per second at speed 1.0.
    pub walk_speed_per_sec: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 40.0,
            initial_population: 6,
            seed: None,
            food_spawn_interval_ms: 2_000.0,
            walk_speed_per_sec: 1.0,
        }
    }
}

/// Energy decay, rest and regeneration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EnergyConfig {
    pub decay_per_sec: f64,
    /// Resting starts below this fraction of stamina.
    pub rest_threshold_ratio: f64,
    /// Time spent resting before regeneration kicks in.
    pub rest_delay_ms: f64,
    pub regen_per_sec: f64,
    /// Resting ends at this fraction of stamina.
    pub wake_ratio: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            decay_per_sec: 0.01,
            rest_threshold_ratio: 0.3,
            rest_delay_ms: 3_000.0,
            regen_per_sec: 0.02,
            wake_ratio: 0.9,
        }
    }
}

/// Mutation amplitudes and colour inheritance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneticsConfig {
    /// Half-width of the mutation window for physical and proportion traits.
    pub physical_mutation: f64,
    /// Half-width of the mutation window for behavioural traits.
    pub behavior_mutation: f64,
    /// Chance that a colour is copied verbatim from one parent.
    pub pure_color_chance: f64,
}

impl Default for GeneticsConfig {
    fn default() -> Self {
        Self {
            physical_mutation: 0.1,
            behavior_mutation: 0.15,
            pure_color_chance: 0.3,
        }
    }
}

/// Breeding eligibility and transaction costs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BreedingConfig {
    /// Each parent needs at least this fraction of its stamina.
    pub energy_floor_ratio: f64,
    /// Fraction of current energy each parent pays.
    pub energy_cost_ratio: f64,
    /// Offspring land within this distance of the parents' midpoint, per axis.
    pub placement_jitter: f64,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            energy_floor_ratio: 0.5,
            energy_cost_ratio: 0.3,
            placement_jitter: 1.0,
        }
    }
}

/// Autonomous evolution loop.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    pub enabled: bool,
    /// Breeding attempts per minute.
    pub speed: f64,
    pub population_ceiling: usize,
    pub target_population: usize,
    pub auto_breed: bool,
    pub natural_selection: bool,
    pub max_culls_per_tick: usize,
    /// Candidates need strictly more than this fraction of stamina.
    pub eligibility_ratio: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 6.0,
            population_ceiling: 30,
            target_population: 20,
            auto_breed: true,
            natural_selection: false,
            max_culls_per_tick: 5,
            eligibility_ratio: 0.5,
        }
    }
}

/// Food sources and passive harvesting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FeedingConfig {
    /// Maximum number of uneaten food sources.
    pub capacity: usize,
    pub proximity_radius: f64,
    pub nutrition: f64,
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            proximity_radius: 1.5,
            nutrition: 0.3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub energy: EnergyConfig,
    pub genetics: GeneticsConfig,
    pub breeding: BreedingConfig,
    pub evolution: EvolutionConfig,
    pub feeding: FeedingConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns the first violated rule as an error.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.world.width > 0.0 && self.world.height > 0.0,
            "World dimensions must be positive"
        );
        anyhow::ensure!(
            self.world.initial_population <= 10_000,
            "Initial population too large (max 10000)"
        );
        anyhow::ensure!(
            self.world.food_spawn_interval_ms > 0.0,
            "Food spawn interval must be positive"
        );
        anyhow::ensure!(
            self.world.walk_speed_per_sec >= 0.0,
            "Walk speed must be non-negative"
        );

        anyhow::ensure!(
            self.energy.decay_per_sec >= 0.0,
            "Energy decay must be non-negative"
        );
        anyhow::ensure!(
            self.energy.regen_per_sec >= 0.0,
            "Energy regeneration must be non-negative"
        );
        anyhow::ensure!(
            self.energy.rest_delay_ms >= 0.0,
            "Rest delay must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.energy.rest_threshold_ratio),
            "Rest threshold must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.energy.wake_ratio > self.energy.rest_threshold_ratio
                && self.energy.wake_ratio <= 1.0,
            "Wake ratio must be above the rest threshold and at most 1.0"
        );

        anyhow::ensure!(
            self.genetics.physical_mutation >= 0.0 && self.genetics.behavior_mutation >= 0.0,
            "Mutation rates must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.genetics.pure_color_chance),
            "Pure colour chance must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.breeding.energy_floor_ratio),
            "Breeding energy floor must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&self.breeding.energy_cost_ratio),
            "Breeding energy cost must be in [0.0, 1.0)"
        );
        anyhow::ensure!(
            self.breeding.placement_jitter >= 0.0,
            "Placement jitter must be non-negative"
        );

        anyhow::ensure!(
            self.evolution.speed > 0.0,
            "Evolution speed must be positive"
        );
        anyhow::ensure!(
            self.evolution.target_population <= self.evolution.population_ceiling,
            "Target population must not exceed the population ceiling"
        );
        anyhow::ensure!(
            self.evolution.max_culls_per_tick > 0,
            "Max culls per tick must be positive"
        );

        anyhow::ensure!(
            self.feeding.proximity_radius >= 0.0,
            "Feeding radius must be non-negative"
        );
        anyhow::ensure!(
            self.feeding.nutrition >= 0.0,
            "Nutrition must be non-negative"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Hash of every rule-affecting section, recorded into save files.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.energy).as_bytes());
        hasher.update(format!("{:?}", self.genetics).as_bytes());
        hasher.update(format!("{:?}", self.breeding).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.feeding).as_bytes());
        hex::encode(hasher.finalize())
    }
}
