//! Food sources and passive harvesting.
//!
//! The feeding ground only holds sources and applies the feeding effect;
//! when and where sources appear is up to the driver.

use crate::config::EnergyConfig;
use crate::lifecycle;
use menagerie_data::{Individual, Position};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSource {
    pub id: Uuid,
    pub position: Position,
    pub nutrition: f64,
}

/// A meal taken from the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct Meal {
    pub source: FoodSource,
    /// Energy actually gained after the stamina cap.
    pub gained: f64,
}

/// Bounded set of uneaten food sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedingGround {
    capacity: usize,
    sources: Vec<FoodSource>,
}

impl FeedingGround {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            sources: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.sources.len() >= self.capacity
    }

    /// Adds a source unless the ground is full.
    pub fn offer(&mut self, position: Position, nutrition: f64) -> Option<&FoodSource> {
        if self.is_full() {
            return None;
        }
        self.sources.push(FoodSource {
            id: Uuid::new_v4(),
            position,
            nutrition: nutrition.max(0.0),
        });
        self.sources.last()
    }

    /// Index of the closest source within `radius` of `position`.
    #[must_use]
    pub fn nearest_within(&self, position: &Position, radius: f64) -> Option<usize> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.position.distance_to(position)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Feeds `individual` from the nearest source in range, consuming it.
    pub fn try_feed(
        &mut self,
        individual: &mut Individual,
        radius: f64,
        energy: &EnergyConfig,
    ) -> Option<Meal> {
        let index = self.nearest_within(&individual.position, radius)?;
        let source = self.sources.swap_remove(index);
        let gained = lifecycle::feed(individual, source.nutrition, energy);
        Some(Meal { source, gained })
    }
}
