use super::traits::TraitSet;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// World position of an individual.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    #[must_use]
    pub fn midpoint(&self, other: &Position) -> Position {
        Position::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// One living creature.
///
/// The genome in `traits` never changes after birth. Energy stays within
/// `[0, traits.physique.stamina]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct Individual {
    pub id: Uuid,
    pub name: String,
    /// 1 for founders, `max(parents) + 1` for offspring.
    pub generation: u32,
    pub traits: TraitSet,
    /// `None` for founders.
    pub parent_ids: Option<[Uuid; 2]>,
    pub energy: f64,
    /// Simulation clock at birth, in milliseconds.
    pub born_at_ms: u64,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub resting: bool,
    #[serde(default)]
    pub rest_elapsed_ms: f64,
    #[serde(default)]
    pub wander_target: Option<Position>,
}

impl Individual {
    #[must_use]
    pub fn stamina(&self) -> f64 {
        self.traits.physique.stamina
    }

    /// Energy as a fraction of stamina, 0 when stamina is 0.
    #[must_use]
    pub fn energy_ratio(&self) -> f64 {
        let stamina = self.stamina();
        if stamina > 0.0 {
            self.energy / stamina
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn is_founder(&self) -> bool {
        self.parent_ids.is_none()
    }

    /// True when `other` is one of this individual's recorded parents.
    #[must_use]
    pub fn is_child_of(&self, other: &Individual) -> bool {
        self.parent_ids
            .is_some_and(|parents| parents.contains(&other.id))
    }

    /// Direct parent or direct offspring, in either direction.
    #[must_use]
    pub fn is_directly_related(&self, other: &Individual) -> bool {
        self.is_child_of(other) || other.is_child_of(self)
    }
}
