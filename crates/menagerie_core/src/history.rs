//! Simulation events handed to the presentation layer each tick.

use crate::breeding::BreedingStatus;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum SimEvent {
    Founded {
        id: Uuid,
        name: String,
        tick: u64,
        timestamp: String,
    },
    Born {
        id: Uuid,
        name: String,
        parents: [Uuid; 2],
        generation: u32,
        tick: u64,
        timestamp: String,
    },
    BreedingRejected {
        first: Uuid,
        second: Uuid,
        status: BreedingStatus,
        tick: u64,
    },
    Fed {
        id: Uuid,
        gained: f64,
        tick: u64,
    },
    Culled {
        id: Uuid,
        fitness: f64,
        tick: u64,
        timestamp: String,
    },
    Released {
        id: Uuid,
        tick: u64,
        timestamp: String,
    },
    Imported {
        id: Uuid,
        name: String,
        tick: u64,
        timestamp: String,
    },
}

impl SimEvent {
    /// Wall-clock stamp for events that carry one.
    #[must_use]
    pub fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        match self {
            SimEvent::Founded { tick, .. }
            | SimEvent::Born { tick, .. }
            | SimEvent::BreedingRejected { tick, .. }
            | SimEvent::Fed { tick, .. }
            | SimEvent::Culled { tick, .. }
            | SimEvent::Released { tick, .. }
            | SimEvent::Imported { tick, .. } => *tick,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Most recent events, oldest dropped first.
#[derive(Debug, Clone)]
pub struct EventLog {
    capacity: usize,
    events: VecDeque<SimEvent>,
    births: u64,
    culls: u64,
    rejections: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: VecDeque::with_capacity(capacity.max(1)),
            births: 0,
            culls: 0,
            rejections: 0,
        }
    }

    pub fn record(&mut self, event: SimEvent) {
        match event {
            SimEvent::Born { .. } => self.births += 1,
            SimEvent::Culled { .. } => self.culls += 1,
            SimEvent::BreedingRejected { .. } => self.rejections += 1,
            _ => {}
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn recent(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births
    }

    #[must_use]
    pub fn culls(&self) -> u64 {
        self.culls
    }

    #[must_use]
    pub fn rejections(&self) -> u64 {
        self.rejections
    }
}
