//! Headless and wall-clock drivers around [`Simulation::tick`].

use crate::simulation::Simulation;
use menagerie_core::history::SimEvent;
use std::time::Duration;

/// Runs `ticks` ticks of `tick_ms` simulated milliseconds back to back.
pub fn run_headless(sim: &mut Simulation, ticks: u64, tick_ms: f64) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(sim.tick(tick_ms));
        if sim.population.is_empty() {
            tracing::info!(tick = sim.tick, "Population died out");
            break;
        }
    }
    events
}

/// Runs `ticks` ticks paced by a tokio interval. Each tick advances the
/// simulation by the wall-clock time since the previous one.
pub async fn run_realtime(sim: &mut Simulation, ticks: u64, tick_ms: u64) -> Vec<SimEvent> {
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await;

    let mut events = Vec::new();
    let mut last = tokio::time::Instant::now();
    for _ in 0..ticks {
        interval.tick().await;
        let now = tokio::time::Instant::now();
        let elapsed = now.duration_since(last).as_secs_f64() * 1000.0;
        last = now;
        events.extend(sim.tick(elapsed));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use menagerie_core::config::AppConfig;

    #[test]
    fn test_headless_advances_clock() {
        let mut config = AppConfig::default();
        config.world.seed = Some(4);
        let mut sim = Simulation::new(config).unwrap();
        run_headless(&mut sim, 10, 100.0);
        assert_eq!(sim.tick, 10);
        assert_eq!(sim.clock_ms(), 1_000);
    }

    #[tokio::test]
    async fn test_realtime_ticks() {
        let mut config = AppConfig::default();
        config.world.seed = Some(5);
        let mut sim = Simulation::new(config).unwrap();
        run_realtime(&mut sim, 3, 5).await;
        assert_eq!(sim.tick, 3);
        assert!(sim.clock_ms() >= 10);
    }
}
