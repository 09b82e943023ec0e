//! Individual lifecycle: creation, energy decay, rest, feeding and wandering.

use crate::config::{EnergyConfig, WorldConfig};
use crate::genetics;
use crate::random::RandomSource;
use menagerie_data::{Individual, Position};
use uuid::Uuid;

const PREFIXES: [&str; 25] = [
    "Aethel", "Bel", "Cor", "Dag", "Eld", "Fin", "Grom", "Had", "Ith", "Jor", "Kael", "Luv", "Mor",
    "Nar", "Oth", "Pyr", "Quas", "Rhun", "Syl", "Tor", "Val", "Wun", "Xer", "Yor", "Zan",
];
const SYLLABLES: [&str; 25] = [
    "ae", "ba", "co", "da", "el", "fa", "go", "ha", "id", "jo", "ka", "lu", "ma", "na", "os", "pe",
    "qu", "ri", "sa", "tu", "vi", "wu", "xi", "yo", "ze",
];

/// Random founder name, e.g. `Korida`.
pub fn founder_name<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let prefix = PREFIXES[rng.index(PREFIXES.len())];
    let s1 = SYLLABLES[rng.index(SYLLABLES.len())];
    let s2 = SYLLABLES[rng.index(SYLLABLES.len())];
    format!("{prefix}{s1}{s2}")
}

/// First half of `a` followed by the second half of `b`.
///
/// Midpoints are floored character counts. Names shorter than three
/// characters can't be split meaningfully and are joined with a `Jr` suffix.
#[must_use]
pub fn offspring_name(a: &str, b: &str) -> String {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.len() < 3 || b_chars.len() < 3 {
        return format!("{a}{b}Jr");
    }
    let head: String = a_chars[..a_chars.len() / 2].iter().collect();
    let tail: String = b_chars[b_chars.len() / 2..].iter().collect();
    head + &tail
}

/// Random founder at `position` with full energy.
pub fn create_founder_with_rng<R: RandomSource + ?Sized>(
    position: Position,
    born_at_ms: u64,
    rng: &mut R,
) -> Individual {
    let traits = genetics::generate_founder_genome(rng);
    let name = founder_name(rng);
    Individual {
        id: Uuid::new_v4(),
        name,
        generation: 1,
        energy: traits.physique.stamina,
        traits,
        parent_ids: None,
        born_at_ms,
        position,
        resting: false,
        rest_elapsed_ms: 0.0,
        wander_target: None,
    }
}

/// Founder at a uniformly random point inside the world.
pub fn spawn_founder<R: RandomSource + ?Sized>(
    world: &WorldConfig,
    born_at_ms: u64,
    rng: &mut R,
) -> Individual {
    let position = random_position(world, rng);
    create_founder_with_rng(position, born_at_ms, rng)
}

pub fn random_position<R: RandomSource + ?Sized>(world: &WorldConfig, rng: &mut R) -> Position {
    Position::new(rng.range(0.0, world.width), rng.range(0.0, world.height))
}

/// Applies `elapsed_ms` of decay or rest.
///
/// Active individuals lose `decay_per_sec`; dropping under the rest threshold
/// puts them to rest. Resting individuals don't decay, and once they have
/// rested for `rest_delay_ms` they regenerate until `wake_ratio`.
pub fn tick_energy(individual: &mut Individual, elapsed_ms: f64, config: &EnergyConfig) {
    let elapsed_ms = elapsed_ms.max(0.0);
    let stamina = individual.stamina();

    if !individual.resting {
        individual.energy = (individual.energy - config.decay_per_sec * elapsed_ms / 1000.0)
            .clamp(0.0, stamina);
        if individual.energy < stamina * config.rest_threshold_ratio {
            individual.resting = true;
            individual.rest_elapsed_ms = 0.0;
            individual.wander_target = None;
        }
        return;
    }

    let rested_before = individual.rest_elapsed_ms;
    individual.rest_elapsed_ms += elapsed_ms;
    // Only the part of this tick past the delay regenerates.
    let regen_ms =
        (individual.rest_elapsed_ms - rested_before.max(config.rest_delay_ms)).max(0.0);
    individual.energy =
        (individual.energy + config.regen_per_sec * regen_ms / 1000.0).clamp(0.0, stamina);
    wake_if_recovered(individual, config);
}

/// Adds `nutrition`, capped at stamina. Returns the energy actually gained.
pub fn feed(individual: &mut Individual, nutrition: f64, config: &EnergyConfig) -> f64 {
    let before = individual.energy;
    individual.energy = (individual.energy + nutrition.max(0.0)).min(individual.stamina());
    if individual.resting {
        wake_if_recovered(individual, config);
    }
    individual.energy - before
}

/// Takes `ratio` of the current energy. Returns the amount paid.
pub fn charge_breeding(individual: &mut Individual, ratio: f64) -> f64 {
    let before = individual.energy;
    individual.energy *= 1.0 - ratio;
    before - individual.energy
}

fn wake_if_recovered(individual: &mut Individual, config: &EnergyConfig) {
    if individual.energy >= individual.stamina() * config.wake_ratio {
        individual.resting = false;
        individual.rest_elapsed_ms = 0.0;
    }
}

/// Random-walk step toward the current wander target.
///
/// A new target is drawn when none is set or the old one is reached.
/// Resting individuals stay put.
pub fn wander<R: RandomSource + ?Sized>(
    individual: &mut Individual,
    elapsed_ms: f64,
    world: &WorldConfig,
    rng: &mut R,
) {
    if individual.resting {
        return;
    }
    let target = match individual.wander_target {
        Some(target) => target,
        None => {
            let target = random_position(world, rng);
            individual.wander_target = Some(target);
            target
        }
    };

    let step = individual.traits.physique.speed * world.walk_speed_per_sec * elapsed_ms.max(0.0)
        / 1000.0;
    let distance = individual.position.distance_to(&target);
    if distance <= step {
        individual.position = target;
        individual.wander_target = None;
    } else {
        individual.position.x += (target.x - individual.position.x) / distance * step;
        individual.position.y += (target.y - individual.position.y) / distance * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SequenceSource};

    fn founder(stamina: f64) -> Individual {
        let mut rng = RngSource::seeded(8);
        let mut ind = create_founder_with_rng(Position::default(), 0, &mut rng);
        ind.traits.physique.stamina = stamina;
        ind.energy = stamina;
        ind
    }

    #[test]
    fn test_founder_starts_full() {
        let mut rng = RngSource::seeded(21);
        let ind = create_founder_with_rng(Position::new(3.0, 4.0), 500, &mut rng);
        assert_eq!(ind.energy, ind.stamina());
        assert_eq!(ind.generation, 1);
        assert!(ind.parent_ids.is_none());
        assert_eq!(ind.born_at_ms, 500);
        assert!(!ind.name.is_empty());
    }

    #[test]
    fn test_offspring_name_halves() {
        assert_eq!(offspring_name("Ember", "Frost"), "Emost");
        assert_eq!(offspring_name("Blaze", "Solar"), "Bllar");
        assert_eq!(offspring_name("Thunder", "Storm"), "Thuorm");
    }

    #[test]
    fn test_offspring_name_short_fallback() {
        assert_eq!(offspring_name("Bo", "Frost"), "BoFrostJr");
        assert_eq!(offspring_name("", ""), "Jr");
    }

    #[test]
    fn test_offspring_name_multibyte() {
        assert_eq!(offspring_name("Ærøsk", "Ünïty"), "Ærïty");
    }

    #[test]
    fn test_decay_then_rest() {
        let config = EnergyConfig::default();
        let mut ind = founder(1.0);
        tick_energy(&mut ind, 10_000.0, &config);
        assert!((ind.energy - 0.9).abs() < 1e-9);
        assert!(!ind.resting);

        // 0.9 -> 0.29 crosses the 30% threshold
        tick_energy(&mut ind, 61_000.0, &config);
        assert!(ind.resting);
        assert!(ind.energy < 0.3);
    }

    #[test]
    fn test_rest_delay_before_regen() {
        let config = EnergyConfig::default();
        let mut ind = founder(1.0);
        ind.energy = 0.2;
        ind.resting = true;

        tick_energy(&mut ind, 2_000.0, &config);
        assert_eq!(ind.energy, 0.2);

        // 1s of this tick is before the 3s delay, 1s after it.
        tick_energy(&mut ind, 2_000.0, &config);
        assert!((ind.energy - 0.22).abs() < 1e-9);
        assert!(ind.resting);
    }

    #[test]
    fn test_regen_caps_and_wakes() {
        let config = EnergyConfig::default();
        let mut ind = founder(1.0);
        ind.energy = 0.2;
        ind.resting = true;
        ind.rest_elapsed_ms = config.rest_delay_ms;

        tick_energy(&mut ind, 1_000_000.0, &config);
        assert_eq!(ind.energy, 1.0);
        assert!(!ind.resting);
    }

    #[test]
    fn test_energy_never_negative() {
        let config = EnergyConfig {
            rest_threshold_ratio: 0.0,
            ..Default::default()
        };
        let mut ind = founder(0.5);
        tick_energy(&mut ind, 1_000_000.0, &config);
        assert_eq!(ind.energy, 0.0);
    }

    #[test]
    fn test_feed_caps_at_stamina_and_wakes() {
        let config = EnergyConfig::default();
        let mut ind = founder(1.0);
        ind.energy = 0.8;
        ind.resting = true;
        let gained = feed(&mut ind, 0.5, &config);
        assert!((gained - 0.2).abs() < 1e-12);
        assert_eq!(ind.energy, 1.0);
        assert!(!ind.resting);
    }

    #[test]
    fn test_feed_while_resting_below_wake() {
        let config = EnergyConfig::default();
        let mut ind = founder(1.0);
        ind.energy = 0.1;
        ind.resting = true;
        feed(&mut ind, 0.3, &config);
        assert!((ind.energy - 0.4).abs() < 1e-12);
        assert!(ind.resting);
    }

    #[test]
    fn test_charge_breeding() {
        let mut ind = founder(2.0);
        ind.energy = 1.5;
        let paid = charge_breeding(&mut ind, 0.3);
        assert_eq!(ind.energy, 1.5 * 0.7);
        assert!((paid - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_wander_reaches_target() {
        let world = WorldConfig::default();
        let mut ind = founder(1.0);
        ind.traits.physique.speed = 1.0;
        ind.position = Position::new(0.0, 0.0);
        ind.wander_target = Some(Position::new(3.0, 4.0));

        wander(&mut ind, 1_000.0, &world, &mut SequenceSource::constant(0.5));
        assert!((ind.position.x - 0.6).abs() < 1e-9);
        assert!((ind.position.y - 0.8).abs() < 1e-9);

        wander(&mut ind, 10_000.0, &world, &mut SequenceSource::constant(0.5));
        assert_eq!(ind.position, Position::new(3.0, 4.0));
        assert!(ind.wander_target.is_none());
    }

    #[test]
    fn test_resting_does_not_wander() {
        let world = WorldConfig::default();
        let mut ind = founder(1.0);
        ind.resting = true;
        let start = ind.position;
        wander(&mut ind, 5_000.0, &world, &mut SequenceSource::constant(0.5));
        assert_eq!(ind.position, start);
        assert!(ind.wander_target.is_none());
    }
}
