//! Genome generation and two-parent inheritance.
//!
//! Pure functions over [`TraitSet`]; all randomness is drawn from the
//! caller's [`RandomSource`].

use crate::config::GeneticsConfig;
use crate::random::RandomSource;
use menagerie_data::{Appearance, Pattern, Physique, Proportions, Rgb, Temperament, TraitSet};

pub const PHYSICAL_RANGE: (f64, f64) = (0.5, 2.0);
pub const HEAD_SIZE_RANGE: (f64, f64) = (0.5, 1.5);
pub const BODY_LENGTH_RANGE: (f64, f64) = (0.7, 1.5);
pub const LIMB_LENGTH_RANGE: (f64, f64) = (0.6, 1.4);
pub const BEHAVIOR_RANGE: (f64, f64) = (0.0, 1.0);

const SATURATION_RANGE: (f64, f64) = (0.5, 0.9);
const LIGHTNESS_RANGE: (f64, f64) = (0.4, 0.7);

fn draw<R: RandomSource + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    rng.range(low, high)
}

/// Random genome for a parentless individual.
pub fn generate_founder_genome<R: RandomSource + ?Sized>(rng: &mut R) -> TraitSet {
    TraitSet {
        physique: Physique {
            size: draw(rng, PHYSICAL_RANGE),
            speed: draw(rng, PHYSICAL_RANGE),
            stamina: draw(rng, PHYSICAL_RANGE),
        },
        appearance: Appearance {
            primary_color: random_color(rng),
            accent_color: random_color(rng),
            pattern: Pattern::ALL[rng.index(Pattern::ALL.len())],
        },
        proportions: Proportions {
            head_size: draw(rng, HEAD_SIZE_RANGE),
            body_length: draw(rng, BODY_LENGTH_RANGE),
            limb_length: draw(rng, LIMB_LENGTH_RANGE),
        },
        temperament: Temperament {
            aggression: draw(rng, BEHAVIOR_RANGE),
            curiosity: draw(rng, BEHAVIOR_RANGE),
            social: draw(rng, BEHAVIOR_RANGE),
        },
    }
}

/// Saturated colour with a uniformly random hue.
pub fn random_color<R: RandomSource + ?Sized>(rng: &mut R) -> Rgb {
    let hue = rng.range(0.0, 360.0);
    let saturation = draw(rng, SATURATION_RANGE);
    let lightness = draw(rng, LIGHTNESS_RANGE);
    hsl_to_rgb(hue, saturation, lightness)
}

/// HSL to RGB. `hue` in degrees, `saturation` and `lightness` in [0, 1].
#[must_use]
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - chroma / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// Parent average plus a uniform perturbation in `[-rate, rate)`, floored at 0.
pub fn mutate_scalar<R: RandomSource + ?Sized>(a: f64, b: f64, rate: f64, rng: &mut R) -> f64 {
    let value = (a + b) / 2.0 + rng.range(-rate, rate);
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// With `pure_chance` one parent's colour is kept verbatim, otherwise the
/// channels are averaged (integer floor).
pub fn blend_color<R: RandomSource + ?Sized>(
    c1: Rgb,
    c2: Rgb,
    pure_chance: f64,
    rng: &mut R,
) -> Rgb {
    if rng.chance(pure_chance) {
        return if rng.coin() { c1 } else { c2 };
    }
    let avg = |a: u8, b: u8| ((u16::from(a) + u16::from(b)) / 2) as u8;
    Rgb::new(avg(c1.r, c2.r), avg(c1.g, c2.g), avg(c1.b, c2.b))
}

/// Offspring genome with the default mutation settings.
pub fn inherit<R: RandomSource + ?Sized>(a: &TraitSet, b: &TraitSet, rng: &mut R) -> TraitSet {
    inherit_with_config(a, b, &GeneticsConfig::default(), rng)
}

pub fn inherit_with_config<R: RandomSource + ?Sized>(
    a: &TraitSet,
    b: &TraitSet,
    config: &GeneticsConfig,
    rng: &mut R,
) -> TraitSet {
    let phys = config.physical_mutation;
    let behav = config.behavior_mutation;

    let physique = Physique {
        size: mutate_scalar(a.physique.size, b.physique.size, phys, rng),
        speed: mutate_scalar(a.physique.speed, b.physique.speed, phys, rng),
        stamina: mutate_scalar(a.physique.stamina, b.physique.stamina, phys, rng),
    };
    let proportions = Proportions {
        head_size: mutate_scalar(a.proportions.head_size, b.proportions.head_size, phys, rng),
        body_length: mutate_scalar(
            a.proportions.body_length,
            b.proportions.body_length,
            phys,
            rng,
        ),
        limb_length: mutate_scalar(
            a.proportions.limb_length,
            b.proportions.limb_length,
            phys,
            rng,
        ),
    };
    let temperament = Temperament {
        aggression: mutate_scalar(a.temperament.aggression, b.temperament.aggression, behav, rng),
        curiosity: mutate_scalar(a.temperament.curiosity, b.temperament.curiosity, behav, rng),
        social: mutate_scalar(a.temperament.social, b.temperament.social, behav, rng),
    };

    let pattern = if rng.coin() {
        a.appearance.pattern
    } else {
        b.appearance.pattern
    };
    let appearance = Appearance {
        primary_color: blend_color(
            a.appearance.primary_color,
            b.appearance.primary_color,
            config.pure_color_chance,
            rng,
        ),
        accent_color: blend_color(
            a.appearance.accent_color,
            b.appearance.accent_color,
            config.pure_color_chance,
            rng,
        ),
        pattern,
    };

    TraitSet {
        physique,
        appearance,
        proportions,
        temperament,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SequenceSource};

    fn within(value: f64, (low, high): (f64, f64)) -> bool {
        value >= low && value < high
    }

    #[test]
    fn test_founder_ranges() {
        let mut rng = RngSource::seeded(11);
        for _ in 0..500 {
            let g = generate_founder_genome(&mut rng);
            assert!(within(g.physique.size, PHYSICAL_RANGE));
            assert!(within(g.physique.speed, PHYSICAL_RANGE));
            assert!(within(g.physique.stamina, PHYSICAL_RANGE));
            assert!(within(g.proportions.head_size, HEAD_SIZE_RANGE));
            assert!(within(g.proportions.body_length, BODY_LENGTH_RANGE));
            assert!(within(g.proportions.limb_length, LIMB_LENGTH_RANGE));
            assert!(within(g.temperament.aggression, BEHAVIOR_RANGE));
            assert!(within(g.temperament.curiosity, BEHAVIOR_RANGE));
            assert!(within(g.temperament.social, BEHAVIOR_RANGE));
        }
    }

    #[test]
    fn test_founder_patterns_cover_set() {
        let mut rng = RngSource::seeded(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(generate_founder_genome(&mut rng).appearance.pattern);
        }
        assert_eq!(seen.len(), Pattern::ALL.len());
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(200.0, 0.0, 1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_blend_averages_when_pure_branch_excluded() {
        // 0.9 >= 0.3 always takes the averaging branch.
        let mut rng = SequenceSource::constant(0.9);
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        for _ in 0..100 {
            assert_eq!(blend_color(red, blue, 0.3, &mut rng), Rgb::new(127, 0, 127));
        }
    }

    #[test]
    fn test_blend_pure_branch_picks_parent() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let mut first = SequenceSource::new(vec![0.1, 0.2]);
        assert_eq!(blend_color(red, blue, 0.3, &mut first), red);
        let mut second = SequenceSource::new(vec![0.1, 0.7]);
        assert_eq!(blend_color(red, blue, 0.3, &mut second), blue);
    }

    #[test]
    fn test_blend_split_is_roughly_thirty_seventy() {
        let mut rng = RngSource::seeded(99);
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let trials = 20_000;
        let pure = (0..trials)
            .filter(|_| blend_color(red, blue, 0.3, &mut rng) != Rgb::new(127, 0, 127))
            .count();
        let share = pure as f64 / trials as f64;
        assert!((0.27..0.33).contains(&share), "pure share was {share}");
    }

    #[test]
    fn test_mutation_windows() {
        let mut rng = RngSource::seeded(1);
        let a = generate_founder_genome(&mut rng);
        let b = generate_founder_genome(&mut rng);
        for _ in 0..1_000 {
            let c = inherit(&a, &b, &mut rng);
            let size_avg = (a.physique.size + b.physique.size) / 2.0;
            assert!((c.physique.size - size_avg).abs() <= 0.1 + 1e-12);
            let social_avg = (a.temperament.social + b.temperament.social) / 2.0;
            // Floor at zero can only pull the value up toward the average.
            assert!(c.temperament.social - social_avg <= 0.15 + 1e-12);
        }
    }

    #[test]
    fn test_floor_at_zero() {
        let mut rng = RngSource::seeded(2);
        let mut zero = generate_founder_genome(&mut rng);
        zero.temperament = Temperament {
            aggression: 0.0,
            curiosity: 0.0,
            social: 0.0,
        };
        // Lowest draw gives the full negative perturbation.
        let mut low = SequenceSource::constant(0.0);
        let child = inherit(&zero, &zero, &mut low);
        assert_eq!(child.temperament.aggression, 0.0);
        assert!(child.is_well_formed());
    }

    #[test]
    fn test_non_finite_parents_collapse_to_zero() {
        let mut rng = RngSource::seeded(3);
        let mut broken = generate_founder_genome(&mut rng);
        broken.physique.speed = f64::INFINITY;
        broken.proportions.head_size = f64::NAN;
        let child = inherit(&broken, &broken, &mut rng);
        assert!(child.is_well_formed());
        assert_eq!(child.physique.speed, 0.0);
    }

    #[test]
    fn test_pattern_comes_from_a_parent() {
        let mut rng = RngSource::seeded(4);
        let mut a = generate_founder_genome(&mut rng);
        let mut b = generate_founder_genome(&mut rng);
        a.appearance.pattern = Pattern::Spots;
        b.appearance.pattern = Pattern::Spikes;
        for _ in 0..100 {
            let p = inherit(&a, &b, &mut rng).appearance.pattern;
            assert!(p == Pattern::Spots || p == Pattern::Spikes);
        }
    }
}
