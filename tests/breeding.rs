mod common;

use common::IndividualBuilder;
use menagerie_core::breeding::{breed, breeding_status, can_breed, BreedingContext, BreedingError, BreedingStatus};
use menagerie_core::config::AppConfig;
use menagerie_core::random::{RngSource, SequenceSource};
use menagerie_data::Rgb;

#[test]
fn test_self_breeding_is_refused() {
    let config = AppConfig::default();
    let a = IndividualBuilder::new("Ember").build();
    assert!(!can_breed(&a, &a, &config.breeding));
    assert_eq!(
        breeding_status(&a, &a, &config.breeding),
        BreedingStatus::SameIndividual
    );
}

#[test]
fn test_parent_child_refused_both_ways() {
    let config = AppConfig::default();
    let a = IndividualBuilder::new("Ember").build();
    let b = IndividualBuilder::new("Frost").build();
    let child = IndividualBuilder::new("Emost").child_of(&a, &b).build();

    for (x, y) in [(&a, &child), (&child, &a), (&b, &child), (&child, &b)] {
        assert_eq!(
            breeding_status(x, y, &config.breeding),
            BreedingStatus::DirectLineage
        );
    }
}

#[test]
fn test_siblings_and_grandparents_allowed() {
    let config = AppConfig::default();
    let a = IndividualBuilder::new("Ember").build();
    let b = IndividualBuilder::new("Frost").build();
    let sib1 = IndividualBuilder::new("Emost").child_of(&a, &b).build();
    let sib2 = IndividualBuilder::new("Frber").child_of(&a, &b).build();
    let c = IndividualBuilder::new("Cinder").build();
    let grandchild = IndividualBuilder::new("Emder").child_of(&sib1, &c).build();

    assert!(can_breed(&sib1, &sib2, &config.breeding));
    assert!(can_breed(&a, &grandchild, &config.breeding));
}

#[test]
fn test_energy_floor_is_inclusive() {
    let config = AppConfig::default();
    let a = IndividualBuilder::new("Ember").energy_ratio(0.5).build();
    let b = IndividualBuilder::new("Frost").energy_ratio(0.49).build();
    assert_eq!(
        breeding_status(&a, &b, &config.breeding),
        BreedingStatus::SecondParentExhausted
    );
    assert_eq!(
        breeding_status(&b, &a, &config.breeding),
        BreedingStatus::FirstParentExhausted
    );
    let c = IndividualBuilder::new("Cinder").energy_ratio(0.5).build();
    assert!(can_breed(&a, &c, &config.breeding));
}

#[test]
fn test_breed_transaction() {
    let config = AppConfig::default();
    let mut a = IndividualBuilder::new("Ember").stamina(1.0).energy_ratio(0.8).at(0.0, 0.0).build();
    let mut b = IndividualBuilder::new("Frost").stamina(2.0).energy_ratio(1.0).at(4.0, 0.0).build();
    b.generation = 3;
    let (ea, eb) = (a.energy, b.energy);

    let mut rng = RngSource::seeded(21);
    let mut ctx = BreedingContext {
        breeding: &config.breeding,
        genetics: &config.genetics,
        clock_ms: 1_234,
        rng: &mut rng,
    };
    let child = breed(&mut a, &mut b, &mut ctx).unwrap();

    assert_eq!(a.energy, ea * 0.7);
    assert_eq!(b.energy, eb * 0.7);
    assert_eq!(child.generation, 4);
    assert_lineage!(child, a, b);
    assert_well_formed!(child);
    assert_eq!(child.name, "Emost");
    assert_eq!(child.born_at_ms, 1_234);
    assert!((child.position.x - 2.0).abs() <= config.breeding.placement_jitter);
    let paid = (ea - a.energy) + (eb - b.energy);
    assert!((child.energy - paid.min(child.stamina())).abs() < 1e-12);
}

#[test]
fn test_refused_breed_changes_nothing() {
    let config = AppConfig::default();
    let mut a = IndividualBuilder::new("Ember").energy_ratio(0.2).build();
    let mut b = IndividualBuilder::new("Frost").build();
    let (before_a, before_b) = (a.clone(), b.clone());
    let mut rng = RngSource::seeded(1);
    let mut ctx = BreedingContext {
        breeding: &config.breeding,
        genetics: &config.genetics,
        clock_ms: 0,
        rng: &mut rng,
    };
    assert_eq!(
        breed(&mut a, &mut b, &mut ctx),
        Err(BreedingError::InvalidBreedingPair(
            BreedingStatus::FirstParentExhausted
        ))
    );
    assert_eq!(a, before_a);
    assert_eq!(b, before_b);
}

#[test]
fn test_colour_average_without_pure_branch() {
    let config = AppConfig::default();
    let mut a = IndividualBuilder::new("Ember").build();
    let mut b = IndividualBuilder::new("Frost").build();
    a.traits.appearance.primary_color = Rgb::new(255, 0, 0);
    b.traits.appearance.primary_color = Rgb::new(0, 0, 255);

    // 0.9 never passes the 0.3 pure-colour roll
    let mut rng = SequenceSource::constant(0.9);
    let mut ctx = BreedingContext {
        breeding: &config.breeding,
        genetics: &config.genetics,
        clock_ms: 0,
        rng: &mut rng,
    };
    let child = breed(&mut a, &mut b, &mut ctx).unwrap();
    assert_eq!(child.traits.appearance.primary_color, Rgb::new(127, 0, 127));
}

#[test]
fn test_short_names_get_junior_suffix() {
    let config = AppConfig::default();
    let mut a = IndividualBuilder::new("Al").build();
    let mut b = IndividualBuilder::new("Frost").build();
    let mut rng = RngSource::seeded(2);
    let mut ctx = BreedingContext {
        breeding: &config.breeding,
        genetics: &config.genetics,
        clock_ms: 0,
        rng: &mut rng,
    };
    let child = breed(&mut a, &mut b, &mut ctx).unwrap();
    assert_eq!(child.name, "AlFrostJr");
}
