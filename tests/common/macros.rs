/// Asserts that the simulation holds exactly `$count` individuals.
#[macro_export]
macro_rules! assert_population {
    ($sim:expr, $count:expr) => {
        assert_eq!(
            $sim.population.len(),
            $count,
            "Population count mismatch"
        );
    };
}

/// Asserts that an individual with the given id is alive.
#[macro_export]
macro_rules! assert_alive {
    ($sim:expr, $id:expr) => {
        assert!(
            $sim.find(&$id).is_some(),
            "Individual {} should be alive",
            $id
        );
    };
}

/// Asserts that `$child` lists `$a` and `$b` as its parents, in order.
#[macro_export]
macro_rules! assert_lineage {
    ($child:expr, $a:expr, $b:expr) => {
        assert_eq!(
            $child.parent_ids,
            Some([$a.id, $b.id]),
            "{} is not the child of {} and {}",
            $child.name,
            $a.name,
            $b.name
        );
    };
}

/// Asserts that every trait of `$ind` is finite and non-negative.
#[macro_export]
macro_rules! assert_well_formed {
    ($ind:expr) => {
        assert!(
            $ind.traits.is_well_formed(),
            "{} has malformed traits: {:?}",
            $ind.name,
            $ind.traits
        );
    };
}
