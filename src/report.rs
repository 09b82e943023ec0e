//! Plain-text views of the population for the CLI.

use menagerie_core::lineage_tree::AncestryTree;
use menagerie_data::Individual;
use std::fmt::Write;
use uuid::Uuid;

/// Indented ancestry of one individual, `depth` generations back.
///
/// ```text
/// Emost (Gen 2)
/// ├─ Parents:
///   Ember (Gen 1) [departed]
///   Frost (Gen 1)
/// ```
#[must_use]
pub fn family_tree(tree: &AncestryTree, id: &Uuid, depth: usize) -> String {
    let mut out = String::new();
    write_branch(tree, id, 0, depth, &mut out);
    out
}

fn write_branch(tree: &AncestryTree, id: &Uuid, indent: usize, depth: usize, out: &mut String) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let prefix = "  ".repeat(indent);
    let marker = if node.is_alive { "" } else { " [departed]" };
    let _ = writeln!(out, "{prefix}{} (Gen {}){marker}", node.name, node.generation);

    let parents = tree.parents(id);
    if depth == 0 || parents.is_empty() {
        return;
    }
    let _ = writeln!(out, "{prefix}├─ Parents:");
    for parent in parents {
        write_branch(tree, &parent.id, indent + 1, depth - 1, out);
    }
}

/// Ancestor, child and descendant counts for one individual.
///
/// ```text
/// Ember: 0 ancestors within 4 generations
///   children: Emost
///   descendants: 2
/// ```
#[must_use]
pub fn lineage_summary(tree: &AncestryTree, id: &Uuid, depth: usize) -> String {
    let Some(node) = tree.node(id) else {
        return String::new();
    };
    let mut out = String::new();
    let ancestors = tree.ancestors(id, depth);
    let _ = writeln!(
        out,
        "{}: {} ancestors within {depth} generations",
        node.name,
        ancestors.len()
    );
    let children: Vec<&str> = tree.children(id).iter().map(|c| c.name.as_str()).collect();
    if children.is_empty() {
        let _ = writeln!(out, "  children: none");
    } else {
        let _ = writeln!(out, "  children: {}", children.join(", "));
    }
    let _ = writeln!(out, "  descendants: {}", tree.descendant_count(id));
    out
}

/// One line per individual: name, generation, energy and colours.
#[must_use]
pub fn population_summary(population: &[Individual]) -> String {
    let mut out = String::new();
    for ind in population {
        let look = &ind.traits.appearance;
        let _ = writeln!(
            out,
            "{:<12} gen {:>3}  energy {:>5.2}/{:<5.2} {} {} {:?}",
            ind.name,
            ind.generation,
            ind.energy,
            ind.stamina(),
            look.primary_color.to_hex(),
            look.accent_color.to_hex(),
            look.pattern,
        );
    }
    out
}
