use menagerie_data::Individual;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;
use std::collections::HashMap;
use uuid::Uuid;

/// A node in the ancestry tree, living or departed.
#[derive(Debug, Clone, PartialEq)]
pub struct AncestryNode {
    pub id: Uuid,
    pub name: String,
    pub generation: u32,
    pub is_alive: bool,
}

/// Parent -> child graph over every known individual.
pub struct AncestryTree {
    pub graph: DiGraph<AncestryNode, ()>,
    id_map: HashMap<Uuid, NodeIndex>,
}

impl Default for AncestryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AncestryTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_map: HashMap::new(),
        }
    }

    /// Builds the tree from the living population and an archive of departed
    /// members. Parents that are in neither list are left out.
    #[must_use]
    pub fn build(living: &[Individual], departed: &[Individual]) -> Self {
        let mut tree = Self::new();

        for (ind, alive) in living
            .iter()
            .map(|i| (i, true))
            .chain(departed.iter().map(|i| (i, false)))
        {
            if tree.id_map.contains_key(&ind.id) {
                continue;
            }
            let idx = tree.graph.add_node(AncestryNode {
                id: ind.id,
                name: ind.name.clone(),
                generation: ind.generation,
                is_alive: alive,
            });
            tree.id_map.insert(ind.id, idx);
        }

        for ind in living.iter().chain(departed.iter()) {
            let Some(parents) = ind.parent_ids else {
                continue;
            };
            let Some(&child_idx) = tree.id_map.get(&ind.id) else {
                continue;
            };
            for parent in parents {
                if let Some(&parent_idx) = tree.id_map.get(&parent) {
                    if !tree.graph.contains_edge(parent_idx, child_idx) {
                        tree.graph.add_edge(parent_idx, child_idx, ());
                    }
                }
            }
        }

        tree
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn node(&self, id: &Uuid) -> Option<&AncestryNode> {
        self.id_map.get(id).map(|&idx| &self.graph[idx])
    }

    fn related(&self, id: &Uuid, direction: Direction) -> Vec<&AncestryNode> {
        let Some(&idx) = self.id_map.get(id) else {
            return Vec::new();
        };
        let mut nodes: Vec<&AncestryNode> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    #[must_use]
    pub fn parents(&self, id: &Uuid) -> Vec<&AncestryNode> {
        self.related(id, Direction::Incoming)
    }

    #[must_use]
    pub fn children(&self, id: &Uuid) -> Vec<&AncestryNode> {
        self.related(id, Direction::Outgoing)
    }

    /// Known ancestors up to `depth` generations back, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: &Uuid, depth: usize) -> Vec<(usize, &AncestryNode)> {
        let mut found = Vec::new();
        let mut frontier = vec![*id];
        for level in 1..=depth {
            let mut next = Vec::new();
            for current in &frontier {
                for parent in self.parents(current) {
                    found.push((level, parent));
                    next.push(parent.id);
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        found
    }

    /// Number of distinct known descendants.
    #[must_use]
    pub fn descendant_count(&self, id: &Uuid) -> usize {
        let Some(&idx) = self.id_map.get(id) else {
            return 0;
        };
        let mut bfs = Bfs::new(&self.graph, idx);
        let mut seen = 0;
        while bfs.next(&self.graph).is_some() {
            seen += 1;
        }
        seen - 1
    }

    /// Graphviz DOT export.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph Ancestry {\n");
        dot.push_str("  node [shape=box, style=filled, fontname=\"Arial\"];\n");

        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            let fill = if node.is_alive { "#e1f5fe" } else { "#eeeeee" };
            dot.push_str(&format!(
                "  \"{}\" [label=\"{} (Gen {})\", fillcolor=\"{}\"];\n",
                node.id, node.name, node.generation, fill
            ));
        }

        for edge in self.graph.edge_indices() {
            if let Some((from, to)) = self.graph.edge_endpoints(edge) {
                dot.push_str(&format!(
                    "  \"{}\" -> \"{}\";\n",
                    self.graph[from].id, self.graph[to].id
                ));
            }
        }

        dot.push_str("}\n");
        dot
    }
}
