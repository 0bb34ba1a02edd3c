//! Minimum spanning tree over platform centers.
//! Decides which platform pairs get a corridor; corridor geometry is owned by
//! the carving step, not by this module.

use crate::types::GridPos;

/// Kruskal's algorithm over the complete graph of centers, weighted by
/// squared Euclidean distance. Platform counts are small, so the dense edge
/// list stays cheap; ties break on `(weight, i, j)` so the result is
/// deterministic for a given center list. Returns `n - 1` edges for
/// `n >= 2` centers, nothing otherwise.
pub fn minimum_spanning_edges(centers: &[GridPos]) -> Vec<(usize, usize)> {
    if centers.len() < 2 {
        return Vec::new();
    }

    let mut edges = Vec::with_capacity(centers.len() * (centers.len() - 1) / 2);
    for i in 0..centers.len() {
        for j in (i + 1)..centers.len() {
            edges.push((centers[i].squared_distance(centers[j]), i, j));
        }
    }
    edges.sort_unstable();

    let mut sets = DisjointSets::new(centers.len());
    let mut tree = Vec::with_capacity(centers.len() - 1);
    for (_, i, j) in edges {
        if sets.union(i, j) {
            tree.push((i, j));
            if tree.len() == centers.len() - 1 {
                break;
            }
        }
    }
    tree
}

struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(size: usize) -> Self {
        Self { parent: (0..size).collect() }
    }

    fn find(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            // Path halving keeps the trees shallow without a rank table.
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    /// Merges the two sets; false when already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        self.parent[root_b] = root_a;
        true
    }
}
