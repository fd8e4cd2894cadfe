//! Route topology selection
//!
//! Kruskal's minimum spanning tree over all settlement nodes guarantees
//! every country is reachable; a probabilistic second pass adds short
//! redundant links so the network is not a pure tree.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{RouteEdge, RouteLink, RouteNode};

/// Disjoint-set forest with union by rank and iterative path-compressed
/// find (no recursion, safe for large node counts).
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Union the sets holding `a` and `b`; false if already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Select the route topology over the given settlement nodes.
///
/// Primary links form a minimum spanning tree (`nodes.len() - 1` edges,
/// connected). Extra links are drawn from the shortest unselected candidate
/// edges, up to `extra_scale` times the average nearest-neighbor distance,
/// each accepted with probability `extra_chance`.
pub fn build_topology(
    nodes: &[RouteNode],
    extra_chance: f64,
    extra_scale: f32,
    rng: &mut ChaCha8Rng,
) -> Vec<RouteLink> {
    if nodes.len() < 2 {
        return Vec::new();
    }

    let mut candidates: Vec<RouteEdge> = Vec::with_capacity(nodes.len() * (nodes.len() - 1) / 2);
    for a in 0..nodes.len() {
        for b in (a + 1)..nodes.len() {
            candidates.push(RouteEdge {
                a,
                b,
                distance: nodes[a].position.distance(&nodes[b].position),
            });
        }
    }
    candidates.sort_by(|x, y| x.distance.total_cmp(&y.distance));

    let mut uf = UnionFind::new(nodes.len());
    let mut in_tree = vec![false; candidates.len()];
    let mut links: Vec<RouteLink> = Vec::new();
    for (i, edge) in candidates.iter().enumerate() {
        if uf.union(edge.a, edge.b) {
            in_tree[i] = true;
            links.push(RouteLink {
                edge: *edge,
                is_primary: true,
            });
        }
    }

    // Redundancy: accept short leftover edges below a distance ceiling
    // derived from how tightly the nodes cluster.
    let mut nearest = vec![f32::INFINITY; nodes.len()];
    for edge in &candidates {
        if edge.distance < nearest[edge.a] {
            nearest[edge.a] = edge.distance;
        }
        if edge.distance < nearest[edge.b] {
            nearest[edge.b] = edge.distance;
        }
    }
    let avg_nearest = nearest.iter().sum::<f32>() / nodes.len() as f32;
    let threshold = avg_nearest * extra_scale;

    // Candidates are sorted, so this is a prefix scan.
    for (i, edge) in candidates.iter().enumerate() {
        if edge.distance > threshold {
            break;
        }
        if in_tree[i] {
            continue;
        }
        if rng.gen_bool(extra_chance) {
            links.push(RouteLink {
                edge: *edge,
                is_primary: false,
            });
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::{CellId, Vec2};
    use crate::countries::CountryId;
    use rand::SeedableRng;

    fn nodes_at(positions: &[(f32, f32)]) -> Vec<RouteNode> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| RouteNode {
                cell: CellId(i as u32),
                country: CountryId(0),
                position: Vec2::new(x, y),
            })
            .collect()
    }

    #[test]
    fn test_union_find() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(uf.union(1, 2));
        assert!(!uf.union(0, 2));
        assert_eq!(uf.find(0), uf.find(2));
        assert_ne!(uf.find(0), uf.find(4));
    }

    #[test]
    fn test_primary_links_form_spanning_tree() {
        let nodes = nodes_at(&[
            (0.0, 0.0),
            (4.0, 1.0),
            (1.0, 5.0),
            (8.0, 8.0),
            (2.0, 2.0),
            (9.0, 0.5),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let links = build_topology(&nodes, 0.5, 1.5, &mut rng);

        let primary: Vec<_> = links.iter().filter(|l| l.is_primary).collect();
        assert_eq!(primary.len(), nodes.len() - 1);

        // Connected via primary edges only.
        let mut uf = UnionFind::new(nodes.len());
        for link in &primary {
            uf.union(link.edge.a, link.edge.b);
        }
        let root = uf.find(0);
        for i in 1..nodes.len() {
            assert_eq!(uf.find(i), root);
        }
    }

    #[test]
    fn test_extras_never_duplicate_tree_edges() {
        let nodes = nodes_at(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.5, 0.5)]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let links = build_topology(&nodes, 1.0, 10.0, &mut rng);
        for (i, a) in links.iter().enumerate() {
            for b in links.iter().skip(i + 1) {
                assert!(a.edge != b.edge, "edge selected twice");
            }
        }
    }

    #[test]
    fn test_degenerate_node_counts() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(build_topology(&[], 0.5, 1.5, &mut rng).is_empty());
        let one = nodes_at(&[(3.0, 3.0)]);
        assert!(build_topology(&one, 0.5, 1.5, &mut rng).is_empty());
    }

    #[test]
    fn test_extras_respect_distance_ceiling() {
        // A tight pair and one far outlier; with scale 1.0 the long edges
        // to the outlier can never be extras.
        let nodes = nodes_at(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (100.0, 100.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let links = build_topology(&nodes, 1.0, 1.0, &mut rng);
        for link in links.iter().filter(|l| !l.is_primary) {
            assert!(link.edge.distance < 50.0);
        }
    }
}
