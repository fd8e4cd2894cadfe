//! Terrain-aware pathfinding between route endpoints
//!
//! A* over the cell adjacency graph. The cost model prefers flat lowland,
//! charges for climbs and high ground, makes open-water steps very
//! expensive, and prices river crossings with a discount where the river is
//! small enough to bridge.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::cells::{Cell, CellGraph, CellId};
use crate::config::RouteCostWeights;

/// Elevation above which the highland penalty starts accruing.
const HIGHLAND_START: f32 = 0.52;
/// Average elevations below this get the lowland discount.
const LOWLAND_CUTOFF: f32 = 0.55;
const LOWLAND_DISCOUNT: f32 = 0.92;

/// Frontier entry ordered for a min-heap on f = g + h.
struct PathNode {
    cell: CellId,
    f: f32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the cheapest cell path from `start` to `goal`.
///
/// Returns the cell sequence including both endpoints, or `None` when the
/// goal is unreachable; callers treat that as "no route", not an error.
pub fn find_route(
    graph: &CellGraph,
    start: CellId,
    goal: CellId,
    weights: &RouteCostWeights,
) -> Option<Vec<CellId>> {
    let goal_pos = graph.cell(goal).position;
    // The lowland and river-valley discounts can pull step costs below
    // plain distance; scale the heuristic by the penalty floor so it stays
    // admissible.
    let h_scale = LOWLAND_DISCOUNT * weights.river_valley_bonus.min(1.0);
    let h = |cell: &Cell| cell.position.distance(&goal_pos) * h_scale;

    let mut open: BinaryHeap<PathNode> = BinaryHeap::new();
    let mut came_from: HashMap<CellId, CellId> = HashMap::new();
    let mut g_score: HashMap<CellId, f32> = HashMap::new();
    let mut closed: HashSet<CellId> = HashSet::new();

    g_score.insert(start, 0.0);
    open.push(PathNode {
        cell: start,
        f: h(graph.cell(start)),
    });

    while let Some(current) = open.pop() {
        if current.cell == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        if !closed.insert(current.cell) {
            continue;
        }

        let from = graph.cell(current.cell);
        let current_g = g_score[&current.cell];

        for &n in &from.neighbors {
            if closed.contains(&n) {
                continue;
            }
            let to = graph.cell(n);
            let tentative = current_g + step_cost(from, to, weights);
            if tentative < *g_score.get(&n).unwrap_or(&f32::INFINITY) {
                came_from.insert(n, current.cell);
                g_score.insert(n, tentative);
                open.push(PathNode {
                    cell: n,
                    f: tentative + h(to),
                });
            }
        }
    }

    None
}

/// Traversal cost of one step between adjacent cells.
pub fn step_cost(from: &Cell, to: &Cell, w: &RouteCostWeights) -> f32 {
    let distance = from.position.distance(&to.position);
    let slope = (from.height - to.height).abs();
    let elevation = (from.height + to.height) * 0.5;

    let mut penalty = 1.0
        + slope * w.slope_weight
        + (elevation - HIGHLAND_START).max(0.0).powi(2) * w.elevation_weight;

    if elevation < LOWLAND_CUTOFF {
        penalty *= LOWLAND_DISCOUNT;
    }

    if !from.is_land || !to.is_land {
        penalty += w.water_penalty;
    }

    if from.river.is_river() && to.river.is_river() {
        if from.river == to.river {
            penalty *= w.river_valley_bonus;
        }
    } else if from.river.is_river() != to.river.is_river() {
        penalty *= w.river_crossing_penalty;
        let crossing_flux = if from.river.is_river() {
            from.flux
        } else {
            to.flux
        };
        if crossing_flux < w.bridge_flux_threshold {
            penalty *= w.bridge_discount;
        }
    }

    distance * penalty
}

fn reconstruct(came_from: &HashMap<CellId, CellId>, start: CellId, goal: CellId) -> Vec<CellId> {
    let mut path = vec![goal];
    let mut cur = goal;
    while cur != start {
        match came_from.get(&cur) {
            Some(&prev) => {
                path.push(prev);
                cur = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
