//! Realm generation: one pass over a terrain cell graph
//!
//! Runs partitioning, settlement placement, route topology selection, and
//! pathfinding in order, and bundles the outputs. All randomness flows
//! through one rng seeded from the master seed, so an identical
//! (graph, config, seed) triple reproduces the realm bit for bit.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cells::{CellGraph, CellId, Vec2};
use crate::config::RealmConfig;
use crate::countries::{generate_countries, Country, CountryId};
use crate::naming::NameGenerator;
use crate::routes::{pathfind, simplify, topology, RouteNode, RoutePath};
use crate::settlements::place_settlements;

/// All political-layer outputs of one generation pass. Replaced wholesale
/// on regeneration; nothing is updated incrementally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RealmData {
    /// Master seed the pass ran with.
    pub seed: u64,
    pub countries: Vec<Country>,
    /// Country of each cell, parallel to the cell array; `None` for water.
    pub cell_country: Vec<Option<CountryId>>,
    /// Settlement cells per country, capital first; parallel to `countries`.
    pub settlements: Vec<Vec<CellId>>,
    /// Simplified route geometry for every path the pathfinder completed.
    pub routes: Vec<RoutePath>,
}

/// Generate the political layer for a terrain graph.
pub fn generate_realm(graph: &CellGraph, config: &RealmConfig, seed: u64) -> RealmData {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let names = NameGenerator::new();

    let partition = generate_countries(graph, config, &names, &mut rng);
    let settlements = place_settlements(graph, &partition, config, &mut rng);

    let mut nodes: Vec<RouteNode> = Vec::new();
    for (country, sites) in partition.countries.iter().zip(&settlements) {
        for &cell in sites {
            nodes.push(RouteNode {
                cell,
                country: country.id,
                position: graph.cell(cell).position,
            });
        }
    }

    let links = topology::build_topology(
        &nodes,
        config.extra_connection_chance,
        config.extra_connection_scale,
        &mut rng,
    );

    let mut routes: Vec<RoutePath> = Vec::new();
    for link in &links {
        let start = nodes[link.edge.a].cell;
        let goal = nodes[link.edge.b].cell;
        // An unreachable goal drops the link silently; partial networks are
        // fine downstream.
        if let Some(path) = pathfind::find_route(graph, start, goal, &config.route_costs) {
            let points: Vec<Vec2> = path.iter().map(|&id| graph.cell(id).position).collect();
            let points = simplify::simplify_path(&points);
            if points.len() >= 2 {
                routes.push(RoutePath {
                    points,
                    is_primary: link.is_primary,
                });
            }
        }
    }

    println!(
        "  Generated {} countries, {} settlements, {} routes",
        partition.countries.len(),
        settlements.iter().map(|s| s.len()).sum::<usize>(),
        routes.len()
    );

    RealmData {
        seed,
        countries: partition.countries,
        cell_country: partition.cell_country,
        settlements,
        routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{flat_grid, synthetic_island};

    #[test]
    fn test_generation_is_deterministic() {
        let graph = synthetic_island(32, 24, 99);
        let config = RealmConfig::default();
        let a = generate_realm(&graph, &config, 99);
        let b = generate_realm(&graph, &config, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let graph = synthetic_island(32, 24, 5);
        let config = RealmConfig::default();
        let a = generate_realm(&graph, &config, 1);
        let b = generate_realm(&graph, &config, 2);
        // Country partitions from different seeds should not coincide.
        assert_ne!(a.cell_country, b.cell_country);
    }

    #[test]
    fn test_routes_have_at_least_two_points() {
        let graph = synthetic_island(40, 30, 31);
        let realm = generate_realm(&graph, &RealmConfig::default(), 31);
        for route in &realm.routes {
            assert!(route.points.len() >= 2);
        }
    }

    #[test]
    fn test_empty_graph_yields_empty_realm() {
        let graph = CellGraph::new(Vec::new());
        let realm = generate_realm(&graph, &RealmConfig::default(), 1);
        assert!(realm.countries.is_empty());
        assert!(realm.cell_country.is_empty());
        assert!(realm.settlements.is_empty());
        assert!(realm.routes.is_empty());
    }

    #[test]
    fn test_settlements_parallel_to_countries() {
        let graph = flat_grid(20, 20, 0.4);
        let config = RealmConfig {
            country_count: 5,
            ..RealmConfig::default()
        };
        let realm = generate_realm(&graph, &config, 8);
        assert_eq!(realm.settlements.len(), realm.countries.len());
        for (country, sites) in realm.countries.iter().zip(&realm.settlements) {
            assert_eq!(sites[0], country.capital);
        }
    }
}
