//! Settlement placement within countries
//!
//! Each country gets its capital plus a weighted random sample of member
//! cells, favoring lowland, river, and near-coast sites. Settlement cells
//! double as route-network endpoints.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::cells::{Cell, CellGraph, CellId};
use crate::config::RealmConfig;
use crate::countries::CountryPartition;

/// Cells above this height never take a settlement.
const MAX_SITE_HEIGHT: f32 = 0.88;
/// Countries below this many cells get at most their capital.
const SMALL_COUNTRY_CELLS: usize = 12;
/// Hard cap on sampling draws per country.
const MAX_DRAWS: usize = 200;

/// Place settlements for every country. Returns one cell list per country,
/// parallel to `partition.countries`, capital first.
pub fn place_settlements(
    graph: &CellGraph,
    partition: &CountryPartition,
    config: &RealmConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<Vec<CellId>> {
    let coast = graph.coast_distance();
    partition
        .countries
        .iter()
        .map(|country| {
            place_in_country(graph, &coast, country.capital, &country.cells, config, rng)
        })
        .collect()
}

fn place_in_country(
    graph: &CellGraph,
    coast: &[u32],
    capital: CellId,
    members: &[CellId],
    config: &RealmConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<CellId> {
    let mut sites = vec![capital];
    if members.is_empty() {
        return sites;
    }

    let hi = config.settlements_max.max(config.settlements_min);
    let mut target = rng.gen_range(config.settlements_min..=hi).max(1);
    if members.len() < SMALL_COUNTRY_CELLS {
        target = target.min(1);
    }

    let weights: Vec<f32> = members
        .iter()
        .map(|&id| site_weight(graph.cell(id), coast))
        .collect();
    let total: f32 = weights.iter().sum();

    let mut draws = 0;
    while sites.len() < target && draws < MAX_DRAWS {
        draws += 1;
        let candidate = if total > 0.0 {
            weighted_pick(rng, members, &weights, total)
        } else {
            // Every member was excluded; fall back to a uniform draw.
            members[rng.gen_range(0..members.len())]
        };
        if sites.contains(&candidate) {
            continue;
        }
        if graph.cell(candidate).height > MAX_SITE_HEIGHT {
            continue;
        }
        sites.push(candidate);
    }

    sites
}

/// Sampling weight of a candidate settlement cell. Zero means ineligible.
fn site_weight(cell: &Cell, coast: &[u32]) -> f32 {
    if !cell.is_land || cell.height > MAX_SITE_HEIGHT {
        return 0.0;
    }
    let mut w: f32 = 1.0;
    if cell.height < 0.45 {
        w += 0.6;
    }
    if cell.height > 0.75 {
        w *= 0.4;
    }
    if cell.river.is_river() {
        w += 0.8;
    }
    let d = coast[cell.id.index()];
    if d > 1 && d <= 3 {
        w += 0.5;
    }
    w.max(0.05)
}

fn weighted_pick(
    rng: &mut ChaCha8Rng,
    members: &[CellId],
    weights: &[f32],
    total: f32,
) -> CellId {
    let mut r = rng.gen::<f32>() * total;
    for (i, &w) in weights.iter().enumerate() {
        if r < w {
            return members[i];
        }
        r -= w;
    }
    members[members.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::RiverId;
    use crate::countries::generate_countries;
    use crate::naming::NameGenerator;
    use crate::synthetic::{flat_grid, grid_graph};
    use rand::SeedableRng;

    fn settle(graph: &CellGraph, config: &RealmConfig, seed: u64) -> Vec<Vec<CellId>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let partition = generate_countries(graph, config, &NameGenerator::new(), &mut rng);
        place_settlements(graph, &partition, config, &mut rng)
    }

    #[test]
    fn test_capital_always_first() {
        let graph = flat_grid(10, 10, 0.5);
        let config = RealmConfig {
            country_count: 3,
            min_country_cells: 2,
            ..RealmConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let partition = generate_countries(&graph, &config, &NameGenerator::new(), &mut rng);
        let sites = place_settlements(&graph, &partition, &config, &mut rng);

        assert_eq!(sites.len(), partition.countries.len());
        for (country, list) in partition.countries.iter().zip(&sites) {
            assert_eq!(list[0], country.capital);
            // No duplicates, all inside the country.
            for (i, &cell) in list.iter().enumerate() {
                assert!(country.cells.contains(&cell));
                assert!(!list[..i].contains(&cell));
            }
        }
    }

    #[test]
    fn test_small_country_gets_capital_only() {
        let graph = flat_grid(3, 3, 0.5);
        let config = RealmConfig {
            country_count: 1,
            min_country_cells: 1,
            settlements_min: 3,
            settlements_max: 5,
            ..RealmConfig::default()
        };
        let sites = settle(&graph, &config, 9);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].len(), 1);
    }

    #[test]
    fn test_high_cells_excluded() {
        // One low basin cell; everything else above the site ceiling.
        let graph = grid_graph(6, 6, |x, y| {
            let h = if x == 3 && y == 3 { 0.3 } else { 0.95 };
            (h, true)
        });
        let config = RealmConfig {
            country_count: 1,
            min_country_cells: 1,
            settlements_min: 4,
            settlements_max: 4,
            ..RealmConfig::default()
        };
        let sites = settle(&graph, &config, 21);
        for list in &sites {
            for &cell in list.iter().skip(1) {
                assert!(graph.cell(cell).height <= MAX_SITE_HEIGHT);
            }
        }
    }

    #[test]
    fn test_river_cells_weighted_up() {
        let mut river_cell = Cell {
            id: CellId(0),
            position: crate::cells::Vec2::new(0.5, 0.5),
            polygon: Vec::new(),
            neighbors: Vec::new(),
            height: 0.5,
            is_land: true,
            river: RiverId(3),
            flux: 4.0,
        };
        let coast = vec![u32::MAX];
        let with_river = site_weight(&river_cell, &coast);
        river_cell.river = RiverId::NONE;
        let without = site_weight(&river_cell, &coast);
        assert!(with_river > without);
    }

    #[test]
    fn test_coast_band_weighted_up() {
        let cell = Cell {
            id: CellId(0),
            position: crate::cells::Vec2::new(0.5, 0.5),
            polygon: Vec::new(),
            neighbors: Vec::new(),
            height: 0.5,
            is_land: true,
            river: RiverId::NONE,
            flux: 0.0,
        };
        assert!(site_weight(&cell, &[2]) > site_weight(&cell, &[1]));
        assert!(site_weight(&cell, &[3]) > site_weight(&cell, &[5]));
    }
}
