//! Country partitioning over the land cells of a terrain graph
//!
//! Seeds countries on random land cells, grows them with a shared-queue
//! breadth-first flood fill, assigns leftover land to the nearest seed, and
//! folds undersized countries into their dominant neighbor. The result is a
//! total partition of the land cells.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cells::{polygon_area, polygon_centroid, CellGraph, CellId, Vec2};
use crate::config::RealmConfig;
use crate::naming::NameGenerator;

/// Identifier of a country. Ids are dense: `CountryId(i)` is the i-th entry
/// of the published country list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountryId(pub u32);

impl CountryId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Country({})", self.0)
    }
}

/// A country: a named, colored set of land cells with a capital.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    /// Map display color.
    pub color: (u8, u8, u8),
    /// Capital cell; this was the country's growth seed.
    pub capital: CellId,
    /// Centroid of the largest-area member cell, or the mean member
    /// position if no member has a valid polygon.
    pub center: Vec2,
    /// Member land cells.
    pub cells: Vec<CellId>,
}

/// Output of the partition pass: country list plus the cell-to-country
/// table covering the full cell array (`None` for water).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountryPartition {
    pub countries: Vec<Country>,
    pub cell_country: Vec<Option<CountryId>>,
}

impl CountryPartition {
    pub fn country_of(&self, cell: CellId) -> Option<CountryId> {
        self.cell_country[cell.index()]
    }
}

/// Partition the graph's land cells into countries.
///
/// A graph with no land cells yields an empty country list; a requested
/// count above the land cell count is clamped silently.
pub fn generate_countries(
    graph: &CellGraph,
    config: &RealmConfig,
    names: &NameGenerator,
    rng: &mut ChaCha8Rng,
) -> CountryPartition {
    let land: Vec<CellId> = graph.land_cells().map(|c| c.id).collect();
    let mut assignment: Vec<Option<CountryId>> = vec![None; graph.len()];

    if land.is_empty() {
        return CountryPartition {
            countries: Vec::new(),
            cell_country: assignment,
        };
    }

    let count = config.country_count.clamp(1, land.len());

    // Seed selection without replacement; each seed cell is the capital of
    // its country and is assigned immediately.
    let mut chosen: HashSet<CellId> = HashSet::new();
    let mut seeds: Vec<CellId> = Vec::with_capacity(count);
    while seeds.len() < count {
        let cell = land[rng.gen_range(0..land.len())];
        if chosen.insert(cell) {
            seeds.push(cell);
        }
    }

    // Multi-source flood fill over land adjacency, one shared queue. Region
    // boundaries follow graph topology and BFS order, not exact distance.
    let mut queue: VecDeque<CellId> = VecDeque::new();
    for (i, &seed) in seeds.iter().enumerate() {
        assignment[seed.index()] = Some(CountryId(i as u32));
        queue.push_back(seed);
    }
    while let Some(id) = queue.pop_front() {
        let owner = assignment[id.index()];
        for &n in &graph.cell(id).neighbors {
            if !graph.cell(n).is_land {
                continue;
            }
            if assignment[n.index()].is_some() {
                continue;
            }
            assignment[n.index()] = owner;
            queue.push_back(n);
        }
    }

    // Land unreached by the fill (disconnected land components) goes to the
    // country with the nearest seed cell. One shot against seed positions,
    // not grown boundaries.
    for &id in &land {
        if assignment[id.index()].is_some() {
            continue;
        }
        let pos = graph.cell(id).position;
        let mut best = 0usize;
        let mut best_d = f32::INFINITY;
        for (i, &seed) in seeds.iter().enumerate() {
            let d = pos.distance_sq(&graph.cell(seed).position);
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        assignment[id.index()] = Some(CountryId(best as u32));
    }

    let mut members: Vec<Vec<CellId>> = vec![Vec::new(); count];
    for &id in &land {
        let owner = assignment[id.index()].expect("land cell assigned");
        members[owner.index()].push(id);
    }

    // Fold countries below the size floor into neighbors.
    let target_size = land.len() / count;
    let min_size = config
        .min_country_cells
        .max((target_size as f32 * 0.4).ceil() as usize);
    merge_undersized(graph, &mut members, &mut assignment, min_size);

    // Drop emptied countries and compact ids.
    let mut countries: Vec<Country> = Vec::new();
    let mut remap: Vec<Option<CountryId>> = vec![None; count];
    for (old, cells) in members.into_iter().enumerate() {
        if cells.is_empty() {
            continue;
        }
        let new_id = CountryId(countries.len() as u32);
        remap[old] = Some(new_id);
        let center = country_center(graph, &cells);
        countries.push(Country {
            id: new_id,
            name: names.country_name(rng),
            color: (0, 0, 0),
            capital: seeds[old],
            center,
            cells,
        });
    }
    for &id in &land {
        let old = assignment[id.index()].expect("land cell assigned").index();
        assignment[id.index()] = remap[old];
    }

    // Colors: hues spread evenly around the wheel, jittered per country.
    let total = countries.len();
    for (i, country) in countries.iter_mut().enumerate() {
        let base = i as f32 * 360.0 / total as f32;
        let hue = (base + rng.gen_range(-12.0..12.0)).rem_euclid(360.0);
        country.color = hsv_to_rgb(hue, 0.65, 0.85);
    }

    CountryPartition {
        countries,
        cell_country: assignment,
    }
}

/// Merge every country below `min_size` into the neighboring country it
/// shares the most boundary cells with (ties to the larger neighbor, then
/// the lower id); a country with no land neighbor goes to the largest
/// surviving country. Sweeps until stable; each merge reduces the number of
/// non-empty countries, so this terminates.
fn merge_undersized(
    graph: &CellGraph,
    members: &mut [Vec<CellId>],
    assignment: &mut [Option<CountryId>],
    min_size: usize,
) {
    loop {
        let mut merged_any = false;
        for i in 0..members.len() {
            let size = members[i].len();
            if size == 0 || size >= min_size {
                continue;
            }

            let mut tally = vec![0usize; members.len()];
            for &cell in &members[i] {
                for &n in &graph.cell(cell).neighbors {
                    if !graph.cell(n).is_land {
                        continue;
                    }
                    if let Some(owner) = assignment[n.index()] {
                        if owner.index() != i {
                            tally[owner.index()] += 1;
                        }
                    }
                }
            }

            let by_boundary = tally
                .iter()
                .enumerate()
                .filter(|&(_, &cnt)| cnt > 0)
                .max_by_key(|&(j, &cnt)| (cnt, members[j].len(), std::cmp::Reverse(j)));

            let target = match by_boundary {
                Some((j, _)) => Some(j),
                // Isolated: fold into the largest surviving country, if any.
                None => members
                    .iter()
                    .enumerate()
                    .filter(|&(j, m)| j != i && !m.is_empty())
                    .max_by_key(|&(j, m)| (m.len(), std::cmp::Reverse(j)))
                    .map(|(j, _)| j),
            };

            if let Some(j) = target {
                let moved = std::mem::take(&mut members[i]);
                for &cell in &moved {
                    assignment[cell.index()] = Some(CountryId(j as u32));
                }
                members[j].extend(moved);
                merged_any = true;
            }
        }
        if !merged_any {
            break;
        }
    }
}

/// Country display center: centroid of the largest-area member polygon,
/// falling back to the mean member position when no polygon is valid.
fn country_center(graph: &CellGraph, cells: &[CellId]) -> Vec2 {
    let mut best: Option<(f32, Vec2)> = None;
    for &id in cells {
        let cell = graph.cell(id);
        if let (Some(area), Some(centroid)) = (
            polygon_area(&cell.polygon),
            polygon_centroid(&cell.polygon),
        ) {
            if best.map_or(true, |(best_area, _)| area > best_area) {
                best = Some((area, centroid));
            }
        }
    }
    if let Some((_, center)) = best {
        return center;
    }
    let inv = 1.0 / cells.len() as f32;
    let mut mx = 0.0;
    let mut my = 0.0;
    for &id in cells {
        let pos = graph.cell(id).position;
        mx += pos.x;
        my += pos.y;
    }
    Vec2::new(mx * inv, my * inv)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
