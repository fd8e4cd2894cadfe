//! Synthetic terrain fixtures
//!
//! Stand-ins for the external terrain provider, used by the CLI demo and
//! tests: a plain grid builder and a small noise-based island with traced
//! rivers. Not a terrain generator.

use noise::{NoiseFn, Perlin, Seedable};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cells::{Cell, CellGraph, CellId, RiverId, Vec2};

/// Sea level for the synthetic island heights.
const SEA_LEVEL: f32 = 0.32;

/// Uniform all-land grid with unit-square polygons and 4-neighbor adjacency.
pub fn flat_grid(width: usize, height: usize, cell_height: f32) -> CellGraph {
    grid_graph(width, height, |_, _| (cell_height, true))
}

/// Grid graph with per-tile (height, is_land) supplied by the closure.
/// Cell ids are row-major.
pub fn grid_graph(
    width: usize,
    height: usize,
    tile: impl Fn(usize, usize) -> (f32, bool),
) -> CellGraph {
    let mut cells = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let (cell_height, is_land) = tile(x, y);
            let fx = x as f32;
            let fy = y as f32;
            let mut neighbors = Vec::with_capacity(4);
            if x > 0 {
                neighbors.push(CellId((y * width + x - 1) as u32));
            }
            if x + 1 < width {
                neighbors.push(CellId((y * width + x + 1) as u32));
            }
            if y > 0 {
                neighbors.push(CellId(((y - 1) * width + x) as u32));
            }
            if y + 1 < height {
                neighbors.push(CellId(((y + 1) * width + x) as u32));
            }
            cells.push(Cell {
                id: CellId((y * width + x) as u32),
                position: Vec2::new(fx + 0.5, fy + 0.5),
                polygon: vec![
                    Vec2::new(fx, fy),
                    Vec2::new(fx + 1.0, fy),
                    Vec2::new(fx + 1.0, fy + 1.0),
                    Vec2::new(fx, fy + 1.0),
                ],
                neighbors,
                height: cell_height,
                is_land,
                river: RiverId::NONE,
                flux: 0.0,
            });
        }
    }
    CellGraph::new(cells)
}

/// Noise-based island: fbm heights with radial falloff, jittered cell
/// positions, and a handful of descent-traced rivers.
pub fn synthetic_island(width: usize, height: usize, seed: u64) -> CellGraph {
    let terrain_noise = Perlin::new(1).set_seed(seed as u32);
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(0x5EA));

    let base = grid_graph(width, height, |x, y| {
        let nx = x as f64 / width as f64;
        let ny = y as f64 / height as f64;

        // Four octaves of Perlin.
        let mut sum = 0.0;
        let mut norm = 0.0;
        let mut amp = 1.0;
        let mut freq = 3.0;
        for _ in 0..4 {
            sum += terrain_noise.get([nx * freq, ny * freq]) * amp;
            norm += amp;
            amp *= 0.5;
            freq *= 2.0;
        }
        let noise_val = (sum / norm) as f32;

        // Radial falloff pushes the rim underwater.
        let dx = nx as f32 - 0.5;
        let dy = ny as f32 - 0.5;
        let edge = 1.0 - (dx * dx + dy * dy).sqrt() * 2.2;

        let h = ((noise_val * 0.5 + 0.5) * 0.7 + 0.3 * edge).clamp(0.0, 1.0);
        (h, h > SEA_LEVEL)
    });

    // Jitter site positions off the grid centers; polygons keep tiling.
    let mut cells = base.cells().to_vec();
    for cell in &mut cells {
        cell.position.x += rng.gen_range(-0.3..0.3);
        cell.position.y += rng.gen_range(-0.3..0.3);
    }

    trace_rivers(&mut cells, &mut rng);
    CellGraph::new(cells)
}

/// Trace a few rivers from high ground downhill, accumulating flux. Stops
/// at water, at an existing river, or in a pit.
fn trace_rivers(cells: &mut [Cell], rng: &mut ChaCha8Rng) {
    let highland: Vec<usize> = cells
        .iter()
        .filter(|c| c.is_land && c.height > 0.6)
        .map(|c| c.id.index())
        .collect();
    if highland.is_empty() {
        return;
    }

    let river_count = (cells.len() / 200).clamp(2, 8);
    let mut next_river = 1u32;

    for _ in 0..river_count {
        let mut cur = highland[rng.gen_range(0..highland.len())];
        if cells[cur].river.is_river() {
            continue;
        }
        let id = RiverId(next_river);
        next_river += 1;

        let mut flux = 1.0f32;
        loop {
            cells[cur].river = id;
            cells[cur].flux += flux;
            flux += 0.8;

            let lowest = cells[cur]
                .neighbors
                .iter()
                .map(|n| n.index())
                .min_by(|&a, &b| cells[a].height.total_cmp(&cells[b].height));
            let Some(next) = lowest else { break };
            if cells[next].height >= cells[cur].height {
                break;
            }
            if !cells[next].is_land || cells[next].river.is_river() {
                // Feed the receiving cell and stop.
                cells[next].flux += flux;
                break;
            }
            cur = next;
        }
    }
}
