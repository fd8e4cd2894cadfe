//! Political map export
//!
//! Renders the generated realm to a PNG (cell polygons in country colors
//! with route and settlement overlays) and to a JSON snapshot for external
//! consumers.

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::cells::{CellGraph, Vec2};
use crate::realm::RealmData;

const WATER_COLOR: [u8; 3] = [24, 44, 84];
const UNCLAIMED_COLOR: [u8; 3] = [120, 120, 112];
const PRIMARY_ROUTE_COLOR: [u8; 3] = [235, 215, 130];
const EXTRA_ROUTE_COLOR: [u8; 3] = [170, 150, 95];
const SETTLEMENT_COLOR: [u8; 3] = [30, 24, 18];

/// Export the political map as a PNG. `scale` is pixels per map unit.
pub fn export_political_map(
    graph: &CellGraph,
    realm: &RealmData,
    path: &str,
    scale: f32,
) -> Result<(), image::ImageError> {
    let (min, max) = graph_bounds(graph);
    let width = (((max.x - min.x) * scale).ceil() as u32).max(1);
    let height = (((max.y - min.y) * scale).ceil() as u32).max(1);
    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, Rgb(WATER_COLOR));

    let to_px = |p: &Vec2| Vec2::new((p.x - min.x) * scale, (p.y - min.y) * scale);

    for cell in graph.cells() {
        if cell.polygon.len() < 3 {
            continue;
        }
        let color = match realm.cell_country[cell.id.index()] {
            Some(id) => {
                let (r, g, b) = realm.countries[id.index()].color;
                [r, g, b]
            }
            None if cell.is_land => UNCLAIMED_COLOR,
            None => WATER_COLOR,
        };
        let polygon: Vec<Vec2> = cell.polygon.iter().map(&to_px).collect();
        fill_polygon(&mut img, &polygon, color);
    }

    for route in &realm.routes {
        let color = if route.is_primary {
            PRIMARY_ROUTE_COLOR
        } else {
            EXTRA_ROUTE_COLOR
        };
        for pair in route.points.windows(2) {
            draw_line(&mut img, &to_px(&pair[0]), &to_px(&pair[1]), color);
        }
    }

    for sites in &realm.settlements {
        for (i, &cell) in sites.iter().enumerate() {
            let px = to_px(&graph.cell(cell).position);
            let radius = if i == 0 { 3 } else { 2 };
            draw_disc(&mut img, &px, radius, SETTLEMENT_COLOR);
        }
    }

    img.save(path)
}

/// Serializable snapshot of a generated realm.
#[derive(Serialize)]
struct RealmSnapshot<'a> {
    seed: u64,
    countries: Vec<CountrySnapshot<'a>>,
    /// Country index per cell, -1 for unassigned/water.
    cell_country: Vec<i32>,
    routes: Vec<RouteSnapshot<'a>>,
}

#[derive(Serialize)]
struct CountrySnapshot<'a> {
    id: u32,
    name: &'a str,
    color: (u8, u8, u8),
    capital_cell: u32,
    center: Vec2,
    cell_count: usize,
    settlement_cells: Vec<u32>,
}

#[derive(Serialize)]
struct RouteSnapshot<'a> {
    is_primary: bool,
    points: &'a [Vec2],
}

/// Write the realm snapshot as pretty-printed JSON.
pub fn export_realm_json(realm: &RealmData, path: &str) -> Result<(), std::io::Error> {
    let snapshot = RealmSnapshot {
        seed: realm.seed,
        countries: realm
            .countries
            .iter()
            .zip(&realm.settlements)
            .map(|(c, sites)| CountrySnapshot {
                id: c.id.0,
                name: &c.name,
                color: c.color,
                capital_cell: c.capital.0,
                center: c.center,
                cell_count: c.cells.len(),
                settlement_cells: sites.iter().map(|s| s.0).collect(),
            })
            .collect(),
        cell_country: realm
            .cell_country
            .iter()
            .map(|c| c.map_or(-1, |id| id.0 as i32))
            .collect(),
        routes: realm
            .routes
            .iter()
            .map(|r| RouteSnapshot {
                is_primary: r.is_primary,
                points: &r.points,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(path, json)
}

fn graph_bounds(graph: &CellGraph) -> (Vec2, Vec2) {
    let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for cell in graph.cells() {
        for p in cell.polygon.iter().chain(std::iter::once(&cell.position)) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
    }
    if !min.x.is_finite() {
        (Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0))
    } else {
        (min, max)
    }
}

/// Scanline fill of a polygon in pixel space.
fn fill_polygon(img: &mut RgbImage, polygon: &[Vec2], color: [u8; 3]) {
    let min_y = polygon.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = polygon
        .iter()
        .map(|p| p.y)
        .fold(f32::NEG_INFINITY, f32::max);
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }

    let y0 = min_y.floor().max(0.0) as u32;
    let y1 = (max_y.ceil().max(0.0) as u32).min(img.height().saturating_sub(1));

    for y in y0..=y1 {
        let scan = y as f32 + 0.5;
        let mut crossings: Vec<f32> = Vec::new();
        for i in 0..polygon.len() {
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            if (a.y <= scan) != (b.y <= scan) {
                let t = (scan - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks(2) {
            if pair.len() < 2 {
                continue;
            }
            let x0 = pair[0].round().max(0.0) as u32;
            let x1 = (pair[1].round().max(0.0) as u32).min(img.width().saturating_sub(1));
            for x in x0..=x1.max(x0) {
                if x < img.width() {
                    img.put_pixel(x, y, Rgb(color));
                }
            }
        }
    }
}

/// Bresenham line between two pixel-space points.
fn draw_line(img: &mut RgbImage, a: &Vec2, b: &Vec2, color: [u8; 3]) {
    let mut x0 = a.x.round() as i64;
    let mut y0 = a.y.round() as i64;
    let x1 = b.x.round() as i64;
    let y1 = b.y.round() as i64;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 && (x0 as u32) < img.width() && (y0 as u32) < img.height() {
            img.put_pixel(x0 as u32, y0 as u32, Rgb(color));
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_disc(img: &mut RgbImage, center: &Vec2, radius: i64, color: [u8; 3]) {
    let cx = center.x.round() as i64;
    let cy = center.y.round() as i64;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let x = cx + dx;
            let y = cy + dy;
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RealmConfig;
    use crate::realm::generate_realm;
    use crate::synthetic::synthetic_island;

    #[test]
    fn test_json_snapshot_shape() {
        let graph = synthetic_island(16, 12, 77);
        let realm = generate_realm(&graph, &RealmConfig::default(), 77);

        let file = std::env::temp_dir().join("realm_snapshot_test.json");
        let path = file.to_str().unwrap();
        export_realm_json(&realm, path).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["seed"], 77);
        let cell_country = value["cell_country"].as_array().unwrap();
        assert_eq!(cell_country.len(), graph.len());
        // Water stays -1, assigned cells are valid country indices.
        let country_count = value["countries"].as_array().unwrap().len() as i64;
        for entry in cell_country {
            let idx = entry.as_i64().unwrap();
            assert!(idx >= -1 && idx < country_count);
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_png_export_writes_file() {
        let graph = synthetic_island(16, 12, 5);
        let realm = generate_realm(&graph, &RealmConfig::default(), 5);

        let file = std::env::temp_dir().join("realm_map_test.png");
        let path = file.to_str().unwrap();
        export_political_map(&graph, &realm, path, 4.0).unwrap();
        assert!(std::fs::metadata(path).unwrap().len() > 0);
        std::fs::remove_file(path).ok();
    }
}
