//! Configuration parameters for political-layer generation

use serde::{Deserialize, Serialize};

/// Cost weights for the route pathfinder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteCostWeights {
    /// Multiplier on |height difference| between adjacent cells.
    pub slope_weight: f32,
    /// Multiplier on squared elevation above the highland threshold.
    pub elevation_weight: f32,
    /// Additive penalty when either endpoint of a step is water.
    pub water_penalty: f32,
    /// Multiplier (>1) when a step crosses onto or off a river.
    pub river_crossing_penalty: f32,
    /// Flux below which a river crossing counts as bridgeable.
    pub bridge_flux_threshold: f32,
    /// Multiplier (<1) applied on bridgeable crossings.
    pub bridge_discount: f32,
    /// Multiplier (<1) when both endpoints follow the same river.
    pub river_valley_bonus: f32,
}

impl Default for RouteCostWeights {
    fn default() -> Self {
        Self {
            slope_weight: 6.0,
            elevation_weight: 14.0,
            water_penalty: 40.0,
            river_crossing_penalty: 2.5,
            bridge_flux_threshold: 8.0,
            bridge_discount: 0.6,
            river_valley_bonus: 0.85,
        }
    }
}

/// Main configuration for one generation pass.
///
/// Values are taken as supplied; beyond the documented clamps (country count
/// against available land cells) validation is the caller's job.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RealmConfig {
    // Countries
    /// Desired number of countries (clamped to [1, land cell count]).
    pub country_count: usize,
    /// Floor on country size before the merge pass folds it into a neighbor.
    pub min_country_cells: usize,

    // Settlements
    /// Minimum settlements per country, capital included.
    pub settlements_min: usize,
    /// Maximum settlements per country, capital included.
    pub settlements_max: usize,

    // Routes
    /// Probability of accepting a redundant short edge into the topology.
    pub extra_connection_chance: f64,
    /// Extra-edge distance ceiling as a multiple of the average
    /// nearest-neighbor distance between settlements.
    pub extra_connection_scale: f32,
    /// Pathfinding cost weights.
    pub route_costs: RouteCostWeights,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            country_count: 8,
            min_country_cells: 16,
            settlements_min: 2,
            settlements_max: 5,
            extra_connection_chance: 0.35,
            extra_connection_scale: 1.6,
            route_costs: RouteCostWeights::default(),
        }
    }
}
