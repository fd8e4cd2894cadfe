//! Trade-route network
//!
//! Topology selection (spanning tree plus redundant short links), concrete
//! terrain-aware pathfinding per selected link, and polyline simplification.

pub mod pathfind;
pub mod simplify;
pub mod topology;

use serde::{Deserialize, Serialize};

use crate::cells::{CellId, Vec2};
use crate::countries::CountryId;

/// A settlement node in the route network.
#[derive(Clone, Copy, Debug)]
pub struct RouteNode {
    pub cell: CellId,
    pub country: CountryId,
    pub position: Vec2,
}

/// Candidate edge between two route nodes, by node index. Used only during
/// topology selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteEdge {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

/// An edge selected into the route topology.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteLink {
    pub edge: RouteEdge,
    /// True for spanning-tree edges, false for redundant extras.
    pub is_primary: bool,
}

/// Final route geometry: a simplified point sequence in map space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    pub points: Vec<Vec2>,
    pub is_primary: bool,
}
