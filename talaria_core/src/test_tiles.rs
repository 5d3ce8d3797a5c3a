//! Hand-built tile fixtures shared by the builder tests: a straight chain of
//! bidirectional segments along the equator, a map-backed reader, and
//! fixed-speed costings.

use crate::constants::access;
use crate::costing::Costing;
use crate::graph::{
    DirectedEdge, EdgeInfo, GraphId, GraphTile, GraphTileHeader, NodeInfo, TileSet,
};
use crate::graph::Admin;
use crate::latlng::LatLng;
use crate::leg::StreetName;
use crate::path::Cost;

/// Degrees of longitude between consecutive chain nodes; roughly 111 m at
/// the equator.
pub const NODE_SPACING_DEG: f64 = 0.001;
pub const SEGMENT_LENGTH_M: u32 = 111;

pub fn tile_base() -> GraphId {
    GraphId::from_parts(2, 100, 0).unwrap()
}

pub fn node_latlng(i: usize) -> LatLng {
    LatLng::new(0.0, i as f64 * NODE_SPACING_DEG)
}

pub fn node_id(i: usize) -> GraphId {
    tile_base().with_id(i as u32)
}

/// Graph id of the forward edge over segment `i` (node i to node i+1).
pub fn forward_edge_id(i: usize) -> GraphId {
    let index = if i == 0 { 0 } else { 2 * i as u32 };
    tile_base().with_id(index)
}

/// Builds one tile holding a chain of `n_edges` segments, each with both
/// directed edges, two-point shapes, and full access. Node `i` sits at
/// longitude `i * 0.001`; every node is in tz index 0 and admin 0.
///
/// Forward-star layout per node: node 0 has only the first forward edge;
/// interior node i has `[i -> i-1, i -> i+1]`; the last node has only its
/// backward edge.
pub fn chain_tile(n_edges: usize) -> GraphTile {
    let mut tile = GraphTile {
        header: GraphTileHeader {
            graph_id: tile_base(),
            date_created: 3_000,
            dataset_id: 42_424_242,
            has_elevation: false,
        },
        admins: vec![Admin::new("FR", "France", "", "")],
        ..Default::default()
    };

    for segment in 0..n_edges {
        tile.edge_infos.push(EdgeInfo {
            way_id: 1_000 + segment as u64,
            speed_limit: 50,
            mean_elevation: 0.0,
            names: vec![StreetName::new(format!("Rue {segment}"), false)],
            shape: vec![node_latlng(segment), node_latlng(segment + 1)],
        });
    }

    // Directed edges grouped by their start node.
    for node in 0..=n_edges {
        let edge_index = tile.directed_edges.len() as u32;
        let mut edge_count = 0;

        if node > 0 {
            // Backward edge: node -> node-1.
            let segment = node - 1;
            tile.directed_edges.push(DirectedEdge {
                end_node: node_id(node - 1),
                length: SEGMENT_LENGTH_M,
                edge_info_index: segment as u32,
                forward: false,
                local_edge_index: 0,
                opposing_index: if node == 1 { 0 } else { 1 },
                opposing_local_index: if node == 1 { 0 } else { 1 },
                forward_access: access::ALL,
                reverse_access: access::ALL,
                speed: 36,
                ..Default::default()
            });
            edge_count += 1;
        }
        if node < n_edges {
            // Forward edge: node -> node+1.
            tile.directed_edges.push(DirectedEdge {
                end_node: node_id(node + 1),
                length: SEGMENT_LENGTH_M,
                edge_info_index: node as u32,
                forward: true,
                local_edge_index: if node == 0 { 0 } else { 1 },
                opposing_index: 0,
                opposing_local_index: 0,
                forward_access: access::ALL,
                reverse_access: access::ALL,
                speed: 36,
                ..Default::default()
            });
            edge_count += 1;
        }

        tile.nodes.push(NodeInfo {
            edge_index,
            edge_count,
            latlng: node_latlng(node),
            ..Default::default()
        });
    }

    tile
}

pub fn reader_with(tile: GraphTile) -> TileSet {
    let mut tiles = TileSet::new();
    tiles.add_tile(tile);
    tiles
}

/// Fixed 10 m/s costing with full access.
pub struct TestCosting;

impl Costing for TestCosting {
    fn edge_cost(&self, edge: &DirectedEdge, _: &GraphTile, _: u32) -> Cost {
        let secs = edge.length as f64 / 10.0;
        Cost::new(secs, secs)
    }

    fn access_mode(&self) -> u16 {
        access::AUTO
    }
}

/// Costing that refuses the edge ending at `reject_end_node`; everything
/// else costs like [`TestCosting`]. The chain fixtures give every directed
/// edge a distinct end node, which is enough to single one out.
pub struct RejectingCosting {
    pub reject_end_node: GraphId,
}

impl Costing for RejectingCosting {
    fn edge_cost(&self, edge: &DirectedEdge, tile: &GraphTile, second_of_week: u32) -> Cost {
        TestCosting.edge_cost(edge, tile, second_of_week)
    }

    fn access_mode(&self) -> u16 {
        access::AUTO
    }

    fn allowed(&self, edge: &DirectedEdge) -> bool {
        edge.end_node != self.reject_end_node
    }
}
