use fxhash::FxHashMap;

use super::{DirectedEdge, GraphId, GraphTile, NodeInfo};

/// Read access to the tiled graph. Implementations own tile lifetime; the
/// builder only borrows tiles for the duration of one call.
pub trait GraphReader {
    fn get_tile(&self, id: GraphId) -> Option<&GraphTile>;

    fn directed_edge(&self, id: GraphId) -> Option<&DirectedEdge> {
        self.get_tile(id)?.directed_edge(id)
    }

    fn node_info(&self, id: GraphId) -> Option<&NodeInfo> {
        self.get_tile(id)?.node(id)
    }

    /// Id of the twin directed edge at the other end of the same segment:
    /// look up the end node's tile and offset by the opposing index.
    fn get_opposing_edge_id(&self, id: GraphId) -> Option<GraphId> {
        let edge = self.directed_edge(id)?;
        let end_tile = self.get_tile(edge.end_node)?;
        let node = end_tile.node(edge.end_node)?;
        Some(edge.end_node.with_id(node.edge_index + edge.opposing_index))
    }

    fn get_opposing_edge(&self, id: GraphId) -> Option<&DirectedEdge> {
        self.directed_edge(self.get_opposing_edge_id(id)?)
    }
}

/// Map-backed tile collection.
#[derive(Default)]
pub struct TileSet {
    tiles: FxHashMap<u64, GraphTile>,
}

impl TileSet {
    pub fn new() -> TileSet {
        TileSet::default()
    }

    pub fn add_tile(&mut self, tile: GraphTile) {
        self.tiles.insert(tile.id().tile_base().value(), tile);
    }
}

impl GraphReader for TileSet {
    fn get_tile(&self, id: GraphId) -> Option<&GraphTile> {
        self.tiles.get(&id.tile_base().value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphTileHeader;

    #[test]
    fn opposing_edge_round_trip() {
        // Two nodes joined by one segment: edge 0 goes 0 -> 1, edge 1 is its twin.
        let tile_id = GraphId::from_parts(2, 5, 0).unwrap();
        let mut tile = GraphTile {
            header: GraphTileHeader {
                graph_id: tile_id,
                ..Default::default()
            },
            ..Default::default()
        };
        tile.nodes = vec![
            NodeInfo {
                edge_index: 0,
                edge_count: 1,
                ..Default::default()
            },
            NodeInfo {
                edge_index: 1,
                edge_count: 1,
                ..Default::default()
            },
        ];
        tile.directed_edges = vec![
            DirectedEdge {
                end_node: tile_id.with_id(1),
                opposing_index: 0,
                ..Default::default()
            },
            DirectedEdge {
                end_node: tile_id.with_id(0),
                opposing_index: 0,
                ..Default::default()
            },
        ];

        let mut tiles = TileSet::new();
        tiles.add_tile(tile);

        let edge_id = tile_id.with_id(0);
        let opposing = tiles.get_opposing_edge_id(edge_id).unwrap();
        assert_eq!(opposing.id(), 1);
        assert_eq!(
            tiles.get_opposing_edge(edge_id).unwrap().end_node,
            tile_id.with_id(0)
        );
        assert_eq!(tiles.get_opposing_edge_id(opposing).unwrap(), edge_id);
    }
}
