use std::fmt;

use serde::{Deserialize, Serialize};

// 3 bits of hierarchy level, 22 bits of tile id, 21 bits of index.
const LEVEL_BITS: u64 = 3;
const TILE_BITS: u64 = 22;
const ID_BITS: u64 = 21;

const LEVEL_MASK: u64 = (1 << LEVEL_BITS) - 1;
const TILE_MASK: u64 = (1 << TILE_BITS) - 1;
const ID_MASK: u64 = (1 << ID_BITS) - 1;

const INVALID_GRAPH_ID: u64 = 0x3fff_ffff_ffff;

/// Identifier of a node or an edge within the tiled, hierarchical graph.
/// Packs the hierarchy level, the tile id, and a unique index within the
/// tile/level into a single value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GraphId {
    value: u64,
}

impl Default for GraphId {
    fn default() -> Self {
        GraphId {
            value: INVALID_GRAPH_ID,
        }
    }
}

impl fmt::Debug for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level(), self.tileid(), self.id())
    }
}

impl GraphId {
    pub fn new(value: u64) -> GraphId {
        GraphId { value }
    }

    /// Constructs a `GraphId` from the hierarchy level, tile id, and index
    /// within the tile. Returns `None` when any component overflows its bits.
    pub fn from_parts(level: u32, tileid: u32, id: u32) -> Option<GraphId> {
        if u64::from(level) > LEVEL_MASK
            || u64::from(tileid) > TILE_MASK
            || u64::from(id) > ID_MASK
        {
            return None;
        }
        Some(GraphId {
            value: u64::from(level)
                | (u64::from(tileid) << LEVEL_BITS)
                | (u64::from(id) << (LEVEL_BITS + TILE_BITS)),
        })
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Hierarchy level of the tile this identifier belongs to.
    pub fn level(&self) -> u32 {
        (self.value & LEVEL_MASK) as u32
    }

    /// Tile identifier within the hierarchy level.
    pub fn tileid(&self) -> u32 {
        ((self.value >> LEVEL_BITS) & TILE_MASK) as u32
    }

    /// Index within the tile, unique within the tile and level.
    pub fn id(&self) -> u32 {
        ((self.value >> (LEVEL_BITS + TILE_BITS)) & ID_MASK) as u32
    }

    /// Combined tile information (level and tile id) with a zero index.
    pub fn tile_base(&self) -> GraphId {
        GraphId {
            value: self.value & (LEVEL_MASK | (TILE_MASK << LEVEL_BITS)),
        }
    }

    /// Same tile, different index.
    pub fn with_id(&self, id: u32) -> GraphId {
        GraphId {
            value: self.tile_base().value | (u64::from(id) << (LEVEL_BITS + TILE_BITS)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.value != INVALID_GRAPH_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack() {
        let id = GraphId::from_parts(2, 838_852, 161_285).unwrap();
        assert_eq!(id.level(), 2);
        assert_eq!(id.tileid(), 838_852);
        assert_eq!(id.id(), 161_285);

        let base = id.tile_base();
        assert_eq!(base.level(), 2);
        assert_eq!(base.tileid(), 838_852);
        assert_eq!(base.id(), 0);

        assert_eq!(id.with_id(7), GraphId::from_parts(2, 838_852, 7).unwrap());
    }

    #[test]
    fn invalid_components_rejected() {
        assert!(GraphId::from_parts(8, 0, 0).is_none());
        assert!(GraphId::from_parts(0, 1 << 22, 0).is_none());
        assert!(GraphId::from_parts(0, 0, 1 << 21).is_none());
    }

    #[test]
    fn default_is_invalid() {
        let id = GraphId::default();
        assert!(!id.is_valid());
        assert_eq!(id.level(), 7);
    }
}
