use serde::{Deserialize, Serialize};

use super::{GraphId, TimeDomain};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessRestrictionType {
    Hazmat,
    MaxHeight,
    MaxWidth,
    MaxLength,
    MaxWeight,
    MaxAxleLoad,
    TimedAllowed,
    TimedDenied,
    DestinationAllowed,
    CenterLane,
    LaneAllowed,
    LaneDenied,
    LaneTimedAllowed,
    LaneTimedDenied,
}

/// Restriction on who may use an edge, optionally bounded by a time domain
/// and a set of lanes.
#[derive(Clone, Debug)]
pub struct AccessRestriction {
    /// Directed edge index within the tile this restriction applies to.
    pub edge_index: u32,
    pub restriction_type: AccessRestrictionType,
    /// Affected access modes, see [`crate::constants::access`].
    pub modes: u16,
    /// Packed [`TimeDomain`] for timed variants; 0 otherwise.
    pub value: u64,
    /// Mask of affected lanes for lane variants.
    pub lanes: u64,
}

impl AccessRestriction {
    pub fn time_domain(&self) -> TimeDomain {
        TimeDomain::from_value(self.value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RestrictionType {
    NoLeftTurn,
    NoRightTurn,
    NoStraightOn,
    NoUTurn,
    OnlyLeftTurn,
    OnlyRightTurn,
    OnlyStraightOn,
    ComplexLane,
    LaneRestriction,
}

/// Turn/lane restriction spanning several edges via a chain of via edges.
#[derive(Clone, Debug)]
pub struct ComplexRestriction {
    pub restriction_type: RestrictionType,
    /// Affected access modes, see [`crate::constants::access`].
    pub modes: u16,
    pub time_domain: Option<TimeDomain>,
    pub vias: Vec<GraphId>,
}

impl ComplexRestriction {
    pub fn has_time_domain(&self) -> bool {
        self.time_domain.is_some()
    }

    /// Visits each via edge in order; the callback returns `false` to stop.
    pub fn walk_vias(&self, mut callback: impl FnMut(&GraphId) -> bool) {
        for via in &self.vias {
            if !callback(via) {
                break;
            }
        }
    }
}
