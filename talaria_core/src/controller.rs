use enumset::{EnumSet, EnumSetType};

/// Closed enumeration of every attribute a caller can ask the builder to
/// emit. Gating is a set-membership test, never a string lookup.
#[derive(EnumSetType, Debug)]
pub enum Attribute {
    // Edge
    EdgeNames,
    EdgeLength,
    EdgeSpeed,
    EdgeRoadClass,
    EdgeBeginHeading,
    EdgeEndHeading,
    EdgeBeginShapeIndex,
    EdgeEndShapeIndex,
    EdgeTraversability,
    EdgeUse,
    EdgeToll,
    EdgeUnpaved,
    EdgeTunnel,
    EdgeBridge,
    EdgeRoundabout,
    EdgeInternalIntersection,
    EdgeDriveOnRight,
    EdgeSurface,
    EdgeTravelMode,
    EdgeVehicleType,
    EdgePedestrianType,
    EdgeBicycleType,
    EdgeTransitType,
    EdgeId,
    EdgeWayId,
    EdgeWeightedGrade,
    EdgeMaxUpwardGrade,
    EdgeMaxDownwardGrade,
    EdgeMeanElevation,
    EdgeLaneCount,
    EdgeCycleLane,
    EdgeBicycleNetwork,
    EdgeSidewalk,
    EdgeDensity,
    EdgeSpeedLimit,
    EdgeDefaultSpeed,
    EdgeTruckSpeed,
    EdgeTruckRoute,
    EdgeDestinationOnly,
    EdgeTurnLanes,
    EdgeLaneConnectivity,

    // Edge signs
    EdgeSignExitNumber,
    EdgeSignExitBranch,
    EdgeSignExitToward,
    EdgeSignExitName,
    EdgeSignGuideBranch,
    EdgeSignGuideToward,
    EdgeSignGuidanceViewJunction,
    EdgeSignJunctionName,

    // Edge transit route info
    EdgeTransitRouteInfoOnestopId,
    EdgeTransitRouteInfoBlockId,
    EdgeTransitRouteInfoTripId,
    EdgeTransitRouteInfoShortName,
    EdgeTransitRouteInfoLongName,
    EdgeTransitRouteInfoHeadsign,
    EdgeTransitRouteInfoColor,
    EdgeTransitRouteInfoTextColor,
    EdgeTransitRouteInfoDescription,
    EdgeTransitRouteInfoOperatorOnestopId,
    EdgeTransitRouteInfoOperatorName,
    EdgeTransitRouteInfoOperatorUrl,

    // Intersecting edges
    NodeIntersectingEdgeBeginHeading,
    NodeIntersectingEdgeWalkability,
    NodeIntersectingEdgeCyclability,
    NodeIntersectingEdgeDriveability,
    NodeIntersectingEdgeFromEdgeNameConsistency,
    NodeIntersectingEdgeToEdgeNameConsistency,
    NodeIntersectingEdgeUse,
    NodeIntersectingEdgeRoadClass,

    // Node
    NodeElapsedTime,
    NodeAdminIndex,
    NodeType,
    NodeFork,
    NodeTimeZone,
    NodeTransitionTime,

    // Node transit platform info
    NodeTransitPlatformInfoType,
    NodeTransitPlatformInfoOnestopId,
    NodeTransitPlatformInfoName,
    NodeTransitPlatformInfoStationOnestopId,
    NodeTransitPlatformInfoStationName,
    NodeTransitPlatformInfoLatLon,
    NodeTransitPlatformInfoArrivalDateTime,
    NodeTransitPlatformInfoDepartureDateTime,
    NodeTransitPlatformInfoAssumedSchedule,

    // Node transit station / egress info
    NodeTransitStationInfoOnestopId,
    NodeTransitStationInfoName,
    NodeTransitStationInfoLatLon,
    NodeTransitEgressInfoOnestopId,
    NodeTransitEgressInfoName,
    NodeTransitEgressInfoLatLon,

    // Leg level
    OsmChangeset,
    Shape,
    ShapeAttributesTime,
    ShapeAttributesLength,
    ShapeAttributesSpeed,
    AdminCountryCode,
    AdminCountryText,
    AdminStateCode,
    AdminStateText,
}

/// Coarse category gates covering a family of attributes at once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    ShapeAttributes,
    Admin,
}

impl Category {
    fn members(self) -> EnumSet<Attribute> {
        match self {
            Category::ShapeAttributes => {
                Attribute::ShapeAttributesTime
                    | Attribute::ShapeAttributesLength
                    | Attribute::ShapeAttributesSpeed
            }
            Category::Admin => {
                Attribute::AdminCountryCode
                    | Attribute::AdminCountryText
                    | Attribute::AdminStateCode
                    | Attribute::AdminStateText
            }
        }
    }
}

/// Answers, per attribute, whether the caller wants it emitted.
#[derive(Clone, Debug)]
pub struct AttributesController {
    enabled: EnumSet<Attribute>,
}

impl Default for AttributesController {
    fn default() -> Self {
        AttributesController::all()
    }
}

impl AttributesController {
    pub fn all() -> AttributesController {
        AttributesController {
            enabled: EnumSet::all(),
        }
    }

    pub fn none() -> AttributesController {
        AttributesController {
            enabled: EnumSet::empty(),
        }
    }

    pub fn enable(mut self, attribute: Attribute) -> AttributesController {
        self.enabled.insert(attribute);
        self
    }

    pub fn disable(mut self, attribute: Attribute) -> AttributesController {
        self.enabled.remove(attribute);
        self
    }

    pub fn disable_category(mut self, category: Category) -> AttributesController {
        self.enabled -= category.members();
        self
    }

    pub fn enabled(&self, attribute: Attribute) -> bool {
        self.enabled.contains(attribute)
    }

    /// True when any attribute of the category is enabled.
    pub fn category_enabled(&self, category: Category) -> bool {
        !(self.enabled & category.members()).is_empty()
    }
}
