use crate::constants::access;
use crate::controller::{Attribute, AttributesController};
use crate::graph::{DirectedEdge, NodeInfo, Traversability};
use crate::leg::{IntersectingEdge, LegNode};

fn traversability_for(edge: &DirectedEdge, access_mask: u16) -> Traversability {
    if edge.forward_access & access_mask != 0 {
        if edge.reverse_access & access_mask != 0 {
            Traversability::Both
        } else {
            Traversability::Forward
        }
    } else if edge.reverse_access & access_mask != 0 {
        Traversability::Backward
    } else {
        Traversability::None
    }
}

/// Appends one intersecting-edge record to the node. `prev_de` is the
/// opposing edge of the previous path edge, used for name consistency at the
/// intersection.
pub fn add_trip_intersecting_edge(
    controller: &AttributesController,
    directededge: &DirectedEdge,
    prev_de: Option<&DirectedEdge>,
    local_edge_index: u32,
    nodeinfo: &NodeInfo,
    trip_node: &mut LegNode,
    intersecting_de: &DirectedEdge,
) {
    let mut intersecting = IntersectingEdge::default();

    if controller.enabled(Attribute::NodeIntersectingEdgeBeginHeading) {
        intersecting.begin_heading = Some(nodeinfo.heading(local_edge_index));
    }

    if controller.enabled(Attribute::NodeIntersectingEdgeWalkability) {
        intersecting.walkability = Some(traversability_for(intersecting_de, access::PEDESTRIAN));
    }

    if controller.enabled(Attribute::NodeIntersectingEdgeCyclability) {
        intersecting.cyclability = Some(traversability_for(intersecting_de, access::BICYCLE));
    }

    if controller.enabled(Attribute::NodeIntersectingEdgeDriveability) {
        intersecting.driveability = Some(nodeinfo.local_driveability(local_edge_index));
    }

    if controller.enabled(Attribute::NodeIntersectingEdgeFromEdgeNameConsistency) {
        let consistency = prev_de.is_some_and(|prev| prev.name_consistency(local_edge_index));
        intersecting.prev_name_consistency = Some(consistency);
    }

    if controller.enabled(Attribute::NodeIntersectingEdgeToEdgeNameConsistency) {
        intersecting.curr_name_consistency = Some(directededge.name_consistency(local_edge_index));
    }

    if controller.enabled(Attribute::NodeIntersectingEdgeUse) {
        intersecting.use_type = Some(intersecting_de.use_type);
    }

    if controller.enabled(Attribute::NodeIntersectingEdgeRoadClass) {
        intersecting.road_class = Some(intersecting_de.road_class);
    }

    trip_node.intersecting_edges.push(intersecting);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeUse, RoadClass};

    #[test]
    fn traversability_combinations() {
        let both = DirectedEdge {
            forward_access: access::PEDESTRIAN,
            reverse_access: access::PEDESTRIAN,
            ..Default::default()
        };
        assert_eq!(
            traversability_for(&both, access::PEDESTRIAN),
            Traversability::Both
        );

        let forward_only = DirectedEdge {
            forward_access: access::PEDESTRIAN,
            ..Default::default()
        };
        assert_eq!(
            traversability_for(&forward_only, access::PEDESTRIAN),
            Traversability::Forward
        );

        let backward_only = DirectedEdge {
            reverse_access: access::BICYCLE,
            ..Default::default()
        };
        assert_eq!(
            traversability_for(&backward_only, access::BICYCLE),
            Traversability::Backward
        );
        assert_eq!(
            traversability_for(&backward_only, access::PEDESTRIAN),
            Traversability::None
        );
    }

    #[test]
    fn record_carries_node_and_edge_context() {
        let controller = AttributesController::all();
        let mut nodeinfo = NodeInfo::default();
        nodeinfo.headings[2] = 135;
        nodeinfo.local_driveability[2] = Traversability::Forward;

        let on_path = DirectedEdge {
            name_consistency_mask: 0b100,
            ..Default::default()
        };
        let intersecting_de = DirectedEdge {
            use_type: EdgeUse::Ramp,
            road_class: RoadClass::Primary,
            forward_access: access::PEDESTRIAN | access::BICYCLE,
            ..Default::default()
        };

        let mut trip_node = LegNode::default();
        add_trip_intersecting_edge(
            &controller,
            &on_path,
            None,
            2,
            &nodeinfo,
            &mut trip_node,
            &intersecting_de,
        );

        let record = &trip_node.intersecting_edges[0];
        assert_eq!(record.begin_heading, Some(135));
        assert_eq!(record.driveability, Some(Traversability::Forward));
        assert_eq!(record.walkability, Some(Traversability::Forward));
        assert_eq!(record.cyclability, Some(Traversability::Forward));
        assert_eq!(record.prev_name_consistency, Some(false));
        assert_eq!(record.curr_name_consistency, Some(true));
        assert_eq!(record.use_type, Some(EdgeUse::Ramp));
        assert_eq!(record.road_class, Some(RoadClass::Primary));
    }
}
