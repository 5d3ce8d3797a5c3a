use thiserror::Error;

use crate::graph::GraphId;

#[derive(Error, Debug)]
pub enum LegError {
    #[error("Trip leg build was interrupted before it started")]
    Interrupted,
    #[error("Cannot build a trip leg from an empty path")]
    EmptyPath,
    #[error("No tile found for {0:?}")]
    MissingTile(GraphId),
    #[error("No directed edge found for {0:?}")]
    MissingEdge(GraphId),
    #[error("No node found for {0:?}")]
    MissingNode(GraphId),
    #[error("No costing supplied for the travel mode of a path step")]
    MissingCosting,
}

#[derive(Error, Debug)]
pub enum RecostError {
    #[error("Edge {0:?} is not accessible to the recosting")]
    Inaccessible(GraphId),
    #[error("No tile found for {0:?}")]
    MissingTile(GraphId),
    #[error("Leg has no nodes to recost")]
    EmptyLeg,
}
