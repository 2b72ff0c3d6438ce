use thiserror::Error;

use super::graph::NodeId;

/// Errors raised by the puzzle engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
	/// The game cannot start with the requested settings.
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// A node id that is not part of the current graph.
	#[error("No node with id {0}")]
	Lookup(NodeId),

	/// An edge whose two endpoints are the same node.
	#[error("Node {0} cannot be connected to itself")]
	SelfEdge(NodeId),
}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
