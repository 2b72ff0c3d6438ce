use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::error::{GameError, GameResult};
use super::geometry::{Point, Segment};

/// Stable identifier of a node: its creation index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
	/// Position of the node in creation (and draw) order.
	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Unordered pair of distinct endpoints identifying an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
	low: NodeId,
	high: NodeId,
}

impl EdgeKey {
	/// Normalises the pair so that `new(a, b) == new(b, a)`.
	pub fn new(a: NodeId, b: NodeId) -> Self {
		if a <= b {
			Self { low: a, high: b }
		} else {
			Self { low: b, high: a }
		}
	}

	/// Both endpoints, lower id first.
	pub fn endpoints(self) -> (NodeId, NodeId) {
		(self.low, self.high)
	}

	/// True if `node` is one of the endpoints.
	pub fn touches(self, node: NodeId) -> bool {
		self.low == node || self.high == node
	}

	/// True if the two edges meet at a common node.
	pub fn shares_endpoint(self, other: EdgeKey) -> bool {
		other.touches(self.low) || other.touches(self.high)
	}
}

impl fmt::Display for EdgeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.low, self.high)
	}
}

/// A draggable, selectable point.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	id: NodeId,
	/// Centre of the node on the canvas.
	pub position: Point,
	/// Mirrors membership in the selection set.
	pub selected: bool,
}

impl Node {
	/// The node's identifier.
	pub fn id(&self) -> NodeId {
		self.id
	}
}

/// A connection between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	key: EdgeKey,
	/// Whether this edge crossed at least one other edge at the last recompute.
	pub crossed: bool,
}

impl Edge {
	/// The edge's identifier.
	pub fn key(&self) -> EdgeKey {
		self.key
	}

	/// Both endpoints, lower id first.
	pub fn endpoints(&self) -> (NodeId, NodeId) {
		self.key.endpoints()
	}
}

/// Nodes, edges and the adjacency index that keeps them consistent.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	adjacency: Vec<HashSet<NodeId>>,
	edges: BTreeMap<EdgeKey, Edge>,
}

impl Graph {
	/// Creates an empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an unselected, unconnected node.
	pub fn add_node(&mut self, position: Point) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(Node {
			id,
			position,
			selected: false,
		});
		self.adjacency.push(HashSet::new());
		id
	}

	/// Drops every node and edge.
	pub fn remove_all_nodes(&mut self) {
		self.nodes.clear();
		self.adjacency.clear();
		self.edges.clear();
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Looks up a node.
	pub fn node(&self, id: NodeId) -> GameResult<&Node> {
		self.nodes.get(id.index()).ok_or(GameError::Lookup(id))
	}

	/// Looks up a node for mutation.
	pub fn node_mut(&mut self, id: NodeId) -> GameResult<&mut Node> {
		self.nodes.get_mut(id.index()).ok_or(GameError::Lookup(id))
	}

	/// Nodes in creation order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	/// Mutable nodes in creation order.
	pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
		self.nodes.iter_mut()
	}

	/// Ids of every node in creation order.
	pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.nodes.iter().map(Node::id)
	}

	fn check(&self, id: NodeId) -> GameResult<()> {
		if id.index() < self.nodes.len() {
			Ok(())
		} else {
			Err(GameError::Lookup(id))
		}
	}

	/// Symmetric adjacency lookup.
	pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> GameResult<bool> {
		self.check(b)?;
		Ok(self.neighbors(a)?.contains(&b))
	}

	/// Connects `a` and `b`; returns `false` if they were already adjacent.
	pub fn connect(&mut self, a: NodeId, b: NodeId) -> GameResult<bool> {
		self.check(a)?;
		self.check(b)?;
		if a == b {
			return Err(GameError::SelfEdge(a));
		}
		if !self.adjacency[a.index()].insert(b) {
			return Ok(false);
		}
		self.adjacency[b.index()].insert(a);
		let key = EdgeKey::new(a, b);
		self.edges.insert(
			key,
			Edge {
				key,
				crossed: false,
			},
		);
		Ok(true)
	}

	/// Removes the edge between `a` and `b`; returns `false` if there was none.
	pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> GameResult<bool> {
		self.check(a)?;
		self.check(b)?;
		if !self.adjacency[a.index()].remove(&b) {
			return Ok(false);
		}
		self.adjacency[b.index()].remove(&a);
		self.edges.remove(&EdgeKey::new(a, b));
		Ok(true)
	}

	/// Drops every edge, keeping the nodes.
	pub fn disconnect_all(&mut self) {
		self.edges.clear();
		self.adjacency.iter_mut().for_each(HashSet::clear);
	}

	/// Nodes adjacent to `id`.
	pub fn neighbors(&self, id: NodeId) -> GameResult<&HashSet<NodeId>> {
		self.adjacency.get(id.index()).ok_or(GameError::Lookup(id))
	}

	/// Edges ordered by endpoint pair.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values()
	}

	/// Looks up an edge for mutation.
	pub fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut Edge> {
		self.edges.get_mut(&key)
	}

	/// The line currently drawn for an edge.
	pub fn segment(&self, key: EdgeKey) -> GameResult<Segment> {
		let (a, b) = key.endpoints();
		Ok(Segment::new(self.node(a)?.position, self.node(b)?.position))
	}

	#[cfg(any(debug_assertions, test))]
	pub(crate) fn assert_consistent(&self) {
		assert_eq!(self.nodes.len(), self.adjacency.len());
		for (index, node) in self.nodes.iter().enumerate() {
			assert_eq!(node.id.index(), index);
		}
		let mut friendships = 0;
		for (index, friends) in self.adjacency.iter().enumerate() {
			let id = NodeId(index);
			for &friend in friends {
				assert_ne!(friend, id, "self edge on {id}");
				assert!(
					self.adjacency[friend.index()].contains(&id),
					"asymmetric adjacency {id} -> {friend}"
				);
				assert!(self.edges.contains_key(&EdgeKey::new(id, friend)));
				friendships += 1;
			}
		}
		assert_eq!(friendships, 2 * self.edges.len());
	}
}
