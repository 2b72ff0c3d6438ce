use rand::Rng;

use super::config::{Canvas, GameConfig};
use super::crossings::{CrossingReport, IntersectionEngine};
use super::error::{GameError, GameResult};
use super::geometry::{Point, Rect, rects_overlap};
use super::graph::{Edge, Graph, Node, NodeId};
use super::layout::{self, LayoutStrategy};
use super::selection::{Selection, SelectionBox};

/// Everything one round of the puzzle owns.
///
/// Built at game start and replaced wholesale when the board is regenerated.
#[derive(Clone, Debug)]
pub struct GameState {
	strategy: LayoutStrategy,
	node_radius: f64,
	canvas: Canvas,
	graph: Graph,
	selection: Selection,
	selection_box: SelectionBox,
	solved: bool,
	crossing_pairs: usize,
}

impl GameState {
	/// Scatters `config.node_count` nodes over the canvas and connects them.
	pub fn generate(config: &GameConfig, canvas: Canvas, rng: &mut impl Rng) -> GameResult<Self> {
		config.validate()?;
		let mut graph = Graph::new();
		for _ in 0..config.node_count {
			graph.add_node(layout::random_point(&canvas.interior, rng));
		}
		layout::populate(&mut graph, config.strategy, rng)?;
		Self::from_graph(config, canvas, graph)
	}

	/// Wraps an already built graph, with crossings and the solved flag computed.
	///
	/// Every node must lie inside the canvas interior.
	pub fn from_graph(config: &GameConfig, canvas: Canvas, graph: Graph) -> GameResult<Self> {
		if let Some(node) = graph.nodes().find(|node| !canvas.in_bounds(node.position)) {
			return Err(GameError::Configuration(format!(
				"node {} at ({:.1}, {:.1}) lies outside the play area",
				node.id(),
				node.position.x,
				node.position.y
			)));
		}
		let mut state = Self {
			strategy: config.strategy,
			node_radius: config.node_radius,
			canvas,
			graph,
			selection: Selection::default(),
			selection_box: SelectionBox::default(),
			solved: false,
			crossing_pairs: 0,
		};
		state.recompute(&mut IntersectionEngine::new(2.0 * config.node_radius))?;
		Ok(state)
	}

	/// Number of nodes on the board.
	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// Generator the edges came from.
	pub fn strategy(&self) -> LayoutStrategy {
		self.strategy
	}

	/// Radius of every node.
	pub fn node_radius(&self) -> f64 {
		self.node_radius
	}

	/// True when no edges crossed at the last recompute.
	pub fn solved(&self) -> bool {
		self.solved
	}

	/// Crossing edge pairs found by the last recompute.
	pub fn crossing_pairs(&self) -> usize {
		self.crossing_pairs
	}

	/// Play-area geometry.
	pub fn canvas(&self) -> &Canvas {
		&self.canvas
	}

	/// Nodes and edges.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Currently selected nodes.
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// The rubber band, if one is being drawn.
	pub fn selection_box(&self) -> Option<Rect> {
		self.selection_box
			.is_visible()
			.then(|| self.selection_box.rect())
	}

	/// An edge is drawn as selected when both of its endpoints are.
	pub fn edge_selected(&self, edge: &Edge) -> bool {
		let (a, b) = edge.endpoints();
		self.selection.contains(a) && self.selection.contains(b)
	}

	/// Bounding square of a node.
	pub fn node_rect(&self, node: &Node) -> Rect {
		Rect::around(node.position, self.node_radius)
	}

	/// First node in creation order whose circle contains `p`.
	pub fn node_at(&self, p: Point) -> Option<NodeId> {
		self.graph
			.nodes()
			.find(|node| {
				let (dx, dy) = (node.position.x - p.x, node.position.y - p.y);
				dx.hypot(dy) <= self.node_radius
			})
			.map(Node::id)
	}

	/// Selects `id`; returns `false` if it already was.
	pub fn select(&mut self, id: NodeId) -> GameResult<bool> {
		self.graph.node_mut(id)?.selected = true;
		Ok(self.selection.insert(id))
	}

	/// Deselects `id`; returns `false` if it was not selected.
	pub fn deselect(&mut self, id: NodeId) -> GameResult<bool> {
		self.graph.node_mut(id)?.selected = false;
		Ok(self.selection.remove(id))
	}

	/// Flips the selection of `id`, returning the new state.
	pub fn toggle(&mut self, id: NodeId) -> GameResult<bool> {
		if self.selection.contains(id) {
			self.deselect(id)?;
			Ok(false)
		} else {
			self.select(id)?;
			Ok(true)
		}
	}

	/// Deselects everything.
	pub fn clear_selection(&mut self) -> GameResult<()> {
		for id in self.selection.take() {
			self.graph.node_mut(id)?.selected = false;
		}
		Ok(())
	}

	/// Makes `id` the only selected node, or clears the selection for `None`.
	pub fn select_only(&mut self, id: Option<NodeId>) -> GameResult<()> {
		self.clear_selection()?;
		if let Some(id) = id {
			self.select(id)?;
		}
		Ok(())
	}

	/// Shows the rubber band anchored at `p`.
	pub fn begin_box(&mut self, p: Point) {
		self.selection_box.anchor(p);
	}

	/// Stretches the rubber band to `p` and adds every node it overlaps to the selection.
	///
	/// Returns the number of newly selected nodes.
	pub fn stretch_box(&mut self, p: Point) -> GameResult<usize> {
		self.selection_box.redraw(p);
		let rect = self.selection_box.rect();
		let hits: Vec<NodeId> = self
			.graph
			.nodes()
			.filter(|node| rects_overlap(&rect, &self.node_rect(node)))
			.map(Node::id)
			.collect();
		let mut added = 0;
		for id in hits {
			if self.select(id)? {
				added += 1;
			}
		}
		Ok(added)
	}

	/// Hides the rubber band.
	pub fn end_box(&mut self) {
		self.selection_box.hide();
	}

	/// Moves every selected node by `(dx, dy)`.
	///
	/// Each axis is applied only if the node stays inside the interior on
	/// that axis. Returns how many nodes moved at all.
	pub fn translate_selected(&mut self, dx: f64, dy: f64) -> GameResult<usize> {
		let canvas = self.canvas;
		let mut moved = 0;
		for id in self.selection.iter().collect::<Vec<_>>() {
			let node = self.graph.node_mut(id)?;
			let before = node.position;
			let (x, y) = (before.x + dx, before.y + dy);
			if canvas.in_bounds_x(x) {
				node.position.x = x;
			}
			if canvas.in_bounds_y(y) {
				node.position.y = y;
			}
			if node.position != before {
				moved += 1;
			}
		}
		Ok(moved)
	}

	/// Deselects everything and drops every node somewhere random inside the interior.
	pub fn scramble(&mut self, rng: &mut impl Rng) -> GameResult<()> {
		self.clear_selection()?;
		let interior = self.canvas.interior;
		for node in self.graph.nodes_mut() {
			node.position = layout::random_point(&interior, rng);
		}
		Ok(())
	}

	/// Deselects everything and places the nodes evenly around the canvas centre.
	pub fn arrange_ring(&mut self) -> GameResult<()> {
		self.clear_selection()?;
		let positions = layout::ring_positions(
			self.graph.node_count(),
			self.canvas.center(),
			self.canvas.ring_radius(),
		);
		for (node, position) in self.graph.nodes_mut().zip(positions) {
			node.position = position;
		}
		Ok(())
	}

	/// Recomputes every edge's crossed flag and the solved state.
	pub fn recompute(&mut self, engine: &mut IntersectionEngine) -> GameResult<CrossingReport> {
		let report = engine.recompute(&self.graph)?;
		for (&key, &crossed) in &report.crossed {
			if let Some(edge) = self.graph.edge_mut(key) {
				edge.crossed = crossed;
			}
		}
		self.solved = report.solved;
		self.crossing_pairs = report.crossing_pairs;
		#[cfg(any(debug_assertions, test))]
		self.assert_consistent();
		Ok(report)
	}

	#[cfg(any(debug_assertions, test))]
	pub(crate) fn assert_consistent(&self) {
		self.graph.assert_consistent();
		for node in self.graph.nodes() {
			assert_eq!(
				node.selected,
				self.selection.contains(node.id()),
				"selection flag out of sync on {}",
				node.id()
			);
			assert!(
				self.canvas.in_bounds(node.position),
				"{} left the interior at {:?}",
				node.id(),
				node.position
			);
		}
		assert_eq!(
			self.solved,
			self.graph.edges().all(|edge| !edge.crossed),
			"solved flag disagrees with edge flags"
		);
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn canvas() -> Canvas {
		Canvas::new(1000.0, 600.0).unwrap()
	}

	fn state_with(points: &[(f64, f64)]) -> GameState {
		let mut graph = Graph::new();
		for &(x, y) in points {
			graph.add_node(Point::new(x, y));
		}
		GameState::from_graph(&GameConfig::default(), canvas(), graph).unwrap()
	}

	#[test]
	fn generated_nodes_start_inside_and_unselected() {
		let mut rng = StdRng::seed_from_u64(11);
		let mut state = GameState::generate(&GameConfig::default(), canvas(), &mut rng).unwrap();
		state.recompute(&mut IntersectionEngine::default()).unwrap();
		assert_eq!(state.node_count(), 10);
		assert!(state.selection().is_empty());
		assert!(state.graph().edge_count() > 0);
		state.assert_consistent();
	}

	#[test]
	fn fresh_state_knows_whether_it_is_solved() {
		let empty = state_with(&[(100.0, 100.0), (200.0, 200.0)]);
		assert!(empty.solved());
		assert_eq!(empty.crossing_pairs(), 0);
		empty.assert_consistent();

		let mut graph = Graph::new();
		for (x, y) in [(100.0, 100.0), (200.0, 100.0), (200.0, 200.0), (100.0, 200.0)] {
			graph.add_node(Point::new(x, y));
		}
		graph.connect(NodeId(0), NodeId(2)).unwrap();
		graph.connect(NodeId(1), NodeId(3)).unwrap();
		let crossed = GameState::from_graph(&GameConfig::default(), canvas(), graph).unwrap();
		assert!(!crossed.solved());
		assert_eq!(crossed.crossing_pairs(), 1);
		assert!(crossed.graph().edges().all(|edge| edge.crossed));
	}

	#[test]
	fn nodes_outside_the_interior_are_rejected() {
		let mut graph = Graph::new();
		graph.add_node(Point::new(100.0, 100.0));
		graph.add_node(Point::new(0.0, 0.0));
		assert!(matches!(
			GameState::from_graph(&GameConfig::default(), canvas(), graph),
			Err(GameError::Configuration(_))
		));
	}

	#[test]
	fn generate_rejects_small_boards() {
		let config = GameConfig {
			node_count: 2,
			..Default::default()
		};
		let mut rng = StdRng::seed_from_u64(12);
		assert!(GameState::generate(&config, canvas(), &mut rng).is_err());
	}

	#[test]
	fn node_hit_prefers_creation_order() {
		let state = state_with(&[(100.0, 100.0), (105.0, 100.0), (300.0, 300.0)]);
		assert_eq!(state.node_at(Point::new(103.0, 100.0)), Some(NodeId(0)));
		assert_eq!(state.node_at(Point::new(113.0, 100.0)), Some(NodeId(1)));
		assert_eq!(state.node_at(Point::new(200.0, 200.0)), None);
	}

	#[test]
	fn selection_flags_follow_the_set() {
		let mut state = state_with(&[(100.0, 100.0), (200.0, 200.0), (300.0, 300.0)]);
		assert!(state.select(NodeId(0)).unwrap());
		assert!(!state.select(NodeId(0)).unwrap());
		assert!(state.toggle(NodeId(2)).unwrap());
		assert!(!state.toggle(NodeId(0)).unwrap());
		assert_eq!(state.selection().iter().collect::<Vec<_>>(), vec![NodeId(2)]);
		state.select_only(Some(NodeId(1))).unwrap();
		assert_eq!(state.selection().iter().collect::<Vec<_>>(), vec![NodeId(1)]);
		state.assert_consistent();

		state.clear_selection().unwrap();
		assert!(state.graph().nodes().all(|node| !node.selected));
		assert!(state.select(NodeId(9)).is_err());
	}

	#[test]
	fn translation_clamps_each_axis_independently() {
		let mut state = state_with(&[(100.0, 300.0), (500.0, 300.0)]);
		let max_x = state.canvas().interior.max.x;
		state.select(NodeId(0)).unwrap();
		state.select(NodeId(1)).unwrap();

		// Node 1 would leave on X, node 0 stays inside; both move on Y.
		let dx = max_x - 500.0 + 1.0;
		assert_eq!(state.translate_selected(dx, 20.0).unwrap(), 2);
		let p0 = state.graph().node(NodeId(0)).unwrap().position;
		let p1 = state.graph().node(NodeId(1)).unwrap().position;
		assert_eq!(p0, Point::new(100.0 + dx, 320.0));
		assert_eq!(p1, Point::new(500.0, 320.0));

		// Pushing off the top leaves Y alone but still applies X.
		assert_eq!(state.translate_selected(-10.0, -1000.0).unwrap(), 2);
		assert_eq!(state.graph().node(NodeId(1)).unwrap().position, Point::new(490.0, 320.0));
		state.assert_consistent();
	}

	#[test]
	fn translation_without_selection_is_a_no_op() {
		let mut state = state_with(&[(100.0, 300.0)]);
		assert_eq!(state.translate_selected(5.0, 5.0).unwrap(), 0);
		assert_eq!(state.graph().node(NodeId(0)).unwrap().position, Point::new(100.0, 300.0));
	}

	#[test]
	fn box_selection_is_additive() {
		let mut state = state_with(&[(100.0, 100.0), (200.0, 200.0), (600.0, 400.0)]);
		state.select(NodeId(2)).unwrap();
		state.begin_box(Point::new(50.0, 50.0));
		assert_eq!(state.stretch_box(Point::new(150.0, 150.0)).unwrap(), 1);
		assert_eq!(state.stretch_box(Point::new(250.0, 250.0)).unwrap(), 1);
		// Shrinking the box keeps what it already picked up.
		assert_eq!(state.stretch_box(Point::new(60.0, 60.0)).unwrap(), 0);
		assert_eq!(state.selection().len(), 3);
		assert!(state.selection_box().is_some());
		state.end_box();
		assert!(state.selection_box().is_none());
	}

	#[test]
	fn box_catches_nodes_it_only_grazes() {
		let mut state = state_with(&[(100.0, 100.0)]);
		state.begin_box(Point::new(0.0, 0.0));
		state.stretch_box(Point::new(92.0, 92.0)).unwrap();
		assert!(state.selection().contains(NodeId(0)));
	}

	#[test]
	fn edges_are_selected_with_both_endpoints() {
		let mut state = state_with(&[(100.0, 100.0), (200.0, 200.0)]);
		let mut graph = state.graph().clone();
		graph.connect(NodeId(0), NodeId(1)).unwrap();
		state = GameState::from_graph(&GameConfig::default(), canvas(), graph).unwrap();
		let edge = state.graph().edges().next().unwrap().clone();

		state.select(NodeId(0)).unwrap();
		assert!(!state.edge_selected(&edge));
		state.select(NodeId(1)).unwrap();
		assert!(state.edge_selected(&edge));
	}

	#[test]
	fn scramble_and_ring_keep_edges_and_clear_selection() {
		let mut rng = StdRng::seed_from_u64(13);
		let mut state = GameState::generate(&GameConfig::default(), canvas(), &mut rng).unwrap();
		let edges: Vec<_> = state.graph().edges().map(Edge::key).collect();
		state.select(NodeId(3)).unwrap();

		state.scramble(&mut rng).unwrap();
		assert!(state.selection().is_empty());
		assert_eq!(state.graph().edges().map(Edge::key).collect::<Vec<_>>(), edges);

		state.select(NodeId(4)).unwrap();
		state.arrange_ring().unwrap();
		assert!(state.selection().is_empty());
		let report = state.recompute(&mut IntersectionEngine::default()).unwrap();
		assert!(report.solved);
		assert!(state.solved());
		state.assert_consistent();
	}
}
