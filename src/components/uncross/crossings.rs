use std::collections::{BTreeMap, HashMap};

use super::error::GameResult;
use super::geometry::{Segment, segments_intersect};
use super::graph::{EdgeKey, Graph};

/// Endpoints closer than this fraction of a node diameter count as the same point.
pub const ENDPOINT_TOLERANCE_RATIO: f64 = 0.01;

#[derive(Clone, Copy, Debug)]
struct CachedPair {
	segments: (Segment, Segment),
	crossed: bool,
}

/// Result of a full crossing pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrossingReport {
	/// Per-edge flag: true if the edge crosses any other edge.
	pub crossed: BTreeMap<EdgeKey, bool>,
	/// Number of distinct crossing edge pairs.
	pub crossing_pairs: usize,
	/// True when no edge crosses another.
	pub solved: bool,
}

impl CrossingReport {
	/// Number of edges that cross at least one other edge.
	pub fn crossed_edges(&self) -> usize {
		self.crossed.values().filter(|&&crossed| crossed).count()
	}
}

/// Tests every edge pair and remembers the answers by pair and endpoint positions.
///
/// A cached answer is only reused while both segments are exactly where they
/// were when it was computed, so moving a node invalidates every pair touching it.
#[derive(Clone, Debug)]
pub struct IntersectionEngine {
	tolerance: f64,
	cache: HashMap<(EdgeKey, EdgeKey), CachedPair>,
}

impl Default for IntersectionEngine {
	fn default() -> Self {
		Self::new(20.0)
	}
}

impl IntersectionEngine {
	/// Creates an engine whose shared-endpoint tolerance scales with `node_diameter`.
	pub fn new(node_diameter: f64) -> Self {
		Self {
			tolerance: node_diameter * ENDPOINT_TOLERANCE_RATIO,
			cache: HashMap::new(),
		}
	}

	/// Shared-endpoint tolerance in canvas units.
	pub fn tolerance(&self) -> f64 {
		self.tolerance
	}

	/// Number of pair results currently remembered.
	pub fn cached_pairs(&self) -> usize {
		self.cache.len()
	}

	/// Forgets every remembered pair.
	pub fn clear_cache(&mut self) {
		self.cache.clear();
	}

	/// Checks every pair of edges that do not share a node.
	pub fn recompute(&mut self, graph: &Graph) -> GameResult<CrossingReport> {
		let lines = graph
			.edges()
			.map(|edge| Ok((edge.key(), graph.segment(edge.key())?)))
			.collect::<GameResult<Vec<_>>>()?;

		let mut report = CrossingReport {
			crossed: lines.iter().map(|&(key, _)| (key, false)).collect(),
			..Default::default()
		};
		let mut cache = HashMap::with_capacity(self.cache.len());

		for (i, &(k1, s1)) in lines.iter().enumerate() {
			for &(k2, s2) in &lines[i + 1..] {
				if k1.shares_endpoint(k2) {
					continue;
				}
				let pair = (k1, k2);
				let crossed = match self.cache.get(&pair) {
					Some(cached) if cached.segments == (s1, s2) => cached.crossed,
					_ => segments_intersect(s1, s2, self.tolerance),
				};
				cache.insert(
					pair,
					CachedPair {
						segments: (s1, s2),
						crossed,
					},
				);
				if crossed {
					report.crossing_pairs += 1;
					report.crossed.insert(k1, true);
					report.crossed.insert(k2, true);
				}
			}
		}

		self.cache = cache;
		report.solved = report.crossing_pairs == 0;
		Ok(report)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::uncross::geometry::Point;
	use crate::components::uncross::graph::NodeId;

	/// Unit square A(0,0) B(1,0) C(1,1) D(0,1), scaled up so the tolerance is irrelevant.
	fn square() -> (Graph, [NodeId; 4]) {
		let mut graph = Graph::new();
		let a = graph.add_node(Point::new(0.0, 0.0));
		let b = graph.add_node(Point::new(100.0, 0.0));
		let c = graph.add_node(Point::new(100.0, 100.0));
		let d = graph.add_node(Point::new(0.0, 100.0));
		(graph, [a, b, c, d])
	}

	#[test]
	fn crossing_diagonals_are_unsolved() {
		let (mut graph, [a, b, c, d]) = square();
		graph.connect(a, c).unwrap();
		graph.connect(b, d).unwrap();

		let report = IntersectionEngine::default().recompute(&graph).unwrap();
		assert!(!report.solved);
		assert_eq!(report.crossing_pairs, 1);
		assert_eq!(report.crossed_edges(), 2);
		assert_eq!(report.crossed.get(&EdgeKey::new(a, c)), Some(&true));
	}

	#[test]
	fn square_border_is_solved() {
		let (mut graph, [a, b, c, d]) = square();
		for (x, y) in [(a, b), (b, c), (c, d), (d, a)] {
			graph.connect(x, y).unwrap();
		}
		let report = IntersectionEngine::default().recompute(&graph).unwrap();
		assert!(report.solved);
		assert_eq!(report.crossed.len(), 4);
		assert_eq!(report.crossed_edges(), 0);
	}

	#[test]
	fn one_crossing_marks_only_its_edges() {
		let (mut graph, [a, b, c, d]) = square();
		graph.connect(a, c).unwrap();
		graph.connect(b, d).unwrap();
		graph.connect(a, b).unwrap();

		let report = IntersectionEngine::default().recompute(&graph).unwrap();
		assert_eq!(report.crossed.get(&EdgeKey::new(a, b)), Some(&false));
		assert_eq!(report.crossed_edges(), 2);
	}

	#[test]
	fn recompute_is_idempotent() {
		let (mut graph, [a, b, c, d]) = square();
		graph.connect(a, c).unwrap();
		graph.connect(b, d).unwrap();
		graph.connect(c, d).unwrap();

		let mut engine = IntersectionEngine::default();
		let first = engine.recompute(&graph).unwrap();
		let second = engine.recompute(&graph).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn moving_a_node_invalidates_cached_pairs() {
		let (mut graph, [a, b, c, d]) = square();
		graph.connect(a, c).unwrap();
		graph.connect(b, d).unwrap();

		let mut engine = IntersectionEngine::default();
		assert!(!engine.recompute(&graph).unwrap().solved);
		assert_eq!(engine.cached_pairs(), 1);

		graph.node_mut(c).unwrap().position = Point::new(-50.0, 0.0);
		assert!(engine.recompute(&graph).unwrap().solved);
	}

	#[test]
	fn cache_drops_removed_edges() {
		let (mut graph, [a, b, c, d]) = square();
		graph.connect(a, c).unwrap();
		graph.connect(b, d).unwrap();

		let mut engine = IntersectionEngine::default();
		engine.recompute(&graph).unwrap();
		graph.disconnect(b, d).unwrap();
		let report = engine.recompute(&graph).unwrap();
		assert!(report.solved);
		assert_eq!(engine.cached_pairs(), 0);
	}

	#[test]
	fn edges_sharing_a_node_never_cross() {
		let mut graph = Graph::new();
		let hub = graph.add_node(Point::new(50.0, 50.0));
		let spokes: Vec<_> = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (50.0, 0.0)]
			.into_iter()
			.map(|(x, y)| graph.add_node(Point::new(x, y)))
			.collect();
		for &spoke in &spokes {
			graph.connect(hub, spoke).unwrap();
		}
		assert!(IntersectionEngine::default().recompute(&graph).unwrap().solved);
	}

	#[test]
	fn tolerance_scales_with_diameter() {
		assert!((IntersectionEngine::new(40.0).tolerance() - 0.4).abs() < 1e-12);
		let mut engine = IntersectionEngine::new(40.0);
		engine.recompute(&Graph::new()).unwrap();
		engine.clear_cache();
		assert_eq!(engine.cached_pairs(), 0);
	}
}
