use std::f64::consts::PI;

use rand::Rng;
use strum_macros::{Display, EnumIter, EnumString};

use super::error::{GameError, GameResult};
use super::geometry::{Point, Rect};
use super::graph::{Graph, NodeId};

/// Fewest nodes any strategy can build a puzzle from.
pub const MIN_NODES: usize = 3;

/// Number of passes applied by [`LayoutStrategy::FixedTriangles`].
pub const FIXED_TRIANGLE_PASSES: usize = 2;

/// How edges are generated over the node set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum LayoutStrategy {
	/// A single cycle through every node.
	Border,
	/// Random edges up to `3 * (n - 2)`; not guaranteed to be solvable.
	MaxEdges,
	/// Triangle fans on nested rings until the inner ring is exhausted.
	#[default]
	NestedTriangles,
	/// Like [`LayoutStrategy::NestedTriangles`] but stops after a fixed number of rings.
	FixedTriangles,
}

/// Output of one triangle pass over a ring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrianglePass {
	/// Node pairs to connect. May repeat pairs already connected.
	pub edges: Vec<(NodeId, NodeId)>,
	/// Every second node of the ring, in ring order.
	pub inner: Vec<NodeId>,
}

/// Connects consecutive triples `(i, i + 1, i + 2)` of `ring`, stepping by two.
///
/// The last triple wraps onto the first node when the ring has even length;
/// an odd ring is closed with a plain edge back to its first node instead.
/// Rings shorter than [`MIN_NODES`] produce nothing.
pub fn triangle_pass(ring: &[NodeId]) -> TrianglePass {
	let len = ring.len();
	if len < MIN_NODES {
		return TrianglePass::default();
	}

	let mut pass = TrianglePass::default();
	for i in (0..len).step_by(2) {
		let a = ring[i];
		pass.inner.push(a);
		if i + 1 == len {
			pass.edges.push((a, ring[0]));
			continue;
		}
		let (b, c) = (ring[i + 1], ring[(i + 2) % len]);
		pass.edges.extend([(a, b), (b, c), (a, c)]);
	}
	pass
}

/// Replaces the graph's edges with the ones produced by `strategy`.
///
/// Node positions are left untouched.
pub fn populate(graph: &mut Graph, strategy: LayoutStrategy, rng: &mut impl Rng) -> GameResult<()> {
	let n = graph.node_count();
	if n < MIN_NODES {
		return Err(GameError::Configuration(format!(
			"{strategy} layout needs at least {MIN_NODES} nodes, got {n}"
		)));
	}

	graph.disconnect_all();
	match strategy {
		LayoutStrategy::Border => populate_border(graph)?,
		LayoutStrategy::MaxEdges => populate_max_edges(graph, rng)?,
		LayoutStrategy::NestedTriangles => populate_triangles(graph, None)?,
		LayoutStrategy::FixedTriangles => {
			populate_triangles(graph, Some(FIXED_TRIANGLE_PASSES))?
		}
	}
	log::debug!(
		"{strategy} layout: {} nodes, {} edges",
		graph.node_count(),
		graph.edge_count()
	);
	Ok(())
}

fn populate_border(graph: &mut Graph) -> GameResult<()> {
	let n = graph.node_count();
	for i in 0..n {
		graph.connect(NodeId(i), NodeId((i + 1) % n))?;
	}
	Ok(())
}

fn populate_max_edges(graph: &mut Graph, rng: &mut impl Rng) -> GameResult<()> {
	let n = graph.node_count();
	let target = 3 * (n - 2);
	let available = n * (n - 1) / 2;
	while graph.edge_count() < target && graph.edge_count() < available {
		let a = rng.random_range(0..n);
		let b = rng.random_range(0..n);
		if a != b {
			graph.connect(NodeId(a), NodeId(b))?;
		}
	}
	Ok(())
}

fn populate_triangles(graph: &mut Graph, max_passes: Option<usize>) -> GameResult<()> {
	let mut ring: Vec<NodeId> = graph.node_ids().collect();
	let mut passes = 0;
	while ring.len() >= MIN_NODES && max_passes.is_none_or(|max| passes < max) {
		let pass = triangle_pass(&ring);
		for (a, b) in pass.edges {
			graph.connect(a, b)?;
		}
		ring = pass.inner;
		passes += 1;
	}
	Ok(())
}

/// Uniformly random point strictly inside `bounds`.
pub fn random_point(bounds: &Rect, rng: &mut impl Rng) -> Point {
	Point::new(
		sample_open(rng, bounds.min.x, bounds.max.x),
		sample_open(rng, bounds.min.y, bounds.max.y),
	)
}

fn sample_open(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
	if max <= min {
		return min;
	}
	let value = rng.random_range(min..max);
	if value > min { value } else { (min + max) / 2.0 }
}

/// Positions of `n` nodes spaced evenly on a circle, node `i` at angle `2 * PI * i / n`.
pub fn ring_positions(n: usize, center: Point, radius: f64) -> Vec<Point> {
	(0..n)
		.map(|i| {
			let angle = 2.0 * PI * (i as f64) / (n as f64);
			center.offset(radius * angle.cos(), radius * angle.sin())
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use strum::IntoEnumIterator;

	use super::*;
	use crate::components::uncross::crossings::IntersectionEngine;

	fn ids(n: usize) -> Vec<NodeId> {
		(0..n).map(NodeId).collect()
	}

	fn graph_on_ring(n: usize) -> Graph {
		let mut graph = Graph::new();
		for p in ring_positions(n, Point::new(500.0, 500.0), 300.0) {
			graph.add_node(p);
		}
		graph
	}

	#[test]
	fn strategy_names_round_trip() {
		assert_eq!("border".parse(), Ok(LayoutStrategy::Border));
		assert_eq!("max-edges".parse(), Ok(LayoutStrategy::MaxEdges));
		assert_eq!("nested-triangles".parse(), Ok(LayoutStrategy::NestedTriangles));
		assert_eq!(LayoutStrategy::FixedTriangles.to_string(), "fixed-triangles");
		assert!("spiral".parse::<LayoutStrategy>().is_err());
		assert_eq!(LayoutStrategy::default(), LayoutStrategy::NestedTriangles);
	}

	#[test]
	fn triangle_pass_on_even_ring_wraps() {
		let pass = triangle_pass(&ids(4));
		assert_eq!(pass.inner, vec![NodeId(0), NodeId(2)]);
		assert!(pass.edges.contains(&(NodeId(2), NodeId(3))));
		assert!(pass.edges.contains(&(NodeId(3), NodeId(0))));
		assert!(pass.edges.contains(&(NodeId(2), NodeId(0))));
	}

	#[test]
	fn triangle_pass_on_odd_ring_closes_with_edge() {
		let pass = triangle_pass(&ids(5));
		assert_eq!(pass.inner, vec![NodeId(0), NodeId(2), NodeId(4)]);
		assert_eq!(pass.edges.last(), Some(&(NodeId(4), NodeId(0))));
		assert_eq!(pass.edges.len(), 7);
	}

	#[test]
	fn triangle_pass_ignores_short_rings() {
		assert_eq!(triangle_pass(&ids(2)), TrianglePass::default());
		assert_eq!(triangle_pass(&[]), TrianglePass::default());
	}

	#[test]
	fn border_is_a_single_cycle() {
		let mut rng = StdRng::seed_from_u64(1);
		for n in 3..40 {
			let mut graph = graph_on_ring(n);
			populate(&mut graph, LayoutStrategy::Border, &mut rng).unwrap();
			assert_eq!(graph.edge_count(), n);
			for id in graph.node_ids() {
				assert_eq!(graph.neighbors(id).unwrap().len(), 2, "n = {n}");
			}

			// Walking the neighbours from node 0 visits every node once.
			let (mut previous, mut current, mut steps) = (NodeId(0), NodeId(1), 1);
			while current != NodeId(0) {
				let next = *graph
					.neighbors(current)
					.unwrap()
					.iter()
					.find(|&&next| next != previous)
					.unwrap();
				(previous, current) = (current, next);
				steps += 1;
			}
			assert_eq!(steps, n);
			graph.assert_consistent();
		}
	}

	#[test]
	fn nested_triangles_are_planar_on_a_ring() {
		let mut rng = StdRng::seed_from_u64(2);
		let mut engine = IntersectionEngine::default();
		for strategy in [LayoutStrategy::NestedTriangles, LayoutStrategy::FixedTriangles] {
			for n in 3..60 {
				let mut graph = graph_on_ring(n);
				populate(&mut graph, strategy, &mut rng).unwrap();
				let report = engine.recompute(&graph).unwrap();
				assert!(report.solved, "{strategy} with {n} nodes crossed");
				graph.assert_consistent();
			}
		}
	}

	#[test]
	fn nested_triangles_connect_every_node() {
		let mut rng = StdRng::seed_from_u64(3);
		for n in 3..30 {
			let mut graph = graph_on_ring(n);
			populate(&mut graph, LayoutStrategy::NestedTriangles, &mut rng).unwrap();
			for id in graph.node_ids() {
				assert!(graph.neighbors(id).unwrap().len() >= 2);
			}
		}
	}

	#[test]
	fn fixed_triangles_stop_early() {
		let mut rng = StdRng::seed_from_u64(4);
		let mut nested = graph_on_ring(32);
		let mut fixed = graph_on_ring(32);
		populate(&mut nested, LayoutStrategy::NestedTriangles, &mut rng).unwrap();
		populate(&mut fixed, LayoutStrategy::FixedTriangles, &mut rng).unwrap();
		assert!(fixed.edge_count() < nested.edge_count());
	}

	#[test]
	fn max_edges_reaches_target() {
		let mut rng = StdRng::seed_from_u64(5);
		for n in 3..25 {
			let mut graph = graph_on_ring(n);
			populate(&mut graph, LayoutStrategy::MaxEdges, &mut rng).unwrap();
			assert_eq!(graph.edge_count(), 3 * (n - 2));
			graph.assert_consistent();
		}
	}

	#[test]
	fn population_is_deterministic_per_seed() {
		let build = |seed| {
			let mut graph = graph_on_ring(12);
			populate(&mut graph, LayoutStrategy::MaxEdges, &mut StdRng::seed_from_u64(seed))
				.unwrap();
			graph.edges().map(|edge| edge.key()).collect::<Vec<_>>()
		};
		assert_eq!(build(9), build(9));
	}

	#[test]
	fn too_few_nodes_is_a_configuration_error() {
		let mut rng = StdRng::seed_from_u64(6);
		for strategy in LayoutStrategy::iter() {
			let mut graph = graph_on_ring(2);
			assert!(matches!(
				populate(&mut graph, strategy, &mut rng),
				Err(GameError::Configuration(_))
			));
		}
	}

	#[test]
	fn repopulating_replaces_edges() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut graph = graph_on_ring(8);
		populate(&mut graph, LayoutStrategy::NestedTriangles, &mut rng).unwrap();
		populate(&mut graph, LayoutStrategy::Border, &mut rng).unwrap();
		assert_eq!(graph.edge_count(), 8);
		graph.assert_consistent();
	}

	#[test]
	fn random_points_stay_inside() {
		let mut rng = StdRng::seed_from_u64(8);
		let bounds = Rect::from_corners(Point::new(10.0, 20.0), Point::new(110.0, 70.0));
		for _ in 0..500 {
			let p = random_point(&bounds, &mut rng);
			assert!(bounds.min.x < p.x && p.x < bounds.max.x);
			assert!(bounds.min.y < p.y && p.y < bounds.max.y);
		}
	}

	#[test]
	fn ring_positions_are_evenly_spaced() {
		let center = Point::new(0.0, 0.0);
		let points = ring_positions(4, center, 10.0);
		assert!((points[0].x - 10.0).abs() < 1e-9);
		assert!((points[1].y - 10.0).abs() < 1e-9);
		assert!((points[2].x + 10.0).abs() < 1e-9);
		assert!((points[3].y + 10.0).abs() < 1e-9);
	}
}
