use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::error::{GameError, GameResult};
use super::geometry::{Point, Rect};
use super::layout::{LayoutStrategy, MIN_NODES};

/// What the reset control (and the `r` key) does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ResetMode {
	/// Throw the game state away and build a new graph.
	#[default]
	Regenerate,
	/// Keep the edges, scatter the nodes again.
	Scramble,
}

/// Settings read once when a game starts.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
	/// Number of nodes in the puzzle.
	pub node_count: usize,
	/// Edge generator.
	pub strategy: LayoutStrategy,
	/// Behaviour of reset.
	pub reset_mode: ResetMode,
	/// Radius of a drawn node.
	pub node_radius: f64,
}

impl Default for GameConfig {
	fn default() -> Self {
		Self {
			node_count: 10,
			strategy: LayoutStrategy::default(),
			reset_mode: ResetMode::default(),
			node_radius: 10.0,
		}
	}
}

impl GameConfig {
	/// Rejects settings no layout can be built from.
	pub fn validate(&self) -> GameResult<()> {
		if self.node_count < MIN_NODES {
			return Err(GameError::Configuration(format!(
				"{} layout needs at least {MIN_NODES} nodes, got {}",
				self.strategy, self.node_count
			)));
		}
		if !(self.node_radius > 0.0) {
			return Err(GameError::Configuration(format!(
				"node radius must be positive, got {}",
				self.node_radius
			)));
		}
		Ok(())
	}

	/// Builds a config from query-string style settings; missing keys keep their defaults.
	pub fn from_params(
		nodes: Option<&str>,
		layout: Option<&str>,
		reset: Option<&str>,
	) -> GameResult<Self> {
		let mut config = Self::default();
		if let Some(nodes) = nodes {
			config.node_count = nodes.trim().parse().map_err(|_| {
				GameError::Configuration(format!("node count must be a whole number, got {nodes:?}"))
			})?;
		}
		if let Some(layout) = layout {
			config.strategy = layout.trim().parse().map_err(|_| {
				GameError::Configuration(format!(
					"unknown layout {layout:?}, expected one of {}",
					names::<LayoutStrategy>()
				))
			})?;
		}
		if let Some(reset) = reset {
			config.reset_mode = reset.trim().parse().map_err(|_| {
				GameError::Configuration(format!(
					"unknown reset mode {reset:?}, expected one of {}",
					names::<ResetMode>()
				))
			})?;
		}
		config.validate()?;
		Ok(config)
	}
}

fn names<E: IntoEnumIterator + ToString>() -> String {
	E::iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
}

/// Fixed geometry of the play area.
///
/// The reset control sits in the top-left corner and its height doubles as
/// the margin nodes must keep from every side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
	/// Full drawing width.
	pub width: f64,
	/// Full drawing height.
	pub height: f64,
	/// Margin between the canvas border and the node interior.
	pub buffer: f64,
	/// Area nodes may occupy; both bounds are exclusive.
	pub interior: Rect,
	/// Clickable reset control.
	pub reset_button: Rect,
}

impl Canvas {
	/// Lays out the play area for a `width` x `height` drawing surface.
	pub fn new(width: f64, height: f64) -> GameResult<Self> {
		let button_width = width / if width > height { 10.0 } else { 3.0 };
		let button_height = button_width / 3.0;
		let buffer = button_height;

		if !(width > 2.0 * buffer && height > 2.0 * buffer) {
			return Err(GameError::Configuration(format!(
				"canvas {width}x{height} is too small to play on"
			)));
		}

		Ok(Self {
			width,
			height,
			buffer,
			interior: Rect::from_corners(
				Point::new(buffer, buffer),
				Point::new(width - buffer, height - buffer),
			),
			reset_button: Rect::from_origin(Point::new(0.0, 0.0), button_width, button_height),
		})
	}

	/// True if `x` lies strictly inside the horizontal node bounds.
	pub fn in_bounds_x(&self, x: f64) -> bool {
		self.interior.min.x < x && x < self.interior.max.x
	}

	/// True if `y` lies strictly inside the vertical node bounds.
	pub fn in_bounds_y(&self, y: f64) -> bool {
		self.interior.min.y < y && y < self.interior.max.y
	}

	/// True if `p` lies strictly inside the node bounds.
	pub fn in_bounds(&self, p: Point) -> bool {
		self.in_bounds_x(p.x) && self.in_bounds_y(p.y)
	}

	/// Centre of the drawing surface.
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// Radius of the solve ring: 90% of the widest circle the interior can hold.
	pub fn ring_radius(&self) -> f64 {
		let c = self.center();
		let room = (c.x - self.interior.min.x).min(c.y - self.interior.min.y);
		room * 0.9
	}
}
