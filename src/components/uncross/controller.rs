use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::{Canvas, GameConfig, ResetMode};
use super::crossings::IntersectionEngine;
use super::error::GameResult;
use super::geometry::{Point, point_in_rect};
use super::graph::{Graph, NodeId};
use super::state::GameState;

/// Keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
	/// Either shift key.
	Shift,
	/// The space bar.
	Space,
	/// Any other printable key.
	Char(char),
	/// Anything else.
	Other,
}

impl Key {
	/// Maps a DOM `KeyboardEvent.key` value.
	pub fn from_name(name: &str) -> Self {
		let mut chars = name.chars();
		match (name, chars.next(), chars.next()) {
			("Shift", _, _) => Key::Shift,
			(" " | "Spacebar", _, _) => Key::Space,
			(_, Some(c), None) => Key::Char(c),
			_ => Key::Other,
		}
	}
}

/// Normalised input, with pointer positions already in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
	/// Primary button pressed.
	PointerDown(Point),
	/// Pointer moved, pressed or not.
	PointerMove(Point),
	/// Primary button released.
	PointerUp(Point),
	/// Key pressed.
	KeyDown(Key),
	/// Key released.
	KeyUp(Key),
}

/// Gesture bookkeeping between pointer events.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
	/// Shift is held down.
	pub shift_held: bool,
	/// The primary button is held down.
	pub pointer_down: bool,
	/// The pointer moved since it was pressed.
	pub moved_since_down: bool,
	/// A box selection is in progress.
	pub boxing: bool,
	/// Node that was under the pointer when it was pressed.
	pub active_node: Option<NodeId>,
	/// Last pointer position seen.
	pub last_pointer: Point,
}

impl InputState {
	fn release(&mut self) {
		*self = Self {
			shift_held: self.shift_held,
			last_pointer: self.last_pointer,
			..Default::default()
		};
	}
}

/// A running puzzle.
///
/// Every [`InputEvent`] runs to completion before the next one is handled,
/// and the game is the only thing mutating its [`GameState`].
pub struct Game {
	config: GameConfig,
	state: GameState,
	input: InputState,
	engine: IntersectionEngine,
	rng: StdRng,
}

impl Game {
	/// Starts a new game on `canvas`.
	///
	/// The same `seed` and settings always produce the same board.
	pub fn new(config: GameConfig, canvas: Canvas, seed: u64) -> GameResult<Self> {
		let mut rng = StdRng::seed_from_u64(seed);
		let state = GameState::generate(&config, canvas, &mut rng)?;
		let mut game = Self::assemble(config, state, rng);
		game.recompute()?;
		info!(
			"Started {} puzzle with {} nodes and {} edges",
			game.state.strategy(),
			game.state.node_count(),
			game.state.graph().edge_count()
		);
		Ok(game)
	}

	/// Starts a game on a hand-built graph.
	///
	/// Fails with a configuration error if any node lies outside the canvas interior.
	pub fn with_graph(config: GameConfig, canvas: Canvas, graph: Graph, seed: u64) -> GameResult<Self> {
		config.validate()?;
		let state = GameState::from_graph(&config, canvas, graph)?;
		let mut game = Self::assemble(config, state, StdRng::seed_from_u64(seed));
		game.recompute()?;
		Ok(game)
	}

	fn assemble(config: GameConfig, state: GameState, rng: StdRng) -> Self {
		Self {
			engine: IntersectionEngine::new(2.0 * config.node_radius),
			config,
			state,
			input: InputState::default(),
			rng,
		}
	}

	/// Current board.
	pub fn state(&self) -> &GameState {
		&self.state
	}

	/// Current gesture bookkeeping.
	pub fn input(&self) -> &InputState {
		&self.input
	}

	/// True when no edges cross.
	pub fn solved(&self) -> bool {
		self.state.solved()
	}

	/// Handles one event. Returns the new solved state if it changed.
	pub fn handle(&mut self, event: InputEvent) -> GameResult<Option<bool>> {
		let was_solved = self.state.solved();
		match event {
			InputEvent::PointerDown(p) => self.pointer_down(p)?,
			InputEvent::PointerMove(p) => self.pointer_move(p)?,
			InputEvent::PointerUp(p) => self.pointer_up(p)?,
			InputEvent::KeyDown(key) => self.key_down(key)?,
			InputEvent::KeyUp(key) => self.key_up(key),
		}
		let solved = self.state.solved();
		if solved != was_solved {
			info!("Puzzle {}", if solved { "solved" } else { "unsolved" });
			return Ok(Some(solved));
		}
		Ok(None)
	}

	fn pointer_down(&mut self, p: Point) -> GameResult<()> {
		self.input.pointer_down = true;
		self.input.moved_since_down = false;
		self.input.last_pointer = p;

		let Some(id) = self.state.node_at(p) else {
			self.input.active_node = None;
			if !self.input.shift_held {
				self.state.clear_selection()?;
			}
			if point_in_rect(p, &self.state.canvas().reset_button) {
				return self.reset();
			}
			debug!("Box selection from ({:.0}, {:.0})", p.x, p.y);
			self.state.begin_box(p);
			self.input.boxing = true;
			return Ok(());
		};

		let was_selected = self.state.selection().contains(id);
		self.input.active_node = Some(id);
		if self.input.shift_held {
			self.state.toggle(id)?;
		} else if !was_selected {
			self.state.select_only(Some(id))?;
		}
		Ok(())
	}

	fn pointer_move(&mut self, p: Point) -> GameResult<()> {
		let (dx, dy) = (p.x - self.input.last_pointer.x, p.y - self.input.last_pointer.y);
		self.input.last_pointer = p;
		if !self.input.pointer_down {
			return Ok(());
		}

		if self.input.boxing {
			self.state.stretch_box(p)?;
		} else if !self.input.shift_held {
			self.state.translate_selected(dx, dy)?;
		}
		self.input.moved_since_down = true;
		Ok(())
	}

	fn pointer_up(&mut self, p: Point) -> GameResult<()> {
		self.input.last_pointer = p;
		if !self.input.pointer_down {
			return Ok(());
		}

		if self.input.boxing {
			// A box that never moved is a click on empty space and picks nothing.
			if self.input.moved_since_down {
				self.state.stretch_box(p)?;
			}
			self.state.end_box();
			debug!("Box selection picked {} nodes", self.state.selection().len());
		} else if !self.input.moved_since_down && !self.input.shift_held {
			let target = self.state.node_at(p);
			self.state.select_only(target)?;
		} else if self.input.moved_since_down {
			debug!("Dragged {} nodes", self.state.selection().len());
		}

		self.input.release();
		self.recompute()
	}

	fn key_down(&mut self, key: Key) -> GameResult<()> {
		match key {
			Key::Char('r') => self.reset(),
			Key::Space => self.solve_layout(),
			Key::Shift => {
				self.input.shift_held = true;
				Ok(())
			}
			_ => Ok(()),
		}
	}

	fn key_up(&mut self, key: Key) {
		if key == Key::Shift {
			self.input.shift_held = false;
		}
	}

	/// Regenerates or rescrambles the board, depending on the configured reset mode.
	pub fn reset(&mut self) -> GameResult<()> {
		match self.config.reset_mode {
			ResetMode::Regenerate => {
				let canvas = *self.state.canvas();
				self.state = GameState::generate(&self.config, canvas, &mut self.rng)?;
				self.engine.clear_cache();
			}
			ResetMode::Scramble => {
				self.state.end_box();
				self.state.scramble(&mut self.rng)?;
			}
		}
		info!("Board reset ({})", self.config.reset_mode);
		self.input.release();
		self.recompute()
	}

	/// Places every node on the solve ring, keeping the edges.
	pub fn solve_layout(&mut self) -> GameResult<()> {
		self.state.arrange_ring()?;
		info!("Arranged {} nodes on a ring", self.state.node_count());
		self.recompute()
	}

	/// Refreshes crossing flags and the solved state.
	pub fn recompute(&mut self) -> GameResult<()> {
		let report = self.state.recompute(&mut self.engine)?;
		debug!(
			"{} crossing pairs over {} edges",
			report.crossing_pairs,
			report.crossed.len()
		);
		Ok(())
	}
}
