mod component;
pub mod config;
pub mod controller;
pub mod crossings;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;
mod render;
pub mod selection;
pub mod state;

pub use component::UncrossCanvas;
pub use config::{Canvas, GameConfig, ResetMode};
pub use controller::{Game, InputEvent, InputState, Key};
pub use crossings::{CrossingReport, IntersectionEngine};
pub use error::{GameError, GameResult};
pub use geometry::{Point, Rect, Segment};
pub use graph::{Edge, EdgeKey, Graph, Node, NodeId};
pub use layout::LayoutStrategy;
pub use state::GameState;
