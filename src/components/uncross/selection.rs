use std::collections::BTreeSet;

use super::geometry::{Point, Rect};
use super::graph::NodeId;

/// Ids of the currently selected nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	ids: BTreeSet<NodeId>,
}

impl Selection {
	/// Adds `id`; returns `false` if it was already selected.
	pub fn insert(&mut self, id: NodeId) -> bool {
		self.ids.insert(id)
	}

	/// Removes `id`; returns `false` if it was not selected.
	pub fn remove(&mut self, id: NodeId) -> bool {
		self.ids.remove(&id)
	}

	/// Membership test.
	pub fn contains(&self, id: NodeId) -> bool {
		self.ids.contains(&id)
	}

	/// Empties the selection, returning what was selected.
	pub fn take(&mut self) -> BTreeSet<NodeId> {
		std::mem::take(&mut self.ids)
	}

	/// Number of selected nodes.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// True when nothing is selected.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Selected ids in ascending order.
	pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.ids.iter().copied()
	}
}

/// Rubber-band rectangle drawn while box-selecting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SelectionBox {
	anchor: Point,
	current: Point,
	visible: bool,
}

impl SelectionBox {
	/// Pins the box to `p` with zero size and shows it.
	pub fn anchor(&mut self, p: Point) {
		self.anchor = p;
		self.current = p;
		self.visible = true;
	}

	/// Stretches the box from its anchor to `p`.
	pub fn redraw(&mut self, p: Point) {
		self.current = p;
	}

	/// Hides the box until the next anchor.
	pub fn hide(&mut self) {
		self.visible = false;
	}

	/// True while a box gesture is in progress.
	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// The spanned rectangle, whichever way the pointer was dragged.
	pub fn rect(&self) -> Rect {
		Rect::from_corners(self.anchor, self.current)
	}
}
