use std::ops::Sub;

/// Cross products whose magnitude falls below this fraction of the operand
/// lengths are treated as collinear.
const COLLINEAR_EPSILON: f64 = 1e-9;

/// A position on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate, growing to the right.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Creates a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Returns this point moved by `(dx, dy)`.
	pub fn offset(self, dx: f64, dy: f64) -> Self {
		Self::new(self.x + dx, self.y + dy)
	}

	fn cross(self, other: Point) -> f64 {
		self.x * other.y - self.y * other.x
	}

	fn length(self) -> f64 {
		self.x.hypot(self.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

/// A straight line between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
	/// First endpoint.
	pub start: Point,
	/// Second endpoint.
	pub end: Point,
}

impl Segment {
	/// Creates a segment.
	pub const fn new(start: Point, end: Point) -> Self {
		Self { start, end }
	}
}

/// An axis-aligned rectangle, always stored with `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	/// Top-left corner.
	pub min: Point,
	/// Bottom-right corner.
	pub max: Point,
}

impl Rect {
	/// Builds the rectangle spanned by two opposite corners given in any order.
	pub fn from_corners(a: Point, b: Point) -> Self {
		Self {
			min: Point::new(a.x.min(b.x), a.y.min(b.y)),
			max: Point::new(a.x.max(b.x), a.y.max(b.y)),
		}
	}

	/// Builds the rectangle with its top-left corner at `origin`.
	pub fn from_origin(origin: Point, width: f64, height: f64) -> Self {
		Self::from_corners(origin, origin.offset(width, height))
	}

	/// The bounding square of a circle.
	pub fn around(center: Point, radius: f64) -> Self {
		Self::from_corners(
			center.offset(-radius, -radius),
			center.offset(radius, radius),
		)
	}

	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}

	/// Midpoint of the rectangle.
	pub fn center(&self) -> Point {
		Point::new(
			(self.min.x + self.max.x) / 2.0,
			(self.min.y + self.max.y) / 2.0,
		)
	}

	/// Corners in clockwise order starting at the top-left.
	pub fn corners(&self) -> [Point; 4] {
		[
			self.min,
			Point::new(self.max.x, self.min.y),
			self.max,
			Point::new(self.min.x, self.max.y),
		]
	}
}

/// Turn direction of an ordered point triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
	/// Negative cross product.
	Clockwise,
	/// Positive cross product.
	CounterClockwise,
	/// Cross product within tolerance of zero.
	Collinear,
}

/// Classifies the turn `p0 -> p1 -> p2` by the sign of `(p1 - p0) x (p2 - p0)`.
pub fn orientation(p0: Point, p1: Point, p2: Point) -> Orientation {
	let (a, b) = (p1 - p0, p2 - p0);
	let cross = a.cross(b);
	let tolerance = COLLINEAR_EPSILON * (a.length() * b.length()).max(1.0);
	if cross.abs() <= tolerance {
		Orientation::Collinear
	} else if cross > 0.0 {
		Orientation::CounterClockwise
	} else {
		Orientation::Clockwise
	}
}

/// True when both coordinate deltas are strictly below `tolerance`.
pub fn approx_equal(p: Point, q: Point, tolerance: f64) -> bool {
	(p.x - q.x).abs() < tolerance && (p.y - q.y).abs() < tolerance
}

/// Segments meeting at an endpoint (within `tolerance`) never count as crossing.
pub fn segments_intersect(s1: Segment, s2: Segment, tolerance: f64) -> bool {
	let (p0, p1, p2, p3) = (s1.start, s1.end, s2.start, s2.end);
	let shares_endpoint = [(p0, p2), (p0, p3), (p1, p2), (p1, p3)]
		.into_iter()
		.any(|(p, q)| approx_equal(p, q, tolerance));
	if shares_endpoint {
		return false;
	}

	orientation(p0, p2, p3) != orientation(p1, p2, p3)
		&& orientation(p2, p0, p1) != orientation(p3, p0, p1)
}

/// Inclusive containment test.
pub fn point_in_rect(p: Point, rect: &Rect) -> bool {
	rect.min.x <= p.x && p.x <= rect.max.x && rect.min.y <= p.y && p.y <= rect.max.y
}

/// Corner-containment overlap: true if any corner of either rectangle lies
/// inside the other.
pub fn rects_overlap(r1: &Rect, r2: &Rect) -> bool {
	r2.corners().iter().any(|&c| point_in_rect(c, r1))
		|| r1.corners().iter().any(|&c| point_in_rect(c, r2))
}
