use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::geometry::Rect;
use super::state::GameState;

const SOLVED_BACKGROUND: &str = "rgb(240, 255, 240)";
const UNSOLVED_BACKGROUND: &str = "rgb(255, 240, 240)";
const RESET_FILL: &str = "rgb(255, 112, 77)";
const NODE_FILL: &str = "rgb(0, 0, 0)";
const SELECTED_NODE_FILL: &str = "rgb(150, 0, 0)";
const EDGE_STROKE: &str = "rgb(60, 60, 60)";
const CROSSED_EDGE_STROKE: &str = "rgb(220, 40, 40)";
const SELECTED_EDGE_STROKE: &str = "rgb(150, 0, 0)";
const BOX_STROKE: &str = "rgba(0, 150, 0, 1)";
const BOX_FILL: &str = "rgba(0, 150, 0, 0.2)";

pub fn render(state: &GameState, ctx: &CanvasRenderingContext2d) {
	let canvas = state.canvas();
	ctx.set_fill_style_str(if state.solved() {
		SOLVED_BACKGROUND
	} else {
		UNSOLVED_BACKGROUND
	});
	ctx.fill_rect(0.0, 0.0, canvas.width, canvas.height);

	draw_reset_button(&canvas.reset_button, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	if let Some(rect) = state.selection_box() {
		draw_selection_box(&rect, ctx);
	}
}

fn draw_reset_button(button: &Rect, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(RESET_FILL);
	ctx.fill_rect(button.min.x, button.min.y, button.width(), button.height());

	let center = button.center();
	ctx.set_fill_style_str("black");
	ctx.set_font(&format!("{}px sans-serif", (button.height() * 0.6).round()));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text("reset", center.x, center.y);
}

fn draw_edges(state: &GameState, ctx: &CanvasRenderingContext2d) {
	let graph = state.graph();
	for edge in graph.edges() {
		let Ok(segment) = graph.segment(edge.key()) else {
			continue;
		};
		let (stroke, width) = if state.edge_selected(edge) {
			(SELECTED_EDGE_STROKE, 3.0)
		} else if edge.crossed {
			(CROSSED_EDGE_STROKE, 2.0)
		} else {
			(EDGE_STROKE, 2.0)
		};

		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(segment.start.x, segment.start.y);
		ctx.line_to(segment.end.x, segment.end.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &GameState, ctx: &CanvasRenderingContext2d) {
	let radius = state.node_radius();
	for node in state.graph().nodes() {
		let p = node.position;
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if node.selected {
			SELECTED_NODE_FILL
		} else {
			NODE_FILL
		});
		ctx.fill();
	}
}

fn draw_selection_box(rect: &Rect, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BOX_FILL);
	ctx.fill_rect(rect.min.x, rect.min.y, rect.width(), rect.height());
	ctx.set_stroke_style_str(BOX_STROKE);
	ctx.set_line_width(1.0);
	ctx.stroke_rect(rect.min.x, rect.min.y, rect.width(), rect.height());
}
