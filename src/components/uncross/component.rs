use std::cell::RefCell;
use std::rc::Rc;

use leptos::callback::{Callable, Callback};
use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::config::{Canvas, GameConfig};
use super::controller::{Game, InputEvent, Key};
use super::error::GameError;
use super::geometry::Point;
use super::render;

/// Share of the window the board takes up in fullscreen mode.
const WINDOW_FILL: f64 = 0.9;

type SharedGame = Rc<RefCell<Option<Game>>>;
type KeyListener = Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>>;

#[component]
pub fn UncrossCanvas(
	config: GameConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] on_solved: Option<Callback<bool>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedGame = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let key_down: KeyListener = Rc::new(RefCell::new(None));
	let key_up: KeyListener = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());
	let (key_down_init, key_up_init) = (key_down.clone(), key_up.clone());
	// Setup failures are raised as render errors for the surrounding ErrorBoundary.
	let failure = RwSignal::new(None::<GameError>);

	let listeners = StoredValue::new_local([("keydown", key_down), ("keyup", key_up)]);
	on_cleanup(move || {
		let Some(window) = web_sys::window() else {
			return;
		};
		listeners.with_value(|slots| {
			for (kind, slot) in slots {
				if let Some(cb) = slot.borrow_mut().take() {
					let _ = window
						.remove_event_listener_with_callback(kind, cb.as_ref().unchecked_ref());
				}
			}
		});
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			(
				inner_size(window.inner_width()) * WINDOW_FILL,
				inner_size(window.inner_height()) * WINDOW_FILL,
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			error!("Canvas has no 2d context");
			return;
		};
		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let game = match Canvas::new(w, h)
			.and_then(|layout| Game::new(config.clone(), layout, seed))
		{
			Ok(game) => game,
			Err(err) => {
				error!("Game did not start: {err}");
				failure.set(Some(err));
				return;
			}
		};
		if let Some(cb) = on_solved {
			cb.run(game.solved());
		}
		*state_init.borrow_mut() = Some(game);

		listen_for_keys(
			&window,
			"keydown",
			&key_down_init,
			&state_init,
			on_solved,
			InputEvent::KeyDown,
		);
		listen_for_keys(
			&window,
			"keyup",
			&key_up_init,
			&state_init,
			on_solved,
			InputEvent::KeyUp,
		);

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref game) = *state_anim.borrow() {
				render::render(game.state(), &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let on_mousedown = pointer_handler(state.clone(), canvas_ref, on_solved, InputEvent::PointerDown);
	let on_mousemove = pointer_handler(state.clone(), canvas_ref, on_solved, InputEvent::PointerMove);
	let on_mouseup = pointer_handler(state.clone(), canvas_ref, on_solved, InputEvent::PointerUp);
	// Leaving the canvas ends any drag or box at the exit point.
	let on_mouseleave = pointer_handler(state, canvas_ref, on_solved, InputEvent::PointerUp);

	view! {
		{move || failure.get().map_or(Ok(()), Err)}
		<canvas
			node_ref=canvas_ref
			class="uncross-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: default;"
		/>
	}
}

fn inner_size(value: Result<JsValue, JsValue>) -> f64 {
	value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Converts a mouse event's client coordinates into canvas space.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn dispatch(game: &mut Game, event: InputEvent, on_solved: Option<Callback<bool>>) {
	match game.handle(event) {
		Ok(Some(solved)) => {
			if let Some(cb) = on_solved {
				cb.run(solved);
			}
		}
		Ok(None) => {}
		Err(err) => error!("Dropped {event:?}: {err}"),
	}
}

fn pointer_handler(
	state: SharedGame,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	on_solved: Option<Callback<bool>>,
	event: fn(Point) -> InputEvent,
) -> impl FnMut(MouseEvent) + 'static {
	move |ev: MouseEvent| {
		let Some(p) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut game) = *state.borrow_mut() {
			dispatch(game, event(p), on_solved);
		}
	}
}

fn listen_for_keys(
	window: &Window,
	kind: &str,
	slot: &KeyListener,
	state: &SharedGame,
	on_solved: Option<Callback<bool>>,
	event: fn(Key) -> InputEvent,
) {
	let state = state.clone();
	*slot.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
		let key = Key::from_name(&ev.key());
		if key == Key::Space {
			// Keep the page from scrolling.
			ev.prevent_default();
		}
		if let Some(ref mut game) = *state.borrow_mut() {
			dispatch(game, event(key), on_solved);
		}
	}));
	if let Some(ref cb) = *slot.borrow() {
		let _ = window.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref());
	}
}
