use leptos::callback::Callback;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use leptos_router::params::ParamsMap;
use log::warn;

use crate::components::uncross::{GameConfig, GameResult, UncrossCanvas};

/// Reads `?nodes=..&layout=..&reset=..`, falling back to defaults for missing keys.
fn config_from_query(query: &ParamsMap) -> GameResult<GameConfig> {
	GameConfig::from_params(
		query.get("nodes").as_deref(),
		query.get("layout").as_deref(),
		query.get("reset").as_deref(),
	)
	.inspect_err(|err| warn!("Rejected game settings: {err}"))
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let solved = RwSignal::new(false);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				{move || {
					query
						.with(config_from_query)
						.map(|config| {
							view! {
								<UncrossCanvas
									config=config
									fullscreen=true
									on_solved=Callback::new(move |now: bool| solved.set(now))
								/>
							}
						})
				}}
				<div class="graph-overlay">
					<h1>"uncross the lines"</h1>
					<p class="subtitle">
						{move || {
							if solved.get() {
								"Solved! Press r for a new board."
							} else {
								"Drag circles until no lines cross. Shift-click or drag a box to select several; space arranges them in a ring."
							}
						}}
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
