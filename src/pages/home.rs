use leptos::prelude::*;

use crate::components::force_graph::SystemMapCanvas;
use crate::layout::GraphData;

/// Demo landscape. `billing` still uses the single `group` field older
/// exports carry, and the last link points at a retired system.
const SAMPLE_LANDSCAPE: &str = r#"{
	"nodes": [
		{ "id": "gateway", "label": "API Gateway", "groups": ["edge"] },
		{ "id": "cdn", "label": "CDN", "groups": ["edge"] },
		{ "id": "auth", "label": "Auth Service", "groups": ["edge", "platform"] },
		{ "id": "orders", "label": "Orders", "groups": ["commerce"] },
		{ "id": "catalog", "label": "Catalog", "groups": ["commerce"] },
		{ "id": "billing", "label": "Billing", "group": "finance" },
		{ "id": "ledger", "label": "General Ledger", "groups": ["finance"] },
		{ "id": "payments", "label": "Payments", "groups": ["finance", "commerce"] },
		{ "id": "postgres", "label": "Postgres", "groups": ["platform"] },
		{ "id": "kafka", "label": "Kafka", "groups": ["platform"] },
		{ "id": "search", "label": "Search", "groups": ["platform", "commerce"] },
		{ "id": "reporting", "label": "Reporting" }
	],
	"links": [
		{ "source": "cdn", "target": "gateway" },
		{ "source": "gateway", "target": "auth" },
		{ "source": "gateway", "target": "orders" },
		{ "source": "gateway", "target": "catalog" },
		{ "source": "orders", "target": "payments" },
		{ "source": "orders", "target": "kafka" },
		{ "source": "catalog", "target": "search" },
		{ "source": "payments", "target": "billing" },
		{ "source": "billing", "target": "ledger" },
		{ "source": "ledger", "target": "postgres" },
		{ "source": "orders", "target": "postgres" },
		{ "source": "auth", "target": "postgres" },
		{ "source": "reporting", "target": "kafka" },
		{ "source": "reporting", "target": "mainframe" }
	]
}"#;

fn sample_landscape() -> Result<GraphData, serde_json::Error> {
	serde_json::from_str(SAMPLE_LANDSCAPE)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(move || match sample_landscape() {
		Ok(data) => data,
		Err(e) => {
			log::error!("sample landscape: {e}");
			GraphData::default()
		}
	});

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
				<SystemMapCanvas data=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>"System Map"</h1>
					<p class="subtitle">
						"Drag a system to pin it. Double-click to pin or release. Scroll to zoom. Drag background to pan."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
