//! Browser entry point: mounts the system map app.

// Every dependency is used through the library crate, not by this binary.
#![allow(unused_crate_dependencies)]

use system_map_canvas::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App)
}
