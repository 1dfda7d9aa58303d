use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{COLORS, MapState, NODE_RADIUS};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &MapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_groups(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_groups(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let centers = state.sim.group_centers();
	for (i, name) in state.group_names().iter().enumerate() {
		let Some(center) = centers.get(name) else {
			continue;
		};
		let color = COLORS[i % COLORS.len()];
		ctx.set_global_alpha(0.08);
		ctx.begin_path();
		let _ = ctx.arc(center.x, center.y, 90.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();
		ctx.set_global_alpha(0.5);
		ctx.set_fill_style_str(color);
		ctx.set_font(&format!("bold {}px sans-serif", 12.0 / k.max(0.5)));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(name, center.x, center.y - 96.0);
	}
	ctx.set_global_alpha(1.0);
	ctx.set_text_align("start");
}

fn draw_edges(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);
	let nodes = state.sim.nodes();

	for link in state.sim.links() {
		let (n1, n2) = (&nodes[link.source], &nodes[link.target]);
		let (x1, y1, x2, y2) = (n1.x, n1.y, n2.x, n2.y);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 || !dist.is_finite() {
			continue;
		}

		let is_highlighted = state.is_highlighted(link.source) && state.is_highlighted(link.target);

		// t=0: all edges at base (0.6), t=1: highlighted at 0.9, others at 0.15
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		// dependency arrow points from the dependent system to its dependency
		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", arrow_alpha));
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_node_body(
	state: &MapState,
	ctx: &CanvasRenderingContext2d,
	idx: usize,
	radius: f64,
	label_alpha: f64,
) {
	let k = state.transform.k;
	let node = &state.sim.nodes()[idx];
	let (x, y) = (node.x, node.y);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(state.node_color(idx));
	ctx.fill();

	// explicit pins get a solid ring, drag/transient pins a dashed one
	if node.is_pinned() {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.9 * label_alpha));
		ctx.set_line_width(1.5 / k);
		if !node.is_fixed {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(3.0 / k),
				&JsValue::from_f64(3.0 / k),
			));
		}
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	let label = node.label.as_deref().unwrap_or(&node.id);
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", label_alpha));
	ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
	let _ = ctx.fill_text(label, x + radius + 4.0, y + 4.0);
}

fn draw_nodes(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);
	let count = state.sim.nodes().len();

	for idx in 0..count {
		if has_highlight && state.is_highlighted(idx) {
			continue;
		}
		let (alpha, radius) = (1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t));
		ctx.set_global_alpha(alpha);
		draw_node_body(state, ctx, idx, radius, 0.8);
		ctx.set_global_alpha(1.0);
	}

	if !has_highlight {
		return;
	}

	for idx in (0..count).filter(|&i| state.is_highlighted(i)) {
		let node = &state.sim.nodes()[idx];
		let (x, y) = (node.x, node.y);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(
				NODE_RADIUS * (1.0 + 0.35 * t),
				NODE_RADIUS * (1.8 + 1.2 * t),
			)
		} else if is_neighbor {
			(NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
		} else {
			(NODE_RADIUS, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			let glow = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius);
			if let Ok(gradient) = glow {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let inner = format!("rgba(255, 255, 255, {})", alpha);
				let outer = format!("rgba(200, 220, 255, {})", alpha * 0.3);
				let _ = gradient.add_color_stop(0.0, &inner);
				let _ = gradient.add_color_stop(0.6, &outer);
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		draw_node_body(state, ctx, idx, radius, 1.0);
	}
}
