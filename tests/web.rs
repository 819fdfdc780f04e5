#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use voronoi_viz::style::shader::fragment_source;
use voronoi_viz::{SessionConfig, StyleKind, VoronoiSession};

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(id: &str) -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: web_sys::HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas.set_id(id);
    canvas.set_width(320);
    canvas.set_height(240);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn fragment_program_compiles() {
    let gl: web_sys::WebGl2RenderingContext = canvas("c")
        .get_context("webgl2")
        .unwrap()
        .expect("webgl2 context")
        .dyn_into()
        .unwrap();
    let shader = gl.create_shader(web_sys::WebGl2RenderingContext::FRAGMENT_SHADER).unwrap();
    gl.shader_source(&shader, &fragment_source());
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, web_sys::WebGl2RenderingContext::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    assert!(ok, "{:?}", gl.get_shader_info_log(&shader));
}

#[wasm_bindgen_test]
fn overlay_canvas_has_a_2d_context() {
    let overlay = canvas("overlay");
    let rect = overlay
        .dyn_ref::<web_sys::Element>()
        .unwrap()
        .get_bounding_client_rect();
    assert!(rect.width() > 0.0 && rect.height() > 0.0);
    assert!(overlay.get_context("2d").unwrap().is_some());
}

#[wasm_bindgen_test]
fn session_ticks_in_the_browser() {
    let config = SessionConfig {
        style: StyleKind::Mosaic,
        ..SessionConfig::default()
    };
    let mut session = VoronoiSession::init(config, 320.0, 240.0).unwrap();
    let now = web_sys::window().unwrap().performance().unwrap().now();
    assert_eq!(session.tick(now).unwrap().index, 1);
}
