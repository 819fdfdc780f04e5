#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod error;
pub mod field;
pub mod label;
pub mod mapper;
pub mod params;
pub mod recorder;
pub mod region;
pub mod search;
pub mod session;
pub mod style;

pub use error::{Error, Result};
pub use field::{cell_center, hash1, hash2, hash3, FieldPoint, LatticeCoord};
pub use mapper::{CoordinateMapper, ScreenPoint};
pub use params::{RenderMode, RenderParameters, Rgb};
pub use region::{enumerate_cells, Region};
pub use search::{find_closest, interior_distance, smin, CellSample};
pub use session::{Frame, SessionConfig, VoronoiSession};
pub use style::{FrameOutput, StyleKind};

// Only compile the browser host when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod canvas;
    mod gl;
    mod render;

    use crate::session::SessionConfig;
    use crate::style::StyleKind;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id("c")
            .ok_or("canvas not found")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;
        let overlay = document
            .get_element_by_id("overlay")
            .ok_or("overlay canvas not found")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let style = match canvas.get_attribute("data-style") {
            Some(name) => name.parse::<StyleKind>().map_err(to_js)?,
            None => StyleKind::default(),
        };
        let config = SessionConfig {
            style,
            ..SessionConfig::default()
        };

        render::start(canvas, overlay, config)?;
        Ok(())
    }

    pub(crate) fn to_js(err: crate::Error) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}
