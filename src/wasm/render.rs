use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, KeyboardEvent,
    WebGl2RenderingContext as GL, Window,
};

use super::to_js;
use super::{canvas, gl::FieldPipeline};
use crate::session::{Frame, SessionConfig, VoronoiSession};
use crate::style::FrameOutput;

/// Everything the frame callback touches.
struct Host {
    session: VoronoiSession,
    pipeline: FieldPipeline,
    gl: GL,
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    overlay: HtmlCanvasElement,
}

impl Host {
    fn frame(&mut self, now_ms: f64) -> Result<(), JsValue> {
        let frame = self.session.tick(now_ms).map_err(to_js)?;
        self.paint(&frame)?;
        if let Some(name) = &frame.export {
            self.export(name)?;
        }
        Ok(())
    }

    fn paint(&mut self, frame: &Frame) -> Result<(), JsValue> {
        let (w, h) = self.session.size();
        canvas::clear(&self.ctx, w, h);
        match &frame.output {
            FrameOutput::Shader(out) => {
                self.pipeline.draw(&self.gl, &out.uniforms);
                canvas::text(&self.ctx, &out.labels)
            }
            FrameOutput::Blob(out) => {
                super::gl::clear_white(&self.gl, w, h);
                canvas::blob(&self.ctx, out)
            }
            FrameOutput::Mosaic(out) => {
                super::gl::clear_white(&self.gl, w, h);
                canvas::fill_white(&self.ctx, w, h);
                canvas::mosaic(&self.ctx, out)
            }
        }
    }

    /// Flattens both canvases into a PNG and hands it to the browser as a download.
    fn export(&self, name: &str) -> Result<(), JsValue> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let flat: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        flat.set_width(self.canvas.width());
        flat.set_height(self.canvas.height());
        let ctx: CanvasRenderingContext2d = flat
            .get_context("2d")?
            .ok_or("2D canvas not supported")?
            .dyn_into()?;
        ctx.draw_image_with_html_canvas_element(&self.canvas, 0.0, 0.0)?;
        ctx.draw_image_with_html_canvas_element(&self.overlay, 0.0, 0.0)?;

        let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        link.set_href(&flat.to_data_url_with_type("image/png")?);
        link.set_download(name);
        link.click();
        Ok(())
    }

    fn resize(&mut self, width: f64, height: f64) {
        fit(&self.canvas, width, height);
        fit(&self.overlay, width, height);
        if let Err(e) = self.session.resize(width, height) {
            log::warn!("resize ignored: {}", e);
        }
    }
}

fn inner_size(window: &Window) -> Result<(f64, f64), JsValue> {
    let w = window.inner_width()?.as_f64().ok_or("inner width is not a number")?;
    let h = window.inner_height()?.as_f64().ok_or("inner height is not a number")?;
    Ok((w, h))
}

fn fit(canvas: &HtmlCanvasElement, width: f64, height: f64) {
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
}

/// Sets up both canvases and starts the animation loop.
pub fn start(
    canvas: HtmlCanvasElement,
    overlay: HtmlCanvasElement,
    config: SessionConfig,
) -> Result<(), JsValue> {
    let window = window().ok_or("no window")?;
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;
    let ctx: CanvasRenderingContext2d = overlay
        .get_context("2d")?
        .ok_or("2D canvas not supported")?
        .dyn_into()?;

    let (w, h) = inner_size(&window)?;
    fit(&canvas, w, h);
    fit(&overlay, w, h);

    let session = VoronoiSession::init(config, w, h).map_err(to_js)?;
    let pipeline = FieldPipeline::new(&gl).map_err(to_js)?;
    let host = Rc::new(RefCell::new(Host {
        session,
        pipeline,
        gl,
        ctx,
        canvas,
        overlay,
    }));

    // Resize canvases to fit window
    let resize_closure = {
        let host = host.clone();
        Closure::wrap(Box::new(move || {
            let size = web_sys::window().ok_or(JsValue::NULL).and_then(|w| inner_size(&w));
            match size {
                Ok((w, h)) => host.borrow_mut().resize(w, h),
                Err(e) => log::warn!("cannot read window size: {:?}", e),
            }
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    let key_closure = {
        let host = host.clone();
        Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if host.borrow_mut().session.handle_key(&event.key()) {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>)
    };
    window.add_event_listener_with_callback("keydown", key_closure.as_ref().unchecked_ref())?;
    key_closure.forget();

    // Animation loop. `f` holds the frame closure so it can schedule itself;
    // the `Option` lets the closure exist before it refers to itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
        if let Err(e) = host.borrow_mut().frame(now_ms) {
            log::error!("frame failed: {:?}", e);
        }

        let scheduled = match (web_sys::window(), f.borrow().as_ref()) {
            (Some(w), Some(cb)) => w.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok(),
            _ => false,
        };
        if !scheduled {
            log::error!("animation loop stopped");
        }
    }) as Box<dyn FnMut(f64)>));

    let first = g.borrow();
    let first = first.as_ref().ok_or("frame callback missing")?;
    window.request_animation_frame(first.as_ref().unchecked_ref())?;

    log::info!("render loop started");
    Ok(())
}
