use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::params::Rgb;
use crate::style::blob::BlobFrame;
use crate::style::mosaic::MosaicFrame;
use crate::style::overlay::{DotMark, TextAlign, TextMark};

const LABEL_FONT: &str = "Helvetica, Arial, sans-serif";
const EMOJI_FONT: &str = "\"Apple Color Emoji\", \"Segoe UI Emoji\", \"Noto Color Emoji\", sans-serif";
const TILE_BORDER: &str = "rgba(0, 0, 0, 0.12)";

pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.clear_rect(0.0, 0.0, width, height);
}

pub fn fill_white(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style_str(&Rgb::WHITE.to_css());
    ctx.fill_rect(0.0, 0.0, width, height);
}

pub fn text(ctx: &CanvasRenderingContext2d, marks: &[TextMark]) -> Result<(), JsValue> {
    for mark in marks {
        let family = if mark.emoji { EMOJI_FONT } else { LABEL_FONT };
        ctx.set_font(&format!("{}px {}", mark.size.round(), family));
        ctx.set_fill_style_str(&mark.color.to_css());
        let (align, baseline) = match mark.align {
            TextAlign::LeftBaseline => ("left", "alphabetic"),
            TextAlign::LeftMiddle => ("left", "middle"),
            TextAlign::Center => ("center", "middle"),
        };
        ctx.set_text_align(align);
        ctx.set_text_baseline(baseline);
        ctx.fill_text(&mark.text, mark.anchor.x, mark.anchor.y)?;
    }
    Ok(())
}

pub fn dots(ctx: &CanvasRenderingContext2d, marks: &[DotMark]) -> Result<(), JsValue> {
    for dot in marks {
        ctx.set_fill_style_str(&dot.color.to_css());
        ctx.begin_path();
        ctx.arc(dot.center.x, dot.center.y, dot.diameter * 0.5, 0.0, TAU)?;
        ctx.fill();
    }
    Ok(())
}

pub fn blob(ctx: &CanvasRenderingContext2d, frame: &BlobFrame) -> Result<(), JsValue> {
    ctx.set_line_join("round");
    ctx.set_line_width(2.0);
    for cell in &frame.cells {
        let Some((first, rest)) = cell.outline.split_first() else {
            continue;
        };
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for p in rest {
            ctx.line_to(p.x, p.y);
        }
        ctx.close_path();
        ctx.set_fill_style_str(&cell.fill.to_css());
        ctx.fill();
        if let Some(stroke) = cell.stroke {
            ctx.set_stroke_style_str(&stroke.to_css());
            ctx.stroke();
        }
    }
    dots(ctx, &frame.dots)?;
    text(ctx, &frame.labels)
}

pub fn mosaic(ctx: &CanvasRenderingContext2d, frame: &MosaicFrame) -> Result<(), JsValue> {
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(TILE_BORDER);
    for tile in &frame.tiles {
        let size = tile.size as f64;
        ctx.set_fill_style_str(&tile.color.to_css());
        ctx.fill_rect(tile.x, tile.y, size, size);
        ctx.stroke_rect(tile.x, tile.y, size, size);
    }
    for tile in &frame.tiles {
        text(ctx, std::slice::from_ref(&tile.label))?;
    }
    Ok(())
}
