//! Canvas-2D drawing of the stage beneath the DOM overlays.

use scene::Camera2D;
use scene::components::{Drawable2D, Rgba, Shape2D, Transform};
use scene::stage::Stage;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::config::site;

pub const LABEL_FONT_FAMILY: &str = "Urbanist, sans-serif";

pub fn rgba_css(c: Rgba) -> String {
    let r = (c[0].clamp(0.0, 1.0) * 255.0).round() as u32;
    let g = (c[1].clamp(0.0, 1.0) * 255.0).round() as u32;
    let b = (c[2].clamp(0.0, 1.0) * 255.0).round() as u32;
    let a = c[3].clamp(0.0, 1.0);
    format!("rgba({r},{g},{b},{a})")
}

fn ctx_set_fill_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(value),
    );
}

fn ctx_set_stroke_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(value),
    );
}

fn label_font(font_px: f64) -> String {
    format!("{font_px}px {LABEL_FONT_FAMILY}")
}

/// Clears the canvas to the site background and draws every stage entity
/// through `camera`.
pub fn draw_stage(
    ctx: &CanvasRenderingContext2d,
    camera: &Camera2D,
    stage: &Stage,
) -> Result<(), JsValue> {
    let viewport = camera.viewport();
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport.x, viewport.y);
    ctx_set_fill_style(ctx, &rgba_css(site::BACKGROUND));
    ctx.fill_rect(0.0, 0.0, viewport.x, viewport.y);

    for (_, transform, drawable) in stage.drawables() {
        draw_one(ctx, camera, transform, drawable)?;
    }
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
}

fn draw_one(
    ctx: &CanvasRenderingContext2d,
    camera: &Camera2D,
    transform: Transform,
    drawable: &Drawable2D,
) -> Result<(), JsValue> {
    let origin = camera.to_screen(transform.position);
    let scale = camera.scale();
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, origin.x, origin.y)?;
    ctx.rotate(transform.rotation)?;
    ctx.scale(scale, scale)?;

    let color = rgba_css(drawable.color);
    match &drawable.shape {
        Shape2D::Outline { size, line_width } => {
            ctx_set_stroke_style(ctx, &color);
            ctx.set_line_width(*line_width / scale);
            ctx.stroke_rect(0.0, 0.0, size.x, size.y);
        }
        Shape2D::Disc { radius } => {
            ctx_set_fill_style(ctx, &color);
            ctx.begin_path();
            ctx.arc(0.0, 0.0, *radius, 0.0, std::f64::consts::TAU)?;
            ctx.fill();
        }
        Shape2D::Label { text, font_px } => {
            ctx_set_fill_style(ctx, &color);
            ctx.set_font(&label_font(*font_px));
            ctx.set_text_baseline("top");
            ctx.fill_text(text, 0.0, 0.0)?;
        }
    }
    Ok(())
}
