//! Canvas 2D rendering
//!
//! Draws a [`FrameSnapshot`] in field coordinates. The canvas backing store
//! is sized to the field, CSS handles scaling to the window.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::css_color;
use crate::sim::snapshot::{BoogerSprite, BugSprite, FrameSnapshot};

const BACKGROUND: &str = "#1e293b";
const LAUNCHER_COLOR: &str = "#f8fafc";
const WING_COLOR: &str = "rgba(255, 255, 255, 0.55)";

pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { context })
    }

    pub fn render(&self, frame: &FrameSnapshot) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.clear_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

        for bug in &frame.bugs {
            self.draw_bug(bug)?;
        }
        for booger in &frame.boogers {
            self.draw_booger(booger)?;
        }
        if let Some(booger) = &frame.charging {
            self.draw_booger(booger)?;
        }

        for particle in &frame.particles {
            ctx.set_global_alpha(particle.alpha as f64);
            let color = css_color(particle.color);
            self.fill_circle(particle.pos.x, particle.pos.y, particle.radius, &color)?;
        }
        ctx.set_global_alpha(1.0);

        if let Some(x) = frame.launcher_x {
            self.draw_launcher(x)?;
        }
        Ok(())
    }

    fn fill_circle(&self, x: f32, y: f32, radius: f32, color: &str) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.begin_path();
        ctx.arc(x as f64, y as f64, radius.max(0.0) as f64, 0.0, TAU)?;
        ctx.set_fill_style_str(color);
        ctx.fill();
        Ok(())
    }

    fn draw_bug(&self, bug: &BugSprite) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.save();
        ctx.translate(bug.pos.x as f64, bug.pos.y as f64)?;
        if bug.facing_left {
            ctx.scale(-1.0, 1.0)?;
        }

        // Wings behind the body
        let r = bug.radius as f64;
        ctx.begin_path();
        ctx.ellipse(-r * 0.2, -r * 0.8, r * 0.6, r * 0.35, -0.4, 0.0, TAU)?;
        ctx.ellipse(r * 0.3, -r * 0.8, r * 0.6, r * 0.35, 0.4, 0.0, TAU)?;
        ctx.set_fill_style_str(WING_COLOR);
        ctx.fill();

        self.fill_circle(0.0, 0.0, bug.radius, &css_color(bug.color))?;
        // Eye on the leading side
        let eye = (bug.radius * 0.18).max(1.5);
        self.fill_circle(bug.radius * 0.5, -bug.radius * 0.2, eye, "#000000")?;

        ctx.restore();
        Ok(())
    }

    fn draw_booger(&self, booger: &BoogerSprite) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.save();
        ctx.translate(booger.pos.x as f64, booger.pos.y as f64)?;
        ctx.rotate(booger.rotation as f64)?;

        // Slightly lumpy: main blob plus an offset lump
        self.fill_circle(0.0, 0.0, booger.radius, &css_color(booger.color))?;
        self.fill_circle(
            booger.radius * 0.45,
            booger.radius * 0.3,
            booger.radius * 0.55,
            &css_color(booger.color),
        )?;
        self.fill_circle(
            -booger.radius * 0.3,
            -booger.radius * 0.35,
            booger.radius * 0.2,
            "rgba(255, 255, 255, 0.35)",
        )?;

        ctx.restore();
        Ok(())
    }

    fn draw_launcher(&self, x: f32) -> Result<(), JsValue> {
        let ctx = &self.context;
        let y = (FIELD_HEIGHT - LAUNCHER_Y_OFFSET) as f64;
        let x = x as f64;
        ctx.begin_path();
        ctx.move_to(x, y - 16.0);
        ctx.line_to(x - 14.0, y + 14.0);
        ctx.line_to(x + 14.0, y + 14.0);
        ctx.close_path();
        ctx.set_fill_style_str(LAUNCHER_COLOR);
        ctx.fill();
        Ok(())
    }
}
