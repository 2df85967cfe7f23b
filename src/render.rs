//! Canvas adapter: paints the effects scene and the streak banner. Reads
//! state only; the frame loop that calls it lives in `app`.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::effects::Scene;

pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    pub fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    pub fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    /// Paint one frame. The banner appears once `streak` reaches
    /// `banner_from`, the same length that starts the streak bonus.
    pub fn draw(&self, scene: &Scene, streak: u32, banner_from: u32) -> Result<(), JsValue> {
        let (w, h) = (self.width(), self.height());
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, w, h);

        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        gradient.add_color_stop(0.0, "#87CEEB")?;
        gradient.add_color_stop(1.0, "#E0F6FF")?;
        ctx.set_fill_style(&gradient);
        ctx.fill_rect(0.0, 0.0, w, h);

        for star in &scene.stars {
            ctx.set_fill_style(&JsValue::from_str(&format!(
                "rgba(255, 255, 255, {})",
                star.opacity
            )));
            disc(ctx, star.x, star.y, star.size)?;
        }

        for p in &scene.particles {
            ctx.set_fill_style(&JsValue::from_str(p.color));
            ctx.set_global_alpha(p.life);
            disc(ctx, p.x, p.y, p.size)?;
            ctx.set_global_alpha(1.0);
        }

        if let Some(text) = streak_banner(streak, banner_from) {
            ctx.set_fill_style(&JsValue::from_str("#FFD93D"));
            ctx.set_font("bold 24px Comic Neue");
            ctx.set_text_align("center");
            ctx.fill_text(&text, w / 2.0, 40.0)?;
        }
        Ok(())
    }
}

fn disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU)?;
    ctx.fill();
    Ok(())
}

/// Banner text for the current streak, if it is long enough to brag about.
pub fn streak_banner(streak: u32, threshold: u32) -> Option<String> {
    (streak >= threshold).then(|| format!("🔥 {streak} Streak!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_banner_threshold() {
        assert_eq!(streak_banner(0, 3), None);
        assert_eq!(streak_banner(2, 3), None);
        assert_eq!(streak_banner(3, 3).as_deref(), Some("🔥 3 Streak!"));
        assert_eq!(streak_banner(11, 3).as_deref(), Some("🔥 11 Streak!"));
    }

    #[test]
    fn test_streak_banner_follows_bonus_threshold() {
        let config = crate::config::RoundConfig::from_json(r#"{"streak_bonus_threshold": 5}"#)
            .expect("valid config");
        let from = config.streak_bonus_threshold;
        assert_eq!(streak_banner(4, from), None);
        assert_eq!(streak_banner(5, from).as_deref(), Some("🔥 5 Streak!"));
    }
}
