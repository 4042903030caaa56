//! Canvas 2D renderer
//!
//! Branches on the game phase: loading screen, menu, running, dead overlay.
//! Images that failed to load (and have no placeholder) become flat colours.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::assets::loader::{Assets, Image};
use crate::assets::{AssetId, LoadProgress};
use crate::consts::*;
use crate::records::format_time;
use crate::settings::Settings;
use crate::sim::{BonusKind, GamePhase, GameState};

/// Everything the renderer reads for one frame
pub struct RenderFrame<'a> {
    pub state: &'a GameState,
    pub progress: &'a LoadProgress,
    pub assets: Option<&'a Assets>,
    pub best_time: f32,
    pub settings: &'a Settings,
    pub fps: u32,
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    pub fn render(&self, frame: &RenderFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (GAME_WIDTH as f64, GAME_HEIGHT as f64);
        ctx.clear_rect(0.0, 0.0, w, h);

        let state = frame.state;
        if state.phase == GamePhase::Loading {
            return self.draw_loading(frame.progress);
        }

        // Background
        if !self.draw_asset(frame.assets, AssetId::Background, 0.0, 0.0, w, h)? {
            ctx.set_fill_style_str("#87CEEB");
            ctx.fill_rect(0.0, 0.0, w, h);
        }

        if state.phase == GamePhase::Menu {
            return self.draw_menu(frame.assets);
        }

        for obj in &state.falling_objects {
            let (x, y) = (obj.pos.x as f64, obj.pos.y as f64);
            let (ow, oh) = (obj.size.x as f64, obj.size.y as f64);
            if !self.draw_asset(frame.assets, AssetId::FallingObject(obj.variant), x, y, ow, oh)? {
                ctx.set_fill_style_str("rgba(255,255,0,0.8)");
                ctx.fill_rect(x, y, ow, oh);
            }
        }

        for bonus in &state.bonuses {
            let (x, y) = (bonus.pos.x as f64, bonus.pos.y as f64);
            let (bw, bh) = (bonus.size.x as f64, bonus.size.y as f64);
            if !self.draw_asset(frame.assets, AssetId::Bonus(bonus.kind), x, y, bw, bh)? {
                ctx.set_fill_style_str(bonus_color(bonus.kind));
                ctx.fill_rect(x, y, bw, bh);
            }
        }

        self.draw_player(frame)?;

        if state.phase == GamePhase::Dead {
            self.draw_dead(state.elapsed, frame.best_time)?;
        } else {
            self.draw_hud(frame)?;
        }

        if frame.settings.show_fps {
            ctx.set_fill_style_str("white");
            ctx.set_font("14px Arial");
            ctx.set_text_align("right");
            ctx.fill_text(&format!("{} fps", frame.fps), w - 10.0, 20.0)?;
            ctx.set_text_align("left");
        }
        Ok(())
    }

    /// Draw an asset if it exists; returns false when the caller should paint a fallback
    fn draw_asset(
        &self,
        assets: Option<&Assets>,
        id: AssetId,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> Result<bool, JsValue> {
        let Some(image) = assets.and_then(|a| a.get(id)) else {
            return Ok(false);
        };
        match image {
            Image::Element(img) => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)?,
            Image::Placeholder(canvas) => self
                .ctx
                .draw_image_with_html_canvas_element_and_dw_and_dh(canvas, x, y, w, h)?,
        }
        Ok(true)
    }

    fn draw_loading(&self, progress: &LoadProgress) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (GAME_WIDTH as f64, GAME_HEIGHT as f64);
        let fraction = progress.fraction() as f64;

        ctx.set_fill_style_str("#000000");
        ctx.fill_rect(0.0, 0.0, w, h);

        let (bar_w, bar_h) = (300.0, 6.0);
        let bar_x = (w - bar_w) / 2.0;
        let bar_y = h - 80.0;

        ctx.set_fill_style_str("rgba(255, 255, 255, 0.3)");
        ctx.fill_rect(bar_x - 2.0, bar_y - 2.0, bar_w + 4.0, bar_h + 4.0);
        ctx.set_fill_style_str("white");
        ctx.fill_rect(bar_x, bar_y, fraction * bar_w, bar_h);

        ctx.set_font("16px Arial");
        ctx.set_text_align("center");
        ctx.fill_text(&format!("Loading... {}%", progress.percent()), w / 2.0, bar_y - 15.0)?;
        ctx.set_text_align("left");
        Ok(())
    }

    fn draw_player(&self, frame: &RenderFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let player = &frame.state.player;
        let (pw, ph) = (player.size.x as f64, player.size.y as f64);
        let (x, y) = (player.pos.x as f64, player.pos.y as f64);

        // Mirror around the sprite's vertical centre line when facing left
        ctx.save();
        ctx.translate(x + pw / 2.0, y)?;
        ctx.scale(player.facing as f64, 1.0)?;
        if !self.draw_asset(frame.assets, AssetId::Mascot, -pw / 2.0, 0.0, pw, ph)? {
            ctx.set_fill_style_str("purple");
            ctx.fill_rect(-pw / 2.0, 0.0, pw, ph);
        }
        ctx.restore();

        let effects = &frame.state.effects;
        if effects.shield_active() {
            let pulse = if frame.settings.reduced_motion {
                1.0
            } else {
                (frame.state.elapsed as f64 * 8.0).sin() * 0.1 + 0.9
            };
            let (cx, cy) = (x + pw / 2.0, y + ph / 2.0);
            let radius = 45.0;

            ctx.save();
            ctx.begin_path();
            ctx.arc(cx, cy, radius * pulse, 0.0, std::f64::consts::TAU)?;
            ctx.set_stroke_style_str(&format!("rgba(0, 140, 255, {:.2})", 0.6 * pulse));
            ctx.set_line_width(5.0);
            ctx.stroke();

            ctx.begin_path();
            ctx.arc(cx, cy, (radius - 10.0) * pulse, 0.0, std::f64::consts::TAU)?;
            ctx.set_stroke_style_str(&format!("rgba(100, 200, 255, {:.2})", 0.3 * pulse));
            ctx.set_line_width(3.0);
            ctx.stroke();
            ctx.restore();
        }
        Ok(())
    }

    fn draw_hud(&self, frame: &RenderFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let state = frame.state;
        let (bar_x, bar_y, bar_w, bar_h) = (20.0, 20.0, 200.0, 24.0);

        ctx.set_fill_style_str("#222");
        ctx.fill_rect(bar_x - 2.0, bar_y - 2.0, bar_w + 4.0, bar_h + 4.0);
        ctx.set_fill_style_str("gray");
        ctx.fill_rect(bar_x, bar_y, bar_w, bar_h);

        let hp_w = state.player.hp as f64 / MAX_HP as f64 * bar_w;
        let gradient = ctx.create_linear_gradient(bar_x, 0.0, bar_x + bar_w, 0.0);
        gradient.add_color_stop(0.0, "#ff4b4b")?;
        gradient.add_color_stop(1.0, "#ff0000")?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(bar_x, bar_y, hp_w, bar_h);

        ctx.set_fill_style_str("white");
        ctx.set_font("18px Arial");
        ctx.fill_text(&format!("HP: {}", state.player.hp), bar_x + 4.0, bar_y + bar_h - 6.0)?;
        ctx.fill_text(
            &format!("Time: {}", format_time(state.elapsed)),
            bar_x,
            bar_y + bar_h + 30.0,
        )?;

        let effects = &state.effects;
        if effects.shield_active() {
            ctx.set_fill_style_str("cyan");
            ctx.fill_text(
                &format!("Shield: {}", format_time(effects.shield.remaining)),
                bar_x,
                bar_y + bar_h + 55.0,
            )?;
        }
        if effects.slow_active() {
            ctx.set_fill_style_str("purple");
            ctx.fill_text(
                &format!("Slow: {}", format_time(effects.slow.remaining)),
                bar_x,
                bar_y + bar_h + 80.0,
            )?;
        }
        Ok(())
    }

    fn draw_menu(&self, assets: Option<&Assets>) -> Result<(), JsValue> {
        let size = 150.0;
        let x = (GAME_WIDTH as f64 - size) / 2.0;
        let y = (GAME_HEIGHT as f64 - size) / 2.0;
        if !self.draw_asset(assets, AssetId::Mascot, x, y, size, size)? {
            self.ctx.set_fill_style_str("purple");
            self.ctx.fill_rect(x, y, size, size);
        }
        Ok(())
    }

    fn draw_dead(&self, session_time: f32, best_time: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (GAME_WIDTH as f64, GAME_HEIGHT as f64);

        ctx.set_fill_style_str("rgba(255,0,0,0.5)");
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str("white");
        ctx.set_text_align("center");
        ctx.set_font("72px Arial");
        ctx.fill_text("reDEAD", w / 2.0, h / 2.0 - 60.0)?;
        ctx.set_font("24px Arial");
        ctx.fill_text(
            &format!("Session: {}", format_time(session_time)),
            w / 2.0,
            h / 2.0 + 20.0,
        )?;
        ctx.fill_text(
            &format!("Best Time: {}", format_time(best_time)),
            w / 2.0,
            h / 2.0 + 50.0,
        )?;
        ctx.set_text_align("left");
        Ok(())
    }
}

fn bonus_color(kind: BonusKind) -> &'static str {
    match kind {
        BonusKind::Potion => "green",
        BonusKind::Shield => "blue",
        BonusKind::Slow => "purple",
    }
}
