//! Audio: background music plus procedural sound cues
//!
//! Music comes from the page's `<audio id="game-music">` element; cues are
//! synthesized with the Web Audio API. Every failure is logged and swallowed.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::app::SoundCue;
use crate::settings::Settings;
use crate::sim::BonusKind;

/// Audio manager for the game
pub struct AudioManager {
    music: Option<HtmlAudioElement>,
    ctx: Option<AudioContext>,
    music_volume: f32,
    sfx_volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let music = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("game-music"))
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());
        if music.is_none() {
            log::warn!("No #game-music element - music disabled");
        }

        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound cues disabled");
        }

        let mut manager = Self {
            music,
            ctx,
            music_volume: 0.0,
            sfx_volume: 0.0,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.music_volume = settings.effective_music_volume();
        self.sfx_volume = settings.effective_sfx_volume();
        if let Some(music) = &self.music {
            music.set_volume(self.music_volume as f64);
        }
    }

    /// Restart music from the top
    pub fn play_music(&self) {
        let Some(music) = &self.music else { return };
        music.set_current_time(0.0);
        music.set_volume(self.music_volume as f64);

        match music.play() {
            Ok(promise) => {
                // Autoplay policy rejections surface asynchronously
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("Music playback failed: {:?}", e);
                    }
                });
            }
            Err(e) => log::warn!("Music playback failed: {:?}", e),
        }
    }

    pub fn stop_music(&self) {
        let Some(music) = &self.music else { return };
        if let Err(e) = music.pause() {
            log::warn!("Failed to stop music: {:?}", e);
        }
        music.set_current_time(0.0);
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pause everything without losing the music position
    pub fn suspend(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
        if let Some(music) = &self.music {
            if let Err(e) = music.pause() {
                log::warn!("Failed to pause music: {:?}", e);
            }
        }
    }

    /// Continue music from where `suspend` left it
    pub fn resume_music(&self) {
        self.resume();
        let Some(music) = &self.music else { return };
        match music.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("Music resume failed: {:?}", e);
                }
            }),
            Err(e) => log::warn!("Music resume failed: {:?}", e),
        }
    }

    /// Play a sound cue
    pub fn play(&self, cue: SoundCue) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Hit => self.play_hit(ctx, vol),
            SoundCue::Blocked => self.play_blocked(ctx, vol),
            SoundCue::Pickup(kind) => self.play_pickup(ctx, vol, kind),
            SoundCue::Death => self.play_death(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Took damage - dull thump
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Shield absorbed a hit - bright ping
    fn play_blocked(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Bonus collected - rising arpeggio, pitched per kind
    fn play_pickup(&self, ctx: &AudioContext, vol: f32, kind: BonusKind) {
        let base = match kind {
            BonusKind::Potion => 600.0,
            BonusKind::Shield => 500.0,
            BonusKind::Slow => 400.0,
        };
        for (i, step) in [1.0, 1.25, 1.5].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, base * step, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Death - sad descending
    fn play_death(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
