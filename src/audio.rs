//! Audio system using the Web Audio API
//!
//! Procedurally synthesized music and sound effects - no external files.
//! The manager owns a single mixer graph (master -> destination, with
//! effects and background submixes) that is built lazily on first use,
//! since browsers refuse an AudioContext before a user gesture.

use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, BiquadFilterType, GainNode, OscillatorNode,
    OscillatorType,
};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Hazard reached the ground
    Splat,
    /// Player took a hit
    Hit,
    /// Power-up collected
    PowerUp,
    /// Storm warning
    Warning,
    /// Round started
    Start,
    /// Round over
    GameOver,
}

/// Background track length in seconds (loops seamlessly)
const BACKGROUND_DURATION_SECS: f64 = 16.0;
const BACKGROUND_TEMPO_BPM: f64 = 110.0;

/// Chord progression: Am, F, C, G with matching bass notes
const PROGRESSION: [([f32; 3], f32); 4] = [
    ([220.0, 440.0, 660.0], 110.0),
    ([174.61, 349.23, 523.25], 87.31),
    ([130.81, 261.63, 392.0], 65.41),
    ([196.0, 392.0, 587.33], 98.0),
];

/// Eighth-note lead line, repeated over the progression
const MELODY: [f32; 8] = [440.0, 494.0, 523.25, 587.33, 659.25, 587.33, 523.25, 494.0];

/// Audio manager for the game
pub struct AudioManager {
    graph: Option<AudioGraph>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        let defaults = Settings::default();
        Self {
            graph: None,
            master_volume: defaults.master_volume,
            sfx_volume: defaults.sfx_volume,
            music_volume: defaults.music_volume,
            muted: defaults.muted,
        }
    }

    /// Apply persisted preferences to the mixer
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
        self.update_gains();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.update_gains();
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    fn update_gains(&self) {
        if let Some(graph) = &self.graph {
            let master = if self.muted { 0.0 } else { self.master_volume };
            graph.master.gain().set_value(master);
            graph.effects.gain().set_value(self.sfx_volume);
            graph.background_gain.gain().set_value(self.music_volume);
        }
    }

    /// Build the mixer graph on first use; resume a suspended context after
    fn ensure_graph(&mut self) -> bool {
        if let Some(graph) = &self.graph {
            if graph.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = graph.ctx.resume();
            }
            return true;
        }

        match AudioGraph::create() {
            Some(graph) => {
                self.graph = Some(graph);
                self.update_gains();
                true
            }
            None => {
                log::warn!("Failed to create AudioContext - audio disabled");
                false
            }
        }
    }

    /// Play a sound effect (fire-and-forget)
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted || !self.ensure_graph() {
            return;
        }
        let Some(graph) = &self.graph else { return };

        match effect {
            SoundEffect::Splat => graph.play_splat(),
            SoundEffect::Hit => graph.play_hit(),
            SoundEffect::PowerUp => graph.play_power_up(),
            SoundEffect::Warning => graph.play_warning(),
            SoundEffect::Start => graph.play_start(),
            SoundEffect::GameOver => graph.play_game_over(),
        }
    }

    /// Start the looping background track (no-op when already running)
    pub fn start_background(&mut self) {
        if !self.ensure_graph() {
            return;
        }
        if let Some(graph) = &mut self.graph {
            graph.start_background();
        }
    }

    /// Stop the background track. Stop failures are cleanup races against an
    /// already-finished source; they are logged, never propagated.
    pub fn stop_background(&mut self) {
        if let Some(graph) = &mut self.graph {
            graph.stop_background();
        }
    }
}

/// The shared mixer graph: master -> destination, effects and background
/// gains feeding the master
struct AudioGraph {
    ctx: AudioContext,
    master: GainNode,
    effects: GainNode,
    background_gain: GainNode,
    background_buffer: Option<AudioBuffer>,
    background_source: Option<AudioBufferSourceNode>,
}

impl AudioGraph {
    fn create() -> Option<Self> {
        let ctx = AudioContext::new().ok()?;

        let master = ctx.create_gain().ok()?;
        master.connect_with_audio_node(&ctx.destination()).ok()?;

        let effects = ctx.create_gain().ok()?;
        effects.connect_with_audio_node(&master).ok()?;

        let background_gain = ctx.create_gain().ok()?;
        background_gain.connect_with_audio_node(&master).ok()?;

        let background_buffer = render_background(&ctx);
        if background_buffer.is_none() {
            log::warn!("Failed to render background track");
        }

        Some(Self {
            ctx,
            master,
            effects,
            background_gain,
            background_buffer,
            background_source: None,
        })
    }

    fn start_background(&mut self) {
        if self.background_source.is_some() {
            return;
        }
        let Some(buffer) = &self.background_buffer else {
            return;
        };
        let Ok(source) = self.ctx.create_buffer_source() else {
            return;
        };
        source.set_buffer(Some(buffer));
        source.set_loop(true);
        if source.connect_with_audio_node(&self.background_gain).is_err() {
            return;
        }
        if source.start().is_err() {
            return;
        }
        self.background_source = Some(source);
    }

    fn stop_background(&mut self) {
        if let Some(source) = self.background_source.take() {
            if let Err(err) = source.stop() {
                log::warn!("Failed to stop background track: {:?}", err);
            }
            source.disconnect().ok();
        }
    }

    // === Sound generators ===

    /// Create an oscillator routed through its own gain into the effects bus
    fn create_osc(&self, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
        let osc = self.ctx.create_oscillator().ok()?;
        let gain = self.ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&self.effects).ok()?;

        Some((osc, gain))
    }

    /// Splat - filtered noise burst with a squared decay
    fn play_splat(&self) {
        let duration = 0.45;
        let len = (self.ctx.sample_rate() as f64 * duration) as u32;
        let Ok(noise) = self.ctx.create_buffer(1, len, self.ctx.sample_rate()) else {
            return;
        };

        let mut samples = vec![0.0f32; len as usize];
        for (i, s) in samples.iter_mut().enumerate() {
            let decay = 1.0 - i as f32 / len as f32;
            *s = (js_sys::Math::random() as f32 * 2.0 - 1.0) * decay * decay;
        }
        if noise.copy_to_channel(&mut samples, 0).is_err() {
            return;
        }

        let Ok(source) = self.ctx.create_buffer_source() else {
            return;
        };
        source.set_buffer(Some(&noise));

        let Ok(filter) = self.ctx.create_biquad_filter() else {
            return;
        };
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(800.0);

        let Ok(gain) = self.ctx.create_gain() else {
            return;
        };
        let t = self.ctx.current_time();
        gain.gain().set_value_at_time(0.8, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + duration)
            .ok();

        source.connect_with_audio_node(&filter).ok();
        filter.connect_with_audio_node(&gain).ok();
        gain.connect_with_audio_node(&self.effects).ok();
        source.start().ok();
    }

    /// Hit - descending square thud
    fn play_hit(&self) {
        let Some((osc, gain)) = self.create_osc(320.0, OscillatorType::Square) else {
            return;
        };
        let t = self.ctx.current_time();

        osc.frequency().set_value_at_time(320.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(110.0, t + 0.35)
            .ok();
        gain.gain().set_value_at_time(0.001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.6, t + 0.02)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.35)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.36).ok();
    }

    /// Power-up - rising triangle arpeggio
    fn play_power_up(&self) {
        for (i, freq) in [523.25, 659.25, 783.99].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(*freq, OscillatorType::Triangle) {
                let t = self.ctx.current_time() + delay;
                gain.gain().set_value_at_time(0.001, t).ok();
                gain.gain().linear_ramp_to_value_at_time(0.5, t + 0.03).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.26).ok();
            }
        }
    }

    /// Storm warning - three sawtooth beeps
    fn play_warning(&self) {
        for i in 0..3 {
            if let Some((osc, gain)) = self.create_osc(880.0, OscillatorType::Sawtooth) {
                let t = self.ctx.current_time() + i as f64 * 0.25;
                gain.gain().set_value_at_time(0.001, t).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(0.45, t + 0.02)
                    .ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.22)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.24).ok();
            }
        }
    }

    /// Round start - rising sawtooth sweep
    fn play_start(&self) {
        let Some((osc, gain)) = self.create_osc(196.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = self.ctx.current_time();

        osc.frequency().set_value_at_time(196.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(523.25, t + 0.4)
            .ok();
        gain.gain().set_value_at_time(0.001, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.7, t + 0.05).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.5)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.52).ok();
    }

    /// Game over - long triangle descent through a lowpass
    fn play_game_over(&self) {
        let Ok(osc) = self.ctx.create_oscillator() else {
            return;
        };
        let Ok(gain) = self.ctx.create_gain() else {
            return;
        };
        let Ok(filter) = self.ctx.create_biquad_filter() else {
            return;
        };
        let t = self.ctx.current_time();

        osc.set_type(OscillatorType::Triangle);
        osc.frequency().set_value_at_time(392.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(98.0, t + 0.8)
            .ok();

        gain.gain().set_value_at_time(0.7, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.85)
            .ok();

        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value_at_time(1200.0, t).ok();

        osc.connect_with_audio_node(&gain).ok();
        gain.connect_with_audio_node(&filter).ok();
        filter.connect_with_audio_node(&self.effects).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.86).ok();
    }
}

/// Render the looping background track into a stereo buffer: bass + pumped
/// chords + eighth-note lead + hats, with a gentle stereo spread.
fn render_background(ctx: &AudioContext) -> Option<AudioBuffer> {
    use std::f64::consts::{PI, TAU};

    let sample_rate = ctx.sample_rate() as f64;
    let frames = (sample_rate * BACKGROUND_DURATION_SECS) as u32;
    let buffer = ctx.create_buffer(2, frames, ctx.sample_rate()).ok()?;

    let beat = 60.0 / BACKGROUND_TEMPO_BPM;
    let bar = beat * 4.0;
    let eighth = beat / 2.0;

    let mut left = vec![0.0f32; frames as usize];
    let mut right = vec![0.0f32; frames as usize];

    for i in 0..frames as usize {
        let t = i as f64 / sample_rate;
        let (chord, bass_freq) = PROGRESSION[((t / bar) as usize) % PROGRESSION.len()];

        let bass = (TAU * bass_freq as f64 * t).sin();
        let chord_env = (PI * ((t % beat) / beat)).sin().powi(2);
        let chords: f64 = chord.iter().map(|f| (TAU * *f as f64 * t).sin()).sum();

        let melody_span = MELODY.len() as f64 * eighth;
        let lead_freq = MELODY[(((t % melody_span) / eighth) as usize) % MELODY.len()] as f64;
        let lead_env = (PI * ((t % eighth) / eighth)).sin().powi(2);
        let lead = (TAU * lead_freq * t).sin() * lead_env;

        let hat_phase = t % beat;
        let hat_env = if hat_phase < 0.07 {
            (1.0 - hat_phase / 0.07).powi(2)
        } else {
            0.0
        };
        let hat = (TAU * 8000.0 * t).sin() * hat_env;

        let mut sample = bass * 0.25 + chords * 0.1 * chord_env + lead * 0.15 + hat * 0.08;

        // Fade the loop edges so the seam doesn't click
        let fade_in = (t / 0.3).min(1.0);
        let fade_out = ((BACKGROUND_DURATION_SECS - t) / 0.3).min(1.0);
        sample *= fade_in.min(fade_out);

        let spread = (TAU * t / (bar * 2.0)).sin() * 0.15;
        left[i] = (sample * (1.0 - spread)).clamp(-1.0, 1.0) as f32;
        right[i] = (sample * (1.0 + spread)).clamp(-1.0, 1.0) as f32;
    }

    buffer.copy_to_channel(&mut left, 0).ok()?;
    buffer.copy_to_channel(&mut right, 1).ok()?;
    Some(buffer)
}
