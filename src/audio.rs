//! Audio collaborator
//!
//! Scenes only ever push commands into an [`AudioSink`]; nothing in the
//! simulation reads audio state back. The web backend synthesizes every cue
//! and theme with Web Audio oscillators, so no sound files are needed.

use crate::settings::Theme;

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Any widget event
    ButtonClick,
    /// Pointer entered a widget
    ButtonOver,
    Coin,
    Heart,
    Flask,
    /// Avatar lost life
    Hit,
    /// A match caught fire
    Flame,
}

/// Lowest gain of the fitted volume range (volume 0)
pub const MIN_GAIN_DB: f32 = -35.0;
/// Width of the fitted range (volume 100 maps to +10 dB)
pub const GAIN_RANGE_DB: f32 = 45.0;

/// Map a 0-100 volume onto the output gain in decibels
pub fn volume_to_gain_db(percent: u8) -> f32 {
    MIN_GAIN_DB + percent.min(100) as f32 * GAIN_RANGE_DB / 100.0
}

/// Inverse of [`volume_to_gain_db`]
pub fn gain_db_to_volume(gain_db: f32) -> u8 {
    ((gain_db - MIN_GAIN_DB) * 100.0 / GAIN_RANGE_DB)
        .round()
        .clamp(0.0, 100.0) as u8
}

/// Linear amplitude for a gain in decibels
pub fn db_to_amplitude(gain_db: f32) -> f32 {
    10f32.powf(gain_db / 20.0)
}

pub trait AudioSink {
    fn play_cue(&mut self, cue: Cue);
    /// Replace the looping background track
    fn play_track(&mut self, theme: Theme);
    fn set_volume(&mut self, percent: u8);
}

/// Sink that only logs, used by the headless native build
#[derive(Debug, Default)]
pub struct NullAudio {
    volume: u8,
    track: Option<Theme>,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for NullAudio {
    fn play_cue(&mut self, cue: Cue) {
        log::trace!("cue {:?}", cue);
    }

    fn play_track(&mut self, theme: Theme) {
        if self.track != Some(theme) {
            log::debug!("track {}", theme.as_str());
            self.track = Some(theme);
        }
    }

    fn set_volume(&mut self, percent: u8) {
        self.volume = percent.min(100);
        log::debug!(
            "volume {} ({:.2} dB)",
            self.volume,
            volume_to_gain_db(self.volume)
        );
    }
}

/// Sink that remembers every command, for tests
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub cues: Vec<Cue>,
    pub tracks: Vec<Theme>,
    pub volume: Option<u8>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn play_track(&mut self, theme: Theme) {
        self.tracks.push(theme);
    }

    fn set_volume(&mut self, percent: u8) {
        self.volume = Some(percent.min(100));
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Cue, db_to_amplitude, volume_to_gain_db};
    use crate::settings::Theme;

    /// Web Audio backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        /// Master gain every voice is routed through
        master: Option<GainNode>,
        /// Oscillators of the looping track
        drones: Vec<OscillatorNode>,
        theme: Option<Theme>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            let master = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });
            if master.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master,
                drones: Vec::new(),
                theme: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator with its own envelope gain
        fn create_osc(&self, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
            let ctx = self.ctx.as_ref()?;
            let master = self.master.as_ref()?;
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;

            Some((osc, gain))
        }

        /// Short enveloped tone, optionally sweeping to `end_freq`
        fn blip(&self, freq: f32, end_freq: f32, osc_type: OscillatorType, level: f32, delay: f64, length: f64) {
            let Some(ctx) = &self.ctx else { return };
            let Some((osc, gain)) = self.create_osc(freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            if end_freq != freq {
                osc.frequency().set_value_at_time(freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end_freq, t + length)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        fn stop_track(&mut self) {
            for osc in self.drones.drain(..) {
                osc.stop().ok();
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play_cue(&mut self, cue: Cue) {
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::ButtonClick => self.blip(300.0, 300.0, OscillatorType::Triangle, 0.4, 0.0, 0.05),
                Cue::ButtonOver => self.blip(900.0, 900.0, OscillatorType::Sine, 0.2, 0.0, 0.04),
                Cue::Coin => {
                    self.blip(990.0, 990.0, OscillatorType::Square, 0.25, 0.0, 0.08);
                    self.blip(1320.0, 1320.0, OscillatorType::Square, 0.25, 0.08, 0.2);
                }
                Cue::Heart => {
                    for (i, freq) in [520.0, 660.0, 780.0].iter().enumerate() {
                        self.blip(*freq, *freq, OscillatorType::Sine, 0.3, i as f64 * 0.08, 0.15);
                    }
                }
                Cue::Flask => self.blip(300.0, 900.0, OscillatorType::Triangle, 0.3, 0.0, 0.25),
                Cue::Hit => self.blip(150.0, 60.0, OscillatorType::Sawtooth, 0.5, 0.0, 0.2),
                Cue::Flame => {
                    self.blip(100.0, 40.0, OscillatorType::Sawtooth, 0.3, 0.0, 0.3);
                    self.blip(2500.0, 800.0, OscillatorType::Square, 0.08, 0.0, 0.1);
                }
            }
        }

        fn play_track(&mut self, theme: Theme) {
            if self.theme == Some(theme) {
                return;
            }
            self.stop_track();
            self.theme = Some(theme);

            // Each theme is a quiet sustained chord
            let (chord, wave): (&[f32], OscillatorType) = match theme {
                Theme::Chiptune => (&[130.8, 196.0, 261.6], OscillatorType::Square),
                Theme::JingleBells => (&[146.8, 185.0, 220.0], OscillatorType::Triangle),
                Theme::CursedDream => (&[55.0, 82.4, 116.5], OscillatorType::Sawtooth),
            };
            for freq in chord {
                if let Some((osc, gain)) = self.create_osc(*freq, wave) {
                    gain.gain().set_value(0.04);
                    if osc.start().is_ok() {
                        self.drones.push(osc);
                    }
                }
            }
            log::info!("Playing theme {}", theme.as_str());
        }

        fn set_volume(&mut self, percent: u8) {
            if let Some(master) = &self.master {
                master
                    .gain()
                    .set_value(db_to_amplitude(volume_to_gain_db(percent)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_mapping_endpoints() {
        assert_eq!(volume_to_gain_db(0), -35.0);
        assert_eq!(volume_to_gain_db(100), 10.0);
        assert!((volume_to_gain_db(25) - -23.75).abs() < 1e-4);
        // Out-of-range volume is clamped
        assert_eq!(volume_to_gain_db(200), 10.0);
    }

    #[test]
    fn test_gain_mapping_inverse() {
        for v in [0u8, 1, 25, 50, 99, 100] {
            assert_eq!(gain_db_to_volume(volume_to_gain_db(v)), v);
        }
        assert_eq!(gain_db_to_volume(-80.0), 0);
        assert_eq!(gain_db_to_volume(40.0), 100);
    }

    #[test]
    fn test_recording_audio_counts_cues() {
        let mut audio = RecordingAudio::new();
        audio.play_cue(Cue::Coin);
        audio.play_cue(Cue::Hit);
        audio.play_cue(Cue::Coin);
        audio.set_volume(120);
        assert_eq!(audio.count(Cue::Coin), 2);
        assert_eq!(audio.count(Cue::Flame), 0);
        assert_eq!(audio.volume, Some(100));
    }
}
