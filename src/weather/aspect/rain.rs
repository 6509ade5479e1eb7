//! Precipitation aspect: a particle emitter plus an optional ambience track.

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, Shared, WHITE};
use crate::weather::aspect::{AspectApplier, AspectData, AspectKind, ComponentData};
use crate::weather::lerp::{clamp01, step, Lerp};
use crate::weather::target::{
    EmitterShape, RainAudio, RainEmitter, SimulationSpace, VolumeProfile,
};

/// Emission rate (particles/s) at intensity 1.
pub const BASE_EMISSION_RATE: f32 = 1000.0;

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// Authored precipitation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainData {
    pub enabled: bool,
    /// `[0, 1]`
    pub intensity: f32,
    pub drop_size: f32,
    /// Metres per second, at least 0.1.
    pub fall_speed: f32,
    pub emission_radius: f32,
    pub emission_height: f32,
    pub color: Color,
    /// `[0, 1]`
    pub alpha: f32,
    /// `[0, 1]`
    pub sound_volume: f32,
}

impl Default for RainData {
    fn default() -> Self {
        Self {
            enabled: false,
            intensity: 0.0,
            drop_size: 1.0,
            fall_speed: 7.0,
            emission_radius: 30.0,
            emission_height: 20.0,
            color: WHITE,
            alpha: 0.5,
            sound_volume: 1.0,
        }
    }
}

impl ComponentData for RainData {
    const KIND: AspectKind = AspectKind::Rain;

    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            enabled: step(&self.enabled, &other.enabled, t),
            intensity: self.intensity.lerp(&other.intensity, t),
            drop_size: self.drop_size.lerp(&other.drop_size, t),
            fall_speed: self.fall_speed.lerp(&other.fall_speed, t),
            emission_radius: self.emission_radius.lerp(&other.emission_radius, t),
            emission_height: self.emission_height.lerp(&other.emission_height, t),
            color: self.color.lerp(&other.color, t),
            alpha: self.alpha.lerp(&other.alpha, t),
            sound_volume: self.sound_volume.lerp(&other.sound_volume, t),
        }
    }
}

impl RainData {
    /// Clamp ranged fields into their valid range. Returns true if anything
    /// changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();
        self.intensity = clamp01(self.intensity);
        self.drop_size = self.drop_size.max(0.0);
        self.fall_speed = self.fall_speed.max(0.1);
        self.emission_radius = self.emission_radius.max(0.0);
        self.emission_height = self.emission_height.max(0.0);
        self.color = self.color.map(clamp01);
        self.alpha = clamp01(self.alpha);
        self.sound_volume = clamp01(self.sound_volume);
        *self != before
    }
}

// ---------------------------------------------------------------------------
// Applier
// ---------------------------------------------------------------------------

/// Drives the rain [`RainEmitter`] and, when present, its [`RainAudio`].
///
/// Playback follows `enabled`: emission and sound start only when not
/// already playing and stop only when playing.
#[derive(Default)]
pub struct RainApplier {
    emitter: Option<Shared<dyn RainEmitter>>,
    audio: Option<Shared<dyn RainAudio>>,
}

impl RainApplier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AspectApplier for RainApplier {
    fn kind(&self) -> AspectKind {
        AspectKind::Rain
    }

    fn initialize(&mut self, profile: &VolumeProfile) -> bool {
        let Some(emitter) = profile.rain.clone() else {
            log::error!("Failed to initialize rain applier: no rain emitter in profile");
            self.emitter = None;
            self.audio = None;
            return false;
        };

        {
            let mut e = emitter.borrow_mut();
            let mut params = e.params();
            params.looping = true;
            params.simulation_space = SimulationSpace::World;
            params.shape = EmitterShape::ConeVolume;
            params.align_to_direction = true;
            e.set_params(params);
        }

        if profile.rain_audio.is_none() {
            log::debug!("Rain applier bound without audio");
        }
        self.emitter = Some(emitter);
        self.audio = profile.rain_audio.clone();
        true
    }

    fn is_active(&self) -> bool {
        self.emitter.is_some()
    }

    fn apply_immediate(&mut self, data: &AspectData) {
        let (Some(emitter), Some(d)) = (&self.emitter, data.as_rain()) else {
            return;
        };

        {
            let mut e = emitter.borrow_mut();
            if d.enabled && !e.is_playing() {
                e.play();
            } else if !d.enabled && e.is_playing() {
                e.stop();
            }

            let mut params = e.params();
            params.start_size = d.drop_size;
            params.start_speed = -d.fall_speed;
            params.start_color = [d.color[0], d.color[1], d.color[2], d.alpha];
            params.rate_over_time = d.intensity * BASE_EMISSION_RATE;
            params.radius = d.emission_radius;
            params.length = d.emission_height;
            e.set_params(params);
        }

        if let Some(audio) = &self.audio {
            let mut a = audio.borrow_mut();
            a.set_volume(d.intensity * d.sound_volume);
            if d.enabled && !a.is_playing() {
                a.play();
            } else if !d.enabled && a.is_playing() {
                a.stop();
            }
        }
    }

    fn create_snapshot(&self) -> Option<AspectData> {
        let e = self.emitter.as_ref()?.borrow();
        let params = e.params();
        let intensity = params.rate_over_time / BASE_EMISSION_RATE;
        let volume = self.audio.as_ref().map(|a| a.borrow().volume()).unwrap_or(0.0);
        let sound_volume = if intensity > 0.0 { volume / intensity } else { volume };

        let [r, g, b, alpha] = params.start_color;

        Some(AspectData::Rain(RainData {
            enabled: e.is_playing(),
            intensity,
            drop_size: params.start_size,
            fall_speed: -params.start_speed,
            emission_radius: params.radius,
            emission_height: params.length,
            // The emitter's fourth channel carries `alpha`; the authored
            // colour alpha is not recoverable and reads back opaque.
            color: [r, g, b, 1.0],
            alpha,
            sound_volume,
        }))
    }
}
