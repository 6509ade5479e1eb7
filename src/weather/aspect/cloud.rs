//! Cloud layer aspect.

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, Shared, BLACK, WHITE};
use crate::weather::aspect::{AspectApplier, AspectData, AspectKind, ComponentData};
use crate::weather::lerp::{clamp01, lerp_count, step, Lerp};
use crate::weather::target::{CloudLayer, VolumeProfile};

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// Authored cloud layer parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudData {
    pub enabled: bool,
    /// `[0, 1]`
    pub opacity: f32,
    pub upper_hemisphere_only: bool,

    // Layer
    pub altitude: f32,
    pub rotation: f32,
    pub tint: Color,
    pub exposure_compensation: f32,

    // Per-channel opacity multipliers of the cloud map, each `[0, 1]`
    pub opacity_r: f32,
    pub opacity_g: f32,
    pub opacity_b: f32,
    pub opacity_a: f32,

    // Wind
    /// Degrees.
    pub wind_orientation: f32,
    pub wind_speed: f32,

    // Raymarching
    pub enable_raymarching: bool,
    pub num_primary_steps: u32,
    pub raymarching_density: f32,
    pub ambient_dimmer: f32,

    // Shadows
    pub enable_shadows: bool,
    pub shadow_multiplier: f32,
    pub shadow_tint: Color,
    pub shadow_resolution: f32,
}

impl Default for CloudData {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 1.0,
            upper_hemisphere_only: true,
            altitude: 2000.0,
            rotation: 0.0,
            tint: WHITE,
            exposure_compensation: 0.0,
            opacity_r: 1.0,
            opacity_g: 0.0,
            opacity_b: 0.0,
            opacity_a: 0.0,
            wind_orientation: 100.0,
            wind_speed: 100.0,
            enable_raymarching: true,
            num_primary_steps: 6,
            raymarching_density: 0.5,
            ambient_dimmer: 1.0,
            enable_shadows: true,
            shadow_multiplier: 1.0,
            shadow_tint: BLACK,
            shadow_resolution: 500.0,
        }
    }
}

impl ComponentData for CloudData {
    const KIND: AspectKind = AspectKind::Cloud;

    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            enabled: step(&self.enabled, &other.enabled, t),
            opacity: self.opacity.lerp(&other.opacity, t),
            upper_hemisphere_only: step(&self.upper_hemisphere_only, &other.upper_hemisphere_only, t),
            altitude: self.altitude.lerp(&other.altitude, t),
            rotation: self.rotation.lerp(&other.rotation, t),
            tint: self.tint.lerp(&other.tint, t),
            exposure_compensation: self.exposure_compensation.lerp(&other.exposure_compensation, t),
            opacity_r: self.opacity_r.lerp(&other.opacity_r, t),
            opacity_g: self.opacity_g.lerp(&other.opacity_g, t),
            opacity_b: self.opacity_b.lerp(&other.opacity_b, t),
            opacity_a: self.opacity_a.lerp(&other.opacity_a, t),
            wind_orientation: self.wind_orientation.lerp(&other.wind_orientation, t),
            wind_speed: self.wind_speed.lerp(&other.wind_speed, t),
            enable_raymarching: step(&self.enable_raymarching, &other.enable_raymarching, t),
            num_primary_steps: lerp_count(self.num_primary_steps, other.num_primary_steps, t),
            raymarching_density: self.raymarching_density.lerp(&other.raymarching_density, t),
            ambient_dimmer: self.ambient_dimmer.lerp(&other.ambient_dimmer, t),
            enable_shadows: step(&self.enable_shadows, &other.enable_shadows, t),
            shadow_multiplier: self.shadow_multiplier.lerp(&other.shadow_multiplier, t),
            shadow_tint: self.shadow_tint.lerp(&other.shadow_tint, t),
            shadow_resolution: self.shadow_resolution.lerp(&other.shadow_resolution, t),
        }
    }
}

impl CloudData {
    /// Per-channel opacity multipliers as `[r, g, b, a]`.
    pub fn channel_opacity(&self) -> [f32; 4] {
        [self.opacity_r, self.opacity_g, self.opacity_b, self.opacity_a]
    }

    /// Clamp ranged fields into their valid range. Returns true if anything
    /// changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();
        self.opacity = clamp01(self.opacity);
        self.opacity_r = clamp01(self.opacity_r);
        self.opacity_g = clamp01(self.opacity_g);
        self.opacity_b = clamp01(self.opacity_b);
        self.opacity_a = clamp01(self.opacity_a);
        self.tint = self.tint.map(clamp01);
        self.shadow_tint = self.shadow_tint.map(clamp01);
        self.wind_speed = self.wind_speed.max(0.0);
        self.num_primary_steps = self.num_primary_steps.clamp(1, 32);
        self.raymarching_density = clamp01(self.raymarching_density);
        self.ambient_dimmer = clamp01(self.ambient_dimmer);
        self.shadow_multiplier = self.shadow_multiplier.max(0.0);
        self.shadow_resolution = self.shadow_resolution.max(0.0);
        *self != before
    }
}

// ---------------------------------------------------------------------------
// Applier
// ---------------------------------------------------------------------------

/// Drives the sky renderer's [`CloudLayer`].
///
/// The layer has no separate toggle: a disabled aspect is written as zero
/// opacity, and a snapshot reports the aspect enabled whenever the live
/// opacity is positive.
#[derive(Default)]
pub struct CloudApplier {
    layer: Option<Shared<CloudLayer>>,
}

impl CloudApplier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AspectApplier for CloudApplier {
    fn kind(&self) -> AspectKind {
        AspectKind::Cloud
    }

    fn initialize(&mut self, profile: &VolumeProfile) -> bool {
        self.layer = profile.clouds.clone();
        if self.layer.is_none() {
            log::error!("Failed to initialize cloud applier: no cloud layer in profile");
        }
        self.layer.is_some()
    }

    fn is_active(&self) -> bool {
        self.layer.is_some()
    }

    fn apply_immediate(&mut self, data: &AspectData) {
        let (Some(layer), Some(d)) = (&self.layer, data.as_cloud()) else {
            return;
        };
        let mut layer = layer.borrow_mut();

        layer.opacity = if d.enabled { d.opacity } else { 0.0 };
        layer.upper_hemisphere_only = d.upper_hemisphere_only;

        layer.altitude = d.altitude;
        layer.rotation = d.rotation;
        layer.tint = d.tint;
        layer.exposure = d.exposure_compensation;
        layer.channel_opacity = d.channel_opacity();

        layer.scroll_orientation = d.wind_orientation;
        layer.scroll_speed = d.wind_speed;

        layer.lighting = d.enable_raymarching;
        layer.steps = d.num_primary_steps;
        layer.thickness = d.raymarching_density;
        layer.ambient_probe_dimmer = d.ambient_dimmer;

        layer.cast_shadows = d.enable_shadows;
        layer.shadow_multiplier = d.shadow_multiplier;
        layer.shadow_tint = d.shadow_tint;
        layer.shadow_size = d.shadow_resolution;
    }

    fn create_snapshot(&self) -> Option<AspectData> {
        let layer = self.layer.as_ref()?.borrow();
        let [opacity_r, opacity_g, opacity_b, opacity_a] = layer.channel_opacity;
        Some(AspectData::Cloud(CloudData {
            enabled: layer.opacity > 0.0,
            opacity: layer.opacity,
            upper_hemisphere_only: layer.upper_hemisphere_only,
            altitude: layer.altitude,
            rotation: layer.rotation,
            tint: layer.tint,
            exposure_compensation: layer.exposure,
            opacity_r,
            opacity_g,
            opacity_b,
            opacity_a,
            wind_orientation: layer.scroll_orientation,
            wind_speed: layer.scroll_speed,
            enable_raymarching: layer.lighting,
            num_primary_steps: layer.steps,
            raymarching_density: layer.thickness,
            ambient_dimmer: layer.ambient_probe_dimmer,
            enable_shadows: layer.cast_shadows,
            shadow_multiplier: layer.shadow_multiplier,
            shadow_tint: layer.shadow_tint,
            shadow_resolution: layer.shadow_size,
        }))
    }
}
