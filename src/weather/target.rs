//! Live render/audio parameters the aspect appliers write into.
//!
//! The renderer and audio mixer own these objects; the weather core only
//! holds [`Shared`] handles to them. A [`VolumeProfile`] groups the handles
//! an application exposes. Appliers bind to the entry they need and go inert
//! if it is missing.

use crate::core::types::{Color, Shared, BLACK, WHITE};

// ---------------------------------------------------------------------------
// Fog volume
// ---------------------------------------------------------------------------

/// Live volumetric fog override read by the renderer each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FogVolume {
    pub active: bool,
    pub mean_free_path: f32,
    pub base_height: f32,
    pub maximum_height: f32,
    pub max_fog_distance: f32,
    pub albedo: Color,
    pub mip_fog_near: f32,
    pub mip_fog_far: f32,
    pub mip_fog_max_mip: f32,
    pub global_light_probe_dimmer: f32,
    pub depth_extent: f32,
    pub slice_distribution_uniformity: f32,
    pub volumetric_fog_budget: f32,
    pub resolution_depth_ratio: f32,
    pub directional_lights_only: bool,
    pub anisotropy: f32,
    pub multi_scattering: f32,
}

impl Default for FogVolume {
    fn default() -> Self {
        Self {
            active: false,
            mean_free_path: 400.0,
            base_height: 0.0,
            maximum_height: 50.0,
            max_fog_distance: 5000.0,
            albedo: WHITE,
            mip_fog_near: 0.0,
            mip_fog_far: 1000.0,
            mip_fog_max_mip: 0.5,
            global_light_probe_dimmer: 1.0,
            depth_extent: 64.0,
            slice_distribution_uniformity: 0.75,
            volumetric_fog_budget: 0.33,
            resolution_depth_ratio: 0.666,
            directional_lights_only: false,
            anisotropy: 0.0,
            multi_scattering: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Cloud layer
// ---------------------------------------------------------------------------

/// Live 2D cloud layer override read by the sky renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudLayer {
    pub opacity: f32,
    pub upper_hemisphere_only: bool,
    pub altitude: f32,
    pub rotation: f32,
    pub tint: Color,
    pub exposure: f32,
    /// Opacity multipliers for the R, G, B and A channels of the cloud map.
    pub channel_opacity: [f32; 4],
    pub scroll_orientation: f32,
    pub scroll_speed: f32,
    pub lighting: bool,
    pub steps: u32,
    pub thickness: f32,
    pub ambient_probe_dimmer: f32,
    pub cast_shadows: bool,
    pub shadow_multiplier: f32,
    pub shadow_tint: Color,
    pub shadow_size: f32,
}

impl Default for CloudLayer {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            upper_hemisphere_only: true,
            altitude: 2000.0,
            rotation: 0.0,
            tint: WHITE,
            exposure: 0.0,
            channel_opacity: [1.0, 0.0, 0.0, 0.0],
            scroll_orientation: 0.0,
            scroll_speed: 1.0,
            lighting: true,
            steps: 6,
            thickness: 0.5,
            ambient_probe_dimmer: 1.0,
            cast_shadows: false,
            shadow_multiplier: 1.0,
            shadow_tint: BLACK,
            shadow_size: 500.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Rain emitter + audio
// ---------------------------------------------------------------------------

/// Shape of the emission volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmitterShape {
    #[default]
    Sphere,
    ConeVolume,
}

/// Simulation space of emitted particles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimulationSpace {
    #[default]
    Local,
    World,
}

/// Particle emitter parameters the rain applier drives.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterParams {
    pub looping: bool,
    pub simulation_space: SimulationSpace,
    pub shape: EmitterShape,
    pub align_to_direction: bool,
    pub start_size: f32,
    /// Signed start speed (negative falls downwards).
    pub start_speed: f32,
    pub start_color: Color,
    /// Particles per second.
    pub rate_over_time: f32,
    pub radius: f32,
    pub length: f32,
}

impl Default for EmitterParams {
    fn default() -> Self {
        Self {
            looping: false,
            simulation_space: SimulationSpace::Local,
            shape: EmitterShape::Sphere,
            align_to_direction: false,
            start_size: 1.0,
            start_speed: 5.0,
            start_color: WHITE,
            rate_over_time: 10.0,
            radius: 1.0,
            length: 5.0,
        }
    }
}

/// Particle system that renders precipitation.
pub trait RainEmitter {
    fn is_playing(&self) -> bool;
    fn play(&mut self);
    fn stop(&mut self);
    fn params(&self) -> EmitterParams;
    fn set_params(&mut self, params: EmitterParams);
}

/// Looping ambience track for precipitation.
pub trait RainAudio {
    fn is_playing(&self) -> bool;
    fn play(&mut self);
    fn stop(&mut self);
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
}

// ---------------------------------------------------------------------------
// Volume profile
// ---------------------------------------------------------------------------

/// The set of live targets an application exposes to the weather core.
///
/// Every entry is optional. Appliers whose entry is absent mark themselves
/// inactive at bind time.
#[derive(Clone, Default)]
pub struct VolumeProfile {
    pub fog: Option<Shared<FogVolume>>,
    pub clouds: Option<Shared<CloudLayer>>,
    pub rain: Option<Shared<dyn RainEmitter>>,
    pub rain_audio: Option<Shared<dyn RainAudio>>,
}

impl VolumeProfile {
    /// Empty profile (every applier bound to it will be inert).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fog(mut self, fog: Shared<FogVolume>) -> Self {
        self.fog = Some(fog);
        self
    }

    pub fn with_clouds(mut self, clouds: Shared<CloudLayer>) -> Self {
        self.clouds = Some(clouds);
        self
    }

    pub fn with_rain(mut self, rain: Shared<dyn RainEmitter>) -> Self {
        self.rain = Some(rain);
        self
    }

    pub fn with_rain_audio(mut self, audio: Shared<dyn RainAudio>) -> Self {
        self.rain_audio = Some(audio);
        self
    }
}

impl std::fmt::Debug for VolumeProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeProfile")
            .field("fog", &self.fog.is_some())
            .field("clouds", &self.clouds.is_some())
            .field("rain", &self.rain.is_some())
            .field("rain_audio", &self.rain_audio.is_some())
            .finish()
    }
}
