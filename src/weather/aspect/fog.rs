//! Volumetric fog aspect.

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, Shared, WHITE};
use crate::weather::aspect::{AspectApplier, AspectData, AspectKind, ComponentData};
use crate::weather::lerp::{clamp01, step, Lerp};
use crate::weather::target::{FogVolume, VolumeProfile};

/// Mean free path multiplier at full night.
const NIGHT_MEAN_FREE_PATH_SCALE: f32 = 0.5;
/// Maximum height multiplier at full night.
const NIGHT_MAXIMUM_HEIGHT_SCALE: f32 = 0.75;

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// Authored fog parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogData {
    pub enabled: bool,

    // Attenuation
    /// Distance (m) light travels before being scattered; lower = thicker.
    pub mean_free_path: f32,
    pub base_height: f32,
    pub maximum_height: f32,
    pub max_distance: f32,

    // Color + mip fog
    pub albedo: Color,
    pub mip_fog_near: f32,
    pub mip_fog_far: f32,
    pub mip_fog_max_mip: f32,

    // Volumetrics
    pub global_light_probe_dimmer: f32,
    pub depth_extent: f32,
    pub slice_distribution_uniformity: f32,
    /// `[0, 1]`
    pub volumetric_fog_budget: f32,
    /// `[0, 1]`
    pub resolution_depth_ratio: f32,
    pub directional_lights_only: bool,
    /// `[-1, 1]`
    pub anisotropy: f32,
    pub multi_scattering: f32,
}

impl Default for FogData {
    fn default() -> Self {
        Self {
            enabled: true,
            mean_free_path: 1000.0,
            base_height: 0.0,
            maximum_height: 100.0,
            max_distance: 500.0,
            albedo: WHITE,
            mip_fog_near: 0.0,
            mip_fog_far: 1000.0,
            mip_fog_max_mip: 0.5,
            global_light_probe_dimmer: 1.0,
            depth_extent: 64.0,
            slice_distribution_uniformity: 0.75,
            volumetric_fog_budget: 0.5,
            resolution_depth_ratio: 0.5,
            directional_lights_only: false,
            anisotropy: 0.0,
            multi_scattering: 0.0,
        }
    }
}

impl ComponentData for FogData {
    const KIND: AspectKind = AspectKind::Fog;

    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            enabled: step(&self.enabled, &other.enabled, t),
            mean_free_path: self.mean_free_path.lerp(&other.mean_free_path, t),
            base_height: self.base_height.lerp(&other.base_height, t),
            maximum_height: self.maximum_height.lerp(&other.maximum_height, t),
            max_distance: self.max_distance.lerp(&other.max_distance, t),
            albedo: self.albedo.lerp(&other.albedo, t),
            mip_fog_near: self.mip_fog_near.lerp(&other.mip_fog_near, t),
            mip_fog_far: self.mip_fog_far.lerp(&other.mip_fog_far, t),
            mip_fog_max_mip: self.mip_fog_max_mip.lerp(&other.mip_fog_max_mip, t),
            global_light_probe_dimmer: self
                .global_light_probe_dimmer
                .lerp(&other.global_light_probe_dimmer, t),
            depth_extent: self.depth_extent.lerp(&other.depth_extent, t),
            slice_distribution_uniformity: self
                .slice_distribution_uniformity
                .lerp(&other.slice_distribution_uniformity, t),
            volumetric_fog_budget: self.volumetric_fog_budget.lerp(&other.volumetric_fog_budget, t),
            resolution_depth_ratio: self
                .resolution_depth_ratio
                .lerp(&other.resolution_depth_ratio, t),
            directional_lights_only: step(
                &self.directional_lights_only,
                &other.directional_lights_only,
                t,
            ),
            anisotropy: self.anisotropy.lerp(&other.anisotropy, t),
            multi_scattering: self.multi_scattering.lerp(&other.multi_scattering, t),
        }
    }
}

impl FogData {
    /// Clamp ranged fields into their valid range. Returns true if anything
    /// changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();
        self.mean_free_path = self.mean_free_path.max(1.0);
        self.maximum_height = self.maximum_height.max(self.base_height);
        self.max_distance = self.max_distance.max(0.0);
        self.albedo = self.albedo.map(clamp01);
        self.mip_fog_max_mip = clamp01(self.mip_fog_max_mip);
        self.depth_extent = self.depth_extent.max(0.1);
        self.slice_distribution_uniformity = clamp01(self.slice_distribution_uniformity);
        self.volumetric_fog_budget = clamp01(self.volumetric_fog_budget);
        self.resolution_depth_ratio = clamp01(self.resolution_depth_ratio);
        self.anisotropy = self.anisotropy.clamp(-1.0, 1.0);
        self.multi_scattering = clamp01(self.multi_scattering);
        *self != before
    }
}

// ---------------------------------------------------------------------------
// Applier
// ---------------------------------------------------------------------------

/// Drives the renderer's [`FogVolume`].
#[derive(Default)]
pub struct FogApplier {
    fog: Option<Shared<FogVolume>>,
}

impl FogApplier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AspectApplier for FogApplier {
    fn kind(&self) -> AspectKind {
        AspectKind::Fog
    }

    fn initialize(&mut self, profile: &VolumeProfile) -> bool {
        self.fog = profile.fog.clone();
        if self.fog.is_none() {
            log::error!("Failed to initialize fog applier: no fog volume in profile");
        }
        self.fog.is_some()
    }

    fn is_active(&self) -> bool {
        self.fog.is_some()
    }

    fn apply_immediate(&mut self, data: &AspectData) {
        let (Some(fog), Some(d)) = (&self.fog, data.as_fog()) else {
            return;
        };
        let mut fog = fog.borrow_mut();

        fog.active = d.enabled;

        fog.mean_free_path = d.mean_free_path;
        fog.base_height = d.base_height;
        fog.maximum_height = d.maximum_height;
        fog.max_fog_distance = d.max_distance;

        fog.albedo = d.albedo;
        fog.mip_fog_near = d.mip_fog_near;
        fog.mip_fog_far = d.mip_fog_far;
        fog.mip_fog_max_mip = d.mip_fog_max_mip;

        fog.global_light_probe_dimmer = d.global_light_probe_dimmer;
        fog.depth_extent = d.depth_extent;
        fog.slice_distribution_uniformity = d.slice_distribution_uniformity;
        fog.volumetric_fog_budget = d.volumetric_fog_budget;
        fog.resolution_depth_ratio = d.resolution_depth_ratio;
        fog.directional_lights_only = d.directional_lights_only;
        fog.anisotropy = d.anisotropy;
        fog.multi_scattering = d.multi_scattering;
    }

    fn create_snapshot(&self) -> Option<AspectData> {
        let fog = self.fog.as_ref()?.borrow();
        Some(AspectData::Fog(FogData {
            enabled: fog.active,
            mean_free_path: fog.mean_free_path,
            base_height: fog.base_height,
            maximum_height: fog.maximum_height,
            max_distance: fog.max_fog_distance,
            albedo: fog.albedo,
            mip_fog_near: fog.mip_fog_near,
            mip_fog_far: fog.mip_fog_far,
            mip_fog_max_mip: fog.mip_fog_max_mip,
            global_light_probe_dimmer: fog.global_light_probe_dimmer,
            depth_extent: fog.depth_extent,
            slice_distribution_uniformity: fog.slice_distribution_uniformity,
            volumetric_fog_budget: fog.volumetric_fog_budget,
            resolution_depth_ratio: fog.resolution_depth_ratio,
            directional_lights_only: fog.directional_lights_only,
            anisotropy: fog.anisotropy,
            multi_scattering: fog.multi_scattering,
        }))
    }

    /// Visibility drops at night: mean free path scales from 0.5x to 1x and
    /// maximum height from 0.75x to 1x of the settled value.
    fn update_time_of_day(&mut self, data: &AspectData, day_night_factor: f32) {
        let (Some(fog), Some(d)) = (&self.fog, data.as_fog()) else {
            return;
        };
        let mut fog = fog.borrow_mut();
        fog.mean_free_path = (d.mean_free_path * NIGHT_MEAN_FREE_PATH_SCALE)
            .lerp(&d.mean_free_path, day_night_factor);
        fog.maximum_height = (d.maximum_height * NIGHT_MAXIMUM_HEIGHT_SCALE)
            .lerp(&d.maximum_height, day_night_factor);
    }
}
