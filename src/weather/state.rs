//! Authored weather states.

use serde::{Deserialize, Serialize};

use crate::weather::aspect::{CloudData, FogData, RainData};
use crate::weather::lerp::clamp01;

/// A named weather configuration plus its scheduling metadata.
///
/// States are authored once and read-only at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherState {
    /// Unique among the configured states.
    pub name: String,
    /// Seconds to blend into this state.
    pub transition_duration: f32,
    /// Shortest time (s) this state persists before random reselection.
    pub min_duration: f32,
    /// Longest time (s) this state persists before random reselection.
    pub max_duration: f32,
    /// Selection weight during the day, `[0, 1]`. 0 = never picked by day.
    pub day_time_probability: f32,
    /// Selection weight during the night, `[0, 1]`. 0 = never picked at night.
    pub night_time_probability: f32,

    pub fog: FogData,
    pub clouds: CloudData,
    pub rain: RainData,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            name: "Unnamed".to_string(),
            transition_duration: 60.0,
            min_duration: 300.0,
            max_duration: 1200.0,
            day_time_probability: 1.0,
            night_time_probability: 1.0,
            fog: FogData::default(),
            clouds: CloudData::default(),
            rain: RainData::default(),
        }
    }
}

impl WeatherState {
    /// Default state with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Selection weight for the current phase of the day.
    #[inline]
    pub fn weight(&self, is_day: bool) -> f32 {
        if is_day {
            self.day_time_probability
        } else {
            self.night_time_probability
        }
    }

    /// Authoring-time validation: clamp every ranged field and fix reversed
    /// duration bounds. Returns true if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();

        self.transition_duration = self.transition_duration.max(0.0);
        self.min_duration = self.min_duration.max(f32::EPSILON);
        self.max_duration = self.max_duration.max(f32::EPSILON);
        if self.min_duration > self.max_duration {
            std::mem::swap(&mut self.min_duration, &mut self.max_duration);
        }
        self.day_time_probability = clamp01(self.day_time_probability);
        self.night_time_probability = clamp01(self.night_time_probability);

        self.fog.sanitize();
        self.clouds.sanitize();
        self.rain.sanitize();

        *self != before
    }

    // -----------------------------------------------------------------------
    // Built-in presets
    // -----------------------------------------------------------------------

    /// Clear skies: thin fog, light high clouds, no rain.
    pub fn clear() -> Self {
        Self {
            name: "Clear".to_string(),
            transition_duration: 60.0,
            min_duration: 300.0,
            max_duration: 1200.0,
            day_time_probability: 0.5,
            night_time_probability: 0.4,
            fog: FogData {
                mean_free_path: 1500.0,
                maximum_height: 120.0,
                ..Default::default()
            },
            clouds: CloudData {
                opacity: 0.3,
                altitude: 2500.0,
                wind_speed: 60.0,
                ..Default::default()
            },
            rain: RainData::default(),
        }
    }

    /// Heavy low cloud cover, dimmer and windier.
    pub fn overcast() -> Self {
        Self {
            name: "Overcast".to_string(),
            transition_duration: 90.0,
            min_duration: 240.0,
            max_duration: 900.0,
            day_time_probability: 0.3,
            night_time_probability: 0.3,
            fog: FogData {
                mean_free_path: 600.0,
                maximum_height: 150.0,
                albedo: [0.85, 0.85, 0.9, 1.0],
                ..Default::default()
            },
            clouds: CloudData {
                opacity: 0.85,
                altitude: 1500.0,
                tint: [0.7, 0.7, 0.75, 1.0],
                opacity_g: 0.6,
                wind_speed: 120.0,
                num_primary_steps: 10,
                shadow_multiplier: 1.5,
                ..Default::default()
            },
            rain: RainData::default(),
        }
    }

    /// Steady rain under dense cloud.
    pub fn rain() -> Self {
        Self {
            name: "Rain".to_string(),
            transition_duration: 120.0,
            min_duration: 180.0,
            max_duration: 600.0,
            day_time_probability: 0.2,
            night_time_probability: 0.2,
            fog: FogData {
                mean_free_path: 300.0,
                maximum_height: 200.0,
                albedo: [0.7, 0.72, 0.75, 1.0],
                anisotropy: 0.2,
                ..Default::default()
            },
            clouds: CloudData {
                opacity: 1.0,
                altitude: 1000.0,
                tint: [0.45, 0.45, 0.5, 1.0],
                opacity_g: 1.0,
                wind_speed: 200.0,
                num_primary_steps: 16,
                raymarching_density: 0.8,
                shadow_multiplier: 2.0,
                ..Default::default()
            },
            rain: RainData {
                enabled: true,
                intensity: 0.7,
                drop_size: 0.6,
                fall_speed: 9.0,
                color: [0.8, 0.82, 0.85, 1.0],
                alpha: 0.4,
                sound_volume: 0.8,
                ..Default::default()
            },
        }
    }

    /// Thick ground fog, mostly at night.
    pub fn fog() -> Self {
        Self {
            name: "Fog".to_string(),
            transition_duration: 180.0,
            min_duration: 300.0,
            max_duration: 900.0,
            day_time_probability: 0.0,
            night_time_probability: 0.3,
            fog: FogData {
                mean_free_path: 40.0,
                maximum_height: 60.0,
                albedo: [0.9, 0.92, 0.95, 1.0],
                multi_scattering: 0.5,
                ..Default::default()
            },
            clouds: CloudData {
                opacity: 0.5,
                altitude: 1200.0,
                wind_speed: 20.0,
                ..Default::default()
            },
            rain: RainData::default(),
        }
    }

    /// All built-in presets.
    pub fn presets() -> Vec<Self> {
        vec![Self::clear(), Self::overcast(), Self::rain(), Self::fog()]
    }
}
