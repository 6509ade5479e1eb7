//! Sun and time-of-day source.
//!
//! [`SunController`] owns the in-game clock and derives the sun's rotation
//! from it. The weather manager only sees it through [`TimeSource`].

pub mod aurora;
pub mod mode;
pub mod time;

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use aurora::{AuroraConfig, AuroraController, AuroraLayer};
pub use mode::SunMode;
pub use time::TimeOfDay;

/// Read/write access to the in-game clock.
pub trait TimeSource {
    /// Current hour in `[0, 24)`.
    fn current_time(&self) -> f32;
    /// Jump to `hour`, clamped to `[0, 24]`.
    fn set_time(&mut self, hour: f32);
    /// Set the month, clamped to 1-12.
    fn set_month(&mut self, month: u32);
    fn current_month(&self) -> u32;
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    /// Real-time minutes per in-game day. 0 = clock paused.
    pub day_length_minutes: f32,
    /// Starting hour (0-24).
    pub start_time: f32,
    /// 1 = January.
    pub month: u32,
    pub mode: SunMode,
    /// e.g. "Stockholm, Sweden"
    pub location_name: String,
    pub location_description: String,
    pub aurora: AuroraConfig,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            day_length_minutes: 24.0,
            start_time: 12.0,
            month: 6,
            mode: SunMode::default(),
            location_name: "Default".to_string(),
            location_description: String::new(),
            aurora: AuroraConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct SunController {
    time: TimeOfDay,
    month: u32,
    day_length_minutes: f32,
    mode: SunMode,
    location_name: String,
}

impl Default for SunController {
    fn default() -> Self {
        Self::new(&SunConfig::default())
    }
}

impl SunController {
    pub fn new(config: &SunConfig) -> Self {
        let mut mode = config.mode;
        mode.sanitize();
        if config.day_length_minutes <= 0.0 {
            log::info!("Sun clock paused (day length {} min)", config.day_length_minutes);
        }
        Self {
            time: TimeOfDay::new(config.start_time),
            month: config.month.clamp(1, 12),
            day_length_minutes: config.day_length_minutes,
            mode,
            location_name: config.location_name.clone(),
        }
    }

    /// Advance the clock by `dt` real seconds.
    pub fn update(&mut self, dt: f32) {
        self.time.advance(dt, self.day_length_minutes * 60.0);
    }

    /// Sun elevation above the horizon, degrees.
    pub fn elevation(&self) -> f32 {
        self.mode.sun_height(self.time.hour(), self.month)
    }

    /// Horizontal rotation, degrees; 0 at noon.
    pub fn azimuth(&self) -> f32 {
        mode::hour_angle_degrees(self.time.hour())
    }

    /// Azimuth wrapped into `[0, 360)`: 0 at noon, 180 at midnight.
    pub fn yaw_degrees(&self) -> f32 {
        self.azimuth().rem_euclid(360.0)
    }

    /// Orientation of the directional light: pitched down by the elevation,
    /// yawed by the azimuth.
    pub fn sun_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.azimuth().to_radians(),
            self.elevation().to_radians(),
            0.0,
        )
    }

    /// Unit vector pointing from the scene towards the sun.
    pub fn sun_direction(&self) -> Vec3 {
        -(self.sun_rotation() * Vec3::Z)
    }

    pub fn mode(&self) -> SunMode {
        self.mode
    }

    /// Switch location model at runtime.
    pub fn set_mode(&mut self, mut mode: SunMode, location_name: impl Into<String>) {
        mode.sanitize();
        self.mode = mode;
        self.location_name = location_name.into();
        log::info!("Sun location set to '{}'", self.location_name);
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn day_count(&self) -> u32 {
        self.time.day_count()
    }
}

impl TimeSource for SunController {
    fn current_time(&self) -> f32 {
        self.time.hour()
    }

    fn set_time(&mut self, hour: f32) {
        self.time.set(hour);
    }

    fn set_month(&mut self, month: u32) {
        self.month = month.clamp(1, 12);
    }

    fn current_month(&self) -> u32 {
        self.month
    }
}
