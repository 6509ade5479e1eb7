//! Aurora layer that fades in while the sun's yaw sits inside a dark window.
//!
//! The window is a plain `[start, end]` range of yaw degrees and does not
//! wrap through 0°. Each edge ramps between the day and night opacity over
//! `transition_angle_range` degrees; the live opacity then eases towards
//! that target over `transition_duration` seconds.

use serde::{Deserialize, Serialize};

use super::SunController;
use crate::core::types::{Color, Shared};
use crate::weather::lerp::{clamp01, Lerp};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    pub day_opacity: f32,
    pub night_opacity: f32,
    /// Seconds to ease towards the target opacity. 0 = snap.
    pub transition_duration: f32,
    /// Sun yaw (degrees) where the dark window opens.
    pub dark_start_angle: f32,
    /// Sun yaw (degrees) where the dark window closes.
    pub dark_end_angle: f32,
    /// Ramp width in degrees at each edge of the window.
    pub transition_angle_range: f32,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            day_opacity: 0.0,
            night_opacity: 1.0,
            transition_duration: 1.0,
            dark_start_angle: 195.0,
            dark_end_angle: 345.0,
            transition_angle_range: 5.0,
        }
    }
}

impl AuroraConfig {
    /// Clamp opacities, wrap angles into `[0, 360)`. Returns true if anything
    /// changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();
        self.day_opacity = clamp01(self.day_opacity);
        self.night_opacity = clamp01(self.night_opacity);
        self.transition_duration = self.transition_duration.max(0.0);
        self.dark_start_angle = self.dark_start_angle.rem_euclid(360.0);
        self.dark_end_angle = self.dark_end_angle.rem_euclid(360.0);
        self.transition_angle_range = self.transition_angle_range.max(0.0);
        *self != before
    }

    /// Opacity the layer settles at for a sun yaw of `angle` degrees.
    pub fn target_opacity(&self, angle: f32) -> f32 {
        let angle = angle.rem_euclid(360.0);
        if angle < self.dark_start_angle || angle > self.dark_end_angle {
            return self.day_opacity;
        }

        let range = self.transition_angle_range;
        if range > 0.0 {
            let from_start = angle - self.dark_start_angle;
            if from_start <= range {
                return self.day_opacity.lerp(&self.night_opacity, from_start / range);
            }
            let to_end = self.dark_end_angle - angle;
            if to_end <= range {
                return self.day_opacity.lerp(&self.night_opacity, to_end / range);
            }
        }
        self.night_opacity
    }
}

/// Material state of the aurora mesh; only the alpha channel is driven.
#[derive(Clone, Debug, PartialEq)]
pub struct AuroraLayer {
    pub color: Color,
}

impl Default for AuroraLayer {
    fn default() -> Self {
        Self { color: [0.4, 1.0, 0.6, 0.0] }
    }
}

#[derive(Clone, Debug)]
pub struct AuroraController {
    config: AuroraConfig,
    opacity: f32,
    layer: Option<Shared<AuroraLayer>>,
}

impl AuroraController {
    pub fn new(mut config: AuroraConfig) -> Self {
        if config.sanitize() {
            log::warn!("Corrected out-of-range aurora settings");
        }
        Self {
            opacity: config.day_opacity,
            config,
            layer: None,
        }
    }

    /// Drive `layer`'s alpha, starting from the alpha it already has.
    pub fn with_layer(mut self, layer: Shared<AuroraLayer>) -> Self {
        self.opacity = layer.borrow().color[3];
        self.layer = Some(layer);
        self
    }

    /// Ease towards the target for the sun's current yaw. Returns the new
    /// opacity.
    pub fn update(&mut self, dt: f32, sun: &SunController) -> f32 {
        self.update_for_angle(dt, sun.yaw_degrees())
    }

    pub fn update_for_angle(&mut self, dt: f32, angle: f32) -> f32 {
        let target = self.config.target_opacity(angle);
        let t = if self.config.transition_duration > 0.0 {
            clamp01(dt / self.config.transition_duration)
        } else {
            1.0
        };
        self.opacity = if t >= 1.0 { target } else { self.opacity.lerp(&target, t) };

        if let Some(layer) = &self.layer {
            layer.borrow_mut().color[3] = self.opacity;
        }
        self.opacity
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn config(&self) -> &AuroraConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::shared;
    use crate::sun::TimeSource;

    #[test]
    fn test_outside_window_is_day() {
        let config = AuroraConfig::default();
        for angle in [0.0, 90.0, 180.0, 194.9, 345.1, 359.0] {
            assert_eq!(config.target_opacity(angle), 0.0, "angle {angle}");
        }
    }

    #[test]
    fn test_window_edges_ramp() {
        let config = AuroraConfig::default();
        assert_eq!(config.target_opacity(195.0), 0.0);
        assert_eq!(config.target_opacity(197.5), 0.5);
        assert_eq!(config.target_opacity(200.0), 1.0);
        assert_eq!(config.target_opacity(270.0), 1.0);
        assert_eq!(config.target_opacity(340.0), 1.0);
        assert_eq!(config.target_opacity(342.5), 0.5);
        assert_eq!(config.target_opacity(345.0), 0.0);
        // Negative yaw wraps
        assert_eq!(config.target_opacity(-90.0), 1.0);
    }

    #[test]
    fn test_zero_ramp_is_hard_edge() {
        let config = AuroraConfig {
            transition_angle_range: 0.0,
            ..Default::default()
        };
        assert_eq!(config.target_opacity(195.0), 1.0);
        assert_eq!(config.target_opacity(345.0), 1.0);
        assert_eq!(config.target_opacity(346.0), 0.0);
    }

    #[test]
    fn test_fade_is_gradual() {
        let mut aurora = AuroraController::new(AuroraConfig::default());
        assert_eq!(aurora.update_for_angle(0.5, 270.0), 0.5);
        assert_eq!(aurora.update_for_angle(0.5, 270.0), 0.75);
        for _ in 0..100 {
            aurora.update_for_angle(0.1, 270.0);
        }
        assert!(aurora.opacity() > 0.99, "opacity {}", aurora.opacity());
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut aurora = AuroraController::new(AuroraConfig {
            transition_duration: 0.0,
            ..Default::default()
        });
        assert_eq!(aurora.update_for_angle(0.016, 270.0), 1.0);
        assert_eq!(aurora.update_for_angle(0.016, 10.0), 0.0);
    }

    #[test]
    fn test_follows_sun_and_writes_layer() {
        let layer = shared(AuroraLayer::default());
        let mut aurora = AuroraController::new(AuroraConfig::default()).with_layer(layer.clone());
        let mut sun = SunController::default();

        // 06:00 puts the sun at yaw 270, deep in the dark window
        sun.set_time(6.0);
        aurora.update(2.0, &sun);
        assert_eq!(aurora.opacity(), 1.0);
        assert_eq!(layer.borrow().color[3], 1.0);
        assert_eq!(layer.borrow().color[1], 1.0, "only alpha is driven");

        sun.set_time(12.0);
        aurora.update(2.0, &sun);
        assert_eq!(layer.borrow().color[3], 0.0);
    }

    #[test]
    fn test_starts_from_layer_alpha() {
        let layer = shared(AuroraLayer { color: [1.0, 1.0, 1.0, 0.8] });
        let aurora = AuroraController::new(AuroraConfig::default()).with_layer(layer);
        assert_eq!(aurora.opacity(), 0.8);
    }

    #[test]
    fn test_sanitize_wraps_and_clamps() {
        let mut config = AuroraConfig {
            night_opacity: 2.0,
            dark_start_angle: -165.0,
            ..Default::default()
        };
        assert!(config.sanitize());
        assert_eq!(config.night_opacity, 1.0);
        assert_eq!(config.dark_start_angle, 195.0);
        assert!(!config.sanitize());
    }
}
