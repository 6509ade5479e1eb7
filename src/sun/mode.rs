//! Location models for sun elevation.

use serde::{Deserialize, Serialize};

/// How sun elevation is derived from hour and month.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SunMode {
    /// Solar elevation formula for a latitude in degrees (`[-90, 90]`).
    Standard { latitude: f32 },
    /// Polar model: the sun circles at a seasonal height, stays at a fixed
    /// (negative) height through polar night.
    Antarctic { max_height: f32, min_height: f32 },
    /// Half-sine arc over the day, peak height varying with the season.
    Custom { max_height: f32, min_height: f32 },
}

impl Default for SunMode {
    fn default() -> Self {
        Self::Standard { latitude: 0.0 }
    }
}

impl SunMode {
    /// Polar defaults (degrees).
    pub const fn antarctic() -> Self {
        Self::Antarctic { max_height: 47.0, min_height: -15.0 }
    }

    /// Clamp angles into `[-90, 90]` and order min/max heights.
    pub fn sanitize(&mut self) {
        match self {
            Self::Standard { latitude } => *latitude = latitude.clamp(-90.0, 90.0),
            Self::Antarctic { max_height, min_height } | Self::Custom { max_height, min_height } => {
                *max_height = max_height.clamp(-90.0, 90.0);
                *min_height = min_height.clamp(-90.0, 90.0);
                if *min_height > *max_height {
                    std::mem::swap(max_height, min_height);
                }
            }
        }
    }

    /// Sun elevation in degrees for `hour` (`[0, 24)`) and `month` (1-12).
    pub fn sun_height(&self, hour: f32, month: u32) -> f32 {
        let month = month as f32;
        match *self {
            Self::Standard { latitude } => {
                let declination =
                    -23.45 * ((360.0 / 365.0) * (month * 30.44 + 10.0)).to_radians().cos();
                let hour_angle = hour_angle_degrees(hour).to_radians();
                let (lat, decl) = (latitude.to_radians(), declination.to_radians());
                let sin_alt = lat.sin() * decl.sin() + lat.cos() * decl.cos() * hour_angle.cos();
                sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
            }
            Self::Antarctic { max_height, min_height } => {
                let peak = seasonal_peak(min_height, max_height, month);
                if peak > 0.0 {
                    peak * hour_angle_degrees(hour).to_radians().sin()
                } else {
                    peak
                }
            }
            Self::Custom { max_height, min_height } => {
                let peak = seasonal_peak(min_height, max_height, month);
                peak * (hour / 24.0 * std::f32::consts::PI).sin()
            }
        }
    }
}

/// 15 degrees per hour, 0 at noon.
#[inline]
pub fn hour_angle_degrees(hour: f32) -> f32 {
    (hour - 12.0) * 15.0
}

/// Peak height for the month: a yearly sine mapped onto `[min, max]`,
/// reaching `max` in June and `min` in December.
fn seasonal_peak(min_height: f32, max_height: f32, month: f32) -> f32 {
    let seasonal = ((month - 3.0) * std::f32::consts::PI / 6.0).sin();
    let t = (seasonal + 1.0) / 2.0;
    min_height + (max_height - min_height) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_equator_noon_near_zenith() {
        let mode = SunMode::Standard { latitude: 0.0 };
        // March equinox-ish: declination small
        let h = mode.sun_height(12.0, 3);
        assert!(h > 80.0, "equator noon elevation {h}");
        assert!(mode.sun_height(0.0, 3) < -80.0);
    }

    #[test]
    fn test_standard_morning_afternoon_symmetric() {
        let mode = SunMode::Standard { latitude: 59.3 };
        let am = mode.sun_height(9.0, 6);
        let pm = mode.sun_height(15.0, 6);
        assert!((am - pm).abs() < 1e-3);
        assert!(mode.sun_height(12.0, 6) > am);
    }

    #[test]
    fn test_antarctic_polar_night_is_flat() {
        let mode = SunMode::antarctic();
        // December: seasonal factor -1, peak = min height
        for hour in [0.0, 6.0, 12.0, 18.0] {
            assert!((mode.sun_height(hour, 12) - -15.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_antarctic_polar_day_circles() {
        let mode = SunMode::antarctic();
        // June: seasonal factor +1, peak = max height
        assert!((mode.sun_height(18.0, 6) - 47.0).abs() < 1e-2);
        assert!((mode.sun_height(6.0, 6) - -47.0).abs() < 1e-2);
        assert!(mode.sun_height(12.0, 6).abs() < 1e-3);
    }

    #[test]
    fn test_custom_arc_peaks_at_noon() {
        let mode = SunMode::Custom { max_height: 60.0, min_height: 20.0 };
        let noon = mode.sun_height(12.0, 6);
        assert!((noon - 60.0).abs() < 1e-3);
        assert!(mode.sun_height(0.0, 6).abs() < 1e-3);
        assert!(mode.sun_height(6.0, 6) < noon);
        // Off-season peak drops to the minimum height
        assert!((mode.sun_height(12.0, 12) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_sanitize_orders_heights() {
        let mut mode = SunMode::Custom { max_height: -120.0, min_height: 30.0 };
        mode.sanitize();
        assert_eq!(mode, SunMode::Custom { max_height: 30.0, min_height: -90.0 });

        let mut std_mode = SunMode::Standard { latitude: 100.0 };
        std_mode.sanitize();
        assert_eq!(std_mode, SunMode::Standard { latitude: 90.0 });
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&SunMode::antarctic()).expect("serialize");
        assert!(json.contains("\"type\":\"Antarctic\""));
        let back: SunMode = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, SunMode::antarctic());
    }
}
