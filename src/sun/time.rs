//! 24-hour clock with day counting.

/// Hours in one in-game day.
pub const HOURS_PER_DAY: f32 = 24.0;

/// Current hour within the day plus the number of days that have rolled
/// over.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeOfDay {
    /// `[0.0, 24.0)`
    hour: f32,
    day_count: u32,
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::new(12.0)
    }
}

impl TimeOfDay {
    pub fn new(start_hour: f32) -> Self {
        let mut time = Self { hour: 0.0, day_count: 0 };
        time.set(start_hour);
        time
    }

    /// Advance by `dt_seconds` of real time, where one in-game day lasts
    /// `day_length_seconds`. A non-positive day length freezes the clock.
    pub fn advance(&mut self, dt_seconds: f32, day_length_seconds: f32) {
        if day_length_seconds <= 0.0 || dt_seconds <= 0.0 {
            return;
        }
        self.hour += dt_seconds * HOURS_PER_DAY / day_length_seconds;
        while self.hour >= HOURS_PER_DAY {
            self.hour -= HOURS_PER_DAY;
            self.day_count += 1;
        }
    }

    /// Jump to `hour`, clamped to `[0, 24]`. 24 reads back as 0.
    pub fn set(&mut self, hour: f32) {
        let hour = if hour.is_nan() { 0.0 } else { hour.clamp(0.0, HOURS_PER_DAY) };
        self.hour = if hour >= HOURS_PER_DAY { 0.0 } else { hour };
    }

    #[inline]
    pub fn hour(&self) -> f32 {
        self.hour
    }

    #[inline]
    pub fn day_count(&self) -> u32 {
        self.day_count
    }
}
