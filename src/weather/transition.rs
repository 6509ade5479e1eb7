//! Transition state machine: blends the current snapshot towards a target
//! over a fixed duration and can be retargeted mid-flight without a jump.

use crate::weather::lerp::clamp01;
use crate::weather::snapshot::WeatherSnapshot;
use crate::weather::state::WeatherState;

/// Fraction of the duration left over at which a blend counts as finished.
/// Frame steps rarely sum to the duration exactly.
pub const COMPLETION_TOLERANCE: f64 = 1e-5;

/// Holds the snapshot being blended from, the snapshot being blended to,
/// and the blend clock.
///
/// Idle while `active` is false; `current` is then the settled value.
#[derive(Clone, Debug)]
pub struct TransitionHandler {
    current: WeatherSnapshot,
    target: WeatherSnapshot,
    /// Accumulated in f64 so thousands of small steps do not drift.
    elapsed: f64,
    duration: f32,
    active: bool,
}

impl TransitionHandler {
    /// Idle handler settled on `initial`.
    pub fn new(initial: WeatherSnapshot) -> Self {
        Self {
            target: initial.clone(),
            current: initial,
            elapsed: 0.0,
            duration: 0.0,
            active: false,
        }
    }

    /// Begin blending from `current` towards `target`'s snapshot.
    pub fn start(&mut self, current: WeatherSnapshot, target: &WeatherState, duration: f32) {
        self.start_towards(current, WeatherSnapshot::from_state(target), duration);
    }

    /// Begin blending from `current` towards an arbitrary snapshot.
    pub fn start_towards(&mut self, current: WeatherSnapshot, target: WeatherSnapshot, duration: f32) {
        self.current = current;
        self.target = target;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.active = true;
    }

    /// Advance the clock by `dt` seconds and return the blended snapshot for
    /// now.
    ///
    /// The call that reaches `t = 1` settles the handler (current becomes
    /// the target, exactly) and returns the target. While idle the settled
    /// snapshot is returned.
    pub fn advance(&mut self, dt: f32) -> WeatherSnapshot {
        if !self.active {
            return self.current.clone();
        }

        self.elapsed += f64::from(dt.max(0.0));
        let t = self.blend_factor();
        if t >= 1.0 {
            self.current = self.target.clone();
            self.active = false;
            return self.target.clone();
        }
        WeatherSnapshot::lerp(&self.current, &self.target, t)
    }

    /// Retarget towards `target` starting from the live blended value, so the
    /// output does not jump.
    pub fn interrupt(&mut self, target: &WeatherState, duration: f32) {
        let live = self.blended();
        log::debug!(
            "Transition interrupted at {:.0}%, retargeting to '{}'",
            self.progress() * 100.0,
            target.name
        );
        self.start(live, target, duration);
    }

    /// Jump straight to `snapshot` and go idle.
    pub fn settle(&mut self, snapshot: WeatherSnapshot) {
        self.target = snapshot.clone();
        self.current = snapshot;
        self.elapsed = 0.0;
        self.duration = 0.0;
        self.active = false;
    }

    /// Blended value at the current progress, without advancing.
    pub fn blended(&self) -> WeatherSnapshot {
        if !self.active {
            return self.current.clone();
        }
        let t = self.blend_factor();
        if t >= 1.0 {
            self.target.clone()
        } else {
            WeatherSnapshot::lerp(&self.current, &self.target, t)
        }
    }

    /// Progress in `[0, 1]`. 1 while idle.
    pub fn progress(&self) -> f32 {
        if self.active { self.blend_factor() } else { 1.0 }
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.active
    }

    pub fn current(&self) -> &WeatherSnapshot {
        &self.current
    }

    pub fn target(&self) -> &WeatherSnapshot {
        &self.target
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// `elapsed / duration` clamped; zero duration resolves to 1, as does
    /// anything within [`COMPLETION_TOLERANCE`] of the end.
    fn blend_factor(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let duration = f64::from(self.duration);
        if duration - self.elapsed <= duration * COMPLETION_TOLERANCE {
            return 1.0;
        }
        clamp01((self.elapsed / duration) as f32)
    }
}
