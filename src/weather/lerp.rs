//! Interpolation primitives shared by every weather aspect.
//!
//! Continuous parameters blend linearly. Discrete parameters (toggles,
//! enum-like flags, step counts) cannot be crossfaded and switch from the
//! source to the destination value at the halfway point of a blend.

// ---------------------------------------------------------------------------
// Lerp trait
// ---------------------------------------------------------------------------

/// Trait for types that can be linearly interpolated.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for [f32; 3] {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        [
            self[0] + (other[0] - self[0]) * t,
            self[1] + (other[1] - self[1]) * t,
            self[2] + (other[2] - self[2]) * t,
        ]
    }
}

impl Lerp for [f32; 4] {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        [
            self[0] + (other[0] - self[0]) * t,
            self[1] + (other[1] - self[1]) * t,
            self[2] + (other[2] - self[2]) * t,
            self[3] + (other[3] - self[3]) * t,
        ]
    }
}

// ---------------------------------------------------------------------------
// Discrete helpers
// ---------------------------------------------------------------------------

/// Blend factor at which discrete values switch from `from` to `to`.
pub const STEP_THRESHOLD: f32 = 0.5;

/// Step interpolation: `from` while `t < 0.5`, `to` afterwards.
#[inline]
pub fn step<T: Clone>(from: &T, to: &T, t: f32) -> T {
    if t < STEP_THRESHOLD {
        from.clone()
    } else {
        to.clone()
    }
}

/// Interpolate an integer count and round to the nearest integer
/// (halfway cases round to even).
#[inline]
pub fn lerp_count(from: u32, to: u32, t: f32) -> u32 {
    let v = (from as f32).lerp(&(to as f32), t);
    v.round_ties_even().max(0.0) as u32
}

/// Clamp to `[0.0, 1.0]`.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
