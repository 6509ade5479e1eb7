//! Weather aspects: one orthogonal weather dimension each (fog, clouds,
//! rain).
//!
//! Every aspect contributes two pieces:
//! - a data record implementing [`ComponentData`] (pure value, blendable)
//! - an applier implementing [`AspectApplier`] that pushes data onto a live
//!   render/audio target and reads it back
//!
//! [`AspectData`] is the kind-tagged union the snapshot and registry layers
//! pass around. Handing an applier data of the wrong kind is a no-op.

pub mod cloud;
pub mod fog;
pub mod rain;

use serde::{Deserialize, Serialize};

use crate::weather::target::VolumeProfile;

pub use cloud::{CloudApplier, CloudData};
pub use fog::{FogApplier, FogData};
pub use rain::{RainApplier, RainData};

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Identifies an aspect. Used as the key of snapshots and the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AspectKind {
    Fog,
    Cloud,
    Rain,
}

impl AspectKind {
    /// Every built-in kind, in registry order.
    pub const ALL: [AspectKind; 3] = [AspectKind::Fog, AspectKind::Cloud, AspectKind::Rain];

    pub fn name(self) -> &'static str {
        match self {
            Self::Fog => "fog",
            Self::Cloud => "cloud",
            Self::Rain => "rain",
        }
    }
}

impl std::fmt::Display for AspectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Component data
// ---------------------------------------------------------------------------

/// Value object holding one aspect's parameters.
///
/// `interpolate` is pure: it never mutates either operand. Continuous fields
/// blend linearly, discrete fields use [`step`](crate::weather::lerp::step).
pub trait ComponentData: Clone + PartialEq {
    const KIND: AspectKind;

    /// Blend `self` towards `other` by `t` in `[0, 1]`.
    fn interpolate(&self, other: &Self, t: f32) -> Self;

    /// Field-wise assignment from `other`.
    fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }
}

/// Kind-tagged aspect data.
#[derive(Clone, Debug, PartialEq)]
pub enum AspectData {
    Fog(FogData),
    Cloud(CloudData),
    Rain(RainData),
}

impl AspectData {
    pub fn kind(&self) -> AspectKind {
        match self {
            Self::Fog(_) => AspectKind::Fog,
            Self::Cloud(_) => AspectKind::Cloud,
            Self::Rain(_) => AspectKind::Rain,
        }
    }

    /// Blend towards `other`. If the kinds differ there is no interpolation
    /// partner and `self` is returned unchanged.
    pub fn interpolate(&self, other: &Self, t: f32) -> Self {
        match (self, other) {
            (Self::Fog(a), Self::Fog(b)) => Self::Fog(a.interpolate(b, t)),
            (Self::Cloud(a), Self::Cloud(b)) => Self::Cloud(a.interpolate(b, t)),
            (Self::Rain(a), Self::Rain(b)) => Self::Rain(a.interpolate(b, t)),
            _ => self.clone(),
        }
    }

    /// In-place assignment. Returns false (and leaves `self` untouched) if
    /// the kinds differ.
    pub fn copy_from(&mut self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fog(a), Self::Fog(b)) => a.copy_from(b),
            (Self::Cloud(a), Self::Cloud(b)) => a.copy_from(b),
            (Self::Rain(a), Self::Rain(b)) => a.copy_from(b),
            _ => return false,
        }
        true
    }

    pub fn as_fog(&self) -> Option<&FogData> {
        match self {
            Self::Fog(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_cloud(&self) -> Option<&CloudData> {
        match self {
            Self::Cloud(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_rain(&self) -> Option<&RainData> {
        match self {
            Self::Rain(d) => Some(d),
            _ => None,
        }
    }
}

impl From<FogData> for AspectData {
    fn from(d: FogData) -> Self {
        Self::Fog(d)
    }
}

impl From<CloudData> for AspectData {
    fn from(d: CloudData) -> Self {
        Self::Cloud(d)
    }
}

impl From<RainData> for AspectData {
    fn from(d: RainData) -> Self {
        Self::Rain(d)
    }
}

// ---------------------------------------------------------------------------
// Applier
// ---------------------------------------------------------------------------

/// Translates aspect data into live render/audio parameters.
///
/// An applier that fails to bind in [`initialize`](Self::initialize) stays
/// inactive for the rest of the run and every other call becomes a no-op.
pub trait AspectApplier {
    fn kind(&self) -> AspectKind;

    /// Bind to the target this aspect drives. Returns whether binding
    /// succeeded; failures are logged, never propagated.
    fn initialize(&mut self, profile: &VolumeProfile) -> bool;

    fn is_active(&self) -> bool;

    /// Push every field of `data` onto the live target.
    fn apply_immediate(&mut self, data: &AspectData);

    /// Blend `from` towards `to` and apply the result.
    fn interpolate(&mut self, from: &AspectData, to: &AspectData, t: f32) {
        if !self.is_active() || from.kind() != self.kind() || to.kind() != self.kind() {
            return;
        }
        self.apply_immediate(&from.interpolate(to, t));
    }

    /// Read the live target back into a fresh data record. `None` while
    /// inactive.
    fn create_snapshot(&self) -> Option<AspectData>;

    /// Time-of-day modulation hook. `day_night_factor` is 0 at night and 1
    /// during the day; `data` is the currently settled value of this aspect.
    fn update_time_of_day(&mut self, _data: &AspectData, _day_night_factor: f32) {}
}
