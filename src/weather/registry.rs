//! Kind-keyed registry of aspect appliers.

use std::collections::BTreeMap;

use crate::weather::aspect::{
    AspectApplier, AspectKind, CloudApplier, FogApplier, RainApplier,
};
use crate::weather::snapshot::WeatherSnapshot;
use crate::weather::target::VolumeProfile;

/// Owns the active appliers and fans snapshot operations out to them.
///
/// New aspect kinds are added by registering another applier; the manager
/// never addresses an aspect directly.
#[derive(Default)]
pub struct AspectRegistry {
    appliers: BTreeMap<AspectKind, Box<dyn AspectApplier>>,
}

impl AspectRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the fog, cloud and rain appliers bound to `profile`.
    pub fn with_defaults(profile: &VolumeProfile) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FogApplier::new()), profile);
        registry.register(Box::new(CloudApplier::new()), profile);
        registry.register(Box::new(RainApplier::new()), profile);
        registry
    }

    /// Bind `applier` to `profile` and store it under its kind, replacing
    /// any previous applier of that kind. Appliers that fail to bind are
    /// still registered, inert.
    pub fn register(&mut self, mut applier: Box<dyn AspectApplier>, profile: &VolumeProfile) {
        let kind = applier.kind();
        if !applier.initialize(profile) {
            log::warn!("{kind} applier is inactive for this run");
        }
        if self.appliers.insert(kind, applier).is_some() {
            log::debug!("Replaced {kind} applier");
        }
    }

    pub fn get(&self, kind: AspectKind) -> Option<&dyn AspectApplier> {
        self.appliers.get(&kind).map(|a| a.as_ref())
    }

    pub fn get_mut(&mut self, kind: AspectKind) -> Option<&mut (dyn AspectApplier + 'static)> {
        self.appliers.get_mut(&kind).map(|a| a.as_mut())
    }

    pub fn kinds(&self) -> impl Iterator<Item = AspectKind> + '_ {
        self.appliers.keys().copied()
    }

    /// Number of registered appliers that bound successfully.
    pub fn active_count(&self) -> usize {
        self.appliers.values().filter(|a| a.is_active()).count()
    }

    pub fn len(&self) -> usize {
        self.appliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appliers.is_empty()
    }

    /// Apply every aspect of `snapshot` that has a registered applier.
    pub fn apply_immediate(&mut self, snapshot: &WeatherSnapshot) {
        for (kind, applier) in &mut self.appliers {
            if let Some(data) = snapshot.get(*kind) {
                applier.apply_immediate(data);
            }
        }
    }

    /// Blend and apply every aspect present in both snapshots.
    pub fn interpolate_all(&mut self, from: &WeatherSnapshot, to: &WeatherSnapshot, t: f32) {
        for (kind, applier) in &mut self.appliers {
            if let (Some(a), Some(b)) = (from.get(*kind), to.get(*kind)) {
                applier.interpolate(a, b, t);
            }
        }
    }

    /// Read back the live value of every active aspect.
    pub fn create_snapshot(&self) -> WeatherSnapshot {
        self.appliers
            .values()
            .filter_map(|a| a.create_snapshot())
            .collect()
    }

    /// Forward a day/night factor to every aspect that reacts to time of day.
    pub fn update_time_of_day(&mut self, snapshot: &WeatherSnapshot, day_night_factor: f32) {
        for (kind, applier) in &mut self.appliers {
            if let Some(data) = snapshot.get(*kind) {
                applier.update_time_of_day(data, day_night_factor);
            }
        }
    }
}

impl std::fmt::Debug for AspectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.appliers.iter().map(|(k, a)| (k, a.is_active())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{shared, Shared};
    use crate::weather::aspect::{AspectData, FogData};
    use crate::weather::state::WeatherState;
    use crate::weather::target::{CloudLayer, FogVolume};

    fn fog_and_clouds() -> (AspectRegistry, Shared<FogVolume>, Shared<CloudLayer>) {
        let fog = shared(FogVolume::default());
        let clouds = shared(CloudLayer::default());
        let profile = VolumeProfile::new()
            .with_fog(fog.clone())
            .with_clouds(clouds.clone());
        (AspectRegistry::with_defaults(&profile), fog, clouds)
    }

    #[test]
    fn test_missing_target_leaves_others_working() {
        let (mut registry, fog, clouds) = fog_and_clouds();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.active_count(), 2);
        assert!(!registry.get(AspectKind::Rain).map(|a| a.is_active()).unwrap_or(true));

        let rain = WeatherState::rain();
        registry.apply_immediate(&WeatherSnapshot::from_state(&rain));
        assert_eq!(fog.borrow().mean_free_path, rain.fog.mean_free_path);
        assert_eq!(clouds.borrow().altitude, rain.clouds.altitude);
    }

    #[test]
    fn test_create_snapshot_skips_inactive() {
        let (mut registry, _fog, _clouds) = fog_and_clouds();
        registry.apply_immediate(&WeatherSnapshot::from_state(&WeatherState::overcast()));
        let snap = registry.create_snapshot();
        assert!(snap.contains(AspectKind::Fog));
        assert!(snap.contains(AspectKind::Cloud));
        assert!(!snap.contains(AspectKind::Rain));
    }

    #[test]
    fn test_snapshot_round_trip_leaves_targets_unchanged() {
        let (mut registry, fog, clouds) = fog_and_clouds();
        registry.apply_immediate(&WeatherSnapshot::from_state(&WeatherState::fog()));
        let fog_before = fog.borrow().clone();
        let clouds_before = clouds.borrow().clone();

        let snap = registry.create_snapshot();
        registry.apply_immediate(&snap);
        assert_eq!(*fog.borrow(), fog_before);
        assert_eq!(*clouds.borrow(), clouds_before);
    }

    #[test]
    fn test_interpolate_all_blends_shared_kinds() {
        let (mut registry, fog, _clouds) = fog_and_clouds();
        let a = WeatherSnapshot::from_state(&WeatherState::clear());
        let b = WeatherSnapshot::from_state(&WeatherState::fog());
        registry.interpolate_all(&a, &b, 0.5);
        let expected = (WeatherState::clear().fog.mean_free_path + WeatherState::fog().fog.mean_free_path) / 2.0;
        assert!((fog.borrow().mean_free_path - expected).abs() < 1e-3);
    }

    #[test]
    fn test_update_time_of_day_reaches_fog() {
        let (mut registry, fog, _clouds) = fog_and_clouds();
        let snap: WeatherSnapshot = [AspectData::Fog(FogData::default())].into_iter().collect();
        registry.update_time_of_day(&snap, 0.0);
        assert!((fog.borrow().mean_free_path - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_register_replaces_kind() {
        let (mut registry, _fog, _clouds) = fog_and_clouds();
        registry.register(Box::new(FogApplier::new()), &VolumeProfile::new());
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.active_count(), 1);
    }
}
