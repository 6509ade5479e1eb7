//! Point-in-time values for every weather aspect.

use std::collections::BTreeMap;

use crate::weather::aspect::{AspectData, AspectKind};
use crate::weather::state::WeatherState;

/// Aspect data keyed by kind. Either extracted from an authored
/// [`WeatherState`] or produced by blending two snapshots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherSnapshot {
    aspects: BTreeMap<AspectKind, AspectData>,
}

impl WeatherSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity extraction of every aspect block of `state`.
    pub fn from_state(state: &WeatherState) -> Self {
        let mut snapshot = Self::new();
        snapshot.insert(AspectData::Fog(state.fog.clone()));
        snapshot.insert(AspectData::Cloud(state.clouds.clone()));
        snapshot.insert(AspectData::Rain(state.rain.clone()));
        snapshot
    }

    /// Blend `from` towards `to` by `t`.
    ///
    /// The result holds the union of both kind sets. A kind present on only
    /// one side passes through unchanged.
    pub fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        let mut aspects = BTreeMap::new();
        for (kind, a) in &from.aspects {
            let blended = match to.aspects.get(kind) {
                Some(b) => a.interpolate(b, t),
                None => a.clone(),
            };
            aspects.insert(*kind, blended);
        }
        for (kind, b) in &to.aspects {
            aspects.entry(*kind).or_insert_with(|| b.clone());
        }
        Self { aspects }
    }

    /// Insert (or replace) the data for its kind.
    pub fn insert(&mut self, data: AspectData) -> Option<AspectData> {
        self.aspects.insert(data.kind(), data)
    }

    pub fn get(&self, kind: AspectKind) -> Option<&AspectData> {
        self.aspects.get(&kind)
    }

    pub fn remove(&mut self, kind: AspectKind) -> Option<AspectData> {
        self.aspects.remove(&kind)
    }

    pub fn contains(&self, kind: AspectKind) -> bool {
        self.aspects.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = AspectKind> + '_ {
        self.aspects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AspectData> {
        self.aspects.values()
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }
}

impl FromIterator<AspectData> for WeatherSnapshot {
    fn from_iter<I: IntoIterator<Item = AspectData>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for data in iter {
            snapshot.insert(data);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::aspect::{CloudData, FogData, RainData};
    use crate::weather::state::WeatherState;

    #[test]
    fn test_from_state_has_every_kind() {
        let snap = WeatherSnapshot::from_state(&WeatherState::clear());
        assert_eq!(snap.len(), 3);
        for kind in AspectKind::ALL {
            assert!(snap.contains(kind), "missing {kind}");
        }
        assert_eq!(snap.get(AspectKind::Fog), Some(&AspectData::Fog(WeatherState::clear().fog)));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = WeatherSnapshot::from_state(&WeatherState::clear());
        let b = WeatherSnapshot::from_state(&WeatherState::rain());
        assert_eq!(WeatherSnapshot::lerp(&a, &b, 0.0), a);
        let end = WeatherSnapshot::lerp(&a, &b, 1.0);
        let fog = end.get(AspectKind::Fog).and_then(AspectData::as_fog).expect("fog");
        assert!((fog.mean_free_path - WeatherState::rain().fog.mean_free_path).abs() < 1e-3);
        let rain = end.get(AspectKind::Rain).and_then(AspectData::as_rain).expect("rain");
        assert!(rain.enabled);
        assert!((rain.intensity - WeatherState::rain().rain.intensity).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_union_passes_through_unpaired_kinds() {
        let a: WeatherSnapshot = [
            AspectData::Fog(FogData::default()),
            AspectData::Cloud(CloudData::default()),
        ]
        .into_iter()
        .collect();
        let rain = RainData { enabled: true, intensity: 0.8, ..Default::default() };
        let b: WeatherSnapshot = [
            AspectData::Fog(FogData { mean_free_path: 0.0, ..Default::default() }),
            AspectData::Rain(rain.clone()),
        ]
        .into_iter()
        .collect();

        let mid = WeatherSnapshot::lerp(&a, &b, 0.5);
        assert_eq!(mid.len(), 3);
        // Only `a` has clouds, only `b` has rain: both pass through untouched
        assert_eq!(mid.get(AspectKind::Cloud), Some(&AspectData::Cloud(CloudData::default())));
        assert_eq!(mid.get(AspectKind::Rain), Some(&AspectData::Rain(rain)));
        let fog = mid.get(AspectKind::Fog).and_then(AspectData::as_fog).expect("fog blended");
        assert!((fog.mean_free_path - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_insert_replaces_same_kind() {
        let mut snap = WeatherSnapshot::new();
        assert!(snap.insert(AspectData::Rain(RainData::default())).is_none());
        assert!(snap.insert(AspectData::Rain(RainData::default())).is_some());
        assert_eq!(snap.len(), 1);
        assert!(snap.remove(AspectKind::Rain).is_some());
        assert!(snap.is_empty());
    }
}
