//! Time-of-day phase helpers and weighted random state selection.

use rand::Rng;

use crate::weather::lerp::clamp01;
use crate::weather::state::WeatherState;

/// First hour of the day window (inclusive).
pub const DAY_START_HOUR: f32 = 6.0;
/// First hour of the night window (inclusive).
pub const DAY_END_HOUR: f32 = 18.0;

/// Whether `hour` falls in the day window `[6, 18)`.
#[inline]
pub fn is_day(hour: f32) -> bool {
    (DAY_START_HOUR..DAY_END_HOUR).contains(&hour)
}

/// Day/night factor in `[0, 1]`: 0 at full night, 1 at full day.
///
/// The clock is folded around noon, then hours 3..9 ramp linearly from 0 to 1.
pub fn day_night_factor(hour: f32) -> f32 {
    let folded = if hour > 12.0 { 24.0 - hour } else { hour };
    clamp01((folded - 3.0) / 6.0)
}

/// Selection pool: `(index, weight)` for every state except `exclude`, with
/// zero-weight states for the current phase dropped.
pub fn candidate_weights(
    states: &[WeatherState],
    exclude: Option<usize>,
    is_day: bool,
) -> Vec<(usize, f32)> {
    states
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != exclude)
        .map(|(i, s)| (i, s.weight(is_day)))
        .filter(|(_, w)| *w > 0.0)
        .collect()
}

/// Roulette-wheel pick: the first candidate whose cumulative weight is
/// `>= roll`. Rolls past the total (float drift) land on the last candidate.
pub fn pick_weighted(candidates: &[(usize, f32)], roll: f32) -> Option<usize> {
    let mut cumulative = 0.0;
    for &(index, weight) in candidates {
        cumulative += weight;
        if cumulative >= roll {
            return Some(index);
        }
    }
    candidates.last().map(|&(index, _)| index)
}

/// Draw a roll in `[0, total)` and pick from `candidates`. `None` when the
/// pool is empty.
pub fn select<R: Rng>(rng: &mut R, candidates: &[(usize, f32)]) -> Option<usize> {
    let total: f32 = candidates.iter().map(|(_, w)| w).sum();
    if candidates.is_empty() || total <= 0.0 {
        return None;
    }
    let roll = rng.gen_range(0.0..total);
    pick_weighted(candidates, roll)
}

/// Uniform duration in `[min, max]`.
pub fn draw_duration<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if lo == hi {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn weighted(weights: &[f32]) -> Vec<WeatherState> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| WeatherState {
                day_time_probability: w,
                night_time_probability: w,
                ..WeatherState::named(format!("S{i}"))
            })
            .collect()
    }

    #[test]
    fn test_day_window_boundaries() {
        assert!(!is_day(5.99));
        assert!(is_day(6.0));
        assert!(is_day(17.99));
        assert!(!is_day(18.0));
        assert!(!is_day(0.0));
    }

    #[test]
    fn test_day_night_factor_boundaries() {
        assert_eq!(day_night_factor(3.0), 0.0);
        assert_eq!(day_night_factor(9.0), 1.0);
        assert_eq!(day_night_factor(12.0), 1.0);
        assert_eq!(day_night_factor(21.0), 0.0);
        assert_eq!(day_night_factor(15.0), 1.0);
        assert_eq!(day_night_factor(0.0), 0.0);
        assert!((day_night_factor(6.0) - 0.5).abs() < 1e-6);
        assert!((day_night_factor(18.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_candidates_exclude_current_and_zero_weight() {
        let states = WeatherState::presets();
        // Fog has zero day weight
        let day = candidate_weights(&states, Some(0), true);
        let day_idx: Vec<usize> = day.iter().map(|(i, _)| *i).collect();
        assert_eq!(day_idx, vec![1, 2]);

        let night = candidate_weights(&states, Some(0), false);
        assert_eq!(night.len(), 3);
        assert_eq!(night[2], (3, 0.3));
    }

    #[test]
    fn test_pick_weighted_cumulative() {
        let pool = vec![(0, 0.2), (1, 0.3), (2, 0.5)];
        assert_eq!(pick_weighted(&pool, 0.0), Some(0));
        assert_eq!(pick_weighted(&pool, 0.2), Some(0));
        assert_eq!(pick_weighted(&pool, 0.21), Some(1));
        assert_eq!(pick_weighted(&pool, 0.99), Some(2));
        assert_eq!(pick_weighted(&pool, 5.0), Some(2));
        assert_eq!(pick_weighted(&[], 0.1), None);
    }

    #[test]
    fn test_selection_frequencies_match_weights() {
        let pool = candidate_weights(&weighted(&[0.2, 0.3, 0.5, 0.0]), None, true);
        assert_eq!(pool.len(), 3);

        const DRAWS: usize = 100_000;
        let mut counts = [0usize; 4];
        for k in 0..DRAWS {
            // Evenly spaced rolls across [0, 1)
            let roll = (k as f32 + 0.5) / DRAWS as f32;
            if let Some(i) = pick_weighted(&pool, roll) {
                counts[i] += 1;
            }
        }
        for (i, expected) in [0.2, 0.3, 0.5].into_iter().enumerate() {
            let observed = counts[i] as f32 / DRAWS as f32;
            assert!(
                (observed - expected).abs() < 0.01,
                "state {i}: observed {observed}, expected {expected}"
            );
        }
        assert_eq!(counts[3], 0, "zero-weight state was picked");
    }

    #[test]
    fn test_seeded_select_never_picks_zero_weight() {
        let states = weighted(&[0.2, 0.0, 0.8]);
        let pool = candidate_weights(&states, None, false);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let picked = select(&mut rng, &pool).expect("pool not empty");
            assert_ne!(picked, 1);
        }
    }

    #[test]
    fn test_select_empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select(&mut rng, &[]), None);
        let only_zero = candidate_weights(&weighted(&[0.0, 0.0]), None, true);
        assert_eq!(select(&mut rng, &only_zero), None);
    }

    #[test]
    fn test_draw_duration_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let d = draw_duration(&mut rng, 300.0, 1200.0);
            assert!((300.0..=1200.0).contains(&d));
        }
        assert_eq!(draw_duration(&mut rng, 50.0, 50.0), 50.0);
        let swapped = draw_duration(&mut rng, 20.0, 10.0);
        assert!((10.0..=20.0).contains(&swapped));
    }
}
