use criterion::{criterion_group, criterion_main, Criterion, black_box};

use skyblend::core::types::shared;
use skyblend::weather::{
    AspectRegistry, CloudLayer, FogVolume, VolumeProfile, WeatherConfig, WeatherSnapshot,
    WeatherState, WeatherStateManager,
};
use skyblend::weather::selection::{candidate_weights, pick_weighted};

fn bench_snapshot_lerp(c: &mut Criterion) {
    let a = WeatherSnapshot::from_state(&WeatherState::clear());
    let b = WeatherSnapshot::from_state(&WeatherState::rain());

    c.bench_function("snapshot_lerp", |bench| {
        let mut t = 0.0f32;
        bench.iter(|| {
            t = (t + 0.013) % 1.0;
            WeatherSnapshot::lerp(black_box(&a), black_box(&b), black_box(t))
        });
    });
}

fn bench_registry_interpolate(c: &mut Criterion) {
    let profile = VolumeProfile::new()
        .with_fog(shared(FogVolume::default()))
        .with_clouds(shared(CloudLayer::default()));
    let mut registry = AspectRegistry::with_defaults(&profile);
    let a = WeatherSnapshot::from_state(&WeatherState::overcast());
    let b = WeatherSnapshot::from_state(&WeatherState::fog());

    c.bench_function("registry_interpolate_all", |bench| {
        bench.iter(|| registry.interpolate_all(black_box(&a), black_box(&b), black_box(0.37)));
    });
}

fn bench_weighted_pick(c: &mut Criterion) {
    let states: Vec<WeatherState> = (0..32)
        .map(|i| WeatherState {
            day_time_probability: (i % 5) as f32 * 0.25,
            ..WeatherState::named(format!("S{i}"))
        })
        .collect();

    c.bench_function("weighted_pick_32_states", |bench| {
        let mut roll = 0.0f32;
        bench.iter(|| {
            roll = (roll + 0.77) % 15.0;
            let pool = candidate_weights(black_box(&states), Some(3), true);
            pick_weighted(&pool, roll)
        });
    });
}

fn bench_manager_tick(c: &mut Criterion) {
    let profile = VolumeProfile::new()
        .with_fog(shared(FogVolume::default()))
        .with_clouds(shared(CloudLayer::default()));
    let config = WeatherConfig {
        seed: Some(99),
        weather_check_interval: 5.0,
        ..Default::default()
    };
    let mut manager = WeatherStateManager::new(config, &profile);
    manager.set_random_weather_enabled(true);

    c.bench_function("manager_tick_60hz", |bench| {
        bench.iter(|| manager.update(black_box(1.0 / 60.0)));
    });
}

criterion_group!(
    benches,
    bench_snapshot_lerp,
    bench_registry_interpolate,
    bench_weighted_pick,
    bench_manager_tick,
);

criterion_main!(benches);
