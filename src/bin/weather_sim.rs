//! Headless weather simulation.
//!
//! Runs the weather manager against in-memory render targets and logs every
//! notification it emits.
//!
//! Usage: cargo run --release --bin weather_sim -- --seconds 3600 --step 0.5
//!
//! Flags:
//!   --config <path>     weather config JSON (default: built-in presets)
//!   --commands <path>   JSON control commands, one per line, run before ticking
//!   --write-config <path>  save the effective config and exit
//!   --seconds <N>       simulated seconds (default 1800)
//!   --step <dt>         tick length in seconds (default 0.5)
//!   --seed <N>          RNG seed for random selection
//!   --start <hour>      starting time of day (default 12)
//!   --day-minutes <N>   real minutes per in-game day (default 24)
//!   --report <N>        seconds between status lines (default 60)

use std::path::PathBuf;

use skyblend::core::logging;
use skyblend::core::types::{shared, Result};
use skyblend::sun::{AuroraController, AuroraLayer, SunConfig, SunController, TimeSource};
use skyblend::weather::target::EmitterParams;
use skyblend::weather::{
    CloudLayer, FogVolume, RainAudio, RainEmitter, VolumeProfile, WeatherConfig, WeatherStateManager,
};

/// Particle system stand-in that only tracks its parameters.
#[derive(Default)]
struct HeadlessEmitter {
    playing: bool,
    params: EmitterParams,
}

impl RainEmitter for HeadlessEmitter {
    fn is_playing(&self) -> bool {
        self.playing
    }
    fn play(&mut self) {
        log::info!("Rain emitter started");
        self.playing = true;
    }
    fn stop(&mut self) {
        log::info!("Rain emitter stopped");
        self.playing = false;
    }
    fn params(&self) -> EmitterParams {
        self.params.clone()
    }
    fn set_params(&mut self, params: EmitterParams) {
        self.params = params;
    }
}

#[derive(Default)]
struct HeadlessAudio {
    playing: bool,
    volume: f32,
}

impl RainAudio for HeadlessAudio {
    fn is_playing(&self) -> bool {
        self.playing
    }
    fn play(&mut self) {
        self.playing = true;
    }
    fn stop(&mut self) {
        self.playing = false;
    }
    fn volume(&self) -> f32 {
        self.volume
    }
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let seconds = parse_f32_arg(&args, "--seconds").unwrap_or(1800.0);
    let step = parse_f32_arg(&args, "--step").unwrap_or(0.5).max(0.001);
    let report = parse_f32_arg(&args, "--report").unwrap_or(60.0);
    let start = parse_f32_arg(&args, "--start").unwrap_or(12.0);
    let day_minutes = parse_f32_arg(&args, "--day-minutes").unwrap_or(24.0);

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => WeatherConfig::load(&path)?,
        None => WeatherConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.seed = Some(seed);
    }
    if let Err(e) = config.validate() {
        log::warn!("{e}");
    }

    if let Some(path) = parse_str_arg(&args, "--write-config") {
        let path = PathBuf::from(path);
        config.save(&path)?;
        println!("Wrote weather config to {}", path.display());
        return Ok(());
    }

    let fog = shared(FogVolume::default());
    let clouds = shared(CloudLayer::default());
    let rain = shared(HeadlessEmitter::default());
    let audio = shared(HeadlessAudio::default());
    let profile = VolumeProfile::new()
        .with_fog(fog.clone())
        .with_clouds(clouds.clone())
        .with_rain(rain.clone())
        .with_rain_audio(audio.clone());

    let sun_config = SunConfig {
        start_time: start,
        day_length_minutes: day_minutes,
        ..Default::default()
    };
    let sun = shared(SunController::new(&sun_config));
    let aurora_layer = shared(AuroraLayer::default());
    let mut aurora = AuroraController::new(sun_config.aurora.clone()).with_layer(aurora_layer.clone());

    let mut manager = WeatherStateManager::new(config, &profile).with_time_source(sun.clone());
    let events = manager.events_mut();
    events.on_weather_state_start_transition(|old, new| {
        log::info!("[event] start transition: {} -> {}", old.name, new.name);
    });
    events.on_weather_state_changed(|old, new| {
        log::info!("[event] state changed: {} -> {}", old.name, new.name);
    });
    events.on_time_of_day_changed(|hour| {
        log::debug!("[event] time of day {hour:.2}");
    });

    if let Some(path) = parse_str_arg(&args, "--commands") {
        let script = std::fs::read_to_string(&path)?;
        for line in script.lines().filter(|l| !l.trim().is_empty()) {
            println!("> {}", line.trim());
            println!("< {}", manager.execute_line(line));
        }
    }

    println!("=== Weather simulation ===");
    println!("States: {}", manager.available_states().iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", "));
    println!("Duration: {seconds}s, step {step}s");

    let mut elapsed = 0.0_f32;
    let mut next_report = 0.0_f32;
    while elapsed < seconds {
        sun.borrow_mut().update(step);
        aurora.update(step, &sun.borrow());
        manager.update(step);
        elapsed += step;

        if elapsed >= next_report {
            next_report += report.max(step);
            let status = manager.status();
            let sun = sun.borrow();
            println!(
                "t={:>7.1}s  {:>5.2}h  elev {:>6.1}°  {} -> {} ({:>3.0}%)  next pick {:>6.1}s  fog mfp {:>7.1}  clouds {:.2}  rain {:>6.1}/s  aurora {:.2}",
                elapsed,
                sun.current_time(),
                sun.elevation(),
                status.current_state.as_deref().unwrap_or("-"),
                status.target_state.as_deref().unwrap_or("-"),
                status.transition_progress * 100.0,
                status.weather_timer,
                fog.borrow().mean_free_path,
                clouds.borrow().opacity,
                rain.borrow().params.rate_over_time,
                aurora_layer.borrow().color[3],
            );
        }
    }

    println!("Done after {} in-game day(s)", sun.borrow().day_count());
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
