//! Weather orchestration: owns the state set, the transition handler and the
//! aspect registry, and runs the per-tick update.
//!
//! Tick order in [`WeatherStateManager::update`]:
//! 1. time-of-day check (notify + re-modulate when the hour moved ≥ 0.1)
//! 2. random selection timer (when enabled)
//! 3. transition advance, apply, completion

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::types::Shared;
use crate::sun::TimeSource;
use crate::weather::config::WeatherConfig;
use crate::weather::events::WeatherEvents;
use crate::weather::registry::AspectRegistry;
use crate::weather::selection;
use crate::weather::snapshot::WeatherSnapshot;
use crate::weather::state::WeatherState;
use crate::weather::target::VolumeProfile;
use crate::weather::transition::TransitionHandler;

/// Minimum change in hours before time-of-day listeners are notified.
pub const TIME_OF_DAY_THRESHOLD: f32 = 0.1;

/// Hour assumed when no time source is attached.
pub const FALLBACK_TIME_OF_DAY: f32 = 12.0;

pub struct WeatherStateManager {
    states: Vec<WeatherState>,
    current: Option<usize>,
    target: Option<usize>,

    handler: TransitionHandler,
    registry: AspectRegistry,
    events: WeatherEvents,
    time_source: Option<Shared<dyn TimeSource>>,
    rng: StdRng,

    /// Last snapshot pushed to the registry.
    applied: WeatherSnapshot,
    /// Seconds until the next random pick.
    weather_timer: f32,
    check_interval: f32,
    random_enabled: bool,
    /// False when there is nothing to run (no states configured).
    enabled: bool,
    last_time_of_day: f32,
    day_night_factor: Option<f32>,
}

impl WeatherStateManager {
    /// Build with the fog, cloud and rain appliers bound to `profile`.
    pub fn new(config: WeatherConfig, profile: &VolumeProfile) -> Self {
        Self::with_registry(config, AspectRegistry::with_defaults(profile))
    }

    /// Build around a caller-assembled registry.
    pub fn with_registry(config: WeatherConfig, registry: AspectRegistry) -> Self {
        let WeatherConfig {
            states,
            default_state,
            enable_random_weather,
            weather_check_interval,
            seed,
        } = config;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut manager = Self {
            states,
            current: None,
            target: None,
            handler: TransitionHandler::new(WeatherSnapshot::new()),
            registry,
            events: WeatherEvents::new(),
            time_source: None,
            rng,
            applied: WeatherSnapshot::new(),
            weather_timer: weather_check_interval,
            check_interval: weather_check_interval,
            random_enabled: enable_random_weather,
            enabled: true,
            last_time_of_day: -1.0,
            day_night_factor: None,
        };

        if manager.states.is_empty() {
            log::warn!("No weather states configured, weather system disabled");
            manager.enabled = false;
            return manager;
        }
        manager.warn_duplicate_names();

        let default = match default_state {
            Some(name) => manager.find_state(&name).unwrap_or_else(|| {
                log::warn!("Default weather state '{name}' not found, using first available state");
                0
            }),
            None => {
                log::warn!("No default weather state set, using first available state");
                0
            }
        };
        manager.set_initial_state(default);
        manager
    }

    /// Attach the clock the manager reads time of day from.
    pub fn with_time_source(mut self, source: Shared<dyn TimeSource>) -> Self {
        self.set_time_source(source);
        self
    }

    pub fn set_time_source(&mut self, source: Shared<dyn TimeSource>) {
        self.time_source = Some(source);
        self.last_time_of_day = -1.0;
    }

    fn warn_duplicate_names(&self) {
        let mut seen = HashSet::new();
        for state in &self.states {
            if !seen.insert(state.name.as_str()) {
                log::warn!("Duplicate weather state name '{}', later entry is unreachable by name", state.name);
            }
        }
    }

    fn set_initial_state(&mut self, index: usize) {
        let state = &self.states[index];
        let snapshot = WeatherSnapshot::from_state(state);
        self.weather_timer = selection::draw_duration(&mut self.rng, state.min_duration, state.max_duration);
        log::info!("Initial weather '{}', next change check in {:.0}s", state.name, self.weather_timer);

        self.current = Some(index);
        self.target = Some(index);
        self.handler.settle(snapshot.clone());
        self.apply(&snapshot);
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }

        self.update_time_of_day();

        if self.random_enabled {
            self.weather_timer -= dt;
            if self.weather_timer <= 0.0 {
                self.select_random_weather();
            }
        }

        if self.handler.is_transitioning() {
            let snapshot = self.handler.advance(dt);
            self.apply(&snapshot);
            if !self.handler.is_transitioning() {
                self.complete_transition();
            }
        }
    }

    fn update_time_of_day(&mut self) {
        let Some(source) = &self.time_source else {
            return;
        };
        let hour = source.borrow().current_time();
        if (hour - self.last_time_of_day).abs() < TIME_OF_DAY_THRESHOLD {
            return;
        }

        self.last_time_of_day = hour;
        let factor = selection::day_night_factor(hour);
        self.day_night_factor = Some(factor);
        log::debug!("Time of day {hour:.2}h, day/night factor {factor:.2}");

        self.events.emit_time_of_day_changed(hour);
        self.registry.update_time_of_day(&self.applied, factor);
    }

    fn select_random_weather(&mut self) {
        let is_day = selection::is_day(self.time_of_day());
        let candidates = selection::candidate_weights(&self.states, self.target, is_day);

        match selection::select(&mut self.rng, &candidates) {
            Some(index) => {
                log::info!(
                    "Random weather picked '{}' ({} candidates, {})",
                    self.states[index].name,
                    candidates.len(),
                    if is_day { "day" } else { "night" }
                );
                self.begin_transition(index);
            }
            None => log::debug!("No eligible weather state to switch to"),
        }

        self.reset_weather_timer();
    }

    fn complete_transition(&mut self) {
        let (Some(old), Some(new)) = (self.current, self.target) else {
            return;
        };
        if old == new {
            return;
        }
        self.current = Some(new);
        log::info!("Weather transition complete: '{}' -> '{}'", self.states[old].name, self.states[new].name);
        self.events.emit_state_changed(&self.states[old], &self.states[new]);
    }

    /// Push `snapshot` to every aspect, then re-apply the latest day/night
    /// modulation on top.
    fn apply(&mut self, snapshot: &WeatherSnapshot) {
        self.registry.apply_immediate(snapshot);
        if let Some(factor) = self.day_night_factor {
            self.registry.update_time_of_day(snapshot, factor);
        }
        self.applied.clone_from(snapshot);
    }

    fn begin_transition(&mut self, index: usize) {
        let Some(old) = self.target else {
            return;
        };
        self.target = Some(index);

        let state = &self.states[index];
        if self.handler.is_transitioning() {
            self.handler.interrupt(state, state.transition_duration);
        } else {
            self.handler.start(self.applied.clone(), state, state.transition_duration);
        }
        log::info!(
            "Weather transition '{}' -> '{}' over {:.0}s",
            self.states[old].name,
            state.name,
            state.transition_duration
        );
        self.events.emit_start_transition(&self.states[old], &self.states[index]);
    }

    // -----------------------------------------------------------------------
    // Control surface
    // -----------------------------------------------------------------------

    /// Blend towards the state called `name`. An in-flight transition is
    /// retargeted from its live value. Unknown names are ignored.
    pub fn set_target_weather(&mut self, name: &str) {
        if !self.enabled {
            return;
        }
        match self.find_state(name) {
            Some(index) => self.begin_transition(index),
            None => log::warn!("set_target_weather: unknown weather state '{name}'"),
        }
    }

    /// Apply the state called `name` immediately, making it both current and
    /// target. Unknown names are ignored.
    pub fn force_weather_state(&mut self, name: &str) {
        if !self.enabled {
            return;
        }
        let Some(index) = self.find_state(name) else {
            log::warn!("force_weather_state: unknown weather state '{name}'");
            return;
        };
        let old = self.current.unwrap_or(index);

        self.current = Some(index);
        self.target = Some(index);
        let snapshot = WeatherSnapshot::from_state(&self.states[index]);
        self.handler.settle(snapshot.clone());
        self.apply(&snapshot);

        log::info!("Weather forced to '{}'", self.states[index].name);
        self.events.emit_state_changed(&self.states[old], &self.states[index]);
    }

    /// Toggle random selection. Re-enabling caps the timer at the check
    /// interval so a pick happens reasonably soon.
    pub fn set_random_weather_enabled(&mut self, enabled: bool) {
        self.random_enabled = enabled;
        if enabled {
            self.weather_timer = self.weather_timer.min(self.check_interval);
        }
        log::info!("Random weather {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Redraw the selection timer from the target state's duration bounds.
    pub fn reset_weather_timer(&mut self) {
        if let Some(state) = self.target_state() {
            let (min, max) = (state.min_duration, state.max_duration);
            self.weather_timer = selection::draw_duration(&mut self.rng, min, max);
            log::debug!("Weather timer reset to {:.0}s", self.weather_timer);
        }
    }

    /// Abandon the transition and snap back to the current state.
    pub fn cancel_transition(&mut self) {
        let (Some(current), Some(target)) = (self.current, self.target) else {
            return;
        };
        if current == target {
            return;
        }

        self.target = Some(current);
        let state = &self.states[current];
        let snapshot = WeatherSnapshot::from_state(state);
        self.handler.start(snapshot.clone(), state, 0.0);
        self.apply(&snapshot);
        log::info!("Weather transition cancelled, staying on '{}'", self.states[current].name);
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn current_state(&self) -> Option<&WeatherState> {
        self.current.map(|i| &self.states[i])
    }

    pub fn target_state(&self) -> Option<&WeatherState> {
        self.target.map(|i| &self.states[i])
    }

    /// Blend progress in `[0, 1]`; 1 when settled.
    pub fn transition_progress(&self) -> f32 {
        self.handler.progress()
    }

    pub fn is_transitioning(&self) -> bool {
        self.handler.is_transitioning()
    }

    /// Seconds until the next random pick.
    pub fn weather_timer(&self) -> f32 {
        self.weather_timer
    }

    pub fn available_states(&self) -> &[WeatherState] {
        &self.states
    }

    pub fn random_weather_enabled(&self) -> bool {
        self.random_enabled
    }

    /// False when the manager disabled itself for lack of states.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Snapshot most recently applied to the aspects, before day/night
    /// modulation.
    pub fn current_snapshot(&self) -> &WeatherSnapshot {
        &self.applied
    }

    /// Latest day/night factor, once a time source has reported.
    pub fn day_night_factor(&self) -> Option<f32> {
        self.day_night_factor
    }

    /// Hour from the attached time source, or noon without one.
    pub fn time_of_day(&self) -> f32 {
        self.time_source
            .as_ref()
            .map(|s| s.borrow().current_time())
            .unwrap_or(FALLBACK_TIME_OF_DAY)
    }

    pub fn time_source(&self) -> Option<&Shared<dyn TimeSource>> {
        self.time_source.as_ref()
    }

    pub fn find_state(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name == name)
    }

    pub fn events_mut(&mut self) -> &mut WeatherEvents {
        &mut self.events
    }

    pub fn registry(&self) -> &AspectRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AspectRegistry {
        &mut self.registry
    }
}

impl std::fmt::Debug for WeatherStateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherStateManager")
            .field("current", &self.current_state().map(|s| &s.name))
            .field("target", &self.target_state().map(|s| &s.name))
            .field("progress", &self.transition_progress())
            .field("weather_timer", &self.weather_timer)
            .field("random_enabled", &self.random_enabled)
            .field("enabled", &self.enabled)
            .field("registry", &self.registry)
            .finish()
    }
}
