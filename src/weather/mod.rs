//! Weather state blending.
//!
//! Authored [`WeatherState`]s are turned into [`WeatherSnapshot`]s, blended
//! over time by the [`TransitionHandler`], and pushed onto live render/audio
//! targets through the [`AspectRegistry`]. The main entry point is
//! [`WeatherStateManager`], updated once per tick.

pub mod aspect;
pub mod config;
pub mod control;
pub mod events;
pub mod lerp;
pub mod manager;
pub mod registry;
pub mod selection;
pub mod snapshot;
pub mod state;
pub mod target;
pub mod transition;

// Re-exports
pub use aspect::{AspectApplier, AspectData, AspectKind, ComponentData};
pub use config::WeatherConfig;
pub use control::{ResponseData, WeatherCommand, WeatherResponse, WeatherStatus};
pub use events::WeatherEvents;
pub use manager::WeatherStateManager;
pub use registry::AspectRegistry;
pub use snapshot::WeatherSnapshot;
pub use state::WeatherState;
pub use target::{CloudLayer, EmitterParams, FogVolume, RainAudio, RainEmitter, VolumeProfile};
pub use transition::TransitionHandler;
