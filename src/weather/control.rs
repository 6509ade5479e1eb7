//! JSON command/response protocol for driving the weather manager from
//! external tooling (debug consoles, scripts).
//!
//! One command per line in, one response per line out:
//! `{"cmd":"SetTargetWeather","params":{"name":"Rain"}}`

use serde::{Deserialize, Serialize};

use crate::weather::manager::WeatherStateManager;

/// Commands accepted by [`WeatherStateManager::execute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum WeatherCommand {
    /// Blend towards a named state
    SetTargetWeather { name: String },
    /// Apply a named state instantly
    ForceWeatherState { name: String },
    SetRandomWeatherEnabled { enabled: bool },
    ResetWeatherTimer,
    CancelTransition,
    /// Set time of day on the attached time source (0.0-24.0)
    SetTimeOfDay { hour: f32 },
    /// Set month on the attached time source (1-12)
    SetMonth { month: u32 },
    /// Get the manager's observable state
    GetStatus,
    /// List configured state names
    ListStates,
    /// Health check
    Ping,
}

/// Responses from [`WeatherStateManager::execute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum WeatherResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    None,
    Pong { message: String },
    Status(WeatherStatus),
    States { names: Vec<String> },
}

/// Snapshot of everything a debug view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStatus {
    pub current_state: Option<String>,
    pub target_state: Option<String>,
    pub transition_progress: f32,
    pub is_transitioning: bool,
    pub weather_timer: f32,
    pub random_weather_enabled: bool,
    pub time_of_day: f32,
    pub day_night_factor: Option<f32>,
    pub month: Option<u32>,
}

impl WeatherResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error { message: msg.into() }
    }

    pub fn none() -> Self {
        Self::ok(ResponseData::None)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl WeatherStateManager {
    /// Run one control command.
    pub fn execute(&mut self, cmd: WeatherCommand) -> WeatherResponse {
        log::debug!("Weather command: {cmd:?}");
        match cmd {
            WeatherCommand::SetTargetWeather { name } => {
                if self.find_state(&name).is_none() {
                    return WeatherResponse::error(format!("Unknown weather state: {name}"));
                }
                self.set_target_weather(&name);
                WeatherResponse::none()
            }
            WeatherCommand::ForceWeatherState { name } => {
                if self.find_state(&name).is_none() {
                    return WeatherResponse::error(format!("Unknown weather state: {name}"));
                }
                self.force_weather_state(&name);
                WeatherResponse::none()
            }
            WeatherCommand::SetRandomWeatherEnabled { enabled } => {
                self.set_random_weather_enabled(enabled);
                WeatherResponse::none()
            }
            WeatherCommand::ResetWeatherTimer => {
                self.reset_weather_timer();
                WeatherResponse::none()
            }
            WeatherCommand::CancelTransition => {
                self.cancel_transition();
                WeatherResponse::none()
            }
            WeatherCommand::SetTimeOfDay { hour } => match self.time_source() {
                Some(source) => {
                    source.borrow_mut().set_time(hour);
                    WeatherResponse::none()
                }
                None => WeatherResponse::error("No time source attached"),
            },
            WeatherCommand::SetMonth { month } => match self.time_source() {
                Some(source) => {
                    source.borrow_mut().set_month(month);
                    WeatherResponse::none()
                }
                None => WeatherResponse::error("No time source attached"),
            },
            WeatherCommand::GetStatus => WeatherResponse::ok(ResponseData::Status(self.status())),
            WeatherCommand::ListStates => WeatherResponse::ok(ResponseData::States {
                names: self.available_states().iter().map(|s| s.name.clone()).collect(),
            }),
            WeatherCommand::Ping => WeatherResponse::ok(ResponseData::Pong {
                message: "pong".into(),
            }),
        }
    }

    /// Parse one JSON command line, run it, and serialize the response.
    pub fn execute_line(&mut self, line: &str) -> String {
        let response = match serde_json::from_str::<WeatherCommand>(line.trim()) {
            Ok(cmd) => self.execute(cmd),
            Err(e) => WeatherResponse::error(format!("Invalid command JSON: {e}")),
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!("{{\"status\":\"error\",\"message\":\"Serialize error: {e}\"}}")
        })
    }

    pub fn status(&self) -> WeatherStatus {
        WeatherStatus {
            current_state: self.current_state().map(|s| s.name.clone()),
            target_state: self.target_state().map(|s| s.name.clone()),
            transition_progress: self.transition_progress(),
            is_transitioning: self.is_transitioning(),
            weather_timer: self.weather_timer(),
            random_weather_enabled: self.random_weather_enabled(),
            time_of_day: self.time_of_day(),
            day_night_factor: self.day_night_factor(),
            month: self.time_source().map(|s| s.borrow().current_month()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::shared;
    use crate::sun::{SunController, TimeSource};
    use crate::weather::config::WeatherConfig;
    use crate::weather::target::VolumeProfile;

    fn manager() -> WeatherStateManager {
        let config = WeatherConfig {
            seed: Some(3),
            enable_random_weather: false,
            ..Default::default()
        };
        WeatherStateManager::new(config, &VolumeProfile::new())
    }

    #[test]
    fn test_command_wire_format() {
        let cmd: WeatherCommand =
            serde_json::from_str(r#"{"cmd":"SetTargetWeather","params":{"name":"Rain"}}"#).expect("parse");
        assert_eq!(cmd, WeatherCommand::SetTargetWeather { name: "Rain".into() });

        let unit: WeatherCommand = serde_json::from_str(r#"{"cmd":"GetStatus"}"#).expect("parse");
        assert_eq!(unit, WeatherCommand::GetStatus);
    }

    #[test]
    fn test_execute_control_calls() {
        let mut m = manager();
        assert!(m.execute(WeatherCommand::SetTargetWeather { name: "Rain".into() }).is_ok());
        assert!(m.is_transitioning());
        assert!(m.execute(WeatherCommand::CancelTransition).is_ok());
        assert_eq!(m.target_state().map(|s| s.name.as_str()), Some("Clear"));

        assert!(m.execute(WeatherCommand::ForceWeatherState { name: "Fog".into() }).is_ok());
        assert_eq!(m.current_state().map(|s| s.name.as_str()), Some("Fog"));

        m.execute(WeatherCommand::SetRandomWeatherEnabled { enabled: true });
        assert!(m.random_weather_enabled());
    }

    #[test]
    fn test_unknown_state_reports_error() {
        let mut m = manager();
        let resp = m.execute(WeatherCommand::ForceWeatherState { name: "Hail".into() });
        assert_eq!(resp, WeatherResponse::error("Unknown weather state: Hail"));
        assert_eq!(m.current_state().map(|s| s.name.as_str()), Some("Clear"));
    }

    #[test]
    fn test_time_commands_need_source() {
        let mut m = manager();
        assert!(!m.execute(WeatherCommand::SetTimeOfDay { hour: 6.0 }).is_ok());

        let sun = shared(SunController::default());
        m.set_time_source(sun.clone());
        assert!(m.execute(WeatherCommand::SetTimeOfDay { hour: 6.0 }).is_ok());
        assert!(m.execute(WeatherCommand::SetMonth { month: 12 }).is_ok());
        assert_eq!(sun.borrow().current_time(), 6.0);
        assert_eq!(sun.borrow().current_month(), 12);
    }

    #[test]
    fn test_status_reflects_manager() {
        let mut m = manager();
        m.set_target_weather("Overcast");
        m.update(45.0);
        let WeatherResponse::Ok { data: ResponseData::Status(status) } = m.execute(WeatherCommand::GetStatus) else {
            panic!("expected status");
        };
        assert_eq!(status.current_state.as_deref(), Some("Clear"));
        assert_eq!(status.target_state.as_deref(), Some("Overcast"));
        assert!(status.is_transitioning);
        assert!((status.transition_progress - 0.5).abs() < 1e-6);
        assert_eq!(status.time_of_day, 12.0);
        assert_eq!(status.month, None);
    }

    #[test]
    fn test_execute_line_round_trip() {
        let mut m = manager();
        let out = m.execute_line(r#"{"cmd":"Ping"}"#);
        assert_eq!(out, r#"{"status":"ok","data":{"message":"pong"}}"#);

        let out = m.execute_line(r#"{"cmd":"ListStates"}"#);
        assert!(out.contains(r#""names":["Clear","Overcast","Rain","Fog"]"#));

        let out = m.execute_line("not json");
        assert!(out.starts_with(r#"{"status":"error","message":"Invalid command JSON"#));
    }
}
