//! Notification lists for weather changes.
//!
//! Subscribers are called synchronously, in registration order, on the tick
//! that triggers the notification.

use crate::weather::state::WeatherState;

/// `(old, new)` state-pair callback.
pub type StateCallback = Box<dyn FnMut(&WeatherState, &WeatherState)>;
/// Time-of-day callback, hour in `[0, 24)`.
pub type TimeCallback = Box<dyn FnMut(f32)>;

#[derive(Default)]
pub struct WeatherEvents {
    state_changed: Vec<StateCallback>,
    start_transition: Vec<StateCallback>,
    time_of_day_changed: Vec<TimeCallback>,
}

impl WeatherEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired when a transition completes or a state is forced.
    pub fn on_weather_state_changed(&mut self, f: impl FnMut(&WeatherState, &WeatherState) + 'static) {
        self.state_changed.push(Box::new(f));
    }

    /// Fired when a new target is set.
    pub fn on_weather_state_start_transition(
        &mut self,
        f: impl FnMut(&WeatherState, &WeatherState) + 'static,
    ) {
        self.start_transition.push(Box::new(f));
    }

    /// Fired when time of day moves by at least 0.1 h since the last
    /// notification.
    pub fn on_time_of_day_changed(&mut self, f: impl FnMut(f32) + 'static) {
        self.time_of_day_changed.push(Box::new(f));
    }

    pub(crate) fn emit_state_changed(&mut self, old: &WeatherState, new: &WeatherState) {
        for f in &mut self.state_changed {
            f(old, new);
        }
    }

    pub(crate) fn emit_start_transition(&mut self, old: &WeatherState, new: &WeatherState) {
        for f in &mut self.start_transition {
            f(old, new);
        }
    }

    pub(crate) fn emit_time_of_day_changed(&mut self, hour: f32) {
        for f in &mut self.time_of_day_changed {
            f(hour);
        }
    }

    /// Drop every subscriber.
    pub fn clear(&mut self) {
        self.state_changed.clear();
        self.start_transition.clear();
        self.time_of_day_changed.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.state_changed.len() + self.start_transition.len() + self.time_of_day_changed.len()
    }
}

impl std::fmt::Debug for WeatherEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherEvents")
            .field("state_changed", &self.state_changed.len())
            .field("start_transition", &self.start_transition.len())
            .field("time_of_day_changed", &self.time_of_day_changed.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_every_subscriber_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut events = WeatherEvents::new();
        for tag in ["first", "second"] {
            let log = log.clone();
            events.on_weather_state_changed(move |old, new| {
                log.borrow_mut().push(format!("{tag}:{}->{}", old.name, new.name));
            });
        }

        events.emit_state_changed(&WeatherState::clear(), &WeatherState::rain());
        assert_eq!(*log.borrow(), vec!["first:Clear->Rain", "second:Clear->Rain"]);
    }

    #[test]
    fn test_lists_are_independent() {
        let hits = Rc::new(RefCell::new((0, 0)));
        let mut events = WeatherEvents::new();
        let h = hits.clone();
        events.on_weather_state_start_transition(move |_, _| h.borrow_mut().0 += 1);
        let h = hits.clone();
        events.on_time_of_day_changed(move |hour| {
            assert_eq!(hour, 7.5);
            h.borrow_mut().1 += 1;
        });

        events.emit_state_changed(&WeatherState::clear(), &WeatherState::fog());
        events.emit_start_transition(&WeatherState::clear(), &WeatherState::fog());
        events.emit_time_of_day_changed(7.5);
        assert_eq!(*hits.borrow(), (1, 1));

        assert_eq!(events.subscriber_count(), 2);
        events.clear();
        assert_eq!(events.subscriber_count(), 0);
    }
}
