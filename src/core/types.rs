//! Core type aliases and re-exports

use std::cell::RefCell;
use std::rc::Rc;

pub use glam::{Quat, Vec3};

/// Standard Result type for the engine
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Linear RGBA color.
pub type Color = [f32; 4];

/// Handle to an object owned outside the weather core (render targets,
/// emitters, clocks). The simulation is single-threaded, so a plain
/// `Rc<RefCell<_>>` is enough.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
