//! Skyblend - time-of-day and weather state blending

pub mod core;
pub mod sun;
pub mod weather;
