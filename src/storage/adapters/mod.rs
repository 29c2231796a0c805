//! Adapter implementations of the board repository port.

pub mod fallback;
pub mod local;
pub mod postgres;
