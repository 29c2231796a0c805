//! Step definitions for sprint board scenarios.

mod given;
mod then;
mod when;
pub mod world;
