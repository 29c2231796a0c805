//! Unit tests for board controllers and command dispatch.

mod billing_tests;
mod fixtures;
mod lifecycle_tests;
mod service_tests;
