//! Application services for the project board.

mod commands;
mod diff;
mod service;

pub use commands::BoardCommand;
pub use diff::{Notice, StateDiff};
pub use service::{BoardService, BoardServiceError, BoardServiceResult, BoardSettings, LoadReport};
