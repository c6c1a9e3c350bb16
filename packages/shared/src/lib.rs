//! Shared utilities for the tic-tac-toe session server.

pub mod logger;

pub use logger::setup_logger;
