//! Shared utilities for the PTV Open API workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};
