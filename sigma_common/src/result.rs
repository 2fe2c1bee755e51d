//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `SigmaError`, so functions can simply return `Result<T>`.
use crate::error::SigmaError;

/// Workspace-wide `Result` alias with `SigmaError` as the default error.
pub type Result<T, E = SigmaError> = std::result::Result<T, E>;
