//! Supervisorgen builds supervisord `[program:*]` and `[group:*]` configuration
//! from typed, fluent builders. Optional directives are only written once they
//! have been explicitly set, so generated files stay short and only carry what
//! the caller asked for. A YAML manifest loader and the `sgen` CLI sit on top of
//! the library for generating files from the command line.

/// CLI interface.
pub mod cli;

/// Supervisord defaults and path conventions.
pub mod constants;

/// Error handling.
pub mod error;

/// Group configuration.
pub mod group;

/// YAML manifest loading.
pub mod manifest;

/// Values that track whether they were explicitly set.
pub mod opt;

/// Program configuration.
pub mod program;

/// Text rendering for programs and groups.
pub mod render;

#[doc(hidden)]
pub mod test_utils;

pub use error::{ConfigError, Result};
pub use group::GroupConfig;
pub use opt::Opt;
pub use program::{AutoRestart, ProgramConfig, RestartMode};
pub use render::{render_group, render_program};
