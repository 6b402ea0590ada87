//! Configuration types
//!
//! This module provides configuration types for the logging system, organized into:
//! - `base`: Core configuration structs (Config, FacilityLevels)
//! - `levels`: `module:facility:level` threshold specs
//! - `writer`: Console stream selection
//! - `presets`: Environment loading and pre-configured setups

mod base;
mod levels;
mod presets;
mod writer;

pub use base::{Config, FacilityLevels};
pub use levels::LevelSpec;
pub use presets::{ENV_CONSOLE, ENV_FILE, ENV_FILE_MAX_SIZE, ENV_LEVELS};
pub use writer::ConsoleTarget;
