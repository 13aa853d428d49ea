//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the fablewright binary.

mod commands;
mod generate;
mod output;
mod plan;
mod prompt;
mod providers;

pub use commands::{Cli, Commands};
pub use generate::generate_book;
pub use plan::plan_scenes;
pub use prompt::print_prompt;
pub use providers::list_providers;

use fablewright::{FablewrightConfig, FablewrightResult};
use std::path::Path;

/// Load configuration from `path` when given, else from the usual search.
pub fn load_config(path: Option<&Path>) -> FablewrightResult<FablewrightConfig> {
    match path {
        Some(path) => FablewrightConfig::from_file(path),
        None => FablewrightConfig::load(),
    }
}
