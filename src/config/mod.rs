pub mod toml_config;

#[cfg(feature = "cli")]
mod cli;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat, OutputFormat};
pub use toml_config::{CopyMode, CopySettings, MirrorConfig};
