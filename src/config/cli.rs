use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "compose-mirror")]
#[command(about = "Transfer Docker images from a compose file to a target registry")]
pub struct CliConfig {
    /// Path to docker-compose file
    pub compose_file: String,

    /// Target registry URL (e.g., registry.cn-hangzhou.aliyuncs.com/myproject)
    #[arg(short = 't', long)]
    pub target_registry: String,

    /// Include services with profiles
    #[arg(short = 'a', long)]
    pub all_profiles: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show what would be transferred without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Preview format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Env file to use instead of the .env next to the compose file
    #[arg(long)]
    pub env_file: Option<String>,

    /// Registry auth file passed to skopeo as --dest-authfile
    #[arg(long)]
    pub auth_file: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("compose_file", &self.compose_file)?;
        validation::validate_registry_root("target_registry", &self.target_registry)?;

        for (field, value) in [
            ("env_file", &self.env_file),
            ("auth_file", &self.auth_file),
            ("config", &self.config),
        ] {
            if let Some(path) = value {
                validation::validate_path(field, path)?;
            }
        }

        Ok(())
    }
}
