pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ProcessEnvironment, SkopeoCopyTool, StdinConfirm};
pub use config::MirrorConfig;
pub use crate::core::descriptor::{DescriptorLoader, LoadedDescriptor};
pub use crate::core::extractor::{extract, ImageExtractor};
pub use crate::core::orchestrator::{TransferEngine, TransferPlan};
pub use crate::core::rewrite::rewrite;
pub use crate::core::variables::VariableEnvironment;
pub use utils::error::{MirrorError, Result};
