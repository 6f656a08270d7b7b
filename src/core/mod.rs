pub mod descriptor;
pub mod extractor;
pub mod orchestrator;
pub mod rewrite;
pub mod variables;

pub use crate::domain::model::{Descriptor, ServiceDefinition, TransferCandidate};
pub use crate::domain::ports::{Confirm, CopyTool, VariableSource};
pub use crate::utils::error::Result;
