// Adapters layer: concrete implementations for external systems (process env, subprocess, terminal).

pub mod env;
pub mod prompt;
pub mod runtime;
pub mod skopeo;

pub use env::ProcessEnvironment;
pub use prompt::StdinConfirm;
pub use skopeo::SkopeoCopyTool;
