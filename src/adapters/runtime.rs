use crate::config::toml_config::CopyMode;
use crate::utils::error::{MirrorError, Result};
use std::io::ErrorKind;
use tokio::process::Command;

pub fn required_program(mode: CopyMode) -> &'static str {
    match mode {
        CopyMode::Docker => "docker",
        CopyMode::Native => "skopeo",
    }
}

/// 確認外部執行環境可用，失敗時在抽取前中止
pub async fn ensure_runtime(mode: CopyMode) -> Result<()> {
    check_program(required_program(mode)).await
}

pub async fn check_program(program: &str) -> Result<()> {
    match Command::new(program).arg("--version").output().await {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            tracing::debug!("{} available: {}", program, version.trim());
            Ok(())
        }
        Ok(_) => Err(MirrorError::RuntimePrecondition {
            message: format!(
                "{} is not available. Please make sure it is installed and running.",
                program
            ),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(MirrorError::RuntimePrecondition {
            message: format!(
                "{} command not found. Please make sure it is installed.",
                program
            ),
        }),
        Err(e) => Err(MirrorError::Io(e)),
    }
}
