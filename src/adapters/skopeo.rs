use crate::config::toml_config::{CopyMode, CopySettings, DEFAULT_AUTH_FILE};
use crate::domain::ports::{CopyOutput, CopyTool};
use crate::utils::error::{MirrorError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// 容器內 skopeo 讀取認證檔的位置
const CONTAINER_AUTH_PATH: &str = "/root/.docker/config.json";

/// 以子行程執行 `skopeo copy`
#[derive(Debug, Clone)]
pub struct SkopeoCopyTool {
    mode: CopyMode,
    skopeo_image: String,
    auth_file: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl SkopeoCopyTool {
    pub fn new(mode: CopyMode, skopeo_image: impl Into<String>, auth_file: Option<PathBuf>) -> Self {
        Self {
            mode,
            skopeo_image: skopeo_image.into(),
            auth_file,
            extra_args: Vec::new(),
        }
    }

    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// 依設定決定認證檔：明確指定者優先，否則使用目前目錄的 `auth.json`（若存在），
    /// 兩者皆無時改用主機上的憑證存放區，除非設定要求必須有認證檔
    pub fn from_settings(settings: &CopySettings, auth_override: Option<&Path>) -> Result<Self> {
        let explicit = auth_override
            .map(Path::to_path_buf)
            .or_else(|| settings.auth_file.as_ref().map(PathBuf::from));

        let auth_file = match explicit {
            Some(path) if path.is_file() => Some(absolute(&path)?),
            Some(path) => {
                return Err(MirrorError::RuntimePrecondition {
                    message: format!("Auth file not found: {}", path.display()),
                })
            }
            None => {
                let default = Path::new(DEFAULT_AUTH_FILE);
                if default.is_file() {
                    Some(absolute(default)?)
                } else {
                    None
                }
            }
        };

        if auth_file.is_none() && settings.require_auth {
            return Err(MirrorError::RuntimePrecondition {
                message: format!(
                    "Auth file not found; create {} with your registry credentials first",
                    DEFAULT_AUTH_FILE
                ),
            });
        }

        match &auth_file {
            Some(path) => tracing::info!("🔑 Using auth file: {}", path.display()),
            None => tracing::info!("🔑 No auth file, relying on ambient registry credentials"),
        }

        Ok(Self::new(settings.copy_mode(), settings.skopeo_image.clone(), auth_file)
            .with_extra_args(settings.extra_args.clone()))
    }

    pub fn mode(&self) -> CopyMode {
        self.mode
    }

    pub fn auth_file(&self) -> Option<&Path> {
        self.auth_file.as_deref()
    }

    /// 組出完整命令列（程式名稱與參數）
    pub fn command_line(&self, source: &str, destination: &str) -> (String, Vec<String>) {
        let mut args = Vec::new();

        let (program, dest_authfile) = match self.mode {
            CopyMode::Docker => {
                args.extend(["run", "--rm"].map(String::from));
                if let Some(auth_file) = &self.auth_file {
                    args.push("-v".to_string());
                    args.push(format!("{}:{}:ro", auth_file.display(), CONTAINER_AUTH_PATH));
                }
                args.push("--net=host".to_string());
                args.push(self.skopeo_image.clone());
                (
                    "docker",
                    self.auth_file.as_ref().map(|_| CONTAINER_AUTH_PATH.to_string()),
                )
            }
            CopyMode::Native => (
                "skopeo",
                self.auth_file.as_ref().map(|p| p.display().to_string()),
            ),
        };

        args.push("copy".to_string());
        args.push(format!("docker://{}", source));
        args.push(format!("docker://{}", destination));
        if let Some(path) = dest_authfile {
            args.push("--dest-authfile".to_string());
            args.push(path);
        }
        args.extend(self.extra_args.iter().cloned());

        (program.to_string(), args)
    }
}

#[async_trait]
impl CopyTool for SkopeoCopyTool {
    async fn copy(&self, source: &str, destination: &str) -> Result<CopyOutput> {
        let (program, args) = self.command_line(source, destination);
        tracing::debug!("Running: {} {}", program, args.join(" "));

        let output = Command::new(&program).args(&args).output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(MirrorError::TransferExecution {
                source_image: source.to_string(),
                message: format!("{} exited with {}", program, output.status),
                stdout,
                stderr,
            });
        }

        Ok(CopyOutput { stdout })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
