use crate::utils::error::{MirrorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SKOPEO_IMAGE: &str = "quay.io/skopeo/stable:latest";
pub const DEFAULT_AUTH_FILE: &str = "auth.json";

/// 執行 skopeo 的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// `docker run quay.io/skopeo/stable ...`
    Docker,
    /// 主機上的 `skopeo`
    Native,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub copy: CopySettings,
    #[serde(default)]
    pub descriptor: DescriptorSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopySettings {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_skopeo_image")]
    pub skopeo_image: String,
    pub auth_file: Option<String>,
    #[serde(default)]
    pub require_auth: bool,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorSettings {
    pub env_file: Option<String>,
}

fn default_mode() -> String {
    "docker".to_string()
}

fn default_skopeo_image() -> String {
    DEFAULT_SKOPEO_IMAGE.to_string()
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            skopeo_image: default_skopeo_image(),
            auth_file: None,
            require_auth: false,
            extra_args: Vec::new(),
        }
    }
}

impl CopySettings {
    pub fn copy_mode(&self) -> CopyMode {
        match self.mode.as_str() {
            "native" => CopyMode::Native,
            _ => CopyMode::Docker,
        }
    }
}

impl MirrorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MirrorError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REGISTRY_AUTH})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn copy_mode(&self) -> CopyMode {
        self.copy.copy_mode()
    }
}

impl Validate for MirrorConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_one_of("copy.mode", &self.copy.mode, &["docker", "native"])?;
        validation::validate_non_empty_string("copy.skopeo_image", &self.copy.skopeo_image)?;

        if let Some(auth_file) = &self.copy.auth_file {
            validation::validate_path("copy.auth_file", auth_file)?;
        }
        if let Some(env_file) = &self.descriptor.env_file {
            validation::validate_path("descriptor.env_file", env_file)?;
        }

        Ok(())
    }
}
