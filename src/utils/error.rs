use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Compose file not found: {path}")]
    DescriptorNotFound { path: String },

    #[error("Failed to parse compose file '{path}': {message}")]
    DescriptorParse { path: String, message: String },

    #[error("Malformed line {line} in env file '{path}': {content}")]
    EnvFileParse {
        path: String,
        line: usize,
        content: String,
    },

    #[error("Failed to transfer {source_image}: {message}")]
    TransferExecution {
        source_image: String,
        message: String,
        stdout: String,
        stderr: String,
    },

    #[error("Runtime precondition failed: {message}")]
    RuntimePrecondition { message: String },

    #[error("Configuration validation error in field '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Descriptor,
    Configuration,
    Transfer,
    Runtime,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MirrorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MirrorError::DescriptorNotFound { .. }
            | MirrorError::DescriptorParse { .. }
            | MirrorError::EnvFileParse { .. } => ErrorCategory::Descriptor,
            MirrorError::ConfigValidation { .. } | MirrorError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            MirrorError::TransferExecution { .. } => ErrorCategory::Transfer,
            MirrorError::RuntimePrecondition { .. } => ErrorCategory::Runtime,
            MirrorError::Io(_) | MirrorError::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一映像傳輸失敗不會中斷整批作業
            ErrorCategory::Transfer => ErrorSeverity::Medium,
            ErrorCategory::Descriptor | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Runtime | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MirrorError::DescriptorNotFound { .. } => {
                "Check the compose file path passed on the command line"
            }
            MirrorError::DescriptorParse { .. } => {
                "Make sure the compose file (and its includes) is valid YAML with a `services` mapping"
            }
            MirrorError::EnvFileParse { .. } => {
                "Every non-comment line in the env file must look like NAME=VALUE"
            }
            MirrorError::TransferExecution { .. } => {
                "Check registry credentials and network access, then re-run for the failed images"
            }
            MirrorError::RuntimePrecondition { .. } => {
                "Install docker (or skopeo for native mode) and make sure it is on PATH"
            }
            MirrorError::ConfigValidation { .. } | MirrorError::InvalidConfigValue { .. } => {
                "Fix the reported option and try again"
            }
            MirrorError::Io(_) => "Check file permissions and available disk space",
            MirrorError::Serialization(_) => "This is likely a bug; please report it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MirrorError::DescriptorNotFound { path } => format!("Error: {} does not exist", path),
            MirrorError::DescriptorParse { message, .. } => {
                format!("Error parsing compose file: {}", message)
            }
            MirrorError::RuntimePrecondition { message } => format!("Error: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_by_category() {
        let missing = MirrorError::DescriptorNotFound {
            path: "compose.yaml".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Descriptor);
        assert_eq!(missing.severity(), ErrorSeverity::High);

        let runtime = MirrorError::RuntimePrecondition {
            message: "docker command not found".to_string(),
        };
        assert_eq!(runtime.severity(), ErrorSeverity::Critical);

        let transfer = MirrorError::TransferExecution {
            source_image: "nginx:1".to_string(),
            message: "exit status 1".to_string(),
            stdout: String::new(),
            stderr: "denied".to_string(),
        };
        assert_eq!(transfer.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_user_friendly_message_names_missing_path() {
        let err = MirrorError::DescriptorNotFound {
            path: "/tmp/nope/compose.yaml".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "Error: /tmp/nope/compose.yaml does not exist"
        );
    }
}
