use crate::utils::error::{MirrorError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MirrorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MirrorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MirrorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

fn scheme_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("valid regex"))
}

/// 目標倉庫根路徑，例如 `registry.cn-hangzhou.aliyuncs.com/myproject`
pub fn validate_registry_root(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    let reason = if scheme_pattern().is_match(value) {
        Some("Registry root must not carry a URL scheme (drop the `docker://` or `https://` prefix)")
    } else if value.chars().any(char::is_whitespace) {
        Some("Registry root must not contain whitespace")
    } else if value.ends_with('/') {
        Some("Registry root must not end with '/'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(MirrorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(MirrorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_registry_root() {
        assert!(validate_registry_root("target_registry", "registry.new/proj").is_ok());
        assert!(validate_registry_root("target_registry", "localhost:5000").is_ok());
        assert!(validate_registry_root("target_registry", "").is_err());
        assert!(validate_registry_root("target_registry", "   ").is_err());
        assert!(validate_registry_root("target_registry", "docker://registry.new").is_err());
        assert!(validate_registry_root("target_registry", "registry.new/proj/").is_err());
        assert!(validate_registry_root("target_registry", "registry new").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("compose_file", "docker-compose.yml").is_ok());
        assert!(validate_path("compose_file", "").is_err());
        assert!(validate_path("compose_file", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("copy.mode", "docker", &["docker", "native"]).is_ok());
        assert!(validate_one_of("copy.mode", "podman", &["docker", "native"]).is_err());
    }
}
