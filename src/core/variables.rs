use crate::domain::ports::VariableSource;
use crate::utils::error::{MirrorError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// 兩層變數查詢：`.env` 檔案優先，其次為注入的環境變數來源
pub struct VariableEnvironment {
    file_vars: HashMap<String, String>,
    fallback: Box<dyn VariableSource>,
}

/// image 欄位經過佔位符解析後的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 不是整串佔位符，原樣返回
    Literal(String),
    Resolved { name: String, value: String },
    Defaulted { name: String, value: String },
    /// 找不到變數也沒有預設值，保留原始佔位符字串
    Unresolved { name: String, raw: String },
}

impl Resolution {
    pub fn value(&self) -> &str {
        match self {
            Resolution::Literal(value) => value,
            Resolution::Resolved { value, .. } | Resolution::Defaulted { value, .. } => value,
            Resolution::Unresolved { raw, .. } => raw,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Resolution::Literal(value) => value,
            Resolution::Resolved { value, .. } | Resolution::Defaulted { value, .. } => value,
            Resolution::Unresolved { raw, .. } => raw,
        }
    }
}

/// `${NAME}` 或 `${NAME:-DEFAULT}`，必須佔滿整個字串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    pub default: Option<&'a str>,
}

impl<'a> Placeholder<'a> {
    pub fn parse(raw: &'a str) -> Option<Self> {
        let inner = raw.strip_prefix("${")?.strip_suffix('}')?;

        let (name, default) = match inner.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (inner, None),
        };

        // 嵌在其他文字中的佔位符（例如 `${A}/x:${B}`）不算整串佔位符
        if name.contains('}') || name.contains("${") {
            return None;
        }
        if default.is_some_and(|d| d.contains("${")) {
            return None;
        }

        Some(Self { name, default })
    }
}

impl VariableEnvironment {
    pub fn new(file_vars: HashMap<String, String>, fallback: Box<dyn VariableSource>) -> Self {
        Self {
            file_vars,
            fallback,
        }
    }

    /// 從 `.env` 檔案建立；檔案不存在時檔案層為空
    pub fn load<P: AsRef<Path>>(path: P, fallback: Box<dyn VariableSource>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!("No env file at {}, using process environment only", path.display());
            return Ok(Self::new(HashMap::new(), fallback));
        }

        let content = std::fs::read_to_string(path)?;
        let file_vars = parse_env_file(&content, &path.display().to_string())?;
        tracing::debug!("Loaded {} variables from {}", file_vars.len(), path.display());

        Ok(Self::new(file_vars, fallback))
    }

    pub fn resolve(&self, name: &str) -> Option<String> {
        self.file_vars
            .get(name)
            .cloned()
            .or_else(|| self.fallback.get(name))
    }

    pub fn file_vars(&self) -> &HashMap<String, String> {
        &self.file_vars
    }

    /// 只支援整串單層替換，部分替換刻意不處理
    pub fn resolve_image(&self, raw: &str) -> Resolution {
        let Some(placeholder) = Placeholder::parse(raw) else {
            return Resolution::Literal(raw.to_string());
        };

        let name = placeholder.name.to_string();
        match (self.resolve(placeholder.name), placeholder.default) {
            (Some(value), _) => Resolution::Resolved { name, value },
            (None, Some(default)) => Resolution::Defaulted {
                name,
                value: default.to_string(),
            },
            (None, None) => Resolution::Unresolved {
                name,
                raw: raw.to_string(),
            },
        }
    }
}

impl fmt::Debug for VariableEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 變數值可能含有敏感資訊，只列出名稱
        let mut names: Vec<&String> = self.file_vars.keys().collect();
        names.sort();
        f.debug_struct("VariableEnvironment")
            .field("file_vars", &names)
            .finish_non_exhaustive()
    }
}

/// 解析 `NAME=VALUE` 格式；空行與 `#` 開頭的註解略過，缺少 `=` 的行視為錯誤
pub fn parse_env_file(content: &str, origin: &str) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, value)) = line.split_once('=') else {
            return Err(MirrorError::EnvFileParse {
                path: origin.to_string(),
                line: index + 1,
                content: line.to_string(),
            });
        };

        vars.insert(name.trim().to_string(), strip_quotes(value.trim()).to_string());
    }

    Ok(vars)
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_with(file: &[(&str, &str)], process: &[(&str, &str)]) -> VariableEnvironment {
        let file_vars = file
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let process: HashMap<String, String> = process
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        VariableEnvironment::new(file_vars, Box::new(process))
    }

    #[test]
    fn test_parse_env_file_rules() {
        let content = r#"
# registry settings
REGISTRY = registry.example.com
TAG="1.2.3"
QUOTED='single'
MIXED="half'
EQUALS=a=b
EMPTY=
"#;
        let vars = parse_env_file(content, ".env").unwrap();

        assert_eq!(vars["REGISTRY"], "registry.example.com");
        assert_eq!(vars["TAG"], "1.2.3");
        assert_eq!(vars["QUOTED"], "single");
        assert_eq!(vars["MIXED"], "\"half'");
        assert_eq!(vars["EQUALS"], "a=b");
        assert_eq!(vars["EMPTY"], "");
        assert_eq!(vars.len(), 6);
    }

    #[test]
    fn test_strip_quotes_removes_exactly_one_pair() {
        assert_eq!(strip_quotes(r#"""x"""#), r#""x""#);
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let err = parse_env_file("GOOD=1\nNOT_AN_ASSIGNMENT\n", "/app/.env").unwrap_err();
        match err {
            MirrorError::EnvFileParse { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "NOT_AN_ASSIGNMENT");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_file_tier_wins_over_process_tier() {
        let env = env_with(&[("FOO", "from-file")], &[("FOO", "from-env"), ("BAR", "env-only")]);
        assert_eq!(env.resolve("FOO").as_deref(), Some("from-file"));
        assert_eq!(env.resolve("BAR").as_deref(), Some("env-only"));
        assert_eq!(env.resolve("MISSING"), None);
    }

    #[test]
    fn test_resolve_image_placeholder_forms() {
        let env = env_with(&[("FOO", "bar")], &[]);

        assert_eq!(env.resolve_image("${FOO}").value(), "bar");
        assert_eq!(env.resolve_image("${NOPE:-baz}").value(), "baz");
        assert_eq!(env.resolve_image("${FOO:-baz}").value(), "bar");
        assert_eq!(
            env.resolve_image("${NOPE}"),
            Resolution::Unresolved {
                name: "NOPE".to_string(),
                raw: "${NOPE}".to_string()
            }
        );
    }

    #[test]
    fn test_embedded_placeholders_are_left_alone() {
        let env = env_with(&[("REG", "r.io"), ("TAG", "1")], &[]);

        for raw in ["${REG}/app:1", "app:${TAG}", "${REG}/app:${TAG}", "nginx:1.25"] {
            assert_eq!(env.resolve_image(raw), Resolution::Literal(raw.to_string()));
        }
    }

    #[test]
    fn test_load_missing_env_file_is_empty() {
        let env = VariableEnvironment::load("/definitely/not/here/.env", Box::new(HashMap::new()))
            .unwrap();
        assert!(env.file_vars().is_empty());
    }

    #[test]
    fn test_load_env_file_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "IMAGE=\"redis:7\"").unwrap();

        let env = VariableEnvironment::load(file.path(), Box::new(HashMap::new())).unwrap();
        assert_eq!(env.resolve("IMAGE").as_deref(), Some("redis:7"));
    }
}
