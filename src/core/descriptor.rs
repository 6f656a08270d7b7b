use crate::core::variables::VariableEnvironment;
use crate::domain::model::{Descriptor, ServiceDefinition};
use crate::domain::ports::VariableSource;
use crate::utils::error::{MirrorError, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    services: Option<RawServices>,
    #[serde(default)]
    include: Option<IncludeDirective>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IncludeDirective {
    One(String),
    Many(Vec<String>),
}

impl IncludeDirective {
    fn into_paths(self) -> Vec<String> {
        match self {
            IncludeDirective::One(path) => vec![path],
            IncludeDirective::Many(paths) => paths,
        }
    }
}

/// 服務表依出現順序保留所有項目（包含重複的鍵），由合併階段決定覆蓋
#[derive(Debug, Default)]
struct RawServices(Vec<(String, serde_yaml::Value)>);

impl<'de> Deserialize<'de> for RawServices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ServicesVisitor;

        impl<'de> Visitor<'de> for ServicesVisitor {
            type Value = RawServices;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of service name to service definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<RawServices, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, body)) = map.next_entry::<String, serde_yaml::Value>()? {
                    entries.push((name, body));
                }
                Ok(RawServices(entries))
            }
        }

        deserializer.deserialize_map(ServicesVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct RawService {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    profiles: Vec<String>,
}

/// 載入後的描述檔與對應的變數環境
#[derive(Debug)]
pub struct LoadedDescriptor {
    pub path: PathBuf,
    pub descriptor: Descriptor,
    pub variables: VariableEnvironment,
}

#[derive(Debug, Clone, Default)]
pub struct DescriptorLoader {
    env_file: Option<PathBuf>,
}

impl DescriptorLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 覆蓋預設的 `<compose 目錄>/.env`
    pub fn with_env_file<P: Into<PathBuf>>(mut self, env_file: P) -> Self {
        self.env_file = Some(env_file.into());
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P, fallback: Box<dyn VariableSource>) -> Result<LoadedDescriptor> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MirrorError::DescriptorNotFound {
                path: path.display().to_string(),
            });
        }

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let env_path = self
            .env_file
            .clone()
            .unwrap_or_else(|| base_dir.join(DEFAULT_ENV_FILE));
        let variables = VariableEnvironment::load(&env_path, fallback)?;

        tracing::info!("📁 Loading compose file: {}", path.display());
        let mut descriptor = read_document(path)?;

        for include in descriptor.includes.clone() {
            let include_path = base_dir.join(&include);
            if !include_path.is_file() {
                tracing::debug!("Skipping missing include {}", include_path.display());
                continue;
            }

            let included = read_document(&include_path)?;
            if !included.includes.is_empty() {
                tracing::debug!(
                    "Ignoring nested include directive in {}",
                    include_path.display()
                );
            }
            tracing::debug!(
                "Merging {} services from {}",
                included.len(),
                include_path.display()
            );
            descriptor.merge_services(included.services.into_values());
        }

        tracing::info!("Loaded {} services", descriptor.len());

        Ok(LoadedDescriptor {
            path: path.to_path_buf(),
            descriptor,
            variables,
        })
    }
}

fn read_document(path: &Path) -> Result<Descriptor> {
    let content = std::fs::read_to_string(path)?;
    parse_descriptor(&content, &path.display().to_string())
}

/// 解析單一文件，不處理 include（只記錄路徑）
pub fn parse_descriptor(content: &str, origin: &str) -> Result<Descriptor> {
    let parse_error = |message: String| MirrorError::DescriptorParse {
        path: origin.to_string(),
        message,
    };

    let has_content = content
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#'));
    if !has_content {
        return Ok(Descriptor::default());
    }

    let raw: RawDocument = serde_yaml::from_str::<Option<RawDocument>>(content)
        .map_err(|e| parse_error(e.to_string()))?
        .unwrap_or_default();

    let mut descriptor = Descriptor {
        includes: raw.include.map(IncludeDirective::into_paths).unwrap_or_default(),
        ..Descriptor::default()
    };

    let mut services = Vec::new();
    for (name, body) in raw.services.unwrap_or_default().0 {
        let service = to_service(&name, body).map_err(parse_error)?;
        services.push(service);
    }
    descriptor.merge_services(services);

    Ok(descriptor)
}

fn to_service(name: &str, mut body: serde_yaml::Value) -> std::result::Result<ServiceDefinition, String> {
    match body {
        // `web:` 沒有內容時視為沒有 image 的服務
        serde_yaml::Value::Null => Ok(ServiceDefinition::new(name, None)),
        serde_yaml::Value::Mapping(_) => {
            body.apply_merge()
                .map_err(|e| format!("service '{}': {}", name, e))?;
            let raw: RawService = serde_yaml::from_value(body)
                .map_err(|e| format!("service '{}': {}", name, e))?;
            Ok(ServiceDefinition::new(name, raw.image.as_deref()).with_profiles(raw.profiles))
        }
        _ => Err(format!("service '{}' must be a mapping", name)),
    }
}
