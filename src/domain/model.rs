use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// compose 檔案中的一個服務
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub name: String,
    /// 原始 image 欄位，可能包含 `${NAME}` 佔位符
    pub image: Option<String>,
    pub profiles: Vec<String>,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>, image: Option<&str>) -> Self {
        Self {
            name: name.into(),
            image: image.map(str::to_string),
            profiles: Vec::new(),
        }
    }

    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = profiles.into_iter().map(Into::into).collect();
        self
    }
}

/// 合併 include 之後的服務表，保留宣告順序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    pub services: IndexMap<String, ServiceDefinition>,
    pub includes: Vec<String>,
}

impl Descriptor {
    /// 淺層合併：同名服務以後合併者為準，位置沿用第一次出現的位置
    pub fn merge_services<I>(&mut self, services: I)
    where
        I: IntoIterator<Item = ServiceDefinition>,
    {
        for service in services {
            self.services.insert(service.name.clone(), service);
        }
    }

    pub fn service(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.get(name)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferCandidate {
    pub source: String,
    pub service: String,
    pub profiles: Vec<String>,
    /// 由 rewrite 填入
    pub destination: Option<String>,
}

impl TransferCandidate {
    pub fn new(source: impl Into<String>, service: impl Into<String>, profiles: Vec<String>) -> Self {
        Self {
            source: source.into(),
            service: service.into(),
            profiles,
            destination: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub source: String,
    pub destination: String,
    pub service: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferSummary {
    pub target_registry: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<TransferOutcome>,
}

impl TransferSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}
