use crate::core::variables::{Resolution, VariableEnvironment};
use crate::domain::model::{Descriptor, TransferCandidate};
use std::fmt;

/// 抽取階段的非致命問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// 找不到變數，保留原始佔位符繼續處理
    UnresolvedVariable {
        service: String,
        variable: String,
        raw: String,
    },
    /// 解析後 image 為空，服務被排除
    EmptyImage { service: String },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::UnresolvedVariable {
                service,
                variable,
                raw,
            } => write!(
                f,
                "Variable '{}' is not set for service '{}', keeping '{}' as-is",
                variable, service, raw
            ),
            ExtractionWarning::EmptyImage { service } => {
                write!(f, "Could not resolve image value for service '{}'", service)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub candidates: Vec<TransferCandidate>,
    pub warnings: Vec<ExtractionWarning>,
    /// 因 profiles 被略過的服務
    pub skipped_profiled: Vec<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageExtractor {
    include_profiles: bool,
}

impl ImageExtractor {
    pub fn new(include_profiles: bool) -> Self {
        Self { include_profiles }
    }

    /// 依服務宣告順序產生候選清單，不去重
    pub fn extract(&self, descriptor: &Descriptor, variables: &VariableEnvironment) -> Extraction {
        let mut extraction = Extraction::default();

        for (name, service) in &descriptor.services {
            let Some(raw_image) = service.image.as_deref() else {
                tracing::debug!("Service '{}' has no image, skipping", name);
                continue;
            };

            if !service.profiles.is_empty() && !self.include_profiles {
                tracing::debug!(
                    "Service '{}' is gated by profiles [{}], skipping",
                    name,
                    service.profiles.join(", ")
                );
                extraction.skipped_profiled.push(name.clone());
                continue;
            }

            let resolution = variables.resolve_image(raw_image);
            if let Resolution::Unresolved { name: variable, raw } = &resolution {
                let warning = ExtractionWarning::UnresolvedVariable {
                    service: name.clone(),
                    variable: variable.clone(),
                    raw: raw.clone(),
                };
                tracing::warn!("⚠️ {}", warning);
                extraction.warnings.push(warning);
            }

            let image = resolution.into_value();
            if image.is_empty() {
                let warning = ExtractionWarning::EmptyImage {
                    service: name.clone(),
                };
                tracing::warn!("⚠️ {}", warning);
                extraction.warnings.push(warning);
                continue;
            }

            extraction.candidates.push(TransferCandidate::new(
                image,
                name.clone(),
                service.profiles.clone(),
            ));
        }

        extraction
    }
}

/// 便利函式
pub fn extract(
    descriptor: &Descriptor,
    variables: &VariableEnvironment,
    include_profiles: bool,
) -> Vec<TransferCandidate> {
    ImageExtractor::new(include_profiles)
        .extract(descriptor, variables)
        .candidates
}
