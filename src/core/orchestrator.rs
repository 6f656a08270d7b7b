use crate::core::rewrite::{rewrite, rewrite_all};
use crate::domain::model::{TransferCandidate, TransferOutcome, TransferSummary};
use crate::domain::ports::CopyTool;
use crate::utils::error::{MirrorError, Result};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write;

/// 已完成改名的傳輸清單
#[derive(Debug, Clone, Serialize)]
pub struct TransferPlan {
    pub target_registry: String,
    pub candidates: Vec<TransferCandidate>,
    /// 多個來源映像對應到同一個目的地
    pub collisions: IndexMap<String, Vec<String>>,
}

impl TransferPlan {
    pub fn new(mut candidates: Vec<TransferCandidate>, target_registry: &str) -> Self {
        rewrite_all(&mut candidates, target_registry);

        let mut by_destination: IndexMap<String, Vec<String>> = IndexMap::new();
        for candidate in &candidates {
            if let Some(destination) = &candidate.destination {
                let sources = by_destination.entry(destination.clone()).or_default();
                if !sources.contains(&candidate.source) {
                    sources.push(candidate.source.clone());
                }
            }
        }
        by_destination.retain(|_, sources| sources.len() > 1);

        for (destination, sources) in &by_destination {
            tracing::warn!(
                "⚠️ {} source images map to the same destination {}: {}",
                sources.len(),
                destination,
                sources.join(", ")
            );
        }

        Self {
            target_registry: target_registry.to_string(),
            candidates,
            collisions: by_destination,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    fn destination_of(&self, candidate: &TransferCandidate) -> String {
        candidate
            .destination
            .clone()
            .unwrap_or_else(|| rewrite(&candidate.source, &self.target_registry))
    }

    pub fn render_preview(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Found {} images to transfer:", self.len());
        for candidate in &self.candidates {
            let profile_info = if candidate.profiles.is_empty() {
                String::new()
            } else {
                format!(" (profiles: {})", candidate.profiles.join(", "))
            };
            let _ = writeln!(
                out,
                "- {} -> {} (service: '{}'{})",
                candidate.source,
                self.destination_of(candidate),
                candidate.service,
                profile_info
            );
        }
        let _ = write!(out, "\nTarget registry: {}", self.target_registry);
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct TransferEngine<T: CopyTool> {
    tool: T,
}

impl<T: CopyTool> TransferEngine<T> {
    pub fn new(tool: T) -> Self {
        Self { tool }
    }

    /// 逐一傳輸，單一失敗不影響其餘映像
    pub async fn run(&self, plan: &TransferPlan) -> TransferSummary {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(plan.len());

        println!("Starting transfer process...");
        for candidate in &plan.candidates {
            let destination = plan.destination_of(candidate);
            println!("Transferring {} to {}", candidate.source, destination);

            let outcome = match self.tool.copy(&candidate.source, &destination).await {
                Ok(output) => {
                    tracing::info!("✅ Transferred {} -> {}", candidate.source, destination);
                    println!("Successfully transferred {}", candidate.source);
                    if !output.stdout.trim().is_empty() {
                        println!("Output: {}", output.stdout.trim_end());
                    }
                    TransferOutcome {
                        source: candidate.source.clone(),
                        destination,
                        service: candidate.service.clone(),
                        success: true,
                        stdout: output.stdout,
                        stderr: String::new(),
                        message: None,
                    }
                }
                Err(e) => {
                    tracing::warn!("❌ {}", e);
                    println!("Error transferring {}:", candidate.source);
                    let (stdout, stderr) = match &e {
                        MirrorError::TransferExecution { stdout, stderr, .. } => {
                            (stdout.clone(), stderr.clone())
                        }
                        _ => (String::new(), String::new()),
                    };
                    if !stdout.trim().is_empty() {
                        println!("stdout: {}", stdout.trim_end());
                    }
                    if !stderr.trim().is_empty() {
                        println!("stderr: {}", stderr.trim_end());
                    }
                    TransferOutcome {
                        source: candidate.source.clone(),
                        destination,
                        service: candidate.service.clone(),
                        success: false,
                        stdout,
                        stderr,
                        message: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let summary = TransferSummary {
            target_registry: plan.target_registry.clone(),
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        tracing::info!(
            "Transfer finished: {}/{} succeeded in {}s",
            summary.succeeded(),
            summary.total(),
            (summary.finished_at - summary.started_at).num_seconds()
        );
        summary
    }
}

pub fn render_summary(summary: &TransferSummary) -> String {
    format!(
        "Transfer complete: {}/{} images transferred successfully",
        summary.succeeded(),
        summary.total()
    )
}
