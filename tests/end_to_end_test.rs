use anyhow::Result;
use async_trait::async_trait;
use compose_mirror::core::orchestrator::render_summary;
use compose_mirror::domain::ports::{CopyOutput, CopyTool};
use compose_mirror::{
    extract, DescriptorLoader, ImageExtractor, MirrorError, TransferEngine, TransferPlan,
};
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::TempDir;

/// 記錄呼叫並依來源映像決定成敗
#[derive(Default)]
struct FakeCopyTool {
    failing: Vec<&'static str>,
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl CopyTool for FakeCopyTool {
    async fn copy(&self, source: &str, destination: &str) -> compose_mirror::Result<CopyOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_string(), destination.to_string()));

        if self.failing.iter().any(|f| *f == source) {
            return Err(MirrorError::TransferExecution {
                source_image: source.to_string(),
                message: "skopeo exited with exit status: 1".to_string(),
                stdout: String::new(),
                stderr: "unauthorized: authentication required".to_string(),
            });
        }
        Ok(CopyOutput {
            stdout: format!("Copying blob for {}", source),
        })
    }
}

const COMPOSE: &str = r#"
services:
  a:
    image: ${R:-reg.io/x:1}
  b:
    image: plain:2
  c:
    image: y:3
    profiles: [dev]
"#;

fn fixture() -> Result<TempDir> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("docker-compose.yml"), COMPOSE)?;
    std::fs::write(dir.path().join(".env"), "")?;
    Ok(dir)
}

#[tokio::test]
async fn test_defaulted_placeholder_end_to_end() -> Result<()> {
    let dir = fixture()?;
    let loaded = DescriptorLoader::new()
        .load(dir.path().join("docker-compose.yml"), Box::new(HashMap::<String, String>::new()))?;

    let candidates = extract(&loaded.descriptor, &loaded.variables, false);
    let plan = TransferPlan::new(candidates, "dest.io/p");

    let rows: Vec<(&str, &str, &str)> = plan
        .candidates
        .iter()
        .map(|c| {
            (
                c.source.as_str(),
                c.destination.as_deref().unwrap_or_default(),
                c.service.as_str(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        [
            ("reg.io/x:1", "dest.io/p/x:1", "a"),
            ("plain:2", "dest.io/p/plain:2", "b"),
        ]
    );

    let engine = TransferEngine::new(FakeCopyTool::default());
    let summary = engine.run(&plan).await;
    assert!(summary.all_succeeded());
    assert_eq!(summary.outcomes[0].stdout, "Copying blob for reg.io/x:1");
    Ok(())
}

#[tokio::test]
async fn test_process_environment_tier_and_all_profiles() -> Result<()> {
    let dir = fixture()?;
    let mut process = HashMap::new();
    process.insert("R".to_string(), "ghcr.io/acme/x:9".to_string());

    let loaded = DescriptorLoader::new().load(dir.path().join("docker-compose.yml"), Box::new(process))?;
    let extraction = ImageExtractor::new(true).extract(&loaded.descriptor, &loaded.variables);

    let sources: Vec<&str> = extraction.candidates.iter().map(|c| c.source.as_str()).collect();
    assert_eq!(sources, ["ghcr.io/acme/x:9", "plain:2", "y:3"]);
    assert!(extraction.warnings.is_empty());

    let plan = TransferPlan::new(extraction.candidates, "dest.io/p");
    assert!(plan
        .render_preview()
        .contains("- y:3 -> dest.io/p/y:3 (service: 'c' (profiles: dev))"));
    Ok(())
}

#[tokio::test]
async fn test_failed_transfer_does_not_abort_batch() -> Result<()> {
    let dir = fixture()?;
    let loaded = DescriptorLoader::new()
        .load(dir.path().join("docker-compose.yml"), Box::new(HashMap::<String, String>::new()))?;
    let plan = TransferPlan::new(extract(&loaded.descriptor, &loaded.variables, true), "dest.io/p");

    let tool = FakeCopyTool {
        failing: vec!["reg.io/x:1"],
        ..FakeCopyTool::default()
    };
    let engine = TransferEngine::new(tool);
    let summary = engine.run(&plan).await;

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.failed(), 1);
    assert!(!summary.outcomes[0].success);
    assert_eq!(summary.outcomes[0].stderr, "unauthorized: authentication required");
    assert!(summary.outcomes[2].success);
    assert_eq!(
        render_summary(&summary),
        "Transfer complete: 2/3 images transferred successfully"
    );
    assert!(summary.finished_at >= summary.started_at);
    Ok(())
}

#[tokio::test]
async fn test_empty_services_yield_no_candidates() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(
        dir.path().join("compose.yaml"),
        "services:\n  builder:\n    build: .\n  tools:\n    image: tools:1\n    profiles: [ops]\n",
    )?;

    let loaded = DescriptorLoader::new()
        .load(dir.path().join("compose.yaml"), Box::new(HashMap::<String, String>::new()))?;
    let plan = TransferPlan::new(extract(&loaded.descriptor, &loaded.variables, false), "dest.io/p");
    assert!(plan.is_empty());

    let summary = TransferEngine::new(FakeCopyTool::default()).run(&plan).await;
    assert_eq!(summary.total(), 0);
    assert!(summary.all_succeeded());
    Ok(())
}
