use clap::Parser;
use compose_mirror::adapters::runtime;
use compose_mirror::config::{LogFormat, OutputFormat};
use compose_mirror::core::orchestrator::render_summary;
use compose_mirror::domain::ports::Confirm;
use compose_mirror::utils::error::{ErrorSeverity, MirrorError};
use compose_mirror::utils::{logger, validation::Validate};
use compose_mirror::{
    CliConfig, DescriptorLoader, ImageExtractor, MirrorConfig, ProcessEnvironment,
    SkopeoCopyTool, StdinConfirm, TransferEngine, TransferPlan,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Text => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("🚀 Starting compose-mirror");
    tracing::debug!("CLI config: {:?}", config);

    match run(&config).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(
                "❌ compose-mirror failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

/// 回傳 `false` 表示至少一個映像傳輸失敗
async fn run(config: &CliConfig) -> Result<bool, MirrorError> {
    config.validate()?;

    let settings = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading settings from: {}", path);
            MirrorConfig::from_file(path)?
        }
        None => MirrorConfig::default(),
    };
    settings.validate()?;

    // 先確認外部工具，再讀取描述檔
    let tool = if config.dry_run {
        None
    } else {
        runtime::ensure_runtime(settings.copy_mode()).await?;
        let auth_override = config.auth_file.as_deref().map(Path::new);
        Some(SkopeoCopyTool::from_settings(&settings.copy, auth_override)?)
    };

    let mut loader = DescriptorLoader::new();
    if let Some(env_file) = config
        .env_file
        .as_deref()
        .or(settings.descriptor.env_file.as_deref())
    {
        loader = loader.with_env_file(env_file);
    }
    let loaded = loader.load(&config.compose_file, Box::new(ProcessEnvironment))?;

    let extraction =
        ImageExtractor::new(config.all_profiles).extract(&loaded.descriptor, &loaded.variables);

    if extraction.is_empty() {
        let hint = if config.all_profiles {
            ""
        } else {
            " (use --all-profiles to include services with profiles)"
        };
        println!("No images found in the compose file{}", hint);
        return Ok(true);
    }

    let plan = TransferPlan::new(extraction.candidates, &config.target_registry);
    match config.output {
        OutputFormat::Text => println!("\n{}", plan.render_preview()),
        OutputFormat::Json => println!("{}", plan.to_json()?),
    }

    let Some(tool) = tool else {
        tracing::info!("🔍 DRY RUN MODE - No images were transferred");
        return Ok(true);
    };

    if !config.yes {
        let mut prompt = StdinConfirm::stdio();
        if !prompt.confirm("\nDo you want to proceed with the transfer?")? {
            println!("Transfer cancelled");
            return Ok(true);
        }
    }

    println!();
    let engine = TransferEngine::new(tool);
    let summary = engine.run(&plan).await;

    println!("\n{}", render_summary(&summary));
    if config.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(summary.all_succeeded())
}
