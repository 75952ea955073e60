mod args;
mod output;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archiscan_core::{
    leaves, load_config, load_config_from_env, parse_finding_aid, validate_config, Config,
    FileFindingAidSource, FindingAidSource, HttpFindingAidSource, InventoryTarget,
    MemorixImageSource, OrchestratorConfig, OutputLayout, PicturaeClient, ProgressEvent,
    ScanCatalog, ScanDownloader, ScanOrchestrator,
};

use args::{Cli, Command, OutputFormat};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries progress and summaries
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(cli.log_json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!cli.log_json).then(|| {
            tracing_subscriber::fmt::layer().with_writer(std::io::stderr)
        }))
        .init();

    let config = resolve_config(&cli)?;
    let finding_aids = finding_aid_source(&cli.command, &config)?;

    if let Command::List { url } = &cli.command {
        let xml = finding_aids
            .fetch(url)
            .await
            .with_context(|| format!("Failed to fetch finding aid {}", url))?;
        let finding_aid = parse_finding_aid(&xml).context("Failed to parse finding aid")?;
        print!("{}", output::leaf_listing(&finding_aid, &leaves(&finding_aid.root)));
        return Ok(());
    }

    let orchestrator = build_orchestrator(&config, finding_aids)?;

    match cli.command {
        Command::Inventory {
            collection,
            inventory,
            path,
            nscans,
            nest_by_collection,
        } => {
            let mut target = InventoryTarget::new(collection, inventory, path);
            if let Some(n) = nscans {
                target = target.with_declared_scans(n);
            }
            let layout = if nest_by_collection {
                OutputLayout::NestedByCollection
            } else {
                OutputLayout::Flat
            };

            let report = orchestrator
                .run_inventory(&target, layout)
                .await
                .with_context(|| format!("Inventory {} failed", target.inventory_id))?;

            match cli.format {
                OutputFormat::Text => print!("{}", output::inventory_report(&report)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            if !report.is_clean() {
                bail!(
                    "{} scans of inventory {} could not be downloaded",
                    report.failed_scans.len(),
                    report.target.inventory_id
                );
            }
        }
        Command::FindingAid { url } => {
            let summary = orchestrator
                .run_finding_aid(&url)
                .await
                .with_context(|| format!("Finding aid {} could not be processed", url))?;

            match cli.format {
                OutputFormat::Text => print!("{}", output::run_summary(&summary)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
            if summary.failed() > 0 {
                bail!(
                    "{} of {} inventories failed",
                    summary.failed(),
                    summary.inventories.len()
                );
            }
        }
        Command::List { .. } => {}
    }

    Ok(())
}

/// Load the configuration file (or defaults), apply command-line overrides
/// and validate the result.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_from_env().context("Failed to load configuration")?,
    };

    if let Some(root) = &cli.output {
        config.output.root = root.clone();
    }
    if let Some(concordance) = cli.concordance {
        config.output.concordance = concordance;
    }

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Local files are read directly; everything else goes over HTTP.
fn finding_aid_source(command: &Command, config: &Config) -> Result<Arc<dyn FindingAidSource>> {
    let url = match command {
        Command::FindingAid { url } | Command::List { url } => url.as_str(),
        Command::Inventory { .. } => "",
    };
    if url.starts_with("http://") || url.starts_with("https://") || url.is_empty() {
        let source = HttpFindingAidSource::new(&config.finding_aid)
            .context("Failed to create finding-aid client")?;
        Ok(Arc::new(source))
    } else {
        Ok(Arc::new(FileFindingAidSource))
    }
}

fn build_orchestrator(
    config: &Config,
    finding_aids: Arc<dyn FindingAidSource>,
) -> Result<ScanOrchestrator> {
    let scans = PicturaeClient::new(config.metadata.clone())
        .context("Failed to create metadata client")?;
    let images =
        MemorixImageSource::new(&config.images).context("Failed to create image client")?;

    info!(
        metadata = %config.metadata.base_url,
        images = %config.images.base_url,
        output = %config.output.root.display(),
        "Using services"
    );

    let orchestrator = ScanOrchestrator::new(
        OrchestratorConfig::from(config),
        ScanCatalog::from_config(Arc::new(scans), &config.metadata),
        ScanDownloader::new(Arc::new(images)),
        finding_aids,
    )
    .with_progress_callback(Arc::new(|event: &ProgressEvent| {
        println!("{}", output::progress_line(event));
    }));

    Ok(orchestrator)
}
