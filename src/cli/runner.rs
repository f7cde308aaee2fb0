//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Settings;
use crate::error::{Result, ResultExt};
use crate::pipeline::LoadPipeline;
use crate::window::compute_window;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                year,
                month,
                resources,
                destination,
                dataset,
                base_url,
                page_limit,
            } => {
                let overrides = RunOverrides {
                    resources: resources.clone(),
                    destination: destination.clone(),
                    dataset: dataset.clone(),
                    base_url: base_url.clone(),
                    page_limit: *page_limit,
                };
                self.run_month(*year, *month, overrides).await
            }
            Commands::Resources => self.resources(),
            Commands::Window { year, month } => self.window(*year, *month),
        }
    }

    /// Settings from file and environment with CLI flags on top
    fn settings(&self, overrides: &RunOverrides) -> Result<Settings> {
        let mut settings = Settings::load(self.cli.config.as_deref())?;
        overrides.apply(&mut settings);
        settings.validate()?;
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    async fn run_month(&self, year: i32, month: u32, overrides: RunOverrides) -> Result<()> {
        // Fail on a bad month before touching the destination
        compute_window(year, month)?;

        let settings = self.settings(&overrides)?;
        let mut pipeline = LoadPipeline::from_settings(&settings)?;

        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current page");
                on_signal.cancel();
            }
        });

        let summary = pipeline
            .run_month(year, month, &settings.resources, cancel)
            .await?;
        self.emit(&summary)
    }

    fn resources(&self) -> Result<()> {
        let catalog = Catalog::spacex()?;
        let resources: Vec<Value> = catalog
            .iter()
            .map(|r| {
                json!({
                    "name": r.name(),
                    "table": r.table_name(),
                    "endpoint": r.endpoint_path(),
                    "write_strategy": r.write_strategy(),
                    "primary_key": r.primary_key(),
                    "merge_key": r.merge_key(),
                    "dedup_sort": r.dedup_sort(),
                    "date_column": r.date_column(),
                    "columns": r.allowed_columns(),
                })
            })
            .collect();
        self.emit(&json!({ "resources": resources }))
    }

    fn window(&self, year: i32, month: u32) -> Result<()> {
        let window = compute_window(year, month)?;
        self.emit(&json!({
            "year": window.year(),
            "month": window.month(),
            "start": window.start_str(),
            "end": window.end_str(),
            "days": window.days(),
        }))
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        }
        .context("Failed to render output")?;
        println!("{text}");
        Ok(())
    }
}

/// `run` flags that take precedence over file and environment settings
#[derive(Debug, Clone, Default)]
pub(crate) struct RunOverrides {
    pub resources: Vec<String>,
    pub destination: Option<PathBuf>,
    pub dataset: Option<String>,
    pub base_url: Option<String>,
    pub page_limit: Option<u32>,
}

impl RunOverrides {
    pub(crate) fn apply(&self, settings: &mut Settings) {
        if !self.resources.is_empty() {
            settings.resources = self
                .resources
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
        }
        if let Some(destination) = &self.destination {
            settings.destination = destination.clone();
        }
        if let Some(dataset) = &self.dataset {
            settings.dataset = dataset.clone();
        }
        if let Some(url) = &self.base_url {
            settings.base_url = url.clone();
        }
        if let Some(limit) = self.page_limit {
            settings.page_limit = limit;
        }
    }
}
