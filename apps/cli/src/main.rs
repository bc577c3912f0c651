use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, AnalysisService, FileCandidate, HttpAnalysisService, ProcessingState,
    RequestOrchestrator, Session,
};
use shared::domain::{TaskId, ViewKind};
use tokio::runtime::Handle;

mod render;

#[derive(Parser, Debug)]
#[command(name = "pixeltype", about = "Submit UI mockups for font-size analysis")]
struct Cli {
    /// Analysis service base url; overrides pixeltype.toml and environment.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an image and print the analysis.
    Process {
        path: PathBuf,
        /// View whose artifact is marked active: normalized, ocr_detection, overlay, annotated.
        #[arg(long, default_value = "normalized")]
        view: String,
        #[arg(long)]
        json: bool,
    },
    /// Check that the analysis service is up.
    Health,
    /// Fetch the stored report of an earlier run.
    Result { task_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(base_url) = &cli.base_url {
        settings = settings.with_base_url(base_url)?;
    }
    tracing::debug!(base_url = %settings.base_url, "resolved client settings");
    let service = Arc::new(HttpAnalysisService::new(settings.clone())?);

    match cli.command {
        Command::Process { path, view, json } => {
            let view = ViewKind::parse(&view).ok_or_else(|| anyhow!("unknown view '{view}'"))?;
            let (mut orchestrator, mut events) =
                RequestOrchestrator::new(service, settings, Handle::current());
            let mut session = Session::new();

            let candidate = FileCandidate::from_path(&path)?;
            session.select_file(candidate)?;
            orchestrator.submit(&mut session)?;

            let mut last_percent = None;
            let interrupted = tokio::select! {
                _ = orchestrator.run_until_settled(&mut session, &mut events, |session| {
                    let percent = session.state().percent();
                    if percent.is_some() && percent != last_percent {
                        last_percent = percent;
                        eprintln!(
                            "[{:>3}%] {}",
                            percent.unwrap_or_default(),
                            session.state().label().unwrap_or_default()
                        );
                    }
                }) => false,
                _ = tokio::signal::ctrl_c() => true,
            };
            if interrupted {
                orchestrator.cancel(&mut session);
            }

            match session.state() {
                ProcessingState::Succeeded(_) => {}
                ProcessingState::Failed(_) => {
                    let message = session
                        .message()
                        .map(|message| message.text.clone())
                        .unwrap_or_else(|| "processing failed".to_string());
                    bail!(message);
                }
                other => bail!("submission did not settle: {other:?}"),
            }

            session.select_view(view);
            if let Some(message) = session.message() {
                eprintln!("{}", message.text);
            }
            let result = session
                .result()
                .context("succeeded session has no result")?;
            let stats = session.stats().unwrap_or_default();
            let distribution = session
                .distribution()
                .unwrap_or(client_core::Distribution::NoData);
            let doc = render::document(result, &stats, &distribution, session.view());
            if json {
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                print!("{}", render::text(&doc));
            }
        }
        Command::Health => {
            let health = service.health().await?;
            println!("{} {} ({})", health.service, health.version, health.status);
        }
        Command::Result { task_id } => {
            let stored = service.fetch_result(&TaskId(task_id)).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
    }

    Ok(())
}
