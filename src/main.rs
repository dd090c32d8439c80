use anyhow::{Context, Result};
use clap::Parser;
use lccde::ui::cli::drivers::InquireDriver;
use lccde::ui::cli::wizard::prompt_choice;
use lccde::ui::types::build::run_task;
use lccde::ui::types::choices::TaskChoice;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Dataset preparation and scoring for the CAN bus ensemble.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Run the task described in this JSON file instead of asking for one.
    #[arg(long)]
    task: Option<PathBuf>,

    /// Save the chosen task as JSON before running it.
    #[arg(long)]
    save_task: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "LCCDE_LOG", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let task: TaskChoice = match &args.task {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading task file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing task file {}", path.display()))?
        }
        None => prompt_choice::<TaskChoice, _>(&InquireDriver)?,
    };

    if let Some(path) = &args.save_task {
        let json = serde_json::to_string_pretty(&task)?;
        fs::write(path, json).with_context(|| format!("saving task to {}", path.display()))?;
        info!(path = %path.display(), "task saved");
    }

    run_task(&task).context("task failed")?;
    Ok(())
}
