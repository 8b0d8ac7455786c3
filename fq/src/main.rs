//! FeatureQuest - Feature Research and PRD Workflow Orchestrator
//!
//! CLI entry point for the interactive workflow, the HTTP API, and the
//! comment triage flow.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use featurequest::cli::{Cli, Command};
use featurequest::clarify::{ConsolePrompter, Prompter};
use featurequest::config::Config;
use featurequest::domain::FeatureRequest;
use featurequest::server::{self, AppState};
use featurequest::session::SessionStore;
use featurequest::workflow::runner::WorkflowRunner;
use featurequest::workflow::triage;
use planexec::{CloudExecutor, PlanExecutor};

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("featurequest")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("featurequest.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn build_executor(config: &Config) -> Result<Arc<dyn PlanExecutor>> {
    let api_key = config.api_key()?;
    let executor = CloudExecutor::new(
        config.executor.base_url.clone(),
        api_key,
        Duration::from_millis(config.executor.timeout_ms),
    )
    .context("Failed to create executor client")?;
    Ok(Arc::new(executor))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Fail fast on a missing credential
    config.validate()?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Serve { host, port }) => {
            debug!(?host, ?port, "main: matched Serve command");
            cmd_serve(&config, host, port).await
        }
        Some(Command::CheckComments { issue_id }) => {
            debug!(%issue_id, "main: matched CheckComments command");
            cmd_check_comments(&config, &issue_id).await
        }
        Some(Command::Run { name, description }) => {
            debug!(?name, ?description, "main: matched Run command");
            cmd_run(&config, name, description).await
        }
        None => {
            debug!("main: no command specified, running interactive workflow");
            cmd_run(&config, None, None).await
        }
    }
}

/// Run the full workflow, prompting for missing request fields
async fn cmd_run(config: &Config, name: Option<String>, description: Option<String>) -> Result<()> {
    debug!("cmd_run: called");
    let executor = build_executor(config)?;
    let prompter: Arc<dyn Prompter> = Arc::new(ConsolePrompter::new()?);

    println!("{}", "Feature Research and PRD Generation".bright_cyan().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => prompter.ask_text("What feature would you like to research?")?,
    };
    let description = match description {
        Some(d) => d,
        None => prompter.ask_text("Please describe the feature in detail:")?,
    };

    let request = FeatureRequest { name, description };
    let runner = WorkflowRunner::new(executor, prompter, config.output.analysis_dir.clone());

    let outcome = runner.run(&request).await?;

    println!();
    println!("{}", "Feature Research Complete".bright_cyan().bold());
    println!("Feature: {}", outcome.analysis.feature_name);
    println!("Analysis saved to: {}", outcome.analysis_file.display());
    if let Some(page_id) = &outcome.page_id {
        println!("{} PRD page created: {}", "✓".green(), page_id);
    }
    if let Some(issue_id) = &outcome.issue_id {
        println!("{} Tracker issue created: {}", "✓".green(), issue_id);
        println!("  Tasks created: {}", outcome.tasks.len());
    }

    Ok(())
}

/// Serve the HTTP API
async fn cmd_serve(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    debug!("cmd_serve: called");
    let executor = build_executor(config)?;
    let prompter: Arc<dyn Prompter> = Arc::new(ConsolePrompter::new()?);
    let runner = Arc::new(WorkflowRunner::new(
        executor,
        prompter,
        config.output.analysis_dir.clone(),
    ));

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid server address")?;

    println!("Starting FeatureQuest API on {}", addr);

    let state = AppState {
        runner,
        sessions: SessionStore::new(),
    };
    server::serve(addr, state).await
}

/// Triage comments for an existing issue
async fn cmd_check_comments(config: &Config, issue_id: &str) -> Result<()> {
    debug!(%issue_id, "cmd_check_comments: called");
    let executor = build_executor(config)?;
    let prompter: Arc<dyn Prompter> = Arc::new(ConsolePrompter::new()?);
    let runner = WorkflowRunner::new(executor, prompter.clone(), config.output.analysis_dir.clone());

    println!("Checking comments for issue: {}", issue_id.bright_cyan());
    triage::monitor_comments(&runner, &prompter, issue_id).await
}
