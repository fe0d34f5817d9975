//! CLI entrypoint for snaxel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::{CommandFactory, Parser, error::ErrorKind};
use snaxel_application::{
    NoProgress, NoSearchLogger, ProgressNotifier, ResultCache, RunSearchError, RunSearchUseCase,
    SearchInput, SearchLogger,
};
use snaxel_domain::{OutputFormat, Severity, Source};
use snaxel_infrastructure::{ConfigLoader, FileConfig, JsonlSearchLogger, QueryEngine};
use snaxel_presentation::{Cli, ConsoleFormatter, ProgressReporter, SearchRepl};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    }
}

/// Caller mistakes exit with 2, everything else with 1
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<RunSearchError>() {
        Some(e) if e.is_bad_request() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => error!("{}", issue.message),
        }
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("Configuration has {} error(s)", errors);
    }

    Ok(config)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    if !config.output.color || format == OutputFormat::Json {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let engine = Arc::new(QueryEngine::from_config(&config.engine)?);
    info!("Using {} query engine", engine.describe());

    let cache = Arc::new(ResultCache::new(config.cache.to_cache_config()));

    let logger: Arc<dyn SearchLogger> = match config
        .logging
        .search_log
        .as_ref()
        .and_then(JsonlSearchLogger::new)
    {
        Some(logger) => {
            info!("Search log: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoSearchLogger),
    };

    let use_case = RunSearchUseCase::new(engine, Arc::clone(&cache))
        .with_config(config.behavior_config())
        .with_logger(logger);

    let sources = if cli.sources.is_empty() {
        config.search.default_sources.clone()
    } else {
        cli.sources.clone()
    };

    let show_progress = !cli.quiet && config.output.show_progress;

    // Interactive mode
    if cli.interactive {
        let shutdown = CancellationToken::new();
        let sweeper = config
            .cache
            .sweep_interval()
            .map(|interval| cache.spawn_sweeper(interval, shutdown.clone()));

        let mut repl = SearchRepl::new(use_case, sources)
            .with_progress(show_progress)
            .with_limit(cli.limit)
            .with_format(format);
        let outcome = repl.run().await;

        shutdown.cancel();
        if let Some(handle) = sweeper {
            let _ = handle.await;
        }
        outcome?;
        return Ok(ExitCode::SUCCESS);
    }

    // One-shot modes - query is required
    let Some(query) = cli.query.clone() else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "a search query is required (use --interactive for the prompt)",
            )
            .exit();
    };

    let progress: Box<dyn ProgressNotifier> = if show_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(NoProgress)
    };

    if let Some(source) = cli.single {
        return run_single(&use_case, source, &query, cli.limit, format).await;
    }

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    if cli.all {
        let result = use_case
            .execute_all_with_progress(&query, cli.limit, Some(cancel), progress.as_ref())
            .await;
        ctrl_c.abort();
        let output = result?;
        let rendered = match format {
            OutputFormat::Json => ConsoleFormatter::format_all_json(&output.envelope, &output.summary),
            OutputFormat::Summary => ConsoleFormatter::format_summary(&output.summary),
            OutputFormat::Full => format!(
                "{}\n{}",
                ConsoleFormatter::format(&output.envelope),
                ConsoleFormatter::format_summary(&output.summary)
            ),
        };
        println!("{}", rendered);
        return Ok(ExitCode::SUCCESS);
    }

    let mut input = SearchInput::new(query)
        .with_sources(sources)
        .with_cancellation(cancel);
    input.limit = cli.limit;

    let result = use_case
        .execute_with_progress(input, progress.as_ref())
        .await;
    ctrl_c.abort();

    let envelope = result?;
    println!("{}", ConsoleFormatter::render(&envelope, format));
    Ok(ExitCode::SUCCESS)
}

/// Single-source lookup; a failed lookup is printed and exits with 1
async fn run_single<P: snaxel_application::SourceProvider + 'static>(
    use_case: &RunSearchUseCase<P>,
    source: Source,
    query: &str,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let result = use_case.execute_single(source, query, limit).await?;

    let rendered = match format {
        OutputFormat::Json => ConsoleFormatter::format_single_json(source, &result),
        _ => ConsoleFormatter::format_source(source, &result),
    };
    println!("{}", rendered);

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
