//! crm-joins - worked SQL join lessons against a sample CRM database.

mod cli;

use cli::Cli;
use crm_joins::config::{Config, DisplayConfig, StoreConfig};
use crm_joins::db::{DatabaseClient, SqliteClient};
use crm_joins::error::{JoinsError, Result};
use crm_joins::lesson::{run_step, run_steps, Lesson, SAMPLE_CRM_SQL};
use crm_joins::logging;
use crm_joins::query::QueryRunner;
use crm_joins::render::{self, OutputFormat};
use std::io::Write;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    // Initialize logging
    let logs_to_file = cli.log_file.is_some();
    match &cli.log_file {
        Some(path) => {
            if let Err(e) = logging::init_file_logging(path) {
                eprintln!("{}: {}", e.category(), e);
                std::process::exit(1);
            }
        }
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        // The failure always reaches stderr, whatever RUST_LOG filters out
        if logs_to_file {
            error!("{}: {}", e.category(), e);
        }
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration file
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let mut display = config.display.clone();
    cli.apply_display_overrides(&mut display);
    let format = cli
        .parse_output_format(display.output)
        .map_err(JoinsError::config)?;

    let lesson = Lesson::crm();

    if cli.list {
        return write_stdout(&render::render_step_list(lesson.steps()));
    }

    let client = open_store(&cli, &config).await?;
    let outcome = execute(&cli, &client, &lesson, format, &display).await;

    if let Err(e) = client.close().await {
        warn!("Failed to close store: {e}");
    }

    outcome
}

/// Runs whatever the command line asked for against an open store.
async fn execute(
    cli: &Cli,
    client: &SqliteClient,
    lesson: &Lesson,
    format: OutputFormat,
    display: &DisplayConfig,
) -> Result<()> {
    let runner = QueryRunner::new(client);

    if cli.schema {
        let schema = client.introspect_schema().await?;
        return write_stdout(&render::render_schema(&schema, format)?);
    }

    if !cli.query.is_empty() {
        let mut results = Vec::with_capacity(cli.query.len());
        for sql in &cli.query {
            let result = runner.run(sql).await?;
            if format == OutputFormat::Text {
                write_stdout(&render::render_result(&result, display))?;
            }
            results.push(result);
        }
        if format == OutputFormat::Json {
            write_stdout(&render::render_results(&results, format, display)?)?;
        }
        return Ok(());
    }

    let steps = lesson.select(cli.step.as_slice())?;

    match format {
        // Print each step as soon as it has run, so a failing step still
        // leaves the earlier ones on screen.
        OutputFormat::Text => {
            for (i, step) in steps.iter().enumerate() {
                let report = run_step(&runner, step).await?;
                if i > 0 {
                    write_stdout("\n")?;
                }
                write_stdout(&render::render_report(&report, display))?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            let reports = run_steps(&runner, &steps).await?;
            write_stdout(&render::render_reports(&reports, format, display)?)
        }
    }
}

/// Opens the store selected by the command line and config.
async fn open_store(cli: &Cli, config: &Config) -> Result<SqliteClient> {
    if cli.sample {
        info!("Using the bundled sample CRM database");
        return SqliteClient::open_seeded(SAMPLE_CRM_SQL).await;
    }

    if let Some(seed_path) = &cli.seed {
        info!("Seeding a private database from {}", seed_path.display());
        let seed = std::fs::read_to_string(seed_path).map_err(|e| {
            JoinsError::io(format!(
                "Failed to read seed file {}: {e}",
                seed_path.display()
            ))
        })?;
        return SqliteClient::open_seeded(&seed).await;
    }

    match resolve_store(cli, config)? {
        Some(store) => {
            info!("Store: {}", store.display_string());
            SqliteClient::open_config(&store).await
        }
        None => Err(JoinsError::config(
            "No database configured. Pass a DATABASE path, use --sample, or set CRM_JOINS_DATABASE",
        )),
    }
}

/// Resolves the final store configuration from CLI args, config file, and environment.
fn resolve_store(cli: &Cli, config: &Config) -> Result<Option<StoreConfig>> {
    // Start with CLI store config if provided
    let mut store = cli.to_store_config()?;

    // If no CLI store, try named connection from config
    if store.is_none() {
        if let Some(name) = cli.connection_name() {
            store = config.get_connection(Some(name)).cloned();
            if store.is_none() {
                return Err(JoinsError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    // If still no store, try default from config
    if store.is_none() {
        store = config.get_connection(None).cloned();
    }

    // Environment variable fills in a missing path
    let mut store = store.unwrap_or_default();
    store.apply_env_defaults();

    Ok(store.path.is_some().then_some(store))
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| JoinsError::io(format!("Failed to write output: {e}")))
}
