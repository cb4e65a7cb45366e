//! The introspection-to-generation pipeline.
//!
//! One run resolves the driver, opens a session, extracts the model,
//! validates it, applies the namespace correction unless disabled, and
//! hands the result to the source generator. The session is released
//! exactly once on every exit path.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use schemagen_core::{Error as CoreError, fix_model, redact_connection_string, validate_model};
use schemagen_generate::{GenerationError, GenerationReport, SourceGenerator};
use schemagen_introspect::adapter::Session;
use schemagen_introspect::{ConnectOptions, DriverRegistry, ExtractOptions};

use crate::config::{ConfigRef, load_database_config};

/// Errors a pipeline run can end with.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad inputs, caught before anything touches the database.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Resolved inputs for one run; both configuration styles build this.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Identifier resolved against the driver registry.
    pub driver_id: String,
    /// Expression recorded in generated artifacts.
    pub driver_expr: String,
    /// Low-level connector identifier; recorded for the run log, actual
    /// connections go through the resolved driver.
    pub connector: String,
    pub connect: ConnectOptions,
    pub extract: ExtractOptions,
    /// Apply the catalog/schema correction to the extracted model.
    pub swap_namespaces: bool,
    pub output_dir: PathBuf,
    pub package: String,
}

/// Flags that apply to either run style.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Keep namespaces exactly as the driver reported them.
    pub no_swap: bool,
    /// Abort extraction after this long instead of waiting forever.
    pub extract_timeout: Option<Duration>,
}

/// Inputs of the explicit-parameter style.
#[derive(Debug, Clone)]
pub struct ExplicitParams {
    pub driver: String,
    pub db_driver: String,
    pub url: String,
    pub output_dir: PathBuf,
    pub package: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: String,
    pub driver: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub tables: usize,
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub bytes_written: u64,
}

/// Execute one pipeline run.
///
/// The driver is resolved before anything connects, so an unknown
/// identifier never opens a connection. Once a session exists it is
/// closed exactly once; if both the run and the release fail, the run's
/// error wins and the release failure is only logged.
pub async fn run(
    registry: &DriverRegistry,
    request: &PipelineRequest,
) -> Result<PipelineReport, PipelineError> {
    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();
    let timer = Instant::now();
    let connection = redact_connection_string(&request.connect.url);
    info!(
        event = "run_started",
        run_id = %run_id,
        driver = %request.driver_id,
        connector = %request.connector,
        url = %connection.redacted,
        swap_namespaces = request.swap_namespaces,
        package = %request.package,
    );

    let driver = registry
        .resolve(&request.driver_id)
        .map_err(|err| PipelineError::Configuration(err.to_string()))?;

    let mut session = driver.connect(&request.connect).await?;
    info!(event = "connected", run_id = %run_id, driver = %request.driver_id);

    let outcome = extract_and_generate(session.as_mut(), request).await;
    let released = session.close().await;

    let generation = match (outcome, released) {
        (Ok(generation), Ok(())) => generation,
        (Ok(_), Err(err)) => {
            // The run itself succeeded, so the release failure is the
            // only thing left to report.
            return Err(err.into());
        }
        (Err(err), Ok(())) => return Err(err),
        (Err(err), Err(release_err)) => {
            warn!(event = "release_failed", run_id = %run_id, error = %release_err);
            return Err(err);
        }
    };

    let report = PipelineReport {
        run_id: run_id.clone(),
        driver: request.driver_id.clone(),
        started_at,
        duration_ms: timer.elapsed().as_millis() as u64,
        tables: generation.tables,
        root: generation.root,
        files: generation.files,
        bytes_written: generation.bytes_written,
    };
    info!(
        event = "run_finished",
        run_id = %run_id,
        tables = report.tables,
        files = report.files.len(),
        bytes = report.bytes_written,
        duration_ms = report.duration_ms,
    );
    Ok(report)
}

async fn extract_and_generate(
    session: &mut dyn Session,
    request: &PipelineRequest,
) -> Result<GenerationReport, PipelineError> {
    let raw = match request.extract.timeout {
        Some(limit) => tokio::time::timeout(limit, session.extract_model(&request.extract))
            .await
            .map_err(|_| {
                CoreError::Extraction(format!("extraction did not finish within {limit:?}"))
            })??,
        None => session.extract_model(&request.extract).await?,
    };

    validate_model(&raw)?;

    let model = if request.swap_namespaces {
        fix_model(&raw)
    } else {
        raw
    };

    let generator = SourceGenerator::new(model);
    let report =
        generator.write_to_file(&request.driver_expr, &request.output_dir, &request.package)?;
    Ok(report)
}

/// Run with every input given as a discrete argument. The driver
/// identifier doubles as the recorded driver expression.
pub async fn run_explicit(
    registry: &DriverRegistry,
    params: ExplicitParams,
    overrides: &RunOverrides,
) -> Result<PipelineReport, PipelineError> {
    let request = PipelineRequest {
        driver_id: params.driver.clone(),
        driver_expr: params.driver,
        connector: params.db_driver,
        connect: ConnectOptions {
            url: params.url,
            user: params.user,
            password: params.password,
        },
        extract: ExtractOptions {
            schemas: None,
            timeout: overrides.extract_timeout,
        },
        swap_namespaces: !overrides.no_swap,
        output_dir: params.output_dir,
        package: params.package,
    };
    run(registry, &request).await
}

/// Run from a named configuration reference (`path` or `path#section`).
pub async fn run_from_config(
    registry: &DriverRegistry,
    reference: &str,
    output_dir: Option<PathBuf>,
    overrides: &RunOverrides,
) -> Result<PipelineReport, PipelineError> {
    let reference = ConfigRef::parse(reference);
    let config = load_database_config(&reference)?;

    let package = config.codegen.package.clone().ok_or_else(|| {
        PipelineError::Configuration(format!(
            "missing required key 'codegen.package' in {}",
            reference.path.display()
        ))
    })?;
    // Explicit argument, configured default, working directory; in that
    // order.
    let output_dir = output_dir
        .or_else(|| config.codegen.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let request = PipelineRequest {
        driver_id: config.driver.clone(),
        driver_expr: config.driver_expr(),
        connector: config.driver.clone(),
        connect: ConnectOptions {
            url: config.url.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
        },
        extract: ExtractOptions {
            schemas: config.schemas.clone(),
            timeout: overrides.extract_timeout,
        },
        swap_namespaces: config.swap_namespaces && !overrides.no_swap,
        output_dir,
        package,
    };
    run(registry, &request).await
}
