//! Pullscope CLI entrypoint: lists a user's recent pull requests.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use pullscope::cache::{MemoryResponseCache, ResponseCache, SqliteResponseCache, migrate_database};
use pullscope::telemetry::StderrJsonlTelemetrySink;
use pullscope::{
    OctocrabQueryExecutor, PullRequest, PullRequestService, PullscopeConfig, RetrievalError,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ignored = writeln!(io::stderr().lock(), "{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), RetrievalError> {
    let config = load_config()?;
    let telemetry = StderrJsonlTelemetrySink;

    if config.migrate_db {
        let database_url = config.require_database_url()?;
        migrate_database(database_url, &telemetry)?;
        return Ok(());
    }

    let user = config.require_user()?;
    let api_base = config.api_base()?;
    let executor = OctocrabQueryExecutor::for_token(user.token(), &api_base)?;
    let cache = build_cache(&config)?;

    let mut service = PullRequestService::new(user, &executor, cache.as_ref())
        .with_ttl(config.response_cache_ttl())
        .with_telemetry(&telemetry);
    let pull_requests = service.pull_requests().await?;

    write_pull_requests(pull_requests)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`RetrievalError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PullscopeConfig, RetrievalError> {
    PullscopeConfig::load().map_err(|error| RetrievalError::Configuration {
        message: error.to_string(),
    })
}

fn build_cache(config: &PullscopeConfig) -> Result<Box<dyn ResponseCache>, RetrievalError> {
    match config.database_url.as_deref() {
        Some(database_url) => Ok(Box::new(SqliteResponseCache::new(database_url)?)),
        None => Ok(Box::new(MemoryResponseCache::new())),
    }
}

fn write_pull_requests(pull_requests: &[PullRequest]) -> Result<(), RetrievalError> {
    let mut stdout = io::stdout().lock();
    for pull_request in pull_requests {
        let labels = if pull_request.labels.is_empty() {
            String::new()
        } else {
            format!(" [{}]", pull_request.labels.join(", "))
        };
        writeln!(
            stdout,
            "{created} {id} {title}{labels}\n    {url}",
            created = pull_request.created_at.format("%Y-%m-%d"),
            id = pull_request.id,
            title = pull_request.title,
            url = pull_request.url,
        )
        .map_err(|error| RetrievalError::Io {
            message: error.to_string(),
        })?;
    }
    Ok(())
}
