//! Executors that run GraphQL documents against GitHub.
//!
//! The retrieval service depends only on [`QueryExecutor`], so tests can stub
//! the transport while [`OctocrabQueryExecutor`] handles real HTTP requests.

mod client;
mod error_mapping;
mod octocrab_executor;

pub use octocrab_executor::OctocrabQueryExecutor;

use async_trait::async_trait;
use serde_json::Value;

use crate::github::error::RetrievalError;

/// Executes a GraphQL document with bound variables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `query` with `variables` and return the decoded JSON response.
    ///
    /// Implementations report transport, authentication and HTTP failures;
    /// GraphQL `errors` payloads are returned as part of the response.
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, RetrievalError>;
}
