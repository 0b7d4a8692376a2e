//! Octocrab implementation of the GraphQL query executor.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::{Value, json};

use crate::github::error::RetrievalError;
use crate::github::user::{ApiBase, PersonalAccessToken};

use super::QueryExecutor;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

/// Octocrab-backed executor posting to the GitHub GraphQL endpoint.
pub struct OctocrabQueryExecutor {
    client: Octocrab,
}

impl OctocrabQueryExecutor {
    /// Creates a new executor from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an executor authenticated with the given token.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::InvalidApiBase` when the base URI cannot be
    /// parsed or `RetrievalError::Api` when Octocrab fails to construct a
    /// client.
    pub fn for_token(
        token: &PersonalAccessToken,
        api_base: &ApiBase,
    ) -> Result<Self, RetrievalError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl QueryExecutor for OctocrabQueryExecutor {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, RetrievalError> {
        let payload = json!({ "query": query, "variables": variables });
        self.client
            .graphql::<Value>(&payload)
            .await
            .map_err(|error| map_octocrab_error("graphql query", &error))
    }
}
