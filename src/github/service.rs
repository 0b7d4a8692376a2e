//! Cache-first retrieval of a user's pull requests.

use std::time::Duration;

use serde_json::Value;

use crate::cache::{ResponseCache, get_or_compute};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

use super::error::RetrievalError;
use super::executor::QueryExecutor;
use super::models::{PullRequest, ensure_no_graphql_errors, pull_requests_from_response};
use super::node_id::encode_user_node_id;
use super::query::{PULL_REQUEST_QUERY, PullRequestQueryVariables};
use super::user::{LocalUserId, User};

/// How long a raw GitHub response stays in the shared cache.
pub const RESPONSE_TTL: Duration = Duration::from_secs(15 * 60);

/// Shared cache key holding the raw pull request response for a user.
#[must_use]
pub fn cache_key(user_id: LocalUserId) -> String {
    format!("user/{user_id}/github_pull_request_service/response")
}

/// Loads the pull requests of one user.
///
/// The first successful [`pull_requests`](Self::pull_requests) call is
/// memoized for the lifetime of the service. Failures are not memoized, so a
/// later call retries.
pub struct PullRequestService<'deps, Executor, Cache>
where
    Executor: QueryExecutor + ?Sized,
    Cache: ResponseCache + ?Sized,
{
    user: User,
    executor: &'deps Executor,
    cache: &'deps Cache,
    telemetry: &'deps dyn TelemetrySink,
    ttl: Duration,
    pull_requests: Option<Vec<PullRequest>>,
}

impl<'deps, Executor, Cache> PullRequestService<'deps, Executor, Cache>
where
    Executor: QueryExecutor + ?Sized,
    Cache: ResponseCache + ?Sized,
{
    /// Creates a service for `user`. The executor must be authenticated with
    /// the user's token.
    #[must_use]
    pub const fn new(user: User, executor: &'deps Executor, cache: &'deps Cache) -> Self {
        Self {
            user,
            executor,
            cache,
            telemetry: &NoopTelemetrySink,
            ttl: RESPONSE_TTL,
            pull_requests: None,
        }
    }

    /// Overrides how long responses stay in the shared cache.
    #[must_use]
    pub fn with_ttl(self, ttl: Duration) -> Self {
        Self { ttl, ..self }
    }

    /// Records retrieval outcomes to `telemetry`.
    #[must_use]
    pub fn with_telemetry(self, telemetry: &'deps dyn TelemetrySink) -> Self {
        Self { telemetry, ..self }
    }

    /// The user whose pull requests this service loads.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Returns the user's pull requests, most recent 100, in GitHub's order.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError`] when GitHub rejects the request, the
    /// transport fails, GitHub answers with a GraphQL error payload, or the
    /// response cannot be mapped.
    pub async fn pull_requests(&mut self) -> Result<&[PullRequest], RetrievalError> {
        let pull_requests = match self.pull_requests.take() {
            Some(memoized) => {
                tracing::debug!("serving memoized pull requests for user {}", self.user.id());
                memoized
            }
            None => self.fetch().await?,
        };

        Ok(self.pull_requests.insert(pull_requests).as_slice())
    }

    async fn fetch(&self) -> Result<Vec<PullRequest>, RetrievalError> {
        let key = cache_key(self.user.id());
        let lookup = get_or_compute(self.cache, &key, self.ttl, move || self.query()).await?;

        match pull_requests_from_response(&lookup.value) {
            Ok(pull_requests) => {
                self.telemetry.record(TelemetryEvent::PullRequestsRetrieved {
                    user_id: self.user.id().get(),
                    source: lookup.source.as_str().to_owned(),
                    count: pull_requests.len(),
                });
                Ok(pull_requests)
            }
            Err(error) => {
                // An unmappable response would fail every call until it expired.
                if let Err(cache_error) = self.cache.invalidate(&key).await {
                    tracing::warn!("failed to drop unmappable response for {key}: {cache_error}");
                }
                Err(error.into())
            }
        }
    }

    async fn query(&self) -> Result<Value, RetrievalError> {
        let node_id = encode_user_node_id(self.user.uid());
        let variables = PullRequestQueryVariables::for_node(&node_id).to_value();

        let response = self.executor.execute(PULL_REQUEST_QUERY, variables).await?;
        ensure_no_graphql_errors(&response)?;
        Ok(response)
    }
}
