//! Pullscope library crate providing cached GitHub pull request retrieval.
//!
//! The library derives a user's GraphQL node id, runs a fixed pull request
//! query through Octocrab, memoizes raw responses in a shared cache (in memory
//! or `SQLite`), and maps them into [`PullRequest`] value objects.

pub mod cache;
pub mod config;
pub mod github;
pub mod telemetry;

pub use cache::{
    CacheError, MemoryResponseCache, ResponseCache, SqliteResponseCache, get_or_compute,
    migrate_database,
};
pub use config::PullscopeConfig;
pub use github::{
    ApiBase, LocalUserId, MappingError, OctocrabQueryExecutor, PersonalAccessToken, PullRequest,
    PullRequestService, QueryExecutor, RemoteUid, RetrievalError, User,
};
