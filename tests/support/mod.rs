//! Shared test utilities.

use std::path::Path;

use pullscope::telemetry::NoopTelemetrySink;
use pullscope::{LocalUserId, PersonalAccessToken, RemoteUid, SqliteResponseCache, User};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Creates a temporary directory for database tests.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
pub fn create_temp_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|error| panic!("failed to create temporary directory: {error}"))
}

/// Migrates a fresh `SQLite` database under `dir` and opens a cache on it.
///
/// # Panics
///
/// Panics if the database cannot be migrated or opened.
pub fn migrated_sqlite_cache(dir: &Path) -> SqliteResponseCache {
    let database_url = dir.join("pullscope.sqlite").display().to_string();
    SqliteResponseCache::open_migrated(database_url, &NoopTelemetrySink)
        .unwrap_or_else(|error| panic!("failed to open migrated response cache: {error}"))
}

/// Builds a user with a valid uid and token.
///
/// # Panics
///
/// Panics if `uid` or `token` is blank.
pub fn user(id: u64, uid: &str, token: &str) -> User {
    User::new(
        LocalUserId::new(id),
        RemoteUid::new(uid).unwrap_or_else(|error| panic!("invalid uid {uid}: {error}")),
        PersonalAccessToken::new(token).unwrap_or_else(|error| panic!("invalid token: {error}")),
    )
}

/// A GraphQL response for a user with the given pull request titles.
pub fn pull_requests_response(titles: &[&str]) -> Value {
    let nodes: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            json!({
                "id": format!("PR_{index}"),
                "title": title,
                "body": "",
                "url": format!("https://github.com/octo/repo/pull/{index}"),
                "createdAt": "2024-01-01T00:00:00Z",
                "repository": { "databaseId": 42 },
                "labels": { "edges": [{ "node": { "name": "bug" } }] }
            })
        })
        .collect();

    json!({ "data": { "node": { "pullRequests": { "nodes": nodes } } } })
}
