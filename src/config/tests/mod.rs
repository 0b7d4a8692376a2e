//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, user and API base resolution tests
//! - `ttl_loading`: `response_cache_ttl_seconds` loading tests

mod helpers;
mod precedence;
