//! Tokio runtime and Wiremock server shared between behavioural test steps.
//!
//! `rstest-bdd` steps are synchronous, so async work is driven through a
//! runtime kept in the scenario state.

use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Reference-counted runtime that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<Runtime>);

impl SharedRuntime {
    /// Starts a multi-threaded runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when Tokio cannot spawn its worker threads.
    pub fn start() -> io::Result<Self> {
        Runtime::new().map(|runtime| Self(Rc::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// Returns the scenario runtime, starting it and the mock GitHub server on
/// first use.
///
/// # Errors
///
/// Returns an error if the runtime cannot be started or the slot loses its
/// value.
pub fn runtime_with_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> io::Result<SharedRuntime> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime::start()?);
    }
    let shared = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime slot empty after initialisation"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared.block_on(MockServer::start()));
    }
    Ok(shared)
}

/// Mounts `mock` on the scenario server.
///
/// # Errors
///
/// Returns an error if the runtime or server has not been initialised.
pub fn mount(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
    mock: Mock,
) -> io::Result<()> {
    let shared = runtime_with_server(runtime, server)?;
    server
        .with_ref(|mock_server| shared.block_on(mock.mount(mock_server)))
        .ok_or_else(|| io::Error::other("mock server not initialised"))
}
