//! Lazily opened connection handle.
//!
//! Request handlers that need a backing store hold a [`LazyConnection`]
//! instead of reaching for a process global. The first caller opens the
//! connection; callers arriving while that attempt is in flight wait on it
//! rather than starting their own, and all of them see its result. A failed
//! or timed-out attempt leaves the handle empty, so the next call tries
//! again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;

/// Timeouts applied when opening a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Upper bound on finding a usable server; also bounds the whole attempt.
    pub server_selection_timeout: Duration,
    /// Upper bound on any single socket operation once connected.
    pub socket_timeout: Duration,
}

impl ConnectOptions {
    /// Fail fast so a missing local store never stalls the UI.
    pub const fn development() -> Self {
        Self {
            server_selection_timeout: Duration::from_millis(2000),
            socket_timeout: Duration::from_millis(2000),
        }
    }

    /// More patience for real deployments.
    pub const fn production() -> Self {
        Self {
            server_selection_timeout: Duration::from_millis(5000),
            socket_timeout: Duration::from_millis(10_000),
        }
    }

    /// Pick the profile for the current environment.
    pub const fn for_environment(production: bool) -> Self {
        if production {
            Self::production()
        } else {
            Self::development()
        }
    }
}

/// Why a connection could not be opened.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// The attempt did not finish inside `server_selection_timeout`.
    #[error("connection attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The connector reported a failure.
    #[error("connection failed: {0}")]
    Failed(String),
}

/// Opens connections to some backing store.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The live connection type.
    type Connection: Send + Sync + 'static;

    /// Open one connection. Implementations apply
    /// [`ConnectOptions::socket_timeout`] to the connection they return.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Failed`] when the store cannot be reached.
    async fn connect(&self, options: &ConnectOptions) -> Result<Self::Connection, ConnectionError>;
}

type Attempt<T> = Shared<BoxFuture<'static, Result<Arc<T>, ConnectionError>>>;

/// Owned, lazily initialized connection with a single in-flight attempt.
///
/// Every caller that arrives while an attempt is running awaits that same
/// attempt and gets its outcome, success or failure. Only callers that
/// arrive after a failure start a new one.
pub struct LazyConnection<C: Connector> {
    connector: Arc<C>,
    options: ConnectOptions,
    slot: Mutex<Option<Attempt<C::Connection>>>,
}

impl<C: Connector + 'static> LazyConnection<C> {
    /// Create an empty handle. Nothing is opened until [`Self::get`].
    pub fn new(connector: C, options: ConnectOptions) -> Self {
        Self {
            connector: Arc::new(connector),
            options,
            slot: Mutex::new(None),
        }
    }

    /// Return the live connection, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns the connector's error, or [`ConnectionError::Timeout`] if the
    /// attempt outlives `server_selection_timeout`. The handle is emptied in
    /// both cases.
    pub async fn get(&self) -> Result<Arc<C::Connection>, ConnectionError> {
        let attempt = self
            .lock_slot()
            .get_or_insert_with(|| self.open())
            .clone();

        let result = attempt.clone().await;
        if result.is_err() {
            let mut slot = self.lock_slot();
            // A caller that saw this failure earlier may already have started a new attempt.
            if slot.as_ref().is_some_and(|current| current.ptr_eq(&attempt)) {
                *slot = None;
            }
        }
        result
    }

    /// Whether a connection has been opened.
    pub fn is_connected(&self) -> bool {
        self.lock_slot()
            .as_ref()
            .is_some_and(|attempt| matches!(attempt.peek(), Some(Ok(_))))
    }

    /// Timeouts this handle connects with.
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    fn open(&self) -> Attempt<C::Connection> {
        let connector = Arc::clone(&self.connector);
        let options = self.options;
        async move {
            let budget = options.server_selection_timeout;
            tracing::debug!(?budget, "opening connection");

            match tokio::time::timeout(budget, connector.connect(&options)).await {
                Ok(Ok(conn)) => Ok(Arc::new(conn)),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "connection attempt failed");
                    Err(e)
                }
                Err(_) => {
                    tracing::warn!(?budget, "connection attempt timed out");
                    Err(ConnectionError::Timeout(budget))
                }
            }
        }
        .boxed()
        .shared()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Attempt<C::Connection>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Connector + 'static> std::fmt::Debug for LazyConnection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyConnection")
            .field("options", &self.options)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
