use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors a widget fetch can produce. None of these are fatal; each stays
/// contained to the widget that raised it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// A search or geocode lookup yielded no match. Recoverable by searching
    /// again with a different term.
    #[error("\"{0}\" not found")]
    NotFound(String),
    /// Network error, non-success HTTP status or an unusable payload.
    /// Recoverable by waiting for the next tick or refreshing manually.
    #[error("upstream failure: {0}")]
    Upstream(String),
    /// The user tried to watch a ticker symbol outside the known set.
    /// Rejected synchronously; the watch-list stays unchanged.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// What happens to the last-good data when a fetch fails. The default is
/// `ClearData`: a failed fetch leaves no stale data behind, so what is on
/// screen is always the outcome of the most recent fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Keep the previous data and show an error banner next to it.
    RetainStale,
    /// Drop the previous data so the widget shows only the error.
    ClearData,
}

/// Per-widget fetch state, in memory only. `Loading` means a fetch is
/// outstanding; a completed fetch moves to `Success` (data replaced
/// wholesale) or `Error` (data handled per [`ErrorPolicy`]).
#[derive(Debug)]
pub struct FetchState<T> {
    pub status: FetchStatus,
    pub data: Option<T>,
    pub error: Option<String>,
    pub last_fetched: Option<DateTime<Local>>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
            last_fetched: None,
        }
    }
}

/// Drives one widget's fetch cycle: an immediate fetch on the first poll,
/// then recurring fetches at a fixed interval, each on its own background
/// thread so the UI never blocks.
///
/// A generation counter keeps at most one fetch effective: a result arriving
/// after `stop` or after being superseded by a newer fetch is discarded
/// without touching state.
pub struct Poller<T> {
    state: Arc<Mutex<FetchState<T>>>,
    generation: Arc<AtomicU64>,
    interval: Option<Duration>,
    policy: ErrorPolicy,
    retry_once: bool,
    last_attempt: Option<Instant>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Poller<T> {
    /// `interval` of `None` means fetch once and then only on demand.
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FetchState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            interval,
            policy: ErrorPolicy::ClearData,
            retry_once: true,
            last_attempt: None,
            handle: None,
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn without_retry(mut self) -> Self {
        self.retry_once = false;
        self
    }

    pub fn set_interval(&mut self, interval: Option<Duration>) {
        self.interval = interval;
    }

    pub fn state(&self) -> MutexGuard<'_, FetchState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn in_flight(&self) -> bool {
        self.state().status == FetchStatus::Loading
    }

    /// Whether the interval clock calls for a fetch. The first poll is always
    /// due so widgets fetch immediately on mount.
    pub fn due(&self) -> bool {
        match (self.interval, self.last_attempt) {
            (_, None) => true,
            (Some(interval), Some(at)) => at.elapsed() >= interval,
            (None, Some(_)) => false,
        }
    }

    /// Fetch if due and nothing is in flight. Skipping while loading is what
    /// keeps interval ticks from overlapping a slow request.
    pub fn maybe_poll<F>(&mut self, fetch: F)
    where
        F: Fn() -> Result<T, FetchError> + Send + 'static,
    {
        if self.in_flight() || !self.due() {
            return;
        }
        self.last_attempt = Some(Instant::now());
        self.spawn(fetch);
    }

    /// Out-of-band fetch (manual refresh or a parameter change). Supersedes
    /// any in-flight fetch and leaves the interval clock alone.
    pub fn refresh_now<F>(&mut self, fetch: F)
    where
        F: Fn() -> Result<T, FetchError> + Send + 'static,
    {
        self.spawn(fetch);
    }

    /// Cancel the cycle. A fetch still in flight will find its generation
    /// stale when it resolves and discard its result.
    pub fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        if state.status == FetchStatus::Loading {
            state.status = FetchStatus::Idle;
        }
    }

    /// Block until the most recently spawned fetch thread has finished.
    /// Used on shutdown and by tests; rendering never calls this.
    pub fn join_in_flight(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn spawn<F>(&mut self, fetch: F)
    where
        F: Fn() -> Result<T, FetchError> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state();
            state.status = FetchStatus::Loading;
            state.error = None;
        }
        let state = Arc::clone(&self.state);
        let counter = Arc::clone(&self.generation);
        let policy = self.policy;
        let retry_once = self.retry_once;
        self.handle = Some(thread::spawn(move || {
            let mut result = fetch();
            if result.is_err() && retry_once {
                // One immediate retry; after that the next tick is the retry.
                result = fetch();
            }
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if counter.load(Ordering::SeqCst) != generation {
                tracing::debug!("discarding superseded fetch result");
                return;
            }
            match result {
                Ok(data) => {
                    state.status = FetchStatus::Success;
                    state.data = Some(data);
                    state.error = None;
                    state.last_fetched = Some(Local::now());
                }
                Err(err) => {
                    tracing::warn!("fetch failed: {err}");
                    state.status = FetchStatus::Error;
                    state.error = Some(err.to_string());
                    if policy == ErrorPolicy::ClearData {
                        state.data = None;
                    }
                }
            }
        }));
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
