//! Page-lifetime scoping for in-flight fetches.
//!
//! A page that starts a fetch and is left before it resolves must not apply
//! the result. Each page owns a [`PageScope`]; every fetch it starts races
//! the scope's cancellation, and leaving (or dropping) the scope abandons
//! whatever is still in flight.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{AppError, Notice};

/// Cancellation scope tied to one page visit.
#[derive(Debug, Default)]
pub struct PageScope {
    token: CancellationToken,
}

impl PageScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandon every fetch started from this scope.
    pub fn leave(&self) {
        self.token.cancel();
    }

    /// Whether the page has been left.
    #[must_use]
    pub fn is_left(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `fut` unless the page is left first.
    ///
    /// Returns `None` if the page was left before `fut` resolved. A page that
    /// is already left never polls `fut`.
    pub async fn fetch<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => {
                debug!("Page left, abandoning fetch");
                None
            }
            out = fut => Some(out),
        }
    }

    /// Fetch and apply the outcome to `state`.
    ///
    /// Returns the notice to show, if any. An abandoned fetch leaves `state`
    /// untouched and shows nothing.
    pub async fn load<T, F>(&self, state: &mut LoadState<T>, fut: F) -> Option<Notice>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let outcome = self.fetch(fut).await?;
        state.settle(outcome)
    }

    /// Run `fut` on the runtime, abandoning it when the scope is left or
    /// dropped.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => None,
                out = fut => Some(out),
            }
        })
    }
}

impl Drop for PageScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// What a page knows about data it is fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    /// The first load failed; the page shows nothing but the notice.
    Failed(Notice),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Apply a completed fetch.
    ///
    /// Success replaces the state. A failure is reported and returned as a
    /// notice; it only replaces the state if nothing was loaded yet, so a
    /// failed refresh keeps the data already on screen.
    pub fn settle(&mut self, outcome: Result<T, AppError>) -> Option<Notice> {
        match outcome {
            Ok(value) => {
                *self = Self::Loaded(value);
                None
            }
            Err(e) => {
                let notice = e.report();
                if !matches!(self, Self::Loaded(_)) {
                    *self = Self::Failed(notice.clone());
                }
                Some(notice)
            }
        }
    }
}
