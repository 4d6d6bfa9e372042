//! Fetch lifecycle and cancellation
//!
//! Each kind of fetch the controller issues owns a [`FetchSlot`]. Starting a
//! fetch cancels whatever the slot held before, so the latest request always
//! wins. Completion handlers present their [`FetchTicket`] to learn whether
//! they are still the active fetch before touching shared state.

use crate::error::{CatalogError, ScopesError};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Identity of one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

/// Holder of at most one in-flight fetch
#[derive(Debug, Default)]
pub struct FetchSlot {
    issued: u64,
    active: Option<(FetchTicket, CancellationToken)>,
}

impl FetchSlot {
    /// Create empty slot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the active fetch, if any, and register a new one
    pub fn begin(&mut self) -> (FetchTicket, CancellationToken) {
        self.cancel();
        self.issued += 1;
        let ticket = FetchTicket(self.issued);
        let token = CancellationToken::new();
        self.active = Some((ticket, token.clone()));
        (ticket, token)
    }

    /// Cancel the active fetch. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether `ticket` is the active fetch
    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.active.as_ref().is_some_and(|(t, _)| *t == ticket)
    }

    /// Release the slot if `ticket` is still active
    ///
    /// Returns false for a fetch that was cancelled or superseded; its
    /// caller must leave shared state alone.
    pub fn finish(&mut self, ticket: FetchTicket) -> bool {
        if self.is_current(ticket) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

/// Drive a catalog call until it completes, times out or is cancelled
///
/// Returns `Ok(None)` when `token` fires first.
///
/// # Errors
/// - `ScopesError::Timeout` if `timeout` elapses first
/// - `ScopesError::Catalog` if the call fails
pub async fn run_cancellable<T, F>(
    token: &CancellationToken,
    timeout: Option<Duration>,
    fetch: F,
) -> Result<Option<T>, ScopesError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    let bounded = async {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| ScopesError::Timeout {
                    millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })?
                .map_err(ScopesError::from),
            None => fetch.await.map_err(ScopesError::from),
        }
    };

    tokio::select! {
        biased;
        () = token.cancelled() => Ok(None),
        result = bounded => result.map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_cancels_previous() {
        let mut slot = FetchSlot::new();
        let (first, first_token) = slot.begin();
        let (second, second_token) = slot.begin();

        assert!(first_token.is_cancelled());
        assert!(!second_token.is_cancelled());
        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));
        assert_ne!(first, second);
    }

    #[test]
    fn stale_ticket_cannot_finish() {
        let mut slot = FetchSlot::new();
        let (stale, _) = slot.begin();
        let (fresh, _) = slot.begin();

        assert!(!slot.finish(stale));
        assert!(slot.is_current(fresh));
        assert!(slot.finish(fresh));
        assert!(!slot.cancel());
    }

    #[test]
    fn cancel_clears_slot() {
        let mut slot = FetchSlot::new();
        let (ticket, token) = slot.begin();
        assert!(slot.cancel());
        assert!(token.is_cancelled());
        assert!(!slot.finish(ticket));
        assert!(!slot.cancel());
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let result = run_cancellable(&token, None, std::future::pending::<Result<u8, CatalogError>>()).await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn completes_with_value() {
        let token = CancellationToken::new();
        let result = run_cancellable(&token, None, async { Ok::<_, CatalogError>(7) }).await;
        assert_eq!(result, Ok(Some(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out() {
        let token = CancellationToken::new();
        let result = run_cancellable(
            &token,
            Some(Duration::from_millis(20)),
            std::future::pending::<Result<u8, CatalogError>>(),
        )
        .await;
        assert_eq!(result, Err(ScopesError::Timeout { millis: 20 }));
    }

    #[tokio::test]
    async fn propagates_catalog_error() {
        let token = CancellationToken::new();
        let result = run_cancellable(&token, None, async {
            Err::<u8, _>(CatalogError::Unavailable("down".to_string()))
        })
        .await;
        assert!(matches!(result, Err(ScopesError::Catalog(_))));
    }
}
