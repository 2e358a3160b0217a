//! Outbound request pacing.

use std::time::Duration;

use tokio::time::Instant;

/// Spacing between consecutive requests when the builder does not
/// override it. TMDB tolerates bursts of roughly 40 requests per
/// second; 25 ms keeps a fast typist's debounced fetches inside that.
const DEFAULT_SPACING: Duration = Duration::from_millis(25);

/// Paces outbound requests to a minimum spacing.
///
/// The client holds one pacer behind a mutex and calls [`Self::acquire`]
/// before every request, so interleaved search and discover fetches
/// share a single pacing budget.
#[derive(Debug)]
pub struct RequestPacer {
    spacing: Duration,
    /// When the next request may be sent. `None` until the first send.
    ready_at: Option<Instant>,
}

impl RequestPacer {
    pub(crate) const fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            ready_at: None,
        }
    }

    pub(crate) const fn with_default_spacing() -> Self {
        Self::new(DEFAULT_SPACING)
    }

    /// Waits until the spacing since the previous `acquire` has elapsed,
    /// then reserves the next send slot. The first call never waits.
    pub(crate) async fn acquire(&mut self) {
        if let Some(ready_at) = self.ready_at {
            tokio::time::sleep_until(ready_at).await;
        }
        self.ready_at = Instant::now().checked_add(self.spacing);
    }
}
