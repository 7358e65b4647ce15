//! Client-side data-access layer for content.
//!
//! [`ContentBrowser`] drives fetches against the remote content API and
//! tracks each operation class in its own [`FetchCell`] state machine
//! (`Idle -> Loading -> Success | Error`, re-entering `Loading` on every
//! call). Completions are guarded by a monotonic ticket: a fetch that
//! finishes after a newer one started does not overwrite the newer
//! result.
//!
//! Degradation differs per operation:
//!
//! - `fetch_all` never errors on an unreachable upstream (sample catalog
//!   instead); a response whose payload is not a content array is stored
//!   as an empty collection with an "invalid response" error
//! - `fetch_by_id` always resolves to an item, placeholder on failure
//! - `fetch_by_kind` filters client-side and surfaces failures

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use newsstand_core::ContentKind;

use crate::fallback::FallbackPolicy;
use crate::models::{ApiEnvelope, ContentItem};
use crate::upstream::{UpstreamClient, UpstreamError};

/// State of a tracked fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    /// No fetch has been issued yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch completed with usable data.
    Success(T),
    /// The last fetch failed; `data` holds what is still renderable.
    Error { message: String, data: T },
}

impl<T> FetchState<T> {
    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The carried data, present in both terminal states.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) | Self::Error { data, .. } => Some(data),
            Self::Idle | Self::Loading => None,
        }
    }

    /// The error message, if the last fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message.as_str()),
            Self::Idle | Self::Loading | Self::Success(_) => None,
        }
    }
}

/// A fetch state slot with a monotonic request-ticket guard.
///
/// `begin` hands out strictly increasing tickets and moves the state to
/// `Loading`. `complete` writes a terminal state only when the caller's
/// ticket is still the newest, so overlapping fetches resolve to the
/// most recently issued one regardless of completion order. Stale
/// completions are dropped, not cancelled.
#[derive(Debug, Default)]
pub struct FetchCell<T> {
    state: RwLock<FetchState<T>>,
    ticket: AtomicU64,
}

impl<T: Clone> FetchCell<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(FetchState::Idle),
            ticket: AtomicU64::new(0),
        }
    }

    /// Start a fetch: move to `Loading` and claim the newest ticket.
    pub fn begin(&self) -> u64 {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        *self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = FetchState::Loading;
        ticket
    }

    /// Complete a fetch. Returns whether the state was written.
    ///
    /// The write is skipped when a newer fetch has begun since `ticket`
    /// was claimed.
    pub fn complete(&self, ticket: u64, state: FetchState<T>) -> bool {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.ticket.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "Dropping stale fetch completion");
            return false;
        }
        *guard = state;
        true
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FetchState<T> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Content fetcher with per-operation fetch state.
///
/// Each operation class owns a [`FetchCell`], so a detail fetch does not
/// disturb the catalog state. Instances are cheap to clone and share
/// their cells.
#[derive(Clone)]
pub struct ContentBrowser {
    upstream: UpstreamClient,
    policy: FallbackPolicy,
    catalog: Arc<FetchCell<Vec<ContentItem>>>,
    detail: Arc<FetchCell<ContentItem>>,
    filtered: Arc<FetchCell<Vec<ContentItem>>>,
}

impl ContentBrowser {
    /// Create a browser over the given upstream and policy.
    #[must_use]
    pub fn new(upstream: UpstreamClient, policy: FallbackPolicy) -> Self {
        Self {
            upstream,
            policy,
            catalog: Arc::new(FetchCell::new()),
            detail: Arc::new(FetchCell::new()),
            filtered: Arc::new(FetchCell::new()),
        }
    }

    /// Fetch the full catalog.
    ///
    /// An unreachable upstream degrades to the sample catalog; only a
    /// payload that fails to parse as a content array is reported as an
    /// error, with an empty collection as the renderable data.
    pub async fn fetch_all(&self) -> FetchState<Vec<ContentItem>> {
        let ticket = self.catalog.begin();
        let result = self.upstream.list_content().await;
        let state = fold_catalog(self.policy, result);
        self.catalog.complete(ticket, state);
        self.catalog.state()
    }

    /// Fetch a single item by id. Always resolves to an item.
    pub async fn fetch_by_id(&self, id: &str) -> FetchState<ContentItem> {
        let ticket = self.detail.begin();
        let result = self.upstream.content_by_id(id).await;
        let envelope = self.policy.resolve_detail(id, result);
        let state = match envelope.data {
            Some(item) => FetchState::Success(item),
            None => FetchState::Success(crate::fallback::placeholder_item(id)),
        };
        self.detail.complete(ticket, state);
        self.detail.state()
    }

    /// Fetch the catalog and keep only items of the given kind.
    ///
    /// Unlike `fetch_all`, failures surface as an error state with an
    /// empty collection.
    pub async fn fetch_by_kind(&self, kind: ContentKind) -> FetchState<Vec<ContentItem>> {
        let ticket = self.filtered.begin();
        let result = self.upstream.list_content().await;
        let state = fold_filtered(kind, result);
        self.filtered.complete(ticket, state);
        self.filtered.state()
    }

    /// Current catalog fetch state.
    #[must_use]
    pub fn catalog_state(&self) -> FetchState<Vec<ContentItem>> {
        self.catalog.state()
    }

    /// Current detail fetch state.
    #[must_use]
    pub fn detail_state(&self) -> FetchState<ContentItem> {
        self.detail.state()
    }

    /// Current filtered fetch state.
    #[must_use]
    pub fn filtered_state(&self) -> FetchState<Vec<ContentItem>> {
        self.filtered.state()
    }
}

/// Fold a catalog fetch result into a terminal state.
fn fold_catalog(
    policy: FallbackPolicy,
    result: Result<ApiEnvelope<Vec<ContentItem>>, UpstreamError>,
) -> FetchState<Vec<ContentItem>> {
    match result {
        Err(UpstreamError::Parse(err)) => {
            tracing::warn!(error = %err, "Content list payload is not a content array");
            FetchState::Error {
                message: "invalid response".to_string(),
                data: Vec::new(),
            }
        }
        other => {
            let envelope = policy.resolve_list(other);
            FetchState::Success(envelope.data.unwrap_or_default())
        }
    }
}

/// Fold a filtered fetch result into a terminal state.
fn fold_filtered(
    kind: ContentKind,
    result: Result<ApiEnvelope<Vec<ContentItem>>, UpstreamError>,
) -> FetchState<Vec<ContentItem>> {
    match result {
        Ok(envelope) if envelope.success => {
            let items = envelope
                .data
                .unwrap_or_default()
                .into_iter()
                .filter(|item| item.kind == kind)
                .collect();
            FetchState::Success(items)
        }
        Ok(envelope) => FetchState::Error {
            message: envelope.message,
            data: Vec::new(),
        },
        Err(err) => FetchState::Error {
            message: err.to_string(),
            data: Vec::new(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use crate::fallback::sample_catalog;

    use super::*;

    fn unreachable_browser(demo_mode: bool) -> ContentBrowser {
        let base: Url = "http://127.0.0.1:1/api".parse().unwrap();
        let upstream = UpstreamClient::new(&base).unwrap();
        ContentBrowser::new(upstream, FallbackPolicy::new(demo_mode))
    }

    fn parse_error() -> UpstreamError {
        UpstreamError::Parse(
            serde_json::from_value::<Vec<ContentItem>>(serde_json::json!("not an array"))
                .unwrap_err(),
        )
    }

    // =========================================================================
    // FetchCell
    // =========================================================================

    #[test]
    fn test_cell_starts_idle() {
        let cell: FetchCell<Vec<ContentItem>> = FetchCell::new();
        assert_eq!(cell.state(), FetchState::Idle);
    }

    #[test]
    fn test_begin_moves_to_loading_with_increasing_tickets() {
        let cell: FetchCell<u32> = FetchCell::new();
        let first = cell.begin();
        let second = cell.begin();
        assert!(second > first);
        assert!(cell.state().is_loading());
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let cell: FetchCell<u32> = FetchCell::new();
        let stale = cell.begin();
        let newest = cell.begin();

        assert!(!cell.complete(stale, FetchState::Success(1)));
        assert!(cell.state().is_loading());

        assert!(cell.complete(newest, FetchState::Success(2)));
        assert_eq!(cell.state(), FetchState::Success(2));
    }

    #[test]
    fn test_stale_completion_after_newer_result_keeps_newer() {
        let cell: FetchCell<u32> = FetchCell::new();
        let stale = cell.begin();
        let newest = cell.begin();

        assert!(cell.complete(newest, FetchState::Success(2)));
        assert!(!cell.complete(stale, FetchState::Success(1)));
        assert_eq!(cell.state(), FetchState::Success(2));
    }

    // =========================================================================
    // State folding
    // =========================================================================

    #[test]
    fn test_catalog_state_unreachable_serves_samples() {
        let state = fold_catalog(
            FallbackPolicy::new(false),
            Err(UpstreamError::Api {
                status: 503,
                message: "down".to_string(),
            }),
        );
        assert_eq!(state.data().unwrap().len(), 6);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_catalog_state_invalid_payload_is_error_with_empty_data() {
        let state = fold_catalog(FallbackPolicy::new(false), Err(parse_error()));
        assert_eq!(state.error(), Some("invalid response"));
        assert!(state.data().unwrap().is_empty());
    }

    #[test]
    fn test_filtered_state_keeps_only_requested_kind() {
        let envelope = ApiEnvelope::ok("fetched", sample_catalog());
        let state = fold_filtered(ContentKind::Digest, Ok(envelope));
        let items = state.data().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.kind == ContentKind::Digest));
    }

    #[test]
    fn test_filtered_state_surfaces_transport_failure() {
        let state = fold_filtered(
            ContentKind::Magazine,
            Err(UpstreamError::Api {
                status: 503,
                message: "down".to_string(),
            }),
        );
        assert!(state.error().unwrap().contains("503"));
        assert!(state.data().unwrap().is_empty());
    }

    #[test]
    fn test_filtered_state_surfaces_upstream_rejection() {
        let state = fold_filtered(
            ContentKind::Magazine,
            Ok(ApiEnvelope::failure("no magazines")),
        );
        assert_eq!(state.error(), Some("no magazines"));
    }

    // =========================================================================
    // Browser end to end against an unreachable upstream
    // =========================================================================

    #[tokio::test]
    async fn test_fetch_all_unreachable_degrades_to_samples() {
        let browser = unreachable_browser(false);
        let state = browser.fetch_all().await;

        assert_eq!(state.data().unwrap().len(), 6);
        assert_eq!(browser.catalog_state(), state);
    }

    #[tokio::test]
    async fn test_fetch_by_id_unreachable_resolves_placeholder() {
        let browser = unreachable_browser(false);
        let state = browser.fetch_by_id("magazine-42").await;

        let item = state.data().unwrap();
        assert_eq!(item.id, "magazine-42");
        assert!(!item.active);
    }

    #[tokio::test]
    async fn test_fetch_by_kind_unreachable_surfaces_error() {
        let browser = unreachable_browser(false);
        let state = browser.fetch_by_kind(ContentKind::Article).await;

        assert!(state.error().is_some());
        assert!(state.data().unwrap().is_empty());
        // The catalog cell is untouched by a filtered fetch.
        assert_eq!(browser.catalog_state(), FetchState::Idle);
    }
}
