//! Listing Store for groupmark.
//!
//! The single owner of the client's copy of a tenant's listing. Every change
//! goes through `load`, `create_group`, `create_bookmark` or `reorder`;
//! mutations are sent to the remote store first and followed by a full reload.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::services::reorder_engine;
use crate::services::remote_store::RemoteStore;
use crate::types::bookmark::{Listing, NewBookmark};
use crate::types::errors::{StoreError, ValidationError};
use crate::types::reorder::{DragResult, OrderSnapshot};
use crate::types::settings::ClientSettings;

/// What happened to the response of a `load()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the cached listing.
    Applied,
    /// A more recently started load, or a later reorder, had already been
    /// applied; the response was dropped.
    Stale,
}

/// Trait defining the listing store interface.
pub trait ListingStoreTrait {
    /// Fetches the full listing and replaces the cache with it.
    fn load(&self) -> impl Future<Output = Result<LoadOutcome, StoreError>> + Send;
    fn create_group(&self, name: &str) -> impl Future<Output = Result<LoadOutcome, StoreError>> + Send;
    fn create_bookmark(
        &self,
        group_id: &str,
        bookmark: NewBookmark,
    ) -> impl Future<Output = Result<LoadOutcome, StoreError>> + Send;
    /// Applies a drag gesture to the cached listing and returns the result.
    fn reorder(&self, gesture: &DragResult) -> impl Future<Output = Result<Listing, StoreError>> + Send;
    /// A copy of the current listing.
    fn snapshot(&self) -> Listing;
    /// True until the first load has finished, successfully or not.
    fn is_loading(&self) -> bool;
    /// Message of the most recent remote failure, cleared by a successful load.
    fn last_error(&self) -> Option<String>;
    /// Whether the most recent remote failure is worth retrying.
    fn last_error_retryable(&self) -> bool;
    fn close(&self);
}

struct StoreState {
    listing: Listing,
    /// Newest ticket whose result the cache reflects.
    applied_ticket: u64,
    /// Bumped on every replacement of `listing`.
    generation: u64,
    loading: bool,
    last_error: Option<StoreError>,
}

/// Client-side cache of one tenant's listing, backed by a `RemoteStore`.
pub struct ListingStore<S> {
    remote: S,
    tenant: String,
    persist_reorder: bool,
    state: Mutex<StoreState>,
    next_ticket: AtomicU64,
    closed: watch::Sender<bool>,
}

impl<S: RemoteStore> ListingStore<S> {
    pub fn new(remote: S, settings: &ClientSettings) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            remote,
            tenant: settings.tenant.clone(),
            persist_reorder: settings.persist_reorder,
            state: Mutex::new(StoreState {
                listing: Listing::default(),
                applied_ticket: 0,
                generation: 0,
                loading: true,
                last_error: None,
            }),
            next_ticket: AtomicU64::new(0),
            closed,
        }
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Cancelled);
        }
        Ok(())
    }

    fn rejected(&self, err: ValidationError) -> StoreError {
        warn!("Rejected before sending: {}", err);
        err.into()
    }

    fn failed(&self, action: &str, err: StoreError) -> StoreError {
        warn!("Error {}: {}", action, err);
        self.lock().last_error = Some(err.clone());
        err
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: RemoteStore> ListingStoreTrait for ListingStore<S> {
    /// Responses are applied only if nothing started later has been applied first.
    async fn load(&self) -> Result<LoadOutcome, StoreError> {
        self.ensure_open()?;
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("load #{} for tenant {}", ticket, self.tenant);

        let closed = self.closed.subscribe();
        let fetched = tokio::select! {
            result = self.remote.fetch_listing(&self.tenant) => result,
            _ = wait_closed(closed) => {
                debug!("load #{} cancelled", ticket);
                return Err(StoreError::Cancelled);
            }
        };
        self.ensure_open()?;

        let mut state = self.lock();
        state.loading = false;
        let listing = match fetched {
            Ok(listing) => listing,
            Err(err) => {
                warn!("Error fetching bookmarks: {}", err);
                if ticket > state.applied_ticket {
                    state.last_error = Some(err.clone());
                }
                return Err(err);
            }
        };

        if ticket <= state.applied_ticket {
            debug!(
                "discarding stale load #{} (already applied #{})",
                ticket, state.applied_ticket
            );
            return Ok(LoadOutcome::Stale);
        }

        info!(
            "loaded {} groups / {} bookmarks (load #{})",
            listing.groups.len(),
            listing.bookmark_count(),
            ticket
        );
        state.applied_ticket = ticket;
        state.generation += 1;
        state.listing = listing;
        state.last_error = None;
        Ok(LoadOutcome::Applied)
    }

    /// Empty or whitespace-only names are rejected without a request.
    async fn create_group(&self, name: &str) -> Result<LoadOutcome, StoreError> {
        if name.trim().is_empty() {
            return Err(self.rejected(ValidationError::EmptyGroupName));
        }
        self.ensure_open()?;

        if let Err(err) = self.remote.create_group(&self.tenant, name).await {
            return Err(self.failed("adding group", err));
        }
        info!("group '{}' created", name);
        self.load().await
    }

    /// The group must exist in the current cache; title and URL must be non-empty.
    async fn create_bookmark(
        &self,
        group_id: &str,
        bookmark: NewBookmark,
    ) -> Result<LoadOutcome, StoreError> {
        if bookmark.title.is_empty() {
            return Err(self.rejected(ValidationError::EmptyTitle));
        }
        if bookmark.url.is_empty() {
            return Err(self.rejected(ValidationError::EmptyUrl));
        }
        if !self.lock().listing.contains_group(group_id) {
            return Err(self.rejected(ValidationError::UnknownGroup(group_id.to_string())));
        }
        self.ensure_open()?;

        if let Err(err) = self
            .remote
            .create_bookmark(&self.tenant, group_id, &bookmark)
            .await
        {
            return Err(self.failed("adding bookmark", err));
        }
        info!("bookmark '{}' added to group {}", bookmark.title, group_id);
        self.load().await
    }

    /// Loads started before the gesture can no longer overwrite its result.
    ///
    /// With reorder persistence enabled the new order is sent to the remote
    /// store; if that fails the cache is rolled back, unless a newer listing has
    /// replaced it in the meantime.
    async fn reorder(&self, gesture: &DragResult) -> Result<Listing, StoreError> {
        self.ensure_open()?;
        if gesture.is_cancelled() {
            debug!("drag cancelled, listing unchanged");
            return Ok(self.snapshot());
        }

        let applied = {
            let mut state = self.lock();
            let result = reorder_engine::reorder(&state.listing, gesture);
            result.map(|next| {
                let previous = std::mem::replace(&mut state.listing, next.clone());
                state.generation += 1;
                state.applied_ticket = self.next_ticket.load(Ordering::SeqCst);
                (previous, next, state.generation)
            })
        };
        let (previous, next, generation) = match applied {
            Ok(applied) => applied,
            Err(err) => {
                warn!("Rejected drag gesture: {}", err);
                return Err(err.into());
            }
        };

        if !self.persist_reorder {
            return Ok(next);
        }

        let order = OrderSnapshot::from(&next);
        match self.remote.save_order(&self.tenant, &order).await {
            Ok(()) => {
                debug!("order persisted for tenant {}", self.tenant);
                Ok(next)
            }
            Err(err) => {
                {
                    let mut state = self.lock();
                    if state.generation == generation {
                        state.listing = previous;
                        state.generation += 1;
                        info!("reorder rolled back");
                    } else {
                        debug!("listing replaced since reorder, skipping rollback");
                    }
                }
                Err(self.failed("saving order", err))
            }
        }
    }

    fn snapshot(&self) -> Listing {
        self.lock().listing.clone()
    }

    fn is_loading(&self) -> bool {
        self.lock().loading
    }

    fn last_error(&self) -> Option<String> {
        self.lock().last_error.as_ref().map(|err| err.to_string())
    }

    fn last_error_retryable(&self) -> bool {
        self.lock()
            .last_error
            .as_ref()
            .is_some_and(StoreError::is_retryable)
    }

    /// In-flight loads are abandoned and later calls fail with `StoreError::Cancelled`.
    fn close(&self) {
        if !self.closed.send_replace(true) {
            debug!("listing store for tenant {} closed", self.tenant);
        }
    }
}

/// Resolves once the close flag is set.
async fn wait_closed(mut closed: watch::Receiver<bool>) {
    loop {
        let is_closed = *closed.borrow_and_update();
        if is_closed {
            return;
        }
        if closed.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
