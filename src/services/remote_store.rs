//! Remote Store access for groupmark.
//!
//! `RemoteStore` is the seam between the listing store and whatever holds the
//! tenant's data. `HttpRemoteStore` talks to the HTTP API; `MemoryRemoteStore`
//! keeps everything in process for offline use and tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::types::bookmark::{Bookmark, Group, Listing, NewBookmark};
use crate::types::errors::StoreError;
use crate::types::reorder::OrderSnapshot;
use crate::types::settings::ClientSettings;

/// Operations the listing store needs from the backend.
pub trait RemoteStore: Send + Sync {
    /// Fetches the full listing for `tenant`.
    fn fetch_listing(&self, tenant: &str) -> impl Future<Output = Result<Listing, StoreError>> + Send;

    fn create_group(&self, tenant: &str, name: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn create_bookmark(
        &self,
        tenant: &str,
        group_id: &str,
        bookmark: &NewBookmark,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Persists the order of groups and bookmarks.
    fn save_order(
        &self,
        tenant: &str,
        order: &OrderSnapshot,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Serialize)]
struct CreateGroupBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct BookmarkBody<'a> {
    title: &'a str,
    url: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookmarkBody<'a> {
    group_id: &'a str,
    bookmark: BookmarkBody<'a>,
}

/// Remote store reached over HTTP.
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    pub fn new(settings: &ClientSettings) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Fetch(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/api/{tenant}{suffix}`
    fn tenant_url(&self, tenant: &str, suffix: &str) -> String {
        format!("{}/api/{}{}", self.base_url, tenant, suffix)
    }

    /// Maps a non-success status to `StoreError::Status`.
    async fn check_status(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        url: String,
        body: &B,
    ) -> Result<(), StoreError> {
        debug!("{} {}", method, url);
        let response = self
            .client
            .request(method, &url)
            .header(USER_AGENT, concat!("groupmark/", env!("CARGO_PKG_VERSION")))
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }
}

impl RemoteStore for HttpRemoteStore {
    async fn fetch_listing(&self, tenant: &str) -> Result<Listing, StoreError> {
        let url = self.tenant_url(tenant, "");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, concat!("groupmark/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;
        let listing: Listing =
            serde_json::from_str(&text).map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
        listing.validate_ids().map_err(StoreError::MalformedResponse)?;
        Ok(listing)
    }

    async fn create_group(&self, tenant: &str, name: &str) -> Result<(), StoreError> {
        self.send_json(
            reqwest::Method::POST,
            self.tenant_url(tenant, "/groups"),
            &CreateGroupBody { name },
        )
        .await
    }

    async fn create_bookmark(
        &self,
        tenant: &str,
        group_id: &str,
        bookmark: &NewBookmark,
    ) -> Result<(), StoreError> {
        let body = CreateBookmarkBody {
            group_id,
            bookmark: BookmarkBody {
                title: &bookmark.title,
                url: &bookmark.url,
                description: bookmark.description.as_deref().unwrap_or(""),
            },
        };
        self.send_json(reqwest::Method::POST, self.tenant_url(tenant, "/bookmarks"), &body)
            .await
    }

    async fn save_order(&self, tenant: &str, order: &OrderSnapshot) -> Result<(), StoreError> {
        self.send_json(reqwest::Method::PATCH, self.tenant_url(tenant, "/order"), order)
            .await
    }
}

/// In-process remote store keyed by tenant.
#[derive(Default)]
pub struct MemoryRemoteStore {
    tenants: Mutex<HashMap<String, Listing>>,
    requests: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose `tenant` starts out with `listing`.
    pub fn with_listing(tenant: &str, listing: Listing) -> Self {
        let store = Self::new();
        store.lock().insert(tenant.to_string(), listing);
        store
    }

    /// Number of calls received so far, of any kind.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Listing>> {
        self.tenants.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn now() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string()
    }

    fn not_found(what: &str, id: &str) -> StoreError {
        StoreError::Status {
            status: 404,
            body: format!("{} not found: {}", what, id),
        }
    }

    fn conflict(msg: String) -> StoreError {
        StoreError::Status {
            status: 409,
            body: msg,
        }
    }

    /// Rebuilds `listing` in the order given by `order`.
    ///
    /// The snapshot must name every group and bookmark exactly once.
    fn apply_order(listing: &Listing, order: &OrderSnapshot) -> Result<Listing, StoreError> {
        let mut bookmarks: HashMap<&str, &Bookmark> = HashMap::new();
        for bookmark in listing.groups.iter().flat_map(|g| g.bookmarks.iter()) {
            bookmarks.insert(bookmark.id.as_str(), bookmark);
        }

        if order.groups.len() != listing.groups.len() {
            return Err(Self::conflict("order does not cover every group".to_string()));
        }

        let mut groups = Vec::with_capacity(order.groups.len());
        let mut seen_groups = HashSet::new();
        let mut placed = 0;
        for entry in &order.groups {
            if !seen_groups.insert(entry.id.as_str()) {
                return Err(Self::conflict(format!("group {} listed twice", entry.id)));
            }
            let group = listing
                .group(&entry.id)
                .ok_or_else(|| Self::not_found("group", &entry.id))?;
            let mut ordered = Vec::with_capacity(entry.bookmark_ids.len());
            for id in &entry.bookmark_ids {
                let bookmark = bookmarks
                    .remove(id.as_str())
                    .ok_or_else(|| Self::not_found("bookmark", id))?;
                ordered.push(bookmark.clone());
            }
            placed += ordered.len();
            groups.push(Group {
                id: group.id.clone(),
                name: group.name.clone(),
                bookmarks: ordered,
            });
        }

        if placed != listing.bookmark_count() {
            return Err(Self::conflict("order does not cover every bookmark".to_string()));
        }
        Ok(Listing::new(groups))
    }
}

impl RemoteStore for MemoryRemoteStore {
    async fn fetch_listing(&self, tenant: &str) -> Result<Listing, StoreError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().get(tenant).cloned().unwrap_or_default())
    }

    async fn create_group(&self, tenant: &str, name: &str) -> Result<(), StoreError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.lock().entry(tenant.to_string()).or_default().groups.push(Group {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            bookmarks: Vec::new(),
        });
        Ok(())
    }

    async fn create_bookmark(
        &self,
        tenant: &str,
        group_id: &str,
        bookmark: &NewBookmark,
    ) -> Result<(), StoreError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut tenants = self.lock();
        let group = tenants
            .get_mut(tenant)
            .and_then(|listing| listing.groups.iter_mut().find(|g| g.id == group_id))
            .ok_or_else(|| Self::not_found("group", group_id))?;
        group.bookmarks.push(Bookmark {
            id: Uuid::new_v4().to_string(),
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            description: bookmark.description.clone(),
            created_at: Self::now(),
        });
        Ok(())
    }

    async fn save_order(&self, tenant: &str, order: &OrderSnapshot) -> Result<(), StoreError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut tenants = self.lock();
        let listing = tenants.entry(tenant.to_string()).or_default();
        let reordered = Self::apply_order(listing, order)?;
        *listing = reordered;
        Ok(())
    }
}
