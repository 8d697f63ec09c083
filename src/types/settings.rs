use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://nav-web-worker.wangzhenyuanwork.workers.dev";
pub const DEFAULT_TENANT: &str = "default";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL of the remote store, without the `/api` segment.
    pub base_url: String,
    /// Tenant namespace for every request.
    pub tenant: String,
    pub request_timeout_secs: u64,
    /// Send the new order to the remote store after each local reorder.
    #[serde(default)]
    pub persist_reorder: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tenant: DEFAULT_TENANT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            persist_reorder: false,
        }
    }
}
