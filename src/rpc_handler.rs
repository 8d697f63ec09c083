//! RPC method handler for the groupmark JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches calls to the listing store held by `App`.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::listing_store::{ListingStore, ListingStoreTrait, LoadOutcome};
use crate::services::remote_store::RemoteStore;
use crate::types::bookmark::NewBookmark;
use crate::types::reorder::DragResult;

/// The listing as presented to the client, with loading and error state.
fn listing_json<R: RemoteStore>(store: &ListingStore<R>) -> Value {
    json!({
        "loading": store.is_loading(),
        "lastError": store.last_error(),
        "retryable": store.last_error_retryable(),
        "groups": store.snapshot().groups,
    })
}

fn str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method<R: RemoteStore>(
    app: &App<R>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    let store: &ListingStore<R> = &app.store;
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Listing ───
        "listing.get" => Ok(listing_json(store)),
        "listing.load" => {
            let outcome = store.load().await.map_err(|e| e.to_string())?;
            let mut res = listing_json(store);
            res["applied"] = json!(outcome == LoadOutcome::Applied);
            Ok(res)
        }
        "listing.reorder" => {
            let gesture: DragResult = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid drag result: {}", e))?;
            let listing = store.reorder(&gesture).await.map_err(|e| e.to_string())?;
            Ok(json!({"groups": listing.groups}))
        }

        // ─── Groups ───
        "group.create" => {
            let name = str_param(params, "name").ok_or("missing name")?;
            store.create_group(name).await.map_err(|e| e.to_string())?;
            Ok(listing_json(store))
        }

        "group.options" => {
            serde_json::to_value(store.snapshot().group_options()).map_err(|e| e.to_string())
        }

        // ─── Bookmarks ───
        "bookmark.create" => {
            let group_id = str_param(params, "groupId").ok_or("missing groupId")?;
            let title = str_param(params, "title").ok_or("missing title")?;
            let url = str_param(params, "url").ok_or("missing url")?;
            let description = str_param(params, "description")
                .filter(|d| !d.is_empty())
                .map(str::to_string);
            let bookmark = NewBookmark {
                title: title.to_string(),
                url: url.to_string(),
                description,
            };
            store
                .create_bookmark(group_id, bookmark)
                .await
                .map_err(|e| e.to_string())?;
            Ok(listing_json(store))
        }

        // ─── Settings ───
        "settings.get" => serde_json::to_value(app.settings()).map_err(|e| e.to_string()),

        _ => Err(format!("unknown method: {}", method)),
    }
}
