//! Unit tests for the RPC handler: all JSON-RPC methods dispatched by `handle_method`.
//!
//! These tests exercise every RPC method through the same code path used by the
//! real `groupmark-rpc` binary, with an in-memory remote store behind the app.

use serde_json::json;
use tempfile::TempDir;

use groupmark::app::App;
use groupmark::rpc_handler::handle_method;
use groupmark::services::remote_store::MemoryRemoteStore;
use groupmark::services::settings_engine::SettingsEngine;
use groupmark::types::bookmark::{Bookmark, Group, Listing};

fn seeded() -> Listing {
    let bm = |id: &str| Bookmark {
        id: id.to_string(),
        title: format!("Title {}", id),
        url: format!("https://{}.example.com", id.to_lowercase()),
        description: None,
        created_at: "2024-05-01T10:00:00Z".to_string(),
    };
    Listing::new(vec![
        Group {
            id: "G1".to_string(),
            name: "Work".to_string(),
            bookmarks: vec![bm("A"), bm("B"), bm("C")],
        },
        Group {
            id: "G2".to_string(),
            name: "Home".to_string(),
            bookmarks: vec![bm("D")],
        },
    ])
}

/// Create a fresh App over an in-memory store, with settings in a temp dir.
async fn setup(listing: Listing) -> (App<MemoryRemoteStore>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("groupmark.json").to_string_lossy().to_string();
    let engine = SettingsEngine::new(Some(path));
    let app = App::with_remote(engine, MemoryRemoteStore::with_listing("default", listing));
    app.startup().await;
    (app, tmp)
}

// ─── Ping ───

#[tokio::test]
async fn test_ping() {
    let (app, _tmp) = setup(Listing::default()).await;
    let res = handle_method(&app, "ping", &json!({})).await.unwrap();
    assert_eq!(res, json!({"pong": true}));
}

// ─── Unknown method ───

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup(Listing::default()).await;
    let res = handle_method(&app, "bookmark.delete", &json!({})).await;
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Listing ───

#[tokio::test]
async fn test_listing_get_after_startup() {
    let (app, _tmp) = setup(seeded()).await;
    let res = handle_method(&app, "listing.get", &json!({})).await.unwrap();

    assert_eq!(res["loading"], false);
    assert!(res["lastError"].is_null());
    assert_eq!(res["retryable"], false);
    let groups = res["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "Work");
    assert_eq!(groups[0]["bookmarks"][1]["createdAt"], "2024-05-01T10:00:00Z");
}

#[tokio::test]
async fn test_listing_load_reports_applied() {
    let (app, _tmp) = setup(seeded()).await;
    let res = handle_method(&app, "listing.load", &json!({})).await.unwrap();
    assert_eq!(res["applied"], true);
    assert_eq!(res["groups"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_listing_reorder_bookmark_between_groups() {
    let (app, _tmp) = setup(seeded()).await;
    let res = handle_method(
        &app,
        "listing.reorder",
        &json!({
            "kind": "bookmark",
            "source": {"groupId": "G1", "index": 0},
            "destination": {"groupId": "G2", "index": 1}
        }),
    )
    .await
    .unwrap();

    let g1: Vec<&str> = res["groups"][0]["bookmarks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    let g2: Vec<&str> = res["groups"][1]["bookmarks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(g1, vec!["B", "C"]);
    assert_eq!(g2, vec!["D", "A"]);
}

#[tokio::test]
async fn test_listing_reorder_group() {
    let (app, _tmp) = setup(seeded()).await;
    let res = handle_method(
        &app,
        "listing.reorder",
        &json!({"kind": "group", "source": 1, "destination": 0}),
    )
    .await
    .unwrap();
    assert_eq!(res["groups"][0]["id"], "G2");
    assert_eq!(res["groups"][1]["id"], "G1");
}

#[tokio::test]
async fn test_listing_reorder_rejects_bad_descriptor() {
    let (app, _tmp) = setup(seeded()).await;
    let res = handle_method(&app, "listing.reorder", &json!({"kind": "tab", "source": 0})).await;
    assert!(res.unwrap_err().contains("invalid drag result"));

    let res = handle_method(
        &app,
        "listing.reorder",
        &json!({"kind": "group", "source": 9, "destination": 0}),
    )
    .await;
    assert!(res.unwrap_err().contains("out of range"));
}

// ─── Groups ───

#[tokio::test]
async fn test_group_create() {
    let (app, _tmp) = setup(Listing::default()).await;
    let res = handle_method(&app, "group.create", &json!({"name": "Reading"}))
        .await
        .unwrap();
    let groups = res["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "Reading");
}

#[tokio::test]
async fn test_group_create_blank_or_missing_name() {
    let (app, _tmp) = setup(Listing::default()).await;
    let res = handle_method(&app, "group.create", &json!({"name": "   "})).await;
    assert!(res.unwrap_err().contains("Group name must not be empty"));

    let res = handle_method(&app, "group.create", &json!({})).await;
    assert_eq!(res.unwrap_err(), "missing name");
    assert_eq!(app.store.remote().request_count(), 1);
}

#[tokio::test]
async fn test_group_options_in_display_order() {
    let (app, _tmp) = setup(seeded()).await;
    let res = handle_method(&app, "group.options", &json!({})).await.unwrap();
    assert_eq!(
        res,
        json!([{"id": "G1", "name": "Work"}, {"id": "G2", "name": "Home"}])
    );

    handle_method(
        &app,
        "listing.reorder",
        &json!({"kind": "group", "source": 1, "destination": 0}),
    )
    .await
    .unwrap();
    let res = handle_method(&app, "group.options", &json!({})).await.unwrap();
    assert_eq!(res[0]["id"], "G2");
}

// ─── Bookmarks ───

#[tokio::test]
async fn test_bookmark_create() {
    let (app, _tmp) = setup(seeded()).await;
    let res = handle_method(
        &app,
        "bookmark.create",
        &json!({
            "groupId": "G2",
            "title": "Rust",
            "url": "https://rust-lang.org",
            "description": "home page"
        }),
    )
    .await
    .unwrap();

    let home = &res["groups"][1]["bookmarks"];
    assert_eq!(home.as_array().unwrap().len(), 2);
    assert_eq!(home[1]["title"], "Rust");
    assert_eq!(home[1]["description"], "home page");
}

#[tokio::test]
async fn test_bookmark_create_unknown_group() {
    let (app, _tmp) = setup(seeded()).await;
    let res = handle_method(
        &app,
        "bookmark.create",
        &json!({"groupId": "nope", "title": "X", "url": "https://x.com"}),
    )
    .await;
    assert!(res.unwrap_err().contains("Unknown group: nope"));
}

#[tokio::test]
async fn test_bookmark_create_missing_params() {
    let (app, _tmp) = setup(seeded()).await;
    assert!(handle_method(&app, "bookmark.create", &json!({"groupId": "G1", "url": "https://x.com"}))
        .await
        .is_err());
    assert!(handle_method(&app, "bookmark.create", &json!({"groupId": "G1", "title": "X"}))
        .await
        .is_err());
    assert!(handle_method(&app, "bookmark.create", &json!({"title": "X", "url": "https://x.com"}))
        .await
        .is_err());
}

// ─── Settings ───

#[tokio::test]
async fn test_settings_get() {
    let (app, _tmp) = setup(Listing::default()).await;
    let res = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(res["tenant"], "default");
    assert_eq!(res["persist_reorder"], false);
}

// ─── Lifecycle ───

#[tokio::test]
async fn test_calls_after_shutdown_are_cancelled() {
    let (app, _tmp) = setup(seeded()).await;
    app.shutdown();
    let res = handle_method(&app, "listing.load", &json!({})).await;
    assert_eq!(res.unwrap_err(), "Operation cancelled");
}
