//! groupmark: a grouped bookmark organizer client backed by a remote HTTP store.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod types;
