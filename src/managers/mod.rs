// groupmark state managers
// Managers own client-side state and funnel every change through typed operations.

pub mod listing_store;
