//! Core types and workflows for SpotLive.
//!
//! This crate holds everything below the terminal front-end:
//! - `Event` and the write payload sent to the backend
//! - the `gateway` traits and their Supabase implementation
//! - the `EventStore` and the `RefreshCoordinator` that invalidates it
//! - the form, detail panel and auth workflows, tied together by `App`

pub mod app;
pub mod auth;
pub mod config;
pub mod detail;
pub mod error;
pub mod event;
pub mod form;
pub mod gateway;
pub mod refresh;
pub mod session;
pub mod store;

// Re-export the domain types at crate root for convenience
pub use event::*;
