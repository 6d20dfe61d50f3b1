//! Funnel API server and client commands.
//!
//! The server exposes the `/api/purchases` resource over a pluggable
//! [`db::FunnelStore`]; client commands drive a [`funnel_sdk::Tracker`] that
//! prefers the API and falls back to a local file store.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod server;

pub use funnel_sdk as sdk;
