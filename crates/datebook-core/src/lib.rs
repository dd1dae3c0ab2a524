//! datebook-core library.
//!
//! Storage and query engine for user-owned special dates, their wishlist
//! items, and the derived cross-user calendar occupancy index.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::StoreError`] for core operations,
//!   `anyhow::Result` at setup boundaries (opening the store, config).
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod db;
pub mod error;
pub mod index;
pub mod model;
pub mod service;
pub mod store;
