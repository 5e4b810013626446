//! Durable storage for materialized views.
//!
//! The [`ViewStore`] trait is the five-operation contract every backend
//! implements. Two backends ship with this crate:
//! - [`RedisViewStore`] — the reference backend, a Redis key/value store
//!   with list-append event logs
//! - [`InMemoryViewStore`] — for tests

pub mod backend;
pub mod error;
pub mod memory;
pub mod redis;

pub use backend::{StoreConfig, ViewStore};
pub use error::{Result, StoreError};
pub use memory::InMemoryViewStore;
pub use self::redis::RedisViewStore;
