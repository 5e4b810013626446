//! View-state cache and commit engine.
//!
//! This crate is the heart of the system: [`ViewState`] buffers the
//! mutations issued while one event is processed, answers reads against
//! cache-over-storage (read-your-writes), and commits the buffer to the
//! backing store one durability unit per key.

pub mod error;
mod scope;
pub mod view;

pub use error::{Result, ViewError};
pub use view::{CommitFailure, CommitReport, ViewState};
