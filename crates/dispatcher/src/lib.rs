//! Event dispatching for materialized views.
//!
//! The [`Dispatcher`] binds a fresh processing scope to each incoming
//! event, fans the event out to every registered [`EventHandler`], then
//! commits the accumulated view mutations through the backing store.
//! [`LocalDriver`] is a synchronous ingestion driver for tests and manual
//! feeding.

pub mod dispatch;
pub mod driver;
pub mod handler;

pub use dispatch::Dispatcher;
pub use driver::LocalDriver;
pub use handler::EventHandler;
