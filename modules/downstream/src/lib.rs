//! Downstream demo service.
//!
//! Each operation either succeeds or raises one classified failure, which the
//! shared error boundary encodes into the wire envelope.

pub mod config;
pub mod module;

pub use config::DownstreamConfig;
pub use module::router;

#[doc(hidden)]
pub mod api;
pub(crate) mod domain;
