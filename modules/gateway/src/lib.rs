//! Upstream gateway.
//!
//! Forwards requests to the downstream service and translates its failures,
//! wire errors and transport errors alike, into a
//! [`hopwire_errors::ErrorKind::DownstreamService`] answered through the
//! shared error boundary.

pub mod config;
pub mod module;

pub use config::{DownstreamClientConfig, GatewayConfig};
pub use domain::client::{
    DownstreamApi, DownstreamFailure, FailureOrigin, HttpDownstreamClient,
    UNKNOWN_DOWNSTREAM_ERROR, extract_error_message,
};
pub use domain::translator::translate;
pub use module::{router, router_with_client};

#[doc(hidden)]
pub mod api;
pub(crate) mod domain;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
