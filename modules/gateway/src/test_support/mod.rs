//! Test utilities for gateway integration tests.

mod mock;

pub use mock::{MockBody, MockDownstream, MockResponse, RecordedRequest, RouteKey};
