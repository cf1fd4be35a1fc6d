//! Error taxonomy and boundary plumbing shared by the hopwire services.
//!
//! - [`ErrorKind`]: the closed set of classified failures.
//! - [`encoder`]: kind + [`RequestContext`] → status and [`ErrorEnvelope`].
//! - [`status`]: status-mapping policy for failures received from a downstream.
//! - [`boundary`]: the per-request middleware that is the single interception point.

pub mod boundary;
pub mod context;
pub mod encoder;
pub mod envelope;
pub mod json;
pub mod kind;
pub mod status;

pub use boundary::{error_boundary, mount};
pub use context::{REQUEST_ID_HEADER, RequestContext, new_request_id};
pub use encoder::{ERROR_SOURCE_HEADER, encode, encode_response};
pub use envelope::{ErrorBody, ErrorEnvelope};
pub use json::JsonBody;
pub use kind::{ErrorCode, ErrorKind, ErrorSource, INTERNAL_ERROR_MESSAGE, Severity};
pub use status::map_downstream_status;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
