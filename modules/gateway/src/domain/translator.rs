use hopwire_errors::ErrorKind;

use super::client::{DownstreamFailure, FailureOrigin, UNKNOWN_DOWNSTREAM_ERROR};

/// Re-kind a failed downstream call as [`ErrorKind::DownstreamService`].
///
/// The downstream's status and body are kept for `details`; the status the
/// gateway answers with is decided later by the downstream status policy.
#[must_use]
pub fn translate(failure: DownstreamFailure, service_name: &str) -> ErrorKind {
    let message = match failure.origin {
        FailureOrigin::Response => format!(
            "{service_name} returned an error: {}",
            failure.message.as_deref().unwrap_or(UNKNOWN_DOWNSTREAM_ERROR)
        ),
        FailureOrigin::Transport => format!("Failed to communicate with {service_name}"),
    };

    ErrorKind::downstream(message, service_name, failure.status_code, failure.raw_body)
}
