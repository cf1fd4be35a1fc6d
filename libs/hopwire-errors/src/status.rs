use http::StatusCode;

/// Status-mapping policy for failures received from a downstream service.
///
/// Collapses downstream statuses into the small upstream contract:
/// bad input stays 400, not-found stays 404, a failed third-party dependency
/// stays 502, and everything else (including transport failures, which are
/// recorded as 500) becomes 500.
#[must_use]
pub fn map_downstream_status(downstream_status: u16) -> StatusCode {
    match downstream_status {
        400 | 422 => StatusCode::BAD_REQUEST,
        404 => StatusCode::NOT_FOUND,
        502 => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
