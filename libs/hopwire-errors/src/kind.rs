use std::fmt;

use http::StatusCode;
use serde_json::{Map, Value};

use crate::status::map_downstream_status;

/// Message returned to callers in place of the real text of an
/// [`ErrorKind::Internal`] failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

// ---------------------------------------------------------------------------
// Stable wire codes
// ---------------------------------------------------------------------------

/// Stable string tag of an [`ErrorKind`], written to `error.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Validation,
    ResourceNotFound,
    BusinessLogic,
    ExternalService,
    DownstreamService,
    InternalServer,
}

impl ErrorCode {
    pub const ALL: [Self; 6] = [
        Self::Validation,
        Self::ResourceNotFound,
        Self::BusinessLogic,
        Self::ExternalService,
        Self::DownstreamService,
        Self::InternalServer,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::BusinessLogic => "BUSINESS_LOGIC_ERROR",
            Self::ExternalService => "EXTERNAL_SERVICE_ERROR",
            Self::DownstreamService => "DOWNSTREAM_SERVICE_ERROR",
            Self::InternalServer => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Parse a wire code. Unknown codes yield `None`.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log level an encoder uses for a kind: client-caused failures are `Warn`,
/// service-caused failures are `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Error,
}

/// Where a failure originated, as seen by the service encoding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    Local,
    Downstream,
}

impl ErrorSource {
    /// Lowercase form used in the `x-error-source` header.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Downstream => "downstream",
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Closed set of classified failures a handler can raise.
///
/// Every variant carries the fields its wire `details` need, so a kind can
/// only be built complete. Handlers return `Result<_, ErrorKind>` and the
/// boundary middleware encodes whatever reaches it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("{message}")]
    Validation {
        message: String,
        field: String,
        reason: String,
    },

    #[error("{message}")]
    ResourceNotFound {
        message: String,
        resource_type: String,
        resource_id: String,
    },

    #[error("{message}")]
    BusinessLogic { message: String },

    #[error("{message}")]
    ExternalService {
        message: String,
        service_name: String,
    },

    /// A failure received from a call to another service, already re-kinded.
    #[error("{message}")]
    DownstreamService {
        message: String,
        service_name: String,
        status_code: u16,
        raw_body: String,
    },

    /// Anything unclassified. The message is for logs only.
    #[error("internal: {message}")]
    Internal { message: String },
}

impl ErrorKind {
    #[must_use]
    pub fn validation(
        message: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn not_found(
        message: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self::ResourceNotFound {
            message: message.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    #[must_use]
    pub fn business(message: impl Into<String>) -> Self {
        Self::BusinessLogic {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn external_service(message: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self::ExternalService {
            message: message.into(),
            service_name: service_name.into(),
        }
    }

    #[must_use]
    pub fn downstream(
        message: impl Into<String>,
        service_name: impl Into<String>,
        status_code: u16,
        raw_body: impl Into<String>,
    ) -> Self {
        Self::DownstreamService {
            message: message.into(),
            service_name: service_name.into(),
            status_code,
            raw_body: raw_body.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::Validation,
            Self::ResourceNotFound { .. } => ErrorCode::ResourceNotFound,
            Self::BusinessLogic { .. } => ErrorCode::BusinessLogic,
            Self::ExternalService { .. } => ErrorCode::ExternalService,
            Self::DownstreamService { .. } => ErrorCode::DownstreamService,
            Self::Internal { .. } => ErrorCode::InternalServer,
        }
    }

    /// HTTP status this kind is answered with. Downstream failures go through
    /// [`map_downstream_status`] and never reuse the foreign status literally.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::BusinessLogic { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            Self::DownstreamService { status_code, .. } => map_downstream_status(*status_code),
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Validation { .. } | Self::ResourceNotFound { .. } | Self::BusinessLogic { .. } => {
                Severity::Warn
            }
            Self::ExternalService { .. }
            | Self::DownstreamService { .. }
            | Self::Internal { .. } => Severity::Error,
        }
    }

    #[must_use]
    pub fn error_source(&self) -> ErrorSource {
        match self {
            Self::DownstreamService { .. } => ErrorSource::Downstream,
            _ => ErrorSource::Local,
        }
    }

    /// Message safe to put on the wire.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::BusinessLogic { message }
            | Self::ExternalService { message, .. }
            | Self::DownstreamService { message, .. } => message,
            Self::Internal { .. } => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Kind-specific `details` object, `None` for kinds without extra fields.
    #[must_use]
    pub fn details(&self) -> Option<Map<String, Value>> {
        let mut details = Map::new();
        match self {
            Self::Validation { field, reason, .. } => {
                details.insert("field".into(), Value::from(field.as_str()));
                details.insert("reason".into(), Value::from(reason.as_str()));
            }
            Self::ResourceNotFound {
                resource_type,
                resource_id,
                ..
            } => {
                details.insert("resourceType".into(), Value::from(resource_type.as_str()));
                details.insert("resourceId".into(), Value::from(resource_id.as_str()));
            }
            Self::ExternalService { service_name, .. } => {
                details.insert("serviceName".into(), Value::from(service_name.as_str()));
            }
            Self::DownstreamService {
                service_name,
                status_code,
                raw_body,
                ..
            } => {
                details.insert("serviceName".into(), Value::from(service_name.as_str()));
                details.insert("downstreamStatusCode".into(), Value::from(*status_code));
                details.insert("downstreamError".into(), Value::from(raw_body.as_str()));
            }
            Self::BusinessLogic { .. } | Self::Internal { .. } => return None,
        }
        Some(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_parse() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(ErrorCode::parse("TEAPOT"), None);
    }

    #[test]
    fn local_kinds_map_to_fixed_statuses() {
        assert_eq!(
            ErrorKind::validation("m", "email", "r").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorKind::not_found("m", "User", "1").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorKind::business("m").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorKind::external_service("m", "payments").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorKind::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn downstream_status_is_remapped_not_passed_through() {
        let err = ErrorKind::downstream("m", "svc", 422, "{}");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ErrorKind::downstream("m", "svc", 409, "{}");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn severity_splits_client_and_service_faults() {
        assert_eq!(ErrorKind::business("m").severity(), Severity::Warn);
        assert_eq!(ErrorKind::not_found("m", "t", "i").severity(), Severity::Warn);
        assert_eq!(
            ErrorKind::downstream("m", "svc", 404, "").severity(),
            Severity::Error
        );
        assert_eq!(ErrorKind::internal("m").severity(), Severity::Error);
    }

    #[test]
    fn internal_message_is_never_public() {
        let err = ErrorKind::internal("Unexpected database connection failure");
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
        assert!(err.to_string().contains("database"));
        assert!(err.details().is_none());
    }

    #[test]
    fn downstream_details_carry_numeric_status() {
        let details = ErrorKind::downstream("m", "svc", 404, "raw")
            .details()
            .unwrap();
        assert_eq!(details["serviceName"], "svc");
        assert_eq!(details["downstreamStatusCode"], 404);
        assert_eq!(details["downstreamError"], "raw");
    }

    #[test]
    fn business_error_has_no_details() {
        assert!(ErrorKind::business("nope").details().is_none());
    }

    #[test]
    fn only_downstream_kind_reports_downstream_source() {
        assert_eq!(
            ErrorKind::downstream("m", "svc", 500, "").error_source(),
            ErrorSource::Downstream
        );
        assert_eq!(ErrorKind::business("m").error_source(), ErrorSource::Local);
    }
}
