use hopwire_errors::ErrorKind;

use super::store::connect_ledger;

/// A user accepted by [`DemoService::validate_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedUser {
    pub email: String,
    pub name: String,
}

/// Demo operations. Every failing operation raises exactly one kind.
#[derive(Debug, Clone)]
pub(crate) struct DemoService {
    name: String,
}

impl DemoService {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn validation_error(&self) -> Result<(), ErrorKind> {
        tracing::debug!(service = %self.name, "Raising demo validation error");
        Err(ErrorKind::validation(
            "Invalid email format",
            "email",
            "Email must contain @ symbol",
        ))
    }

    pub(crate) fn not_found(&self) -> Result<(), ErrorKind> {
        tracing::debug!(service = %self.name, "Looking up demo user 12345");
        Err(ErrorKind::not_found("User not found", "User", "12345"))
    }

    pub(crate) fn business_error(&self) -> Result<(), ErrorKind> {
        tracing::debug!(service = %self.name, "Checking demo account balance");
        Err(ErrorKind::business(
            "Account balance insufficient for this operation",
        ))
    }

    pub(crate) fn external_service_error(&self) -> Result<(), ErrorKind> {
        tracing::debug!(service = %self.name, "Calling demo payment gateway");
        Err(ErrorKind::external_service(
            "Payment gateway is currently unavailable",
            "payment-service",
        ))
    }

    /// Touches the ledger, whose failure is not classified.
    pub(crate) fn internal_error(&self) -> Result<(), ErrorKind> {
        tracing::debug!(service = %self.name, "Opening demo ledger");
        connect_ledger()?;
        Ok(())
    }

    pub(crate) fn validate_user(
        &self,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<ValidatedUser, ErrorKind> {
        let email = email.filter(|e| e.contains('@')).ok_or_else(|| {
            ErrorKind::validation(
                "Invalid email format",
                "email",
                "Email must be a valid email address",
            )
        })?;

        let name = name.filter(|n| !n.trim().is_empty()).ok_or_else(|| {
            ErrorKind::validation("Name cannot be empty", "name", "Name is required")
        })?;

        tracing::debug!(service = %self.name, email, "User validated");
        Ok(ValidatedUser {
            email: email.to_owned(),
            name: name.to_owned(),
        })
    }
}
