use hopwire_errors::ErrorKind;

/// Storage failures. None of them are classified for callers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("Unexpected database connection failure")]
    ConnectionFailure,
}

impl From<StoreError> for ErrorKind {
    fn from(e: StoreError) -> Self {
        Self::internal(e.to_string())
    }
}

/// Opens the ledger database. It is never reachable, so `/internal-error`
/// always fails here.
pub(crate) fn connect_ledger() -> Result<(), StoreError> {
    Err(StoreError::ConnectionFailure)
}
