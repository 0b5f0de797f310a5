/// Errors from key-value store operations.
///
/// The bundled backends never fail on their own: [`InMemoryKvStore`] only
/// reports [`StoreError::Backend`] for a poisoned lock and [`NullKvStore`]
/// always succeeds. `Io` and `ReadOnly` exist for embedder backends over
/// files, remote stores or read-only snapshots, and surface through
/// persistence unchanged.
///
/// [`InMemoryKvStore`]: crate::InMemoryKvStore
/// [`NullKvStore`]: crate::NullKvStore
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend failed to complete the operation.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error from a file- or socket-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend is read-only or otherwise unavailable.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn open_snapshot() -> StoreResult<String> {
        Err(io::Error::new(io::ErrorKind::NotFound, "snapshot missing"))?
    }

    #[test]
    fn io_errors_convert() {
        let err = open_snapshot().unwrap_err();
        assert!(matches!(err, StoreError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert_eq!(err.to_string(), "I/O error: snapshot missing");
    }

    #[test]
    fn messages() {
        assert_eq!(StoreError::ReadOnly.to_string(), "store is read-only");
        assert_eq!(
            StoreError::Backend("offline".into()).to_string(),
            "backend error: offline"
        );
    }
}
