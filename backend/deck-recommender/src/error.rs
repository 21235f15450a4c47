use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures at the key/value storage seam.
///
/// None of these escape the public store operations: reads degrade to the
/// documented default and writes are logged and dropped. They exist so the
/// "no data" and "corrupt data" paths stay distinguishable in tests.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Corrupt data under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn corrupt(key: &str, reason: impl ToString) -> Self {
        StoreError::Corrupt {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for data that exists but could not be decoded.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

// Implement conversions from other error types
impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_is_distinguishable() {
        let err = StoreError::corrupt("nuera:prefs:v1", "expected value at line 1");
        assert!(err.is_corrupt());
        assert!(err.to_string().contains("nuera:prefs:v1"));

        let io: StoreError = std::io::Error::new(std::io::ErrorKind::Other, "disk gone").into();
        assert!(!io.is_corrupt());
    }
}
