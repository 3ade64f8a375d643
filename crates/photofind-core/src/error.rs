//! Error types for photofind.

use thiserror::Error;

/// Main error type for photofind operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog operation failed
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Vector index operation failed
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog initialization failed: {0}")]
    Init(String),

    #[error("insert failed: {0}")]
    Insert(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Vector index errors.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("index unavailable: {0}")]
    Unavailable(String),

    #[error("insert failed: {0}")]
    Insert(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("dimension mismatch: got {got}, index holds {expected}")]
    DimensionMismatch { got: usize, expected: usize },
}

/// Embedding errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("model loading failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Result type alias for photofind operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Query("bad filter".to_string());
        assert_eq!(err.to_string(), "query failed: bad filter");
    }

    #[test]
    fn test_index_error_dimension_mismatch_display() {
        let err = IndexError::DimensionMismatch {
            got: 384,
            expected: 512,
        };
        assert_eq!(err.to_string(), "dimension mismatch: got 384, index holds 512");
    }

    #[test]
    fn test_embed_error_display() {
        let err = EmbedError::Inference("model crashed".to_string());
        assert_eq!(err.to_string(), "inference failed: model crashed");
    }

    #[test]
    fn test_error_from_catalog_error() {
        let err: Error = CatalogError::Insert("duplicate path".to_string()).into();
        assert!(matches!(err, Error::Catalog(_)));
        assert!(err.to_string().contains("duplicate path"));
    }

    #[test]
    fn test_error_from_index_error() {
        let err: Error = IndexError::Unavailable("not mounted".to_string()).into();
        assert!(matches!(err, Error::Index(_)));
        assert!(err.to_string().contains("not mounted"));
    }

    #[test]
    fn test_error_from_embed_error() {
        let err: Error = EmbedError::ModelLoad("missing weights".to_string()).into();
        assert!(matches!(err, Error::Embedding(_)));
        assert!(err.to_string().contains("missing weights"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_config_display() {
        let err = Error::Config("invalid mode".to_string());
        assert_eq!(err.to_string(), "config error: invalid mode");
    }
}
