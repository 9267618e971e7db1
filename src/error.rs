//! Error types for the NWP importers.
//!
//! A single enum covers every failure an import can surface. Failures are
//! reported once to the caller; nothing is retried and nothing is partially
//! returned.

use thiserror::Error;

/// The main error type for importer operations.
#[derive(Error, Debug)]
pub enum ImportError {
    /// A required decode backend is not available in this build
    #[error("Missing dependency: {dependency} - {message}")]
    MissingDependency { dependency: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// The dataset is missing an expected variable, coordinate or attribute,
    /// or its content cannot be interpreted
    #[error("Dataset error in {path}: {message}")]
    Dataset { path: String, message: String },

    /// Failure while deriving one metadata field
    #[error("Failed to extract metadata field '{field}' from {path}: {message}")]
    MetadataExtraction {
        field: String,
        path: String,
        message: String,
    },

    /// Invalid or unknown importer option
    #[error("Invalid option: {option} - {message}")]
    InvalidOption { option: String, message: String },

    /// No importer registered under the requested name
    #[error("Unknown importer: {name}")]
    UnknownImporter { name: String },

    /// Array shape errors
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ImportError {
    /// Build a dataset error for the given source path.
    pub fn dataset(path: &str, message: impl Into<String>) -> Self {
        ImportError::Dataset {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Short machine-readable name of the variant, used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::MissingDependency { .. } => "missing_dependency",
            ImportError::Io(_) => "io",
            #[cfg(feature = "netcdf")]
            ImportError::NetCdf(_) => "netcdf",
            ImportError::Dataset { .. } => "dataset",
            ImportError::MetadataExtraction { .. } => "metadata_extraction",
            ImportError::InvalidOption { .. } => "invalid_option",
            ImportError::UnknownImporter { .. } => "unknown_importer",
            ImportError::Shape(_) => "shape",
            ImportError::Json(_) => "json",
            ImportError::Config { .. } => "config",
        }
    }

    /// Attach a metadata field name to this error.
    ///
    /// Errors that already carry a field keep their original context.
    pub fn in_field(self, field: &str, path: &str) -> Self {
        match self {
            ImportError::MetadataExtraction { .. } => self,
            ImportError::Dataset { message, .. } => ImportError::MetadataExtraction {
                field: field.to_string(),
                path: path.to_string(),
                message,
            },
            other => ImportError::MetadataExtraction {
                field: field.to_string(),
                path: path.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Convenience type alias for Results with ImportError
pub type Result<T> = std::result::Result<T, ImportError>;
