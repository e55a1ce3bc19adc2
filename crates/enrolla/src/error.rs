//! Error types for the booking engine.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the booking engine.
///
/// Validation failures are deliberately not errors: they are ordinary values
/// surfaced through [`StepReport`](crate::wizard::StepReport) and block
/// nothing but the forward transition that triggered them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The catalog document could not be parsed.
    #[error("Failed to parse catalog document: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// The catalog document could not be read.
    #[error("Failed to read catalog document: {0}")]
    CatalogRead(#[from] std::io::Error),

    /// A course referenced by ID is not in the catalog.
    #[error("Unknown course '{id}'")]
    UnknownCourse { id: String },

    /// The wizard refused to open because the course has no seats left.
    #[error("Course '{id}' is sold out")]
    SoldOut { id: String },
}
