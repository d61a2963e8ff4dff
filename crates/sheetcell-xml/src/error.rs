//! XML error types

use thiserror::Error;

/// Result type for sheet XML operations
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// Errors that can occur while reading or writing sheet XML
#[derive(Debug, Error)]
pub enum XmlError {
    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Text is not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// A required element is missing
    #[error("Missing element: <{0}>")]
    MissingElement(&'static str),

    /// Structurally invalid content
    #[error("Parse error: {0}")]
    Parse(String),

    /// No cell with this reference
    #[error("Cell not found: {0}")]
    CellNotFound(String),

    /// A cell reference that is not in A1 form
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    /// Core error
    #[error("Cell value error: {0}")]
    Core(#[from] sheetcell_core::Error),
}
