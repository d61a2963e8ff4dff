//! # sheetcell
//!
//! Typed access to the value of a spreadsheet cell, kept in sync with the
//! cell's XML in the worksheet.
//!
//! ## Features
//!
//! - Empty, boolean, integer, float, string and error values
//! - Checked conversions between representations
//! - Minimal-diff persistence: the type attribute and value node are only
//!   written when they carry information
//! - Dirty tracking, so only changed cells need to be re-serialized
//!
//! ## Example
//!
//! ```rust
//! use sheetcell::prelude::*;
//!
//! let mut sheet = SheetData::new();
//! let cell = sheet.insert_cell("B2").unwrap();
//!
//! let mut value = cell.value().unwrap();
//! value.assign(true).unwrap();
//! assert_eq!(value.float().unwrap(), 1.0);
//!
//! assert_eq!(
//!     sheet.to_xml().unwrap(),
//!     r#"<sheetData><row r="2"><c r="B2" t="b"><v>1</v></c></row></sheetData>"#
//! );
//! ```

pub mod prelude;

// Re-export core types
pub use sheetcell_core::{
    CellError, CellNode, CellValue, Error, MemoryCell, Number, Result, TypeCode, Value, ValueKind,
};

// Re-export XML types
pub use sheetcell_xml::{CellElement, Formula, Row, SheetData, XmlError, XmlResult, XmlWriteOptions};
