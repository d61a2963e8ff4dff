//! # sheetcell-xml
//!
//! The worksheet side of a cell value: `<c>` elements read from and written
//! back to a `<sheetData>` fragment.
//!
//! [`CellElement`] implements [`sheetcell_core::CellNode`] over the `<v>`
//! child and `t` attribute of a `<c>` element, so a
//! [`CellValue`](sheetcell_core::CellValue) can be opened directly on it.
//! Everything else in the element is carried through unchanged.
//!
//! ## Example
//!
//! ```rust
//! use sheetcell_xml::SheetData;
//!
//! let xml = r#"<sheetData><row r="1"><c r="A1" t="b"><v>1</v></c></row></sheetData>"#;
//! let mut sheet = SheetData::parse(xml).unwrap();
//!
//! let mut value = sheet.cell_value("A1").unwrap();
//! assert!(value.boolean().unwrap());
//! value.set_integer(42);
//!
//! assert_eq!(
//!     sheet.to_xml().unwrap(),
//!     r#"<sheetData><row r="1"><c r="A1"><v>42</v></c></row></sheetData>"#
//! );
//! ```

pub mod element;
pub mod error;
pub mod options;
pub mod sheet_data;

pub use element::{CellElement, Formula};
pub use error::{XmlError, XmlResult};
pub use options::XmlWriteOptions;
pub use sheet_data::{Row, SheetData};
