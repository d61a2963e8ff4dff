//! # sheetcell-core
//!
//! The value held by a single worksheet cell, and its mapping to the
//! serialized form inside the worksheet XML.
//!
//! A cell value is empty, a boolean, an integer, a float, a string or an
//! error token. It is persisted as the text of a value node plus an optional
//! type-code attribute, which is omitted for plain numbers.
//!
//! - [`CellValue`] - Reads, converts and writes a cell's value
//! - [`CellNode`] - The value node/type attribute interface a document implements
//! - [`MemoryCell`] - A standalone [`CellNode`]
//!
//! ## Example
//!
//! ```rust
//! use sheetcell_core::{CellValue, MemoryCell, ValueKind};
//!
//! let mut cell = MemoryCell::with_type("b", "1");
//! let mut value = CellValue::new(&mut cell).unwrap();
//! assert!(value.boolean().unwrap());
//!
//! value.set_string("Hello");
//! assert_eq!(value.value_type(), ValueKind::String);
//! assert!(value.float().is_err());
//! ```

pub mod cell;
pub mod error;

pub use cell::{CellError, CellNode, CellValue, MemoryCell, Number, TypeCode, Value, ValueKind};
pub use error::{Error, Result};
