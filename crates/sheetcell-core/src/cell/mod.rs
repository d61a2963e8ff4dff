//! Cell value types
//!
//! This module contains:
//! - [`CellValue`] - The facade over a cell's value and its persisted encoding
//! - [`Value`] and [`Number`] - The tagged union of value kinds
//! - [`CellNode`] - Access to the value node and type attribute of a cell
//! - [`ValueKind`], [`TypeCode`] - Kinds and the type-code table
//! - [`CellError`] - Error tokens

mod error_value;
mod kind;
mod node;
mod value;
mod variant;

pub use error_value::CellError;
pub use kind::{TypeCode, ValueKind};
pub use node::{CellNode, MemoryCell};
pub use value::CellValue;
pub use variant::{Number, Value};
