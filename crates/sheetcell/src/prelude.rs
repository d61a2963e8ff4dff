//! Prelude module - common imports for sheetcell users
//!
//! ```rust
//! use sheetcell::prelude::*;
//! ```

pub use crate::{
    // Cell node access
    CellElement,
    CellError,
    CellNode,
    // Cell value types
    CellValue,
    // Error types
    Error,
    MemoryCell,
    Number,
    Result,
    // Sheet XML
    SheetData,
    Value,
    ValueKind,
    XmlError,
    XmlResult,
    XmlWriteOptions,
};
