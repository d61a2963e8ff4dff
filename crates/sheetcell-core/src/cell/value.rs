//! The cell value facade

use std::fmt;

use log::trace;

use super::{CellError, CellNode, Number, Value, ValueKind};
use crate::error::{Error, Result};

/// The value of one worksheet cell, kept in sync with its persisted encoding.
///
/// `CellValue` borrows the cell's [`CellNode`] for its whole lifetime and owns
/// the single active [`Value`]. Every setter rewrites the persisted state as
/// needed and reports the cell as modified.
///
/// # Example
///
/// ```rust
/// use sheetcell_core::{CellNode, CellValue, MemoryCell, ValueKind};
///
/// let mut cell = MemoryCell::new();
/// let mut value = CellValue::new(&mut cell).unwrap();
/// assert_eq!(value.value_type(), ValueKind::Empty);
///
/// value.set_integer(42);
/// assert_eq!(value.integer().unwrap(), 42);
/// assert_eq!(value.as_string(), "42");
///
/// value.set_boolean(true);
/// assert_eq!(value.node().type_code(), Some("b"));
/// assert_eq!(value.node().value_text(), Some("1"));
/// ```
pub struct CellValue<'a, N: CellNode + ?Sized> {
    node: &'a mut N,
    value: Value,
}

impl<'a, N: CellNode + ?Sized> CellValue<'a, N> {
    /// Load the value currently persisted in `node`.
    ///
    /// Fails with [`Error::MalformedValue`] or [`Error::UnsupportedTypeCode`]
    /// if the persisted state cannot be interpreted; the data is never
    /// silently treated as empty.
    pub fn new(node: &'a mut N) -> Result<Self> {
        let value = Value::read_from(&*node)?;
        Ok(Self { node, value })
    }

    /// Get the value as a boolean
    pub fn boolean(&self) -> Result<bool> {
        self.value.as_boolean()
    }

    /// Get the value as an `i64`, truncating floats toward zero
    pub fn integer(&self) -> Result<i64> {
        self.value.as_integer()
    }

    /// Get the value as a narrower integer type
    ///
    /// ```rust
    /// use sheetcell_core::{CellValue, Error, MemoryCell};
    ///
    /// let mut cell = MemoryCell::with_value("300");
    /// let value = CellValue::new(&mut cell).unwrap();
    /// assert_eq!(value.integer_as::<i16>().unwrap(), 300);
    /// assert!(matches!(value.integer_as::<u8>(), Err(Error::OutOfRange { .. })));
    /// ```
    pub fn integer_as<T: TryFrom<i64>>(&self) -> Result<T> {
        let n = self.integer()?;
        T::try_from(n).map_err(|_| Error::OutOfRange {
            value: n.to_string(),
            target: std::any::type_name::<T>(),
        })
    }

    /// Get the value as an `f64`
    pub fn float(&self) -> Result<f64> {
        self.value.as_float()
    }

    /// Borrow the text of a string value
    pub fn string(&self) -> Result<&str> {
        self.value.as_str()
    }

    /// Render the value as text regardless of its kind. Never fails.
    pub fn as_string(&self) -> String {
        self.value.to_string()
    }

    /// The kind of the active value
    pub fn value_type(&self) -> ValueKind {
        self.value.kind()
    }

    /// Borrow the active value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Borrow the underlying cell node
    pub fn node(&self) -> &N {
        &*self.node
    }

    /// Take the active value, releasing the borrow of the cell
    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn set_boolean(&mut self, b: bool) {
        self.store(Value::Boolean(b));
    }

    pub fn set_integer(&mut self, n: i64) {
        self.store(Value::Number(Number::Integer(n)));
    }

    /// Set a floating-point value. NaN and infinities have no persisted
    /// form and are rejected with [`Error::OutOfRange`].
    pub fn set_float(&mut self, n: f64) -> Result<()> {
        self.set(n)
    }

    pub fn set_string<S: Into<String>>(&mut self, s: S) {
        self.store(Value::String(s.into()));
    }

    pub fn set_error(&mut self, e: CellError) {
        self.store(Value::Error(e));
    }

    /// Set any value. [`Value::Empty`] is equivalent to [`set_empty`](Self::set_empty).
    pub fn set<V: Into<Value>>(&mut self, value: V) -> Result<()> {
        let value = value.into();
        value.check_storable()?;
        if value.is_empty() {
            self.set_empty();
        } else {
            self.store(value);
        }
        Ok(())
    }

    /// Chainable form of [`set`](Self::set)
    ///
    /// ```rust
    /// use sheetcell_core::{CellValue, MemoryCell};
    ///
    /// let mut cell = MemoryCell::new();
    /// let mut value = CellValue::new(&mut cell).unwrap();
    /// let text = value.assign(1.5).unwrap().assign("done").unwrap().as_string();
    /// assert_eq!(text, "done");
    /// ```
    pub fn assign<V: Into<Value>>(&mut self, value: V) -> Result<&mut Self> {
        self.set(value)?;
        Ok(self)
    }

    /// Copy another cell's value into this one
    pub fn copy_from<M: CellNode + ?Sized>(&mut self, other: &CellValue<'_, M>) {
        if other.value.is_empty() {
            self.set_empty();
        } else {
            self.store(other.value.clone());
        }
    }

    /// Clear the value, removing the value node and type attribute
    pub fn set_empty(&mut self) {
        if !self.value.is_empty() {
            trace!("cell value {} -> empty", self.value.kind());
        }
        self.node.delete_value_node();
        self.node.delete_type_attribute();
        self.value = Value::Empty;
        self.node.set_modified();
    }

    /// Persist a non-empty value and make it active.
    ///
    /// Within the same category only the value text changes, provided the
    /// persisted type code is already the one this value writes. Integer
    /// and float share a category since neither writes a type code.
    fn store(&mut self, value: Value) {
        let same_category =
            std::mem::discriminant(&self.value) == std::mem::discriminant(&value);
        let code_matches = self.node.type_code() == value.type_code();
        match value.persisted_text() {
            Some(text) if same_category && code_matches => self.node.set_value_text(&text),
            _ => {
                if !same_category {
                    trace!("cell value {} -> {}", self.value.kind(), value.kind());
                }
                value.write_to(&mut *self.node);
            }
        }
        self.value = value;
        self.node.set_modified();
    }
}

impl<N: CellNode + ?Sized> fmt::Display for CellValue<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<N: CellNode + ?Sized> fmt::Debug for CellValue<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellValue")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
