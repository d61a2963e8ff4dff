//! Access to the persisted state behind a cell value
//!
//! A cell's value is encoded by two pieces of document state: the value
//! node holding the literal text, and the optional type attribute naming
//! the kind. [`CellNode`] is the narrow interface through which
//! [`CellValue`](super::CellValue) reads and writes them, so the value model
//! does not depend on any particular XML tree.

/// The value node, type attribute and dirty flag of one cell.
///
/// Implementations only touch the single cell's subtree. `create_*` and
/// `delete_*` are idempotent. `set_*` requires the node or attribute to
/// exist; calling it otherwise is a broken invariant and may panic.
pub trait CellNode {
    /// Whether the value node exists
    fn has_value_node(&self) -> bool {
        self.value_text().is_some()
    }

    /// Materialize an empty value node if absent
    fn create_value_node(&mut self);

    /// Text of the value node, `None` when absent
    fn value_text(&self) -> Option<&str>;

    /// Overwrite the value node's text
    fn set_value_text(&mut self, text: &str);

    /// Remove the value node; no-op if absent
    fn delete_value_node(&mut self);

    /// Whether the type attribute exists
    fn has_type_attribute(&self) -> bool {
        self.type_code().is_some()
    }

    /// Materialize an empty type attribute if absent
    fn create_type_attribute(&mut self);

    /// Text of the type attribute, `None` when absent
    fn type_code(&self) -> Option<&str>;

    /// Overwrite the type attribute's text
    fn set_type_code(&mut self, code: &str);

    /// Remove the type attribute; no-op if absent
    fn delete_type_attribute(&mut self);

    /// Tell the owning cell its persisted state changed
    fn set_modified(&mut self);
}

/// A detached cell holding its encoding in plain fields.
///
/// Useful for values that are not (yet) attached to a worksheet, and as a
/// reference implementation of [`CellNode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCell {
    value: Option<String>,
    type_code: Option<String>,
    modified: bool,
}

impl MemoryCell {
    /// Create a cell with no value node and no type attribute
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell with a value node and no type attribute
    pub fn with_value<S: Into<String>>(text: S) -> Self {
        Self {
            value: Some(text.into()),
            ..Self::default()
        }
    }

    /// Create a cell with both a value node and a type attribute
    pub fn with_type<C: Into<String>, S: Into<String>>(code: C, text: S) -> Self {
        Self {
            value: Some(text.into()),
            type_code: Some(code.into()),
            modified: false,
        }
    }

    /// Whether a mutation has been reported since creation or the last
    /// [`clear_modified`](Self::clear_modified)
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Reset the dirty flag, e.g. after the cell has been serialized
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }
}

impl CellNode for MemoryCell {
    fn create_value_node(&mut self) {
        self.value.get_or_insert_with(String::new);
    }

    fn value_text(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn set_value_text(&mut self, text: &str) {
        let value = self
            .value
            .as_mut()
            .expect("value node must exist before its text is written");
        value.clear();
        value.push_str(text);
    }

    fn delete_value_node(&mut self) {
        self.value = None;
    }

    fn create_type_attribute(&mut self) {
        self.type_code.get_or_insert_with(String::new);
    }

    fn type_code(&self) -> Option<&str> {
        self.type_code.as_deref()
    }

    fn set_type_code(&mut self, code: &str) {
        let attr = self
            .type_code
            .as_mut()
            .expect("type attribute must exist before its code is written");
        attr.clear();
        attr.push_str(code);
    }

    fn delete_type_attribute(&mut self) {
        self.type_code = None;
    }

    fn set_modified(&mut self) {
        self.modified = true;
    }
}
