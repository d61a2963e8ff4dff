//! The `<c>` element of a worksheet

use quick_xml::escape::escape;

use sheetcell_core::{CellNode, CellValue, TypeCode};

use crate::error::{XmlError, XmlResult};
use crate::options::XmlWriteOptions;

/// An `<f>` child, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formula {
    /// Attributes of `<f>` in document order (e.g. `t="shared"`, `si`)
    pub attributes: Vec<(String, String)>,
    /// Formula text without the leading `=`
    pub text: String,
}

/// A worksheet cell element.
///
/// The `r` attribute, the `t` attribute and the value are modelled
/// directly; other attributes and the formula are passed through. The value
/// of an inline-string cell lives in `<is>` rather than `<v>`; its plain text
/// is exposed as the value text, and the parsed `<is>` subtree is written
/// back verbatim until the value is changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellElement {
    reference: String,
    attributes: Vec<(String, String)>,
    type_code: Option<String>,
    value: Option<String>,
    inline_xml: Option<String>,
    formula: Option<Formula>,
    modified: bool,
}

impl CellElement {
    /// Create an empty cell at an A1 reference
    pub fn new<S: Into<String>>(reference: S) -> XmlResult<Self> {
        let reference = reference.into();
        split_reference(&reference)?;
        Ok(Self::unchecked(reference))
    }

    pub(crate) fn unchecked(reference: String) -> Self {
        Self {
            reference,
            attributes: Vec::new(),
            type_code: None,
            value: None,
            inline_xml: None,
            formula: None,
            modified: false,
        }
    }

    /// The A1 reference from the `r` attribute
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Value of a passthrough attribute such as `s`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a passthrough attribute.
    ///
    /// `r` and `t` are owned by the element and the value model; use
    /// [`CellValue`] to change the type.
    pub fn set_attribute<K: Into<String>, V: Into<String>>(
        &mut self,
        name: K,
        value: V,
    ) -> XmlResult<()> {
        let name = name.into();
        if name == "r" || name == "t" {
            return Err(XmlError::Parse(format!(
                "attribute '{}' cannot be set directly",
                name
            )));
        }
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
        self.modified = true;
        Ok(())
    }

    /// Style index from the `s` attribute
    pub fn style_index(&self) -> Option<u32> {
        self.attribute("s").and_then(|s| s.parse().ok())
    }

    /// The formula child, if any
    pub fn formula(&self) -> Option<&Formula> {
        self.formula.as_ref()
    }

    /// Open the cell's value for reading and writing
    pub fn value(&mut self) -> sheetcell_core::Result<CellValue<'_, Self>> {
        CellValue::new(self)
    }

    /// Whether the cell changed since it was parsed or last cleared
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Reset the dirty flag once the change has been written out
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    /// Serialize this element on its own
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, &XmlWriteOptions::compact(), 0);
        out
    }

    pub(crate) fn set_parsed_attribute(&mut self, name: &str, value: String) {
        match name {
            "r" => self.reference = value,
            "t" => self.type_code = Some(value),
            _ => self.attributes.push((name.to_string(), value)),
        }
    }

    pub(crate) fn set_parsed_value(&mut self, value: String) {
        self.value = Some(value);
    }

    /// `text` is the plain text of the `<t>` runs, `raw` the whole `<is>` element
    pub(crate) fn set_parsed_inline(&mut self, text: String, raw: String) {
        self.value = Some(text);
        self.inline_xml = Some(raw);
    }

    pub(crate) fn set_parsed_formula(&mut self, formula: Formula) {
        self.formula = Some(formula);
    }

    pub(crate) fn write(&self, out: &mut String, options: &XmlWriteOptions, depth: usize) {
        options.newline(out, depth);
        out.push_str("<c r=\"");
        out.push_str(&escape(self.reference.as_str()));
        out.push('"');
        for (key, value) in &self.attributes {
            push_attribute(out, key, value);
        }
        if let Some(code) = &self.type_code {
            push_attribute(out, "t", code);
        }

        if self.formula.is_none() && self.value.is_none() && options.self_close_empty {
            out.push_str("/>");
            return;
        }
        out.push('>');

        if let Some(formula) = &self.formula {
            out.push_str("<f");
            for (key, value) in &formula.attributes {
                push_attribute(out, key, value);
            }
            if formula.text.is_empty() && options.self_close_empty {
                out.push_str("/>");
            } else {
                out.push('>');
                out.push_str(&escape(formula.text.as_str()));
                out.push_str("</f>");
            }
        }
        if let Some(value) = &self.value {
            let inline = self.type_code.as_deref() == Some(TypeCode::InlineString.as_str());
            match &self.inline_xml {
                Some(raw) if inline => out.push_str(raw),
                _ if inline => {
                    out.push_str("<is><t");
                    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace)
                    {
                        out.push_str(" xml:space=\"preserve\"");
                    }
                    out.push('>');
                    out.push_str(&escape(value.as_str()));
                    out.push_str("</t></is>");
                }
                _ => {
                    out.push_str("<v>");
                    out.push_str(&escape(value.as_str()));
                    out.push_str("</v>");
                }
            }
        }
        out.push_str("</c>");
    }
}

fn push_attribute(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

/// Split an A1 reference into its column letters and 1-based row number.
/// `$` markers are accepted and ignored.
pub(crate) fn split_reference(reference: &str) -> XmlResult<(&str, u32)> {
    let invalid = || XmlError::InvalidReference(reference.to_string());
    let s = reference.trim_start_matches('$');
    let split = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (column, row) = s.split_at(split);
    let row = row.strip_prefix('$').unwrap_or(row);
    if column.is_empty() || column.len() > 3 {
        return Err(invalid());
    }
    let row: u32 = row.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }
    Ok((column, row))
}

/// Canonical `A1` form of a reference: upper-case column, no `$` markers
pub(crate) fn normalize_reference(reference: &str) -> XmlResult<String> {
    let (column, row) = split_reference(reference)?;
    Ok(format!("{}{}", column.to_ascii_uppercase(), row))
}

/// Sort key for a column: shorter letter runs come first, then alphabetical
pub(crate) fn column_key(column: &str) -> (usize, String) {
    (column.len(), column.to_ascii_uppercase())
}

impl CellNode for CellElement {
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
            .expect("<v> must exist before its text is written");
        value.clear();
        value.push_str(text);
        self.inline_xml = None;
    }

    fn delete_value_node(&mut self) {
        self.value = None;
        self.inline_xml = None;
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
            .expect("t attribute must exist before its code is written");
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
