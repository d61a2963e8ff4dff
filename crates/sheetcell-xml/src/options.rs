//! Serialization options

/// Options for writing `<sheetData>` XML
#[derive(Debug, Clone)]
pub struct XmlWriteOptions {
    /// Put each row and cell on its own line, indented by this many spaces
    /// per level. `None` writes everything on one line (default).
    pub indent: Option<usize>,
    /// Write elements without content as `<c .../>` rather than
    /// `<c ...></c>` (default: true)
    pub self_close_empty: bool,
}

impl Default for XmlWriteOptions {
    fn default() -> Self {
        Self {
            indent: None,
            self_close_empty: true,
        }
    }
}

impl XmlWriteOptions {
    /// Compact output
    pub fn compact() -> Self {
        Self::default()
    }

    /// One element per line, two-space indent
    pub fn pretty() -> Self {
        Self {
            indent: Some(2),
            ..Self::default()
        }
    }

    pub(crate) fn newline(&self, out: &mut String, depth: usize) {
        if let Some(width) = self.indent {
            out.push('\n');
            out.extend(std::iter::repeat(' ').take(width * depth));
        }
    }
}
