//! Reading and writing the `<sheetData>` element

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use sheetcell_core::{CellNode, CellValue};

use crate::element::{
    column_key, normalize_reference, split_reference, CellElement, Formula,
};
use crate::error::{XmlError, XmlResult};
use crate::options::XmlWriteOptions;

/// A `<row>` element and its cells
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// 1-based row number from the `r` attribute
    pub number: Option<u32>,
    /// Other attributes (`spans`, `ht`, `customHeight`, ...) in document order
    pub attributes: Vec<(String, String)>,
    /// Cells in document order
    pub cells: Vec<CellElement>,
}

impl Row {
    fn write(&self, out: &mut String, options: &XmlWriteOptions) {
        options.newline(out, 1);
        out.push_str("<row");
        if let Some(number) = self.number {
            out.push_str(&format!(" r=\"{}\"", number));
        }
        for (key, value) in &self.attributes {
            out.push_str(&format!(
                " {}=\"{}\"",
                key,
                quick_xml::escape::escape(value.as_str())
            ));
        }
        if self.cells.is_empty() && options.self_close_empty {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for cell in &self.cells {
            cell.write(out, options, 2);
        }
        options.newline(out, 1);
        out.push_str("</row>");
    }
}

/// The cells of one worksheet, as held in its `<sheetData>` element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetData {
    rows: Vec<Row>,
}

/// Where text events are currently collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Value,
    Formula,
    InlineText,
}

impl SheetData {
    /// Create empty sheet data
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `<sheetData>` element.
    ///
    /// `xml` may also be a whole worksheet part; only its `<sheetData>` is
    /// read. Element names are matched without namespace prefix.
    pub fn parse(xml: &str) -> XmlResult<Self> {
        let mut reader = Reader::from_str(xml);

        let mut rows: Vec<Row> = Vec::new();
        let mut found = false;
        let mut in_sheet_data = false;
        let mut current_cell: Option<CellElement> = None;
        let mut value_text = String::new();
        let mut formula: Option<Formula> = None;
        let mut inline_text: Option<String> = None;
        let mut inline_start = 0;
        let mut inline_raw: Option<String> = None;
        let mut in_inline = false;
        let mut in_phonetic = false;
        let mut capture = Capture::None;

        loop {
            let event_start = reader.buffer_position();
            match reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"sheetData" => {
                        found = true;
                        in_sheet_data = true;
                    }
                    b"row" if in_sheet_data => rows.push(Self::parse_row(&e)?),
                    b"c" if in_sheet_data => {
                        current_cell = Some(Self::parse_cell(&e)?);
                        formula = None;
                        inline_text = None;
                        inline_raw = None;
                    }
                    b"v" if current_cell.is_some() => {
                        value_text.clear();
                        capture = Capture::Value;
                    }
                    b"f" if current_cell.is_some() => {
                        formula = Some(Formula {
                            attributes: Self::parse_attributes(&e)?,
                            text: String::new(),
                        });
                        capture = Capture::Formula;
                    }
                    b"is" if current_cell.is_some() => {
                        in_inline = true;
                        inline_start = event_start;
                        inline_text = Some(String::new());
                    }
                    b"rPh" if in_inline => in_phonetic = true,
                    b"t" if in_inline && !in_phonetic => capture = Capture::InlineText,
                    other if in_sheet_data && current_cell.is_none() => {
                        debug!(
                            "skipping <{}> in sheetData",
                            String::from_utf8_lossy(other)
                        );
                    }
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"sheetData" => {
                        found = true;
                        break;
                    }
                    b"row" if in_sheet_data => rows.push(Self::parse_row(&e)?),
                    b"c" if in_sheet_data => {
                        let cell = Self::parse_cell(&e)?;
                        Self::push_cell(&mut rows, cell)?;
                    }
                    b"v" => {
                        if let Some(cell) = current_cell.as_mut() {
                            cell.set_parsed_value(String::new());
                        }
                    }
                    b"f" if current_cell.is_some() => {
                        formula = Some(Formula {
                            attributes: Self::parse_attributes(&e)?,
                            text: String::new(),
                        });
                    }
                    b"is" if current_cell.is_some() => {
                        inline_text = Some(String::new());
                        inline_raw = Some(xml[event_start..reader.buffer_position()].to_string());
                    }
                    _ => {}
                },
                Event::Text(e) => {
                    if capture != Capture::None {
                        let text = e.unescape()?;
                        Self::append(
                            capture,
                            &text,
                            &mut value_text,
                            &mut formula,
                            &mut inline_text,
                        );
                    }
                }
                Event::CData(e) => {
                    if capture != Capture::None {
                        let text = std::str::from_utf8(&e)?;
                        Self::append(
                            capture,
                            text,
                            &mut value_text,
                            &mut formula,
                            &mut inline_text,
                        );
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"sheetData" => break,
                    b"v" if capture == Capture::Value => {
                        if let Some(cell) = current_cell.as_mut() {
                            cell.set_parsed_value(std::mem::take(&mut value_text));
                        }
                        capture = Capture::None;
                    }
                    b"f" | b"t" => capture = Capture::None,
                    b"rPh" => in_phonetic = false,
                    b"is" if in_inline => {
                        in_inline = false;
                        inline_raw = Some(xml[inline_start..reader.buffer_position()].to_string());
                    }
                    b"c" => {
                        if let Some(mut cell) = current_cell.take() {
                            if let Some(f) = formula.take() {
                                cell.set_parsed_formula(f);
                            }
                            if let (Some(text), Some(raw)) = (inline_text.take(), inline_raw.take())
                            {
                                if cell.has_value_node() {
                                    debug!("{}: <v> takes precedence over <is>", cell.reference());
                                } else {
                                    cell.set_parsed_inline(text, raw);
                                }
                            }
                            Self::push_cell(&mut rows, cell)?;
                        }
                    }
                    _ => {}
                },
                Event::Eof => {
                    if in_sheet_data {
                        return Err(XmlError::Parse("unterminated <sheetData>".into()));
                    }
                    break;
                }
                _ => {}
            }
        }

        if !found {
            return Err(XmlError::MissingElement("sheetData"));
        }
        Ok(Self { rows })
    }

    fn append(
        capture: Capture,
        text: &str,
        value_text: &mut String,
        formula: &mut Option<Formula>,
        inline_text: &mut Option<String>,
    ) {
        match capture {
            Capture::Value => value_text.push_str(text),
            Capture::Formula => {
                if let Some(f) = formula.as_mut() {
                    f.text.push_str(text);
                }
            }
            Capture::InlineText => {
                if let Some(t) = inline_text.as_mut() {
                    t.push_str(text);
                }
            }
            Capture::None => {}
        }
    }

    fn parse_attributes(e: &BytesStart<'_>) -> XmlResult<Vec<(String, String)>> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(attributes)
    }

    fn parse_row(e: &BytesStart<'_>) -> XmlResult<Row> {
        let mut row = Row::default();
        for (key, value) in Self::parse_attributes(e)? {
            if key == "r" {
                row.number = Some(value.parse().map_err(|_| {
                    XmlError::Parse(format!("invalid row number '{}'", value))
                })?);
            } else {
                row.attributes.push((key, value));
            }
        }
        if row.number.is_none() {
            warn!("<row> without r attribute");
        }
        Ok(row)
    }

    fn parse_cell(e: &BytesStart<'_>) -> XmlResult<CellElement> {
        let mut cell = CellElement::unchecked(String::new());
        for (key, value) in Self::parse_attributes(e)? {
            cell.set_parsed_attribute(&key, value);
        }
        if cell.reference().is_empty() {
            return Err(XmlError::Parse("<c> without r attribute".into()));
        }
        split_reference(cell.reference())?;
        Ok(cell)
    }

    fn push_cell(rows: &mut [Row], cell: CellElement) -> XmlResult<()> {
        let row = rows
            .last_mut()
            .ok_or_else(|| XmlError::Parse(format!("cell {} outside <row>", cell.reference())))?;
        row.cells.push(cell);
        Ok(())
    }

    /// Rows in document order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// All cells in document order
    pub fn cells(&self) -> impl Iterator<Item = &CellElement> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    /// Cells changed since parsing or the last [`clear_modified`](Self::clear_modified)
    pub fn modified_cells(&self) -> impl Iterator<Item = &CellElement> {
        self.cells().filter(|cell| cell.is_modified())
    }

    /// Reset every cell's dirty flag
    pub fn clear_modified(&mut self) {
        for cell in self.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            cell.clear_modified();
        }
    }

    /// Find a cell by its A1 reference. Case and `$` markers are ignored.
    pub fn cell(&self, reference: &str) -> Option<&CellElement> {
        let wanted = normalize_reference(reference).ok()?;
        self.cells().find(|cell| Self::refers_to(cell, &wanted))
    }

    /// Find a cell by its A1 reference, mutably
    pub fn cell_mut(&mut self, reference: &str) -> Option<&mut CellElement> {
        let wanted = normalize_reference(reference).ok()?;
        self.rows
            .iter_mut()
            .flat_map(|row| row.cells.iter_mut())
            .find(|cell| Self::refers_to(cell, &wanted))
    }

    fn refers_to(cell: &CellElement, wanted: &str) -> bool {
        normalize_reference(cell.reference()).map_or(false, |r| r == wanted)
    }

    /// Open the value of an existing cell
    pub fn cell_value(&mut self, reference: &str) -> XmlResult<CellValue<'_, CellElement>> {
        let cell = self
            .cell_mut(reference)
            .ok_or_else(|| XmlError::CellNotFound(reference.to_string()))?;
        Ok(CellValue::new(cell)?)
    }

    /// Get the cell at `reference`, creating it (and its row) in sorted
    /// position if it does not exist yet
    pub fn insert_cell(&mut self, reference: &str) -> XmlResult<&mut CellElement> {
        let (column, row_number) = split_reference(reference)?;
        let key = column_key(column);
        let normalized = normalize_reference(reference)?;

        let row_idx = match self
            .rows
            .iter()
            .position(|row| row.number.map_or(false, |n| n >= row_number))
        {
            Some(i) if self.rows[i].number == Some(row_number) => i,
            Some(i) => {
                self.rows.insert(i, Self::new_row(row_number));
                i
            }
            None => {
                self.rows.push(Self::new_row(row_number));
                self.rows.len() - 1
            }
        };

        let cells = &mut self.rows[row_idx].cells;
        let mut existing_at = None;
        let mut insert_at = cells.len();
        for (i, cell) in cells.iter().enumerate() {
            let (existing, _) = split_reference(cell.reference())?;
            let existing = column_key(existing);
            if existing == key {
                existing_at = Some(i);
                break;
            }
            if existing > key {
                insert_at = i;
                break;
            }
        }
        if let Some(i) = existing_at {
            return Ok(&mut cells[i]);
        }
        cells.insert(insert_at, CellElement::unchecked(normalized));
        Ok(&mut cells[insert_at])
    }

    fn new_row(number: u32) -> Row {
        Row {
            number: Some(number),
            ..Row::default()
        }
    }

    /// Serialize compactly
    pub fn to_xml(&self) -> XmlResult<String> {
        self.to_xml_with(&XmlWriteOptions::default())
    }

    /// Serialize with the given options
    pub fn to_xml_with(&self, options: &XmlWriteOptions) -> XmlResult<String> {
        let mut out = String::from("<sheetData");
        if self.rows.is_empty() && options.self_close_empty {
            out.push_str("/>");
            return Ok(out);
        }
        out.push('>');
        for row in &self.rows {
            row.write(&mut out, options);
        }
        options.newline(&mut out, 0);
        out.push_str("</sheetData>");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetcell_core::{CellError, CellNode, ValueKind};

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <dimension ref="A1:D2"/>
    <sheetData>
        <row r="1" spans="1:4">
            <c r="A1" s="1"><v>42</v></c>
            <c r="B1" t="b"><v>0</v></c>
            <c r="C1" t="inlineStr"><is><t>rich</t><rPh><t>x</t></rPh></is></c>
            <c r="D1" t="e"><v>#DIV/0!</v></c>
        </row>
        <row r="2">
            <c r="A2"><f>A1*2</f><v>84</v></c>
            <c r="B2" s="4"/>
        </row>
    </sheetData>
</worksheet>"#;

    #[test]
    fn test_parse_worksheet() {
        let sheet = SheetData::parse(SHEET).unwrap();
        assert_eq!(sheet.rows().len(), 2);
        assert_eq!(sheet.cells().count(), 6);
        assert_eq!(
            sheet.rows()[0].attributes,
            vec![("spans".to_string(), "1:4".to_string())]
        );

        let a1 = sheet.cell("A1").unwrap();
        assert_eq!(a1.value_text(), Some("42"));
        assert_eq!(a1.style_index(), Some(1));

        let c1 = sheet.cell("c1").unwrap();
        assert_eq!(c1.value_text(), Some("rich"));

        let a2 = sheet.cell("A2").unwrap();
        assert_eq!(a2.formula().unwrap().text, "A1*2");

        assert!(!sheet.cell("B2").unwrap().has_value_node());
        assert_eq!(sheet.modified_cells().count(), 0);
    }

    #[test]
    fn test_cell_values() {
        let mut sheet = SheetData::parse(SHEET).unwrap();
        assert_eq!(sheet.cell_value("A1").unwrap().integer().unwrap(), 42);
        assert!(!sheet.cell_value("B1").unwrap().boolean().unwrap());
        assert_eq!(sheet.cell_value("C1").unwrap().string().unwrap(), "rich");
        assert_eq!(
            sheet.cell_value("D1").unwrap().value(),
            &sheetcell_core::Value::Error(CellError::Div0)
        );
        assert_eq!(
            sheet.cell_value("B2").unwrap().value_type(),
            ValueKind::Empty
        );
        assert!(matches!(
            sheet.cell_value("Z9"),
            Err(XmlError::CellNotFound(_))
        ));
    }

    #[test]
    fn test_only_changed_cells_are_dirty() {
        let mut sheet = SheetData::parse(SHEET).unwrap();
        sheet.cell_value("B1").unwrap().set_boolean(true);
        sheet.cell_value("A2").unwrap().set_empty();

        let dirty: Vec<_> = sheet.modified_cells().map(|c| c.reference()).collect();
        assert_eq!(dirty, vec!["B1", "A2"]);

        let a2 = sheet.cell("A2").unwrap();
        assert_eq!(a2.to_xml(), r#"<c r="A2"><f>A1*2</f></c>"#);

        sheet.clear_modified();
        assert_eq!(sheet.modified_cells().count(), 0);
    }

    #[test]
    fn test_round_trip_minimal_diff() {
        let xml = r#"<sheetData><row r="1"><c r="A1" s="2"><v>1.5</v></c><c r="B1" t="b"><v>1</v></c></row></sheetData>"#;
        let mut sheet = SheetData::parse(xml).unwrap();
        assert_eq!(sheet.to_xml().unwrap(), xml);

        sheet.cell_value("B1").unwrap().set_float(2.25).unwrap();
        assert_eq!(
            sheet.to_xml().unwrap(),
            r#"<sheetData><row r="1"><c r="A1" s="2"><v>1.5</v></c><c r="B1"><v>2.25</v></c></row></sheetData>"#
        );
    }

    #[test]
    fn test_escaped_text() {
        let xml = r#"<sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>&lt;tag&gt; &amp; more</t></is></c></row></sheetData>"#;
        let mut sheet = SheetData::parse(xml).unwrap();
        assert_eq!(
            sheet.cell_value("A1").unwrap().string().unwrap(),
            "<tag> & more"
        );
        assert_eq!(sheet.to_xml().unwrap(), xml);
    }

    #[test]
    fn test_untouched_inline_string_kept_verbatim() {
        let xml = concat!(
            r#"<sheetData><row r="1">"#,
            r#"<c r="A1" t="inlineStr"><is><r><rPr><b/></rPr><t>ri</t></r><r><t>ch</t></r><rPh sb="0" eb="1"><t>x</t></rPh></is></c>"#,
            r#"<c r="B1" t="inlineStr"><is/></c>"#,
            r#"</row></sheetData>"#
        );
        let mut sheet = SheetData::parse(xml).unwrap();
        assert_eq!(sheet.cell_value("A1").unwrap().string().unwrap(), "rich");
        assert_eq!(sheet.cell_value("B1").unwrap().string().unwrap(), "");
        assert_eq!(sheet.modified_cells().count(), 0);
        assert_eq!(sheet.to_xml().unwrap(), xml);

        sheet.cell_value("A1").unwrap().set_string("plain");
        assert_eq!(
            sheet.cell("A1").unwrap().to_xml(),
            r#"<c r="A1" t="inlineStr"><is><t>plain</t></is></c>"#
        );
    }

    #[test]
    fn test_insert_cell_sorted() {
        let mut sheet = SheetData::parse(SHEET).unwrap();
        sheet
            .insert_cell("AA3")
            .unwrap()
            .value()
            .unwrap()
            .set_string("new");
        sheet.insert_cell("C3").unwrap();
        sheet.insert_cell("b2").unwrap();

        let row3: Vec<_> = sheet.rows()[2].cells.iter().map(|c| c.reference()).collect();
        assert_eq!(row3, vec!["C3", "AA3"]);
        assert_eq!(sheet.rows()[1].cells.len(), 2);
        assert_eq!(sheet.modified_cells().count(), 1);
        assert!(sheet.insert_cell("3C").is_err());
    }

    #[test]
    fn test_absolute_references_resolve() {
        let mut sheet = SheetData::new();
        sheet.insert_cell("$A$1").unwrap().value().unwrap().set_integer(9);

        assert_eq!(sheet.cell("$A$1").unwrap().reference(), "A1");
        assert!(sheet.cell("a$1").is_some());
        assert_eq!(sheet.cell_value("$A$1").unwrap().integer().unwrap(), 9);
        assert!(sheet.cell("not a ref").is_none());
        assert!(matches!(
            sheet.cell_value("$B$1"),
            Err(XmlError::CellNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_value_is_reported() {
        let xml = r#"<sheetData><row r="1"><c r="A1"><v>abc</v></c></row></sheetData>"#;
        let mut sheet = SheetData::parse(xml).unwrap();
        assert!(matches!(
            sheet.cell_value("A1"),
            Err(XmlError::Core(sheetcell_core::Error::MalformedValue { .. }))
        ));
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            SheetData::parse("<worksheet/>"),
            Err(XmlError::MissingElement("sheetData"))
        ));
        assert!(SheetData::parse("<sheetData><c r=\"A1\"/></sheetData>").is_err());
        assert!(SheetData::parse("<sheetData><row r=\"1\"><c/></row></sheetData>").is_err());
        assert_eq!(
            SheetData::parse("<sheetData/>").unwrap().to_xml().unwrap(),
            "<sheetData/>"
        );
    }

    #[test]
    fn test_pretty_output() {
        let mut sheet = SheetData::new();
        sheet.insert_cell("A1").unwrap().value().unwrap().set_integer(1);
        let xml = sheet.to_xml_with(&XmlWriteOptions::pretty()).unwrap();
        assert_eq!(
            xml,
            "<sheetData>\n  <row r=\"1\">\n    <c r=\"A1\"><v>1</v></c>\n  </row>\n</sheetData>"
        );
    }
}
