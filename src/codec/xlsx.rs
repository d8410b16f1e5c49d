//! XLSX decoding and encoding.
//!
//! Decoding parses the first worksheet of an Office Open XML workbook:
//! workbook relationships, shared strings, cell styles (so date-formatted
//! serial numbers render as ISO strings) and the worksheet cell stream.
//! Encoding produces a minimal single-worksheet workbook with inline strings.

use crate::error::SweeperError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::table::Table;
use crate::table::Value;
use chrono::Duration;
use chrono::NaiveDate;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufRead;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;

// XML tag names for parsing the XLSX format
const TAG_RELATIONSHIP: &[u8] = b"Relationship";          // Package relationship
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts");      // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");        // Individual custom number format
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");      // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");             // Individual cell format index
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");       // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");           // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                      // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_SHEET: QName = QName(b"sheet");                 // Worksheet definition
const TAG_ROW: QName = QName(b"row");                     // Row in worksheet
const TAG_CELL: QName = QName(b"c");                      // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");            // Inline string value
const TAG_VALUE: QName = QName(b"v");                     // Cell value content

/// Errors specific to XLSX workbook structure.
#[derive(Error, Debug)]
pub enum XlsxError {
    #[error("Missing '{0}' in workbook archive")]
    MissingPart(String),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("Missing shared string {0}")]
    MissingSharedString(usize),

    #[error("Date serial number {0} out of range")]
    DateOutOfRange(String),
}

/// Types of cell data in a worksheet, derived from the cell's `t` attribute
/// and its number format.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum CellKind {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Plain numeric values
    Number,
    /// Date/time values stored as serial numbers
    NumberDateTime,
    /// Date values stored as serial numbers
    NumberDate,
    /// Time values stored as serial numbers
    NumberTime,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as #DIV/0!
    Error,
}

impl CellKind {
    /// Maps built-in Excel number format IDs to date/time kinds.
    fn parse_builtin_number_format_id(id: &str) -> Option<CellKind> {
        match id {
            "22" => Some(CellKind::NumberDateTime),
            "14" | "15" | "16" | "17" => Some(CellKind::NumberDate),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(CellKind::NumberTime),
            _ => None,
        }
    }

    /// Analyzes a custom number format string for date/time patterns.
    fn parse_custom_number_format(format: &str) -> CellKind {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_escaped => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_literal && !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_color && !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        if is_date && is_time {
            CellKind::NumberDateTime
        } else if is_date {
            CellKind::NumberDate
        } else if is_time {
            CellKind::NumberTime
        } else {
            CellKind::Number
        }
    }
}

/// A cell as it appears in the worksheet XML, before value resolution.
#[derive(Debug)]
struct RawCell {
    row: usize,
    col: usize,
    kind: CellKind,
    value: String,
}

/// Decodes XLSX bytes into a table from the first worksheet.
/// The first populated row is the header row defining column names.
pub(crate) fn decode(content: &[u8]) -> Result<Table, SweeperError> {
    let mut zip = ZipArchive::new(Cursor::new(content))?;
    let (sheets, is_1904) = load_workbook(&mut zip)?;
    let (_, zip_path) = sheets.first().ok_or(XlsxError::NoWorksheet)?;
    let formats = load_number_formats(&mut zip)?;
    let shared_strings = load_shared_strings(&mut zip)?;
    let cells = read_worksheet(&mut zip, zip_path, &formats)?;
    build_table(cells, &shared_strings, is_1904)
}

/// Loads workbook structure: worksheet (name, zip path) pairs in workbook
/// order plus the date system (1900 vs 1904).
fn load_workbook<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<(Vec<(String, String)>, bool), SweeperError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| XlsxError::MissingPart("xl/workbook.xml".to_owned()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.unescape_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.unescape_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id.to_string()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads worksheet relationships, mapping relationship IDs to zip paths.
fn load_relationships<RS: Read + Seek>(zip: &mut ZipArchive<RS>, path: &str) -> Result<HashMap<String, String>, SweeperError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| XlsxError::MissingPart(path.to_owned()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheet relationships matter here
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target into a path inside the zip archive.
fn to_zip_path(path: Cow<'_, str>) -> String {
    if path.starts_with("/xl/") {
        path[1..].to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Loads cell style indexes from styles.xml, mapping each style to the
/// cell kind implied by its number format.
fn load_number_formats<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Vec<CellKind>, SweeperError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut has_custom_formats = false;
    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellKind>::new();

    let mut has_format_indexes = false;
    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if !custom_formats_context && event.name() == TAG_CUSTOM_FORMATS => {
            has_custom_formats = true;
            custom_formats_context = true;
        }
        Event::End(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMATS => {
            custom_formats_context = false;
            if has_custom_formats && has_format_indexes {
                break;
            }
        }
        Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                let kind = CellKind::parse_custom_number_format(&format);
                custom_formats.insert(id.to_string(), kind);
            }
        }

        Event::Start(event) if !format_indexes_context && event.name() == TAG_FORMAT_INDEXES => {
            has_format_indexes = true;
            format_indexes_context = true;
        }
        Event::End(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEXES => {
            format_indexes_context = false;
            if has_custom_formats && has_format_indexes {
                break;
            }
        }
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            if let Some(id) = event.get_attribute_value("numFmtId")? {
                format_indexes.push(id.to_string());
            }
        }
    });

    let formats = format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellKind::parse_builtin_number_format_id(id))
                .unwrap_or(CellKind::Number)
        })
        .collect();
    Ok(formats)
}

/// Loads the shared string table, if present.
fn load_shared_strings<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Vec<String>, SweeperError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
            shared_strings.push(string);
        }
    });
    Ok(shared_strings)
}

/// Reads all populated cells of one worksheet in document order.
fn read_worksheet<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    zip_path: &str,
    formats: &[CellKind],
) -> Result<Vec<RawCell>, SweeperError> {
    let mut reader = zip.xml_reader(zip_path)?
        .ok_or_else(|| XlsxError::MissingPart(zip_path.to_owned()))?;
    let mut cells = Vec::<RawCell>::new();
    let mut row_count = 0usize;
    let mut col_count = 0usize;
    let mut row = 0usize;
    let mut col = 0usize;
    let mut kind = CellKind::default();
    let mut value = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == TAG_ROW => {
            row_count += 1;
            col_count = 0;
        }
        Event::Start(event) if event.name() == TAG_CELL => {
            (row, col) = event.get_attribute_value("r")?
                .and_then(|reference| reference_to_index(&reference))
                .unwrap_or((row_count, col_count));
            col_count += 1;
            kind = event.get_attribute_value("t")?.map(|t| {
                match t.as_ref() {
                    "inlineStr" | "str" => CellKind::InlineString,
                    "s" => CellKind::SharedString,
                    "d" => CellKind::IsoDateTime,
                    "b" => CellKind::Boolean,
                    "e" => CellKind::Error,
                    _ => CellKind::Number,
                }
            }).unwrap_or(CellKind::Number);
            if kind == CellKind::Number {
                if let Some(index) = event.parse_attribute_value::<usize>("s")? {
                    kind = formats.get(index).copied().unwrap_or(CellKind::Number);
                }
            }
            value.clear();
        }
        Event::Start(event) if kind != CellKind::Empty && event.name() == TAG_INLINE_STRING => {
            value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
        }
        Event::Start(event) if kind != CellKind::Empty && event.name() == TAG_VALUE => {
            value = read_string_value(&mut reader, TAG_VALUE, true)?;
        }
        Event::End(event) if kind != CellKind::Empty && !value.is_empty() && event.name() == TAG_CELL => {
            cells.push(RawCell {
                row,
                col,
                kind,
                value: value.to_owned(),
            });
            value.clear();
        }
    });
    Ok(cells)
}

/// Reads string content from XML, skipping phonetic annotations and handling
/// text nodes, CDATA sections and entity references.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, SweeperError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

/// Builds the table from raw cells: the first populated row is the header,
/// later rows become data rows with gaps filled as missing values.
fn build_table(mut cells: Vec<RawCell>, shared_strings: &[String], is_1904: bool) -> Result<Table, SweeperError> {
    if cells.is_empty() {
        return Ok(Table::new(Vec::new()));
    }
    cells.sort_by_key(|cell| (cell.row, cell.col));
    let col_lower = cells.iter().map(|cell| cell.col).min().unwrap_or(0);
    let col_upper = cells.iter().map(|cell| cell.col).max().unwrap_or(0);
    let width = col_upper - col_lower + 1;
    let header_row = cells[0].row;
    let last_row = cells[cells.len() - 1].row;

    let mut columns = vec![String::new(); width];
    let mut index = 0usize;
    while index < cells.len() && cells[index].row == header_row {
        let cell = &cells[index];
        columns[cell.col - col_lower] = cell_value(cell, shared_strings, is_1904)?.to_string();
        index += 1;
    }
    for (position, name) in columns.iter_mut().enumerate() {
        if name.trim().is_empty() {
            *name = format!("column_{}", position + 1);
        }
    }

    let mut table = Table::new(columns);
    for row_number in (header_row + 1)..=last_row {
        let mut row = vec![Value::Missing; width];
        while index < cells.len() && cells[index].row == row_number {
            let cell = &cells[index];
            row[cell.col - col_lower] = cell_value(cell, shared_strings, is_1904)?;
            index += 1;
        }
        table.push_row(row)?;
    }
    Ok(table)
}

/// Resolves a raw cell into a typed value.
fn cell_value(cell: &RawCell, shared_strings: &[String], is_1904: bool) -> Result<Value, SweeperError> {
    match cell.kind {
        CellKind::Empty => Ok(Value::Missing),
        CellKind::Boolean => Ok(Value::Boolean(cell.value == "1")),
        CellKind::Number => Ok(Value::Number(cell.value.parse::<f64>()?)),
        CellKind::NumberDate => Ok(Value::Text(to_date_string(&cell.value, is_1904)?)),
        CellKind::NumberTime => Ok(Value::Text(to_time_string(&cell.value)?)),
        CellKind::NumberDateTime => Ok(Value::Text(to_datetime_string(&cell.value, is_1904)?)),
        CellKind::IsoDateTime => Ok(Value::Text(cell.value.replace('T', " "))),
        // Error cells keep their literal marker such as #DIV/0!
        CellKind::InlineString | CellKind::Error => Ok(text_value(&cell.value)),
        CellKind::SharedString => {
            let index = cell.value.parse::<usize>()?;
            let text = shared_strings
                .get(index)
                .ok_or(XlsxError::MissingSharedString(index))?;
            Ok(text_value(text))
        }
    }
}

fn text_value(text: &str) -> Value {
    if text.is_empty() {
        Value::Missing
    } else {
        Value::Text(text.to_owned())
    }
}

/// Converts an Excel serial date to an ISO date string.
/// Handles the Lotus 1-2-3 leap year bug for the 1900 epoch.
/// Serial numbers beyond the representable date range fail the decode
/// instead of aborting it.
fn to_date_string(value: &str, is_1904: bool) -> Result<String, SweeperError> {
    let days = value.parse::<f64>()?.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let base = NaiveDate::from_ymd_opt(1899, 12, 30).expect("NaiveDate Literal");
    let date = days
        .checked_add(offset)
        .and_then(Duration::try_days)
        .and_then(|duration| base.checked_add_signed(duration))
        .ok_or_else(|| XlsxError::DateOutOfRange(value.to_owned()))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Converts an Excel serial time fraction to an ISO time string.
fn to_time_string(value: &str) -> Result<String, SweeperError> {
    let factor = value.parse::<f64>()?;
    let mut hours = (factor.fract() * 86_400_000f64).round() as i64;
    let milliseconds = hours % 1_000; hours /= 1_000;
    let seconds = hours % 60; hours /= 60;
    let minutes = hours % 60; hours /= 60;
    let timestamp = if milliseconds > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    };
    Ok(timestamp)
}

/// Converts an Excel serial datetime to an ISO datetime string.
fn to_datetime_string(value: &str, is_1904: bool) -> Result<String, SweeperError> {
    if let Some(index) = value.find('.') {
        let date = to_date_string(&value[..index], is_1904)?;
        let time = to_time_string(&value[index..])?;
        Ok(format!("{date} {time}"))
    } else {
        let date = to_date_string(value, is_1904)?;
        Ok(format!("{date} 00:00:00"))
    }
}

/// Converts 0-based row and column indexes to an Excel-style reference ("B2").
fn index_to_reference(row: usize, col: usize) -> String {
    let row = (row + 1).to_string();
    let mut column = col as u32 + 1;
    let mut reference = String::new();
    while column > 0 {
        column -= 1;
        let digit = char::from_u32(65 + column % 26).expect("Hardcoded letters");
        column /= 26;
        reference.insert(0, digit);
    }
    reference.push_str(&row);
    reference
}

/// Parses an Excel-style reference ("B2") into 0-based row and column indexes.
fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|character: char| character.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }
    let mut col = 0usize;
    for character in letters.chars() {
        let character = character.to_ascii_uppercase();
        if !character.is_ascii_uppercase() {
            return None;
        }
        col = col * 26 + (character as usize - 'A' as usize + 1);
    }
    let row = digits.parse::<usize>().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

/// Encodes a table as a minimal single-worksheet workbook.
/// Text cells are written as inline strings, so no shared string table is needed.
pub(crate) fn encode(table: &Table) -> Result<Vec<u8>, SweeperError> {
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_owned()),
        ("_rels/.rels", PACKAGE_RELATIONSHIPS.to_owned()),
        ("xl/workbook.xml", WORKBOOK.to_owned()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELATIONSHIPS.to_owned()),
        ("xl/styles.xml", STYLES.to_owned()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(table)),
    ];
    for (path, content) in parts {
        archive.start_file(path, options)?;
        archive.write_all(content.as_bytes())?;
    }
    let cursor = archive.finish()?;
    Ok(cursor.into_inner())
}

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELATIONSHIPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

const WORKBOOK: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    r#"<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>"#,
    r#"</workbook>"#,
);

const WORKBOOK_RELATIONSHIPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#,
);

const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="1"><font/></fonts>"#,
    r#"<fills count="1"><fill/></fills>"#,
    r#"<borders count="1"><border/></borders>"#,
    r#"<cellStyleXfs count="1"><xf/></cellStyleXfs>"#,
    r#"<cellXfs count="1"><xf/></cellXfs>"#,
    r#"</styleSheet>"#,
);

/// Serializes the worksheet part: header row first, then data rows.
/// Missing values emit no cell at all.
fn worksheet_xml(table: &Table) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#);
    xml.push_str("<sheetData>");
    if table.column_count() > 0 {
        xml.push_str(r#"<row r="1">"#);
        for (col, name) in table.columns().iter().enumerate() {
            push_inline_string_cell(&mut xml, 0, col, name);
        }
        xml.push_str("</row>");
        for (index, row) in table.rows().iter().enumerate() {
            let row_number = index + 1;
            xml.push_str(&format!(r#"<row r="{}">"#, row_number + 1));
            for (col, value) in row.iter().enumerate() {
                match value {
                    Value::Missing => (),
                    Value::Number(number) => {
                        xml.push_str(&format!(
                            r#"<c r="{}"><v>{}</v></c>"#,
                            index_to_reference(row_number, col),
                            number,
                        ));
                    }
                    Value::Boolean(boolean) => {
                        xml.push_str(&format!(
                            r#"<c r="{}" t="b"><v>{}</v></c>"#,
                            index_to_reference(row_number, col),
                            if *boolean { 1 } else { 0 },
                        ));
                    }
                    Value::Text(text) => push_inline_string_cell(&mut xml, row_number, col, text),
                }
            }
            xml.push_str("</row>");
        }
    }
    xml.push_str("</sheetData>");
    xml.push_str("</worksheet>");
    xml
}

fn push_inline_string_cell(xml: &mut String, row: usize, col: usize, text: &str) {
    xml.push_str(&format!(
        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
        index_to_reference(row, col),
        escape(text),
    ));
}
