//! Package container decoder.
//!
//! HWPX documents are ZIP archives of XML parts. Body text lives in
//! `Contents/section<N>.xml`; document properties in the
//! `Contents/content.hpf` manifest; the format version in `version.xml`.
//! This decoder walks the section XML with an event reader, so control
//! elements (tables, nested text areas) land at the exact run position they
//! occupy in their paragraph.
//!
//! Embedded assets live under the reserved `BinData/` archive directory.
//! They are intentionally NOT surfaced here: the extraction adapter
//! re-reads the archive for them, and that difference stays behind the
//! adapter boundary.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::detect::ZIP_MAGIC;
use crate::error::{Error, Result};
use crate::model::{Control, Document, Metadata, Paragraph, Section, Table, TableCell, TableRow};

/// Decode an HWPX file into a document tree.
pub fn decode_file(path: &Path) -> Result<Document> {
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Decode an HWPX package from any seekable reader.
pub fn decode<R: Read + Seek>(mut reader: R) -> Result<Document> {
    reader.seek(SeekFrom::Start(0))?;
    let mut magic = [0u8; 4];
    if reader.read_exact(&mut magic).is_err() || magic != ZIP_MAGIC {
        return Err(Error::Decode("not a ZIP package (bad magic)".to_string()));
    }
    reader.seek(SeekFrom::Start(0))?;

    let mut archive = zip::ZipArchive::new(reader)
        .map_err(|e| Error::Decode(format!("invalid package archive: {}", e)))?;

    let mut section_names: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let idx = name
                .strip_prefix("Contents/section")?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((idx, name.to_string()))
        })
        .collect();
    section_names.sort_by_key(|(idx, _)| *idx);

    if section_names.is_empty() {
        return Err(Error::Decode(
            "package has no Contents/section<N>.xml entries".to_string(),
        ));
    }

    let mut doc = Document::new();

    if let Ok(mut entry) = archive.by_name("Contents/content.hpf") {
        let mut xml = String::new();
        if entry.read_to_string(&mut xml).is_ok() {
            parse_manifest(&xml, &mut doc.metadata);
        }
    } else {
        log::debug!("package manifest missing; properties left unset");
    }

    if let Ok(mut entry) = archive.by_name("version.xml") {
        let mut xml = String::new();
        if entry.read_to_string(&mut xml).is_ok() {
            doc.metadata.format_version = parse_version(&xml);
        }
    }

    for (index, (_, name)) in section_names.iter().enumerate() {
        let mut entry = archive
            .by_name(name)
            .map_err(|e| Error::Decode(format!("cannot open entry '{}': {}", name, e)))?;
        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| Error::Decode(format!("entry '{}' is not readable text: {}", name, e)))?;
        doc.add_section(parse_section(&xml, index)?);
    }

    log::debug!(
        "decoded HWPX document: {} section(s), {} paragraph(s)",
        doc.sections.len(),
        doc.paragraph_count()
    );
    Ok(doc)
}

/// Where paragraphs closed at the current nesting depth are routed.
enum Sink {
    /// Top-level body paragraphs
    Section(Vec<Paragraph>),
    /// Paragraphs of an open table cell
    Cell(Vec<Paragraph>),
    /// Paragraphs of a nested text area (text box, caption, ...)
    Object(Vec<Paragraph>),
}

impl Sink {
    fn paragraphs_mut(&mut self) -> &mut Vec<Paragraph> {
        match self {
            Sink::Section(p) | Sink::Cell(p) | Sink::Object(p) => p,
        }
    }
}

fn parse_section(xml: &str, index: usize) -> Result<Section> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut elem_stack: Vec<Vec<u8>> = Vec::new();
    let mut sinks: Vec<Sink> = vec![Sink::Section(Vec::new())];
    let mut para_stack: Vec<Paragraph> = Vec::new();
    let mut table_stack: Vec<Table> = Vec::new();
    let mut row_stack: Vec<TableRow> = Vec::new();
    let mut text_depth = 0usize;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                match name.as_slice() {
                    b"p" => para_stack.push(Paragraph::new()),
                    b"t" => text_depth += 1,
                    b"tbl" => table_stack.push(Table::new()),
                    b"tr" => row_stack.push(TableRow::new()),
                    b"subList" => {
                        // The sink kind depends on what opened the sub-list:
                        // a table cell collects cell paragraphs, anything
                        // else is a nested text object.
                        if elem_stack.last().map(|n| n.as_slice()) == Some(b"tc".as_slice()) {
                            sinks.push(Sink::Cell(Vec::new()));
                        } else {
                            sinks.push(Sink::Object(Vec::new()));
                        }
                    }
                    _ => {}
                }
                elem_stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"lineBreak" {
                    if let Some(p) = para_stack.last_mut() {
                        p.push_text("\n");
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if text_depth > 0 {
                    if let (Ok(text), Some(p)) = (e.unescape(), para_stack.last_mut()) {
                        p.push_text(text.into_owned());
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name().as_ref().to_vec();
                elem_stack.pop();
                match name.as_slice() {
                    b"p" => {
                        if let Some(p) = para_stack.pop() {
                            if let Some(sink) = sinks.last_mut() {
                                sink.paragraphs_mut().push(p);
                            }
                        }
                    }
                    b"t" => text_depth = text_depth.saturating_sub(1),
                    b"subList" => {
                        match sinks.pop() {
                            Some(Sink::Cell(paragraphs)) => {
                                // Attached when the enclosing <tc> closes.
                                sinks.push(Sink::Cell(paragraphs));
                            }
                            Some(Sink::Object(paragraphs)) => {
                                if let Some(p) = para_stack.last_mut() {
                                    p.push_control(Control::Object(paragraphs));
                                } else if let Some(sink) = sinks.last_mut() {
                                    sink.paragraphs_mut().extend(paragraphs);
                                }
                            }
                            Some(sink) => sinks.push(sink),
                            None => {}
                        }
                    }
                    b"tc" => {
                        let mut cell = TableCell::new();
                        // Pop the cell sink pushed by this cell's sub-list.
                        if matches!(sinks.last(), Some(Sink::Cell(_))) {
                            if let Some(Sink::Cell(paragraphs)) = sinks.pop() {
                                cell.paragraphs = paragraphs;
                            }
                        }
                        if let Some(row) = row_stack.last_mut() {
                            row.add_cell(cell);
                        }
                    }
                    b"tr" => {
                        if let (Some(row), Some(table)) = (row_stack.pop(), table_stack.last_mut())
                        {
                            table.add_row(row);
                        }
                    }
                    b"tbl" => {
                        if let Some(table) = table_stack.pop() {
                            if let Some(p) = para_stack.last_mut() {
                                p.push_control(Control::Table(table));
                            } else if let Some(sink) = sinks.last_mut() {
                                let mut p = Paragraph::new();
                                p.push_control(Control::Table(table));
                                sink.paragraphs_mut().push(p);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::Decode(format!(
                    "section {} XML error at position {}: {}",
                    index,
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    let mut section = Section::new(index);
    if let Some(Sink::Section(paragraphs)) = sinks.into_iter().next() {
        section.paragraphs = paragraphs;
    }
    Ok(section)
}

/// Pull document properties out of the package manifest. Best-effort: any
/// recognized element fills its field, everything else is ignored.
fn parse_manifest(xml: &str, metadata: &mut Metadata) {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut current: Option<&'static str> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                current = match e.local_name().as_ref() {
                    b"title" => Some("title"),
                    b"creator" | b"author" => Some("author"),
                    b"subject" | b"description" => Some("subject"),
                    b"keyword" | b"keywords" => Some("keywords"),
                    b"date" | b"modified" => Some("date"),
                    _ => None,
                };
            }
            Ok(Event::Text(e)) => {
                if let (Some(field), Ok(text)) = (current, e.unescape()) {
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    match field {
                        "title" => metadata.title = Some(text.to_string()),
                        "author" => metadata.author = Some(text.to_string()),
                        "subject" => metadata.subject = Some(text.to_string()),
                        "keywords" => metadata.keywords = Some(text.to_string()),
                        "date" => metadata.modified = parse_date(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                log::debug!("manifest XML error: {}; keeping properties read so far", e);
                break;
            }
        }
        buf.clear();
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Read the dotted format version from `version.xml` root attributes.
fn parse_version(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let mut parts = [None, None, None, None];
                for attr in e.attributes().flatten() {
                    let slot = match attr.key.as_ref() {
                        b"major" => 0,
                        b"minor" => 1,
                        b"micro" => 2,
                        b"buildNumber" => 3,
                        _ => continue,
                    };
                    if let Ok(value) = attr.unescape_value() {
                        parts[slot] = Some(value.into_owned());
                    }
                }
                let known: Vec<String> = parts.into_iter().flatten().collect();
                return if known.is_empty() {
                    None
                } else {
                    Some(known.join("."))
                };
            }
            Ok(Event::Eof) => return None,
            Ok(_) => {}
            Err(_) => return None,
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn build_package(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap()
    }

    const SECTION_SIMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hs:sec xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph">
  <hp:p><hp:run><hp:t>first paragraph</hp:t></hp:run></hp:p>
  <hp:p><hp:run><hp:t>second paragraph</hp:t></hp:run></hp:p>
</hs:sec>"#;

    #[test]
    fn test_decode_simple_sections() {
        let cursor = build_package(&[("Contents/section0.xml", SECTION_SIMPLE)]);
        let doc = decode(cursor).unwrap();
        assert_eq!(doc.plain_text(), "first paragraph\nsecond paragraph");
    }

    #[test]
    fn test_decode_rejects_non_zip() {
        let result = decode(Cursor::new(b"\xD0\xCF\x11\xE0 not a zip".to_vec()));
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_requires_sections() {
        let cursor = build_package(&[("mimetype", "application/hwp+zip")]);
        let result = decode(cursor);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_table_text_at_run_position() {
        let xml = r#"<hs:sec xmlns:hs="s" xmlns:hp="p">
  <hp:p><hp:run><hp:t>before </hp:t>
    <hp:tbl rowCnt="1" colCnt="2">
      <hp:tr>
        <hp:tc><hp:subList><hp:p><hp:run><hp:t>c1</hp:t></hp:run></hp:p></hp:subList></hp:tc>
        <hp:tc><hp:subList><hp:p><hp:run><hp:t>c2</hp:t></hp:run></hp:p></hp:subList></hp:tc>
      </hp:tr>
    </hp:tbl>
    <hp:t> after</hp:t></hp:run></hp:p>
</hs:sec>"#;
        let cursor = build_package(&[("Contents/section0.xml", xml)]);
        let doc = decode(cursor).unwrap();
        assert_eq!(doc.plain_text(), "before c1\tc2 after");
    }

    #[test]
    fn test_nested_text_object() {
        let xml = r#"<hs:sec xmlns:hs="s" xmlns:hp="p">
  <hp:p><hp:run><hp:t>x</hp:t>
    <hp:rect><hp:subList><hp:p><hp:run><hp:t>boxed</hp:t></hp:run></hp:p></hp:subList></hp:rect>
    <hp:t>y</hp:t></hp:run></hp:p>
</hs:sec>"#;
        let cursor = build_package(&[("Contents/section0.xml", xml)]);
        let doc = decode(cursor).unwrap();
        assert_eq!(doc.plain_text(), "xboxedy");
    }

    #[test]
    fn test_sections_ordered_by_index() {
        let s0 = r#"<hs:sec xmlns:hp="p"><hp:p><hp:run><hp:t>zero</hp:t></hp:run></hp:p></hs:sec>"#;
        let s1 = r#"<hs:sec xmlns:hp="p"><hp:p><hp:run><hp:t>one</hp:t></hp:run></hp:p></hs:sec>"#;
        // Entry order in the archive is deliberately reversed.
        let cursor = build_package(&[
            ("Contents/section1.xml", s1),
            ("Contents/section0.xml", s0),
        ]);
        let doc = decode(cursor).unwrap();
        assert_eq!(doc.plain_text(), "zero\none");
    }

    #[test]
    fn test_manifest_metadata() {
        let manifest = r#"<opf:package xmlns:opf="o">
  <opf:metadata>
    <opf:title>제목</opf:title>
    <opf:creator>An Author</opf:creator>
  </opf:metadata>
</opf:package>"#;
        let cursor = build_package(&[
            ("Contents/content.hpf", manifest),
            ("Contents/section0.xml", SECTION_SIMPLE),
        ]);
        let doc = decode(cursor).unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("제목"));
        assert_eq!(doc.metadata.author.as_deref(), Some("An Author"));
        assert!(doc.metadata.subject.is_none());
    }

    #[test]
    fn test_version_entry() {
        let version = r#"<hv:HCFVersion xmlns:hv="v" major="5" minor="0" micro="5" buildNumber="0"/>"#;
        let cursor = build_package(&[
            ("version.xml", version),
            ("Contents/section0.xml", SECTION_SIMPLE),
        ]);
        let doc = decode(cursor).unwrap();
        assert_eq!(doc.metadata.format_version.as_deref(), Some("5.0.5.0"));
    }

    #[test]
    fn test_line_break_element() {
        let xml = r#"<hs:sec xmlns:hp="p"><hp:p><hp:run><hp:t>a</hp:t><hp:lineBreak/><hp:t>b</hp:t></hp:run></hp:p></hs:sec>"#;
        let cursor = build_package(&[("Contents/section0.xml", xml)]);
        let doc = decode(cursor).unwrap();
        assert_eq!(doc.plain_text(), "a\nb");
    }
}
