//! Legacy binary container decoder.
//!
//! HWP documents are CFB compound files. The `FileHeader` stream declares
//! the format version and attribute flags; body text lives in
//! `BodyText/Section<N>` record streams (raw-deflate compressed when the
//! compressed flag is set); embedded assets live as streams under the
//! `BinData` storage; document properties live in the
//! `\x05HwpSummaryInformation` property set.
//!
//! Paragraph text is UTF-16LE with inline control characters. Codes below
//! 32 are structural: "char" controls occupy one code unit, "inline" and
//! "extended" controls occupy eight. Extended code 11 anchors a table or
//! drawing object at that exact text position; the matching control header
//! records follow the paragraph header, in anchor order.

use std::collections::VecDeque;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::DeflateDecoder;

use super::record::{
    self, RecordNode, TAG_CTRL_HEADER, TAG_LIST_HEADER, TAG_PARA_HEADER, TAG_PARA_TEXT, TAG_TABLE,
};
use super::summary;
use super::{read_u16_le, read_u32_le};
use crate::detect::CFB_MAGIC;
use crate::error::{Error, Result};
use crate::model::{
    Control, Document, EmbeddedResource, Paragraph, Section, Table, TableCell, TableRow,
};

const SIGNATURE: &[u8] = b"HWP Document File";

const FLAG_COMPRESSED: u32 = 1;
const FLAG_PASSWORD: u32 = 1 << 1;
const FLAG_DISTRIBUTION: u32 = 1 << 2;

const CTRL_TABLE: u32 = u32::from_be_bytes(*b"tbl ");
const CTRL_SHAPE: u32 = u32::from_be_bytes(*b"gso ");

/// Decode an HWP file into a document tree.
pub fn decode_file(path: &Path, password: Option<&str>) -> Result<Document> {
    let file = std::fs::File::open(path)?;
    decode(file, password)
}

/// Decode an HWP container from any seekable reader.
pub fn decode<R: Read + Seek>(mut reader: R, password: Option<&str>) -> Result<Document> {
    reader.seek(SeekFrom::Start(0))?;
    let mut magic = [0u8; 8];
    if reader.read_exact(&mut magic).is_err() || magic != CFB_MAGIC {
        return Err(Error::Decode(
            "not a compound-file container (bad magic)".to_string(),
        ));
    }
    reader.seek(SeekFrom::Start(0))?;

    let mut comp = cfb::CompoundFile::open(reader)
        .map_err(|e| Error::Decode(format!("invalid compound file: {}", e)))?;

    let header = read_stream(&mut comp, "/FileHeader")?;
    if header.len() < 40 || !header.starts_with(SIGNATURE) {
        return Err(Error::Decode("missing document header signature".to_string()));
    }

    let flags = read_u32_le(&header, 36).unwrap_or(0);
    if flags & FLAG_PASSWORD != 0 {
        return Err(Error::Decode(match password {
            Some(_) => "password could not be validated: encrypted documents are not supported"
                .to_string(),
            None => "document is password-encrypted (no password supplied)".to_string(),
        }));
    }
    if flags & FLAG_DISTRIBUTION != 0 {
        return Err(Error::Decode(
            "distribution (view-only) documents are not supported".to_string(),
        ));
    }
    let compressed = flags & FLAG_COMPRESSED != 0;

    let mut doc = Document::new();
    doc.metadata.format_version = read_u32_le(&header, 32).map(format_version);

    // Best-effort properties; absence never fails the decode.
    match read_stream(&mut comp, "/\u{5}HwpSummaryInformation") {
        Ok(data) => summary::apply(&data, &mut doc.metadata),
        Err(e) => log::debug!("summary stream unavailable: {}", e),
    }

    // Collect entry paths up front: walking borrows the compound file and
    // stream reads need it mutably.
    let mut section_paths: Vec<(u32, PathBuf)> = Vec::new();
    let mut bin_paths: Vec<(String, PathBuf)> = Vec::new();
    for entry in comp.walk() {
        if !entry.is_stream() {
            continue;
        }
        if entry.path().starts_with("/BodyText") {
            if let Some(idx) = entry
                .name()
                .strip_prefix("Section")
                .and_then(|n| n.parse::<u32>().ok())
            {
                section_paths.push((idx, entry.path().to_path_buf()));
            }
        } else if entry.path().starts_with("/BinData") {
            bin_paths.push((entry.name().to_string(), entry.path().to_path_buf()));
        }
    }
    section_paths.sort_by_key(|(idx, _)| *idx);
    bin_paths.sort_by(|(a, _), (b, _)| a.cmp(b));

    if section_paths.is_empty() {
        return Err(Error::Decode("no body sections found".to_string()));
    }

    for (index, (_, path)) in section_paths.iter().enumerate() {
        let raw = read_stream_path(&mut comp, path)?;
        let data = if compressed {
            inflate_raw(&raw).map_err(|e| {
                Error::Decode(format!("section {} failed to inflate: {}", index, e))
            })?
        } else {
            raw
        };

        let tree = record::build_tree(record::parse_records(&data));
        doc.add_section(section_from_tree(index, &tree));
    }

    for (name, path) in bin_paths {
        let raw = match read_stream_path(&mut comp, &path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("skipping unreadable embedded stream '{}': {}", name, e);
                continue;
            }
        };
        // Per-item compression is declared elsewhere in the container; when
        // the document is compressed, try inflation and keep the stored
        // bytes if it is not a deflate stream.
        let data = if compressed {
            inflate_raw(&raw).unwrap_or(raw)
        } else {
            raw
        };
        doc.resources.push(EmbeddedResource::named(name, data));
    }

    log::debug!(
        "decoded HWP document: {} section(s), {} paragraph(s), {} resource(s)",
        doc.sections.len(),
        doc.paragraph_count(),
        doc.resources.len()
    );
    Ok(doc)
}

fn read_stream<R: Read + Seek>(comp: &mut cfb::CompoundFile<R>, path: &str) -> Result<Vec<u8>> {
    let mut stream = comp
        .open_stream(path)
        .map_err(|e| Error::Decode(format!("missing stream '{}': {}", path, e)))?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Ok(data)
}

fn read_stream_path<R: Read + Seek>(
    comp: &mut cfb::CompoundFile<R>,
    path: &Path,
) -> Result<Vec<u8>> {
    let mut stream = comp
        .open_stream(path)
        .map_err(|e| Error::Decode(format!("missing stream '{}': {}", path.display(), e)))?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Ok(data)
}

/// Inflate a raw (headerless) deflate stream.
fn inflate_raw(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

fn format_version(v: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (v >> 24) & 0xFF,
        (v >> 16) & 0xFF,
        (v >> 8) & 0xFF,
        v & 0xFF
    )
}

fn section_from_tree(index: usize, nodes: &[RecordNode]) -> Section {
    let mut section = Section::new(index);
    for node in nodes {
        if node.tag == TAG_PARA_HEADER {
            section.add_paragraph(paragraph_from_node(node));
        }
    }
    section
}

fn paragraph_from_node(node: &RecordNode) -> Paragraph {
    let mut anchored: VecDeque<Control> = VecDeque::new();
    let mut trailing: Vec<Control> = Vec::new();

    for child in &node.children {
        if child.tag != TAG_CTRL_HEADER {
            continue;
        }
        let Some(ctrl_id) = read_u32_le(&child.data, 0) else {
            continue;
        };
        match ctrl_id {
            CTRL_TABLE => anchored.push_back(Control::Table(table_from_ctrl(child))),
            CTRL_SHAPE => anchored.push_back(Control::Object(gather_paragraphs(child))),
            id if (id >> 24) as u8 == b'%' => {
                // Field control; some field kinds carry click-here text.
                let paragraphs = gather_paragraphs(child);
                let text = paragraphs
                    .iter()
                    .map(|p| p.plain_text())
                    .collect::<Vec<_>>()
                    .join("\n");
                if !text.is_empty() {
                    trailing.push(Control::Field(text));
                }
            }
            _ => {
                // Headers, footers, notes and the like: text-bearing but not
                // anchored by an inline character we splice on.
                let paragraphs = gather_paragraphs(child);
                if paragraphs.iter().any(|p| !p.is_empty()) {
                    trailing.push(Control::Object(paragraphs));
                }
            }
        }
    }

    let mut paragraph = Paragraph::new();
    if let Some(text) = node.child(TAG_PARA_TEXT) {
        walk_para_text(&text.data, &mut anchored, &mut paragraph);
    }
    // Anchors without a matching character (malformed producer): keep the
    // content, at the end of the paragraph.
    for control in anchored {
        paragraph.push_control(control);
    }
    for control in trailing {
        paragraph.push_control(control);
    }
    paragraph
}

/// Paragraphs nested anywhere under a control, in document order.
fn gather_paragraphs(node: &RecordNode) -> Vec<Paragraph> {
    let mut out = Vec::new();
    for child in &node.children {
        if child.tag == TAG_PARA_HEADER {
            out.push(paragraph_from_node(child));
        } else {
            out.extend(gather_paragraphs(child));
        }
    }
    out
}

fn table_from_ctrl(ctrl: &RecordNode) -> Table {
    // Row/column counts live in the TABLE child: attributes u32, then
    // row count u16, column count u16.
    let cols = ctrl
        .child(TAG_TABLE)
        .and_then(|t| read_u16_le(&t.data, 6))
        .unwrap_or(0) as usize;

    let mut cells: Vec<TableCell> = Vec::new();
    for child in &ctrl.children {
        if child.tag != TAG_LIST_HEADER {
            continue;
        }
        let mut cell = TableCell::new();
        for paragraph in gather_paragraphs(child) {
            cell.add_paragraph(paragraph);
        }
        cells.push(cell);
    }

    let mut table = Table::new();
    let per_row = if cols > 0 { cols } else { cells.len().max(1) };
    let mut row = TableRow::new();
    for cell in cells {
        row.add_cell(cell);
        if row.cells.len() == per_row {
            table.add_row(std::mem::take(&mut row));
        }
    }
    if !row.cells.is_empty() {
        table.add_row(row);
    }
    table
}

/// Walk UTF-16LE paragraph text, splicing anchored controls at their
/// extended-character positions.
fn walk_para_text(data: &[u8], anchored: &mut VecDeque<Control>, paragraph: &mut Paragraph) {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    let mut buf: Vec<u16> = Vec::new();
    let mut i = 0;
    while i < units.len() {
        match units[i] {
            // Paragraph mark, unusable, reserved one-unit codes.
            0 | 13 | 25..=29 => i += 1,
            10 => {
                buf.push(u16::from(b'\n'));
                i += 1;
            }
            24 => {
                buf.push(u16::from(b'-'));
                i += 1;
            }
            30 | 31 => {
                buf.push(u16::from(b' '));
                i += 1;
            }
            9 => {
                buf.push(u16::from(b'\t'));
                i += 8;
            }
            // Remaining inline controls: eight units, no text.
            4..=8 | 19 | 20 => i += 8,
            // Table / drawing object anchor.
            11 => {
                flush_text(&mut buf, paragraph);
                if let Some(control) = anchored.pop_front() {
                    paragraph.push_control(control);
                }
                i += 8;
            }
            // Remaining extended controls: eight units, content handled via
            // their control headers.
            1..=3 | 12 | 14..=18 | 21..=23 => i += 8,
            _ => {
                buf.push(units[i]);
                i += 1;
            }
        }
    }
    flush_text(&mut buf, paragraph);
}

fn flush_text(buf: &mut Vec<u16>, paragraph: &mut Paragraph) {
    if buf.is_empty() {
        return;
    }
    paragraph.push_text(String::from_utf16_lossy(buf));
    buf.clear();
}
