//! Shared container fixture builders.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const TAG_PARA_HEADER: u16 = 66;
pub const TAG_PARA_TEXT: u16 = 67;
pub const TAG_CTRL_HEADER: u16 = 71;
pub const TAG_LIST_HEADER: u16 = 72;
pub const TAG_TABLE: u16 = 77;

pub const FLAG_PASSWORD: u32 = 1 << 1;

/// Pack a record header (tag / level / size) plus payload.
pub fn encode_record(tag: u16, level: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let size = payload.len() as u32;
    assert!(size < 0xFFF, "fixture records stay below the extended size");
    let header = (tag as u32 & 0x3FF) | ((level as u32 & 0x3FF) << 10) | (size << 20);
    out.extend_from_slice(&header.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn utf16_bytes(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

fn units_bytes(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|u| u.to_le_bytes()).collect()
}

/// One paragraph record pair at the given level.
pub fn paragraph_records(level: u16, text: &str) -> Vec<u8> {
    let mut stream = encode_record(TAG_PARA_HEADER, level, &[0u8; 8]);
    stream.extend(encode_record(TAG_PARA_TEXT, level + 1, &utf16_bytes(text)));
    stream
}

/// A body section of plain paragraphs.
pub fn simple_section(paragraphs: &[&str]) -> Vec<u8> {
    let mut stream = Vec::new();
    for text in paragraphs {
        stream.extend(paragraph_records(0, text));
    }
    stream
}

/// A body section whose single paragraph anchors a 1x1 table between two
/// text runs: `<before><table: cell_text><after>`.
pub fn section_with_table(before: &str, cell_text: &str, after: &str) -> Vec<u8> {
    let mut units: Vec<u16> = before.encode_utf16().collect();
    units.push(11);
    units.extend([0u16; 6]);
    units.push(11);
    units.extend(after.encode_utf16());

    let mut stream = encode_record(TAG_PARA_HEADER, 0, &[0u8; 8]);
    stream.extend(encode_record(TAG_PARA_TEXT, 1, &units_bytes(&units)));

    let ctrl_id = u32::from_be_bytes(*b"tbl ");
    stream.extend(encode_record(TAG_CTRL_HEADER, 1, &ctrl_id.to_le_bytes()));
    let mut table_payload = vec![0u8; 4];
    table_payload.extend(1u16.to_le_bytes());
    table_payload.extend(1u16.to_le_bytes());
    stream.extend(encode_record(TAG_TABLE, 2, &table_payload));
    stream.extend(encode_record(TAG_LIST_HEADER, 2, &[0u8; 4]));
    stream.extend(paragraph_records(3, cell_text));
    stream
}

/// Write a binary-container fixture to disk.
pub fn write_hwp(path: &Path, flags: u32, section: &[u8], bin: &[(&str, &[u8])]) {
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .unwrap();
    let mut comp = cfb::CompoundFile::create(file).unwrap();

    let mut header = vec![0u8; 256];
    header[..17].copy_from_slice(b"HWP Document File");
    header[32..36].copy_from_slice(&0x0500_0500u32.to_le_bytes());
    header[36..40].copy_from_slice(&flags.to_le_bytes());
    comp.create_stream("/FileHeader")
        .unwrap()
        .write_all(&header)
        .unwrap();

    comp.create_storage("/BodyText").unwrap();
    comp.create_stream("/BodyText/Section0")
        .unwrap()
        .write_all(section)
        .unwrap();

    if !bin.is_empty() {
        comp.create_storage("/BinData").unwrap();
        for (name, data) in bin {
            comp.create_stream(format!("/BinData/{}", name))
                .unwrap()
                .write_all(data)
                .unwrap();
        }
    }
    comp.flush().unwrap();
}

/// Write a package-container fixture to disk.
pub fn write_hwpx(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

/// Section XML for a run of plain paragraphs.
pub fn hwpx_section(paragraphs: &[&str]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><hs:sec xmlns:hs="s" xmlns:hp="p">"#,
    );
    for text in paragraphs {
        xml.push_str("<hp:p><hp:run><hp:t>");
        xml.push_str(text);
        xml.push_str("</hp:t></hp:run></hp:p>");
    }
    xml.push_str("</hs:sec>");
    xml
}

/// Write an HWPX fixture with one plain-paragraph section.
pub fn write_simple_hwpx(path: &Path, paragraphs: &[&str]) {
    let xml = hwpx_section(paragraphs);
    write_hwpx(path, &[("Contents/section0.xml", xml.as_bytes())]);
}
