//! HWP record stream parsing.
//!
//! Body and document-info streams are sequences of tagged records. Each
//! record starts with a packed u32 header: tag in bits 0-9, nesting level in
//! bits 10-19, payload size in bits 20-31. A size field of 0xFFF means the
//! real size follows as an extra u32. The level field encodes a tree, which
//! [`build_tree`] reconstructs.

use super::read_u32_le;

const TAG_BEGIN: u16 = 0x010;

/// Paragraph header record.
pub const TAG_PARA_HEADER: u16 = TAG_BEGIN + 50;
/// Paragraph text record (UTF-16LE code units with control characters).
pub const TAG_PARA_TEXT: u16 = TAG_BEGIN + 51;
/// Control header record; first four payload bytes are the control id.
pub const TAG_CTRL_HEADER: u16 = TAG_BEGIN + 55;
/// List header record (one per table cell or nested text area).
pub const TAG_LIST_HEADER: u16 = TAG_BEGIN + 56;
/// Table layout record (row/column counts).
pub const TAG_TABLE: u16 = TAG_BEGIN + 61;

/// Extended-size marker in the packed header.
const SIZE_EXTENDED: u32 = 0xFFF;

/// A single decoded record.
#[derive(Debug, Clone)]
pub struct Record {
    /// Record tag
    pub tag: u16,
    /// Nesting level within the stream
    pub level: u16,
    /// Raw payload
    pub data: Vec<u8>,
}

/// A record with its nested children, reconstructed from levels.
#[derive(Debug, Clone)]
pub struct RecordNode {
    /// Record tag
    pub tag: u16,
    /// Raw payload
    pub data: Vec<u8>,
    /// Records nested one level deeper
    pub children: Vec<RecordNode>,
}

impl RecordNode {
    /// First direct child with the given tag.
    pub fn child(&self, tag: u16) -> Option<&RecordNode> {
        self.children.iter().find(|c| c.tag == tag)
    }
}

/// Parse a record stream into a flat, document-ordered list.
///
/// Truncated trailing records are dropped rather than failing the stream;
/// everything decoded up to that point is still returned.
pub fn parse_records(data: &[u8]) -> Vec<Record> {
    let mut records = Vec::new();
    let mut offset = 0usize;

    while let Some(header) = read_u32_le(data, offset) {
        offset += 4;

        let tag = (header & 0x3FF) as u16;
        let level = ((header >> 10) & 0x3FF) as u16;
        let mut size = header >> 20;

        if size == SIZE_EXTENDED {
            match read_u32_le(data, offset) {
                Some(extended) => {
                    size = extended;
                    offset += 4;
                }
                None => {
                    log::warn!("record stream truncated in extended size field");
                    break;
                }
            }
        }

        let size = size as usize;
        let Some(payload) = data.get(offset..offset + size) else {
            log::warn!(
                "record 0x{:03x} claims {} bytes but only {} remain",
                tag,
                size,
                data.len() - offset
            );
            break;
        };

        records.push(Record {
            tag,
            level,
            data: payload.to_vec(),
        });
        offset += size;
    }

    records
}

/// Rebuild the record tree implied by the level fields.
pub fn build_tree(records: Vec<Record>) -> Vec<RecordNode> {
    let mut iter = records.into_iter().peekable();
    build_level(&mut iter, 0)
}

fn build_level(
    iter: &mut std::iter::Peekable<std::vec::IntoIter<Record>>,
    level: u16,
) -> Vec<RecordNode> {
    let mut nodes: Vec<RecordNode> = Vec::new();

    while let Some(next_level) = iter.peek().map(|r| r.level) {
        if next_level < level {
            break;
        }
        if next_level > level {
            // Deeper records belong to the node we just emitted. A level
            // jump with no preceding sibling is malformed; drop the record.
            if let Some(last) = nodes.last_mut() {
                last.children.extend(build_level(iter, next_level));
            } else {
                iter.next();
            }
            continue;
        }
        let Some(rec) = iter.next() else { break };
        let mut node = RecordNode {
            tag: rec.tag,
            data: rec.data,
            children: Vec::new(),
        };
        node.children = build_level(iter, level + 1);
        nodes.push(node);
    }

    nodes
}

/// Encode a record header and payload the way the container does.
/// Test scaffolding for building synthetic record streams.
#[cfg(test)]
pub(crate) fn encode_record(tag: u16, level: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let size = payload.len() as u32;
    if size >= SIZE_EXTENDED {
        let header = (tag as u32 & 0x3FF) | ((level as u32 & 0x3FF) << 10) | (SIZE_EXTENDED << 20);
        out.extend_from_slice(&header.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
    } else {
        let header = (tag as u32 & 0x3FF) | ((level as u32 & 0x3FF) << 10) | (size << 20);
        out.extend_from_slice(&header.to_le_bytes());
    }
    out.extend_from_slice(payload);
    out
}
