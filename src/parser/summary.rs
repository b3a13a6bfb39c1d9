//! Best-effort reader for the container's summary-information property set.
//!
//! The stream follows the OLE property-set layout: a header naming one or
//! more property sections, each section a table of (property id, offset)
//! pairs pointing at typed values. Only the handful of properties the
//! extractor surfaces are read. Any structural surprise leaves the
//! corresponding fields unset; nothing in here can fail a decode.

use chrono::{DateTime, TimeZone, Utc};

use super::{read_u16_le, read_u32_le, read_u64_le};
use crate::model::Metadata;

const PID_TITLE: u32 = 2;
const PID_SUBJECT: u32 = 3;
const PID_AUTHOR: u32 = 4;
const PID_KEYWORDS: u32 = 5;
const PID_CREATED: u32 = 12;
const PID_MODIFIED: u32 = 13;

const VT_LPSTR: u32 = 30;
const VT_LPWSTR: u32 = 31;
const VT_FILETIME: u32 = 64;

const BYTE_ORDER_MARK: u16 = 0xFFFE;

// Property tables on garbage input can claim absurd counts.
const MAX_PROPERTIES: u32 = 256;

/// Apply every recognized property in `data` to `metadata`.
pub(crate) fn apply(data: &[u8], metadata: &mut Metadata) {
    if scan(data, metadata).is_none() {
        log::debug!("summary property set not parsable; leaving properties unset");
    }
}

fn scan(data: &[u8], metadata: &mut Metadata) -> Option<()> {
    if read_u16_le(data, 0)? != BYTE_ORDER_MARK {
        return None;
    }
    // Header: byte order, version, system id, clsid, set count, then the
    // first section's format id + offset.
    let set_count = read_u32_le(data, 24)?;
    if set_count == 0 {
        return None;
    }
    let section = read_u32_le(data, 44)? as usize;

    let prop_count = read_u32_le(data, section.checked_add(4)?)?.min(MAX_PROPERTIES);
    for i in 0..prop_count as usize {
        let pair = section.checked_add(8 + i * 8)?;
        let pid = read_u32_le(data, pair)?;
        let value = section.checked_add(read_u32_le(data, pair + 4)? as usize)?;

        match pid {
            PID_TITLE => metadata.title = read_string(data, value).or(metadata.title.take()),
            PID_SUBJECT => metadata.subject = read_string(data, value).or(metadata.subject.take()),
            PID_AUTHOR => metadata.author = read_string(data, value).or(metadata.author.take()),
            PID_KEYWORDS => {
                metadata.keywords = read_string(data, value).or(metadata.keywords.take())
            }
            PID_CREATED => metadata.created = read_filetime(data, value).or(metadata.created),
            PID_MODIFIED => metadata.modified = read_filetime(data, value).or(metadata.modified),
            _ => {}
        }
    }
    Some(())
}

fn read_string(data: &[u8], offset: usize) -> Option<String> {
    let vt = read_u32_le(data, offset)?;
    let text = match vt {
        VT_LPWSTR => {
            let chars = read_u32_le(data, offset + 4)? as usize;
            let bytes = data.get(offset + 8..offset.checked_add(8 + chars.checked_mul(2)?)?)?;
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        VT_LPSTR => {
            let len = read_u32_le(data, offset + 4)? as usize;
            let bytes = data.get(offset + 8..offset.checked_add(8 + len)?)?;
            String::from_utf8_lossy(bytes).into_owned()
        }
        _ => return None,
    };
    let trimmed = text.trim_end_matches('\0').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn read_filetime(data: &[u8], offset: usize) -> Option<DateTime<Utc>> {
    if read_u32_le(data, offset)? != VT_FILETIME {
        return None;
    }
    filetime_to_datetime(read_u64_le(data, offset + 4)?)
}

/// Convert a FILETIME (100ns ticks since 1601-01-01) to a UTC timestamp.
fn filetime_to_datetime(ft: u64) -> Option<DateTime<Utc>> {
    if ft == 0 {
        return None;
    }
    const UNIX_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;
    let secs = (ft / 10_000_000) as i64 - UNIX_EPOCH_OFFSET_SECS;
    let nanos = ((ft % 10_000_000) * 100) as u32;
    Utc.timestamp_opt(secs, nanos).single()
}
