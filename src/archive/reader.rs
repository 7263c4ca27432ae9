//! Decodes .slar archives into a value tree.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::types::error::{SidelistError, SidelistResult};
use crate::types::Value;

use super::envelope::{ArchiveHeader, HEADER_SIZE};

/// Class tags for object-table records.
pub const TAG_NULL: u8 = 0x00;
pub const TAG_BOOL: u8 = 0x01;
pub const TAG_INT: u8 = 0x02;
pub const TAG_TEXT: u8 = 0x03;
pub const TAG_BLOB: u8 = 0x04;
pub const TAG_ARRAY: u8 = 0x05;
pub const TAG_DICT: u8 = 0x06;

/// One object-table record with unresolved UID references.
#[derive(Debug, Clone)]
enum Record {
    Null,
    Boolean(bool),
    Integer(i64),
    Text(String),
    Blob(Vec<u8>),
    Array(Vec<u32>),
    Dict(Vec<(u32, u32)>),
}

/// Reader for .slar archives.
pub struct ArchiveReader;

impl ArchiveReader {
    /// Read a .slar file into a value tree.
    pub fn read_from_file(path: &Path) -> SidelistResult<Value> {
        let data = std::fs::read(path)?;
        Self::decode(&data)
    }

    /// Read from any reader into a value tree.
    pub fn read_from(reader: &mut impl Read) -> SidelistResult<Value> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::decode(&data)
    }

    /// Decode raw archive bytes into a value tree.
    ///
    /// Resolves every UID back-reference from the root, sharing the cost of
    /// repeated references through a memo table and rejecting cycles. Bytes
    /// past the last table record are ignored.
    pub fn decode(data: &[u8]) -> SidelistResult<Value> {
        if (data.len() as u64) < HEADER_SIZE {
            return Err(SidelistError::Truncated);
        }
        let header = ArchiveHeader::read_from(&mut std::io::Cursor::new(&data[..24]))?;

        let count = header.object_count as usize;
        let mut cursor = ByteCursor {
            data,
            pos: HEADER_SIZE as usize,
        };
        let mut records: Vec<Record> = Vec::new();
        for _ in 0..count {
            records.push(parse_record(&mut cursor)?);
        }

        if cursor.pos < data.len() {
            log::debug!(
                "ignoring {} trailing bytes after object table",
                data.len() - cursor.pos
            );
        }

        if header.root >= header.object_count {
            return Err(SidelistError::BadReference {
                uid: header.root,
                count: header.object_count,
            });
        }

        let mut memo: Vec<Option<Value>> = vec![None; count];
        let mut visiting = vec![false; count];
        materialize(header.root, &records, &mut memo, &mut visiting)
    }
}

/// Bounds-checked cursor over the raw archive bytes.
struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn take(&mut self, len: usize) -> SidelistResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or(SidelistError::Truncated)?;
        if end > self.data.len() {
            return Err(SidelistError::Truncated);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> SidelistResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> SidelistResult<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn read_i64(&mut self) -> SidelistResult<i64> {
        Ok(i64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }
}

/// Parse one tag-prefixed record at the cursor.
fn parse_record(cursor: &mut ByteCursor) -> SidelistResult<Record> {
    let tag = cursor.read_u8()?;
    match tag {
        TAG_NULL => Ok(Record::Null),
        TAG_BOOL => {
            let at = cursor.pos as u64;
            match cursor.read_u8()? {
                0 => Ok(Record::Boolean(false)),
                1 => Ok(Record::Boolean(true)),
                _ => Err(SidelistError::Corrupt(at)),
            }
        }
        TAG_INT => Ok(Record::Integer(cursor.read_i64()?)),
        TAG_TEXT => {
            let len = cursor.read_u32()? as usize;
            let at = cursor.pos as u64;
            let bytes = cursor.take(len)?;
            let text =
                String::from_utf8(bytes.to_vec()).map_err(|_| SidelistError::Corrupt(at))?;
            Ok(Record::Text(text))
        }
        TAG_BLOB => {
            let len = cursor.read_u32()? as usize;
            Ok(Record::Blob(cursor.take(len)?.to_vec()))
        }
        TAG_ARRAY => {
            let count = cursor.read_u32()?;
            let mut uids = Vec::new();
            for _ in 0..count {
                uids.push(cursor.read_u32()?);
            }
            Ok(Record::Array(uids))
        }
        TAG_DICT => {
            let count = cursor.read_u32()?;
            let mut pairs = Vec::new();
            for _ in 0..count {
                let key = cursor.read_u32()?;
                let value = cursor.read_u32()?;
                pairs.push((key, value));
            }
            Ok(Record::Dict(pairs))
        }
        other => Err(SidelistError::UnknownClassTag(other)),
    }
}

/// Recursively resolve a UID into a value.
///
/// `visiting` tracks the current materialization path so a self- or mutually-
/// referencing table entry fails instead of recursing forever; `memo` caches
/// finished entries so shared references are materialized once.
fn materialize(
    uid: u32,
    records: &[Record],
    memo: &mut [Option<Value>],
    visiting: &mut [bool],
) -> SidelistResult<Value> {
    let idx = uid as usize;
    if idx >= records.len() {
        return Err(SidelistError::BadReference {
            uid,
            count: records.len() as u32,
        });
    }
    if let Some(value) = &memo[idx] {
        return Ok(value.clone());
    }
    if visiting[idx] {
        return Err(SidelistError::CyclicReference(uid));
    }
    visiting[idx] = true;

    let value = match &records[idx] {
        Record::Null => Value::Null,
        Record::Boolean(b) => Value::Boolean(*b),
        Record::Integer(n) => Value::Integer(*n),
        Record::Text(s) => Value::Text(s.clone()),
        Record::Blob(b) => Value::Blob(b.clone()),
        Record::Array(uids) => {
            let mut items = Vec::with_capacity(uids.len());
            for &child in uids {
                items.push(materialize(child, records, memo, visiting)?);
            }
            Value::Sequence(items)
        }
        Record::Dict(pairs) => {
            let mut out = Vec::with_capacity(pairs.len());
            let mut seen: HashSet<String> = HashSet::new();
            for &(key_uid, value_uid) in pairs {
                let key_idx = key_uid as usize;
                if key_idx >= records.len() {
                    return Err(SidelistError::BadReference {
                        uid: key_uid,
                        count: records.len() as u32,
                    });
                }
                let key = match &records[key_idx] {
                    Record::Text(s) => s.clone(),
                    _ => return Err(SidelistError::InvalidKey(key_uid)),
                };
                if !seen.insert(key.clone()) {
                    return Err(SidelistError::DuplicateKey(key));
                }
                let value = materialize(value_uid, records, memo, visiting)?;
                out.push((key, value));
            }
            Value::Map(out)
        }
    };

    visiting[idx] = false;
    memo[idx] = Some(value.clone());
    Ok(value)
}
