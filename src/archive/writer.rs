//! Encodes a value tree into a .slar archive.

use std::io::Write;
use std::path::Path;

use crate::types::error::SidelistResult;
use crate::types::Value;

use super::envelope::ArchiveHeader;
use super::reader::{TAG_ARRAY, TAG_BLOB, TAG_BOOL, TAG_DICT, TAG_INT, TAG_NULL, TAG_TEXT};

/// One object-table slot with child references already assigned.
enum Slot {
    Null,
    Boolean(bool),
    Integer(i64),
    Text(String),
    Blob(Vec<u8>),
    Array(Vec<u32>),
    Dict(Vec<(u32, u32)>),
}

/// Writer for .slar archives.
pub struct ArchiveWriter;

impl ArchiveWriter {
    /// Write a value tree to a .slar file.
    pub fn write_to_file(root: &Value, path: &Path) -> SidelistResult<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        Self::write_to(root, &mut writer)
    }

    /// Write a value tree to any writer.
    pub fn write_to(root: &Value, writer: &mut impl Write) -> SidelistResult<()> {
        writer.write_all(&Self::encode(root))?;
        writer.flush()?;
        Ok(())
    }

    /// Encode a value tree into archive bytes.
    ///
    /// The tree is interned depth-first in pre-order, so a node's table slot
    /// precedes its children's and the root is always UID 0. The table is
    /// fully unshared; equal trees encode to identical bytes.
    pub fn encode(root: &Value) -> Vec<u8> {
        let mut table: Vec<Slot> = Vec::new();
        let root_uid = intern(root, &mut table);

        let mut out = Vec::new();
        let header = ArchiveHeader::new(table.len() as u32, root_uid);
        // Writing a header into a Vec cannot fail.
        header
            .write_to(&mut out)
            .expect("in-memory header write failed");
        for slot in &table {
            emit_record(slot, &mut out);
        }
        out
    }
}

/// Assign a table slot to a value, interning its children after it.
fn intern(value: &Value, table: &mut Vec<Slot>) -> u32 {
    let uid = table.len() as u32;
    table.push(Slot::Null); // placeholder until children are interned
    let slot = match value {
        Value::Null => Slot::Null,
        Value::Boolean(b) => Slot::Boolean(*b),
        Value::Integer(n) => Slot::Integer(*n),
        Value::Text(s) => Slot::Text(s.clone()),
        Value::Blob(b) => Slot::Blob(b.clone()),
        Value::Sequence(items) => {
            Slot::Array(items.iter().map(|item| intern(item, table)).collect())
        }
        Value::Map(pairs) => Slot::Dict(
            pairs
                .iter()
                .map(|(key, value)| {
                    let key_uid = table.len() as u32;
                    table.push(Slot::Text(key.clone()));
                    let value_uid = intern(value, table);
                    (key_uid, value_uid)
                })
                .collect(),
        ),
    };
    table[uid as usize] = slot;
    uid
}

/// Append one tag-prefixed record to the output buffer.
fn emit_record(slot: &Slot, out: &mut Vec<u8>) {
    match slot {
        Slot::Null => out.push(TAG_NULL),
        Slot::Boolean(b) => {
            out.push(TAG_BOOL);
            out.push(*b as u8);
        }
        Slot::Integer(n) => {
            out.push(TAG_INT);
            out.extend_from_slice(&n.to_le_bytes());
        }
        Slot::Text(s) => {
            out.push(TAG_TEXT);
            out.extend_from_slice(&(s.len() as u32).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        Slot::Blob(b) => {
            out.push(TAG_BLOB);
            out.extend_from_slice(&(b.len() as u32).to_le_bytes());
            out.extend_from_slice(b);
        }
        Slot::Array(uids) => {
            out.push(TAG_ARRAY);
            out.extend_from_slice(&(uids.len() as u32).to_le_bytes());
            for uid in uids {
                out.extend_from_slice(&uid.to_le_bytes());
            }
        }
        Slot::Dict(pairs) => {
            out.push(TAG_DICT);
            out.extend_from_slice(&(pairs.len() as u32).to_le_bytes());
            for (key, value) in pairs {
                out.extend_from_slice(&key.to_le_bytes());
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
    }
}
