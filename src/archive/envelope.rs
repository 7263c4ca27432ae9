//! Envelope header for .slar archives.

use std::io::{Read, Write};

use crate::types::error::{SidelistError, SidelistResult};
use crate::types::{FORMAT_VERSION, SLAR_MAGIC};

/// Envelope of a .slar archive. Fixed size: 24 bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchiveHeader {
    /// Magic bytes: [0x53, 0x4C, 0x41, 0x52] ("SLAR").
    pub magic: [u8; 4],
    /// Container format version (currently 1).
    pub version: u32,
    /// Number of records in the object table.
    pub object_count: u32,
    /// UID of the root object (index into the table).
    pub root: u32,
}

/// The fixed size of an ArchiveHeader on disk: 24 bytes.
pub const HEADER_SIZE: u64 = 24;

impl ArchiveHeader {
    /// Create a new header with default magic and version.
    pub fn new(object_count: u32, root: u32) -> Self {
        Self {
            magic: SLAR_MAGIC,
            version: FORMAT_VERSION,
            object_count,
            root,
        }
    }

    /// Write this header to the given writer. Writes exactly 24 bytes.
    ///
    /// Layout (all little-endian):
    /// - 0x00..0x04: magic (4 bytes)
    /// - 0x04..0x08: version (u32, 4 bytes)
    /// - 0x08..0x0C: _reserved (u32, 4 bytes, written as 0)
    /// - 0x0C..0x10: object_count (u32, 4 bytes)
    /// - 0x10..0x14: root UID (u32, 4 bytes)
    /// - 0x14..0x18: _reserved (u32, 4 bytes, written as 0)
    ///   Total: 24 bytes
    pub fn write_to(&self, writer: &mut impl Write) -> SidelistResult<()> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&0u32.to_le_bytes())?; // _reserved
        writer.write_all(&self.object_count.to_le_bytes())?;
        writer.write_all(&self.root.to_le_bytes())?;
        writer.write_all(&0u32.to_le_bytes())?; // _reserved
        Ok(())
    }

    /// Read a header from the given reader. Reads exactly 24 bytes.
    pub fn read_from(reader: &mut impl Read) -> SidelistResult<Self> {
        let mut buf = [0u8; 24];
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                SidelistError::Truncated
            } else {
                SidelistError::Io(e)
            }
        })?;

        let magic = [buf[0], buf[1], buf[2], buf[3]];
        if magic != SLAR_MAGIC {
            return Err(SidelistError::InvalidMagic);
        }

        let version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        if version != FORMAT_VERSION {
            return Err(SidelistError::UnsupportedVersion(version));
        }

        // bytes 8..12 are reserved
        let object_count = u32::from_le_bytes(buf[12..16].try_into().unwrap());
        let root = u32::from_le_bytes(buf[16..20].try_into().unwrap());
        // bytes 20..24 are reserved

        Ok(Self {
            magic,
            version,
            object_count,
            root,
        })
    }
}
