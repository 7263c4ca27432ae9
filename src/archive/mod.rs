//! Binary I/O for .slar keyed object archives.

pub mod envelope;
pub mod reader;
pub mod writer;

pub use envelope::{ArchiveHeader, HEADER_SIZE};
pub use reader::ArchiveReader;
pub use writer::ArchiveWriter;
