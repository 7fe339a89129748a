//! Whole-record stream formats used by file-backed storage.
//!
//! # Responsibility
//! - Encode one resume to a byte sink and decode it back.
//! - Report codec failures as storage failures carrying the original cause.
//!
//! # Invariants
//! - `read(write(r)) == r`, including the empty contact set.

use crate::model::resume::Resume;
use crate::storage::StorageResult;
use std::io::{Read, Write};

pub mod json_stream;
pub mod object_stream;
pub mod xml_stream;

pub use json_stream::JsonStreamSerializer;
pub use object_stream::ObjectStreamSerializer;
pub use xml_stream::XmlStreamSerializer;

/// Strategy for encoding a single resume.
pub trait StreamSerializer {
    fn write(&self, resume: &Resume, sink: &mut dyn Write) -> StorageResult<()>;
    fn read(&self, source: &mut dyn Read) -> StorageResult<Resume>;
}
