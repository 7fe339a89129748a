//! Compact binary encoding of the whole resume.

use crate::model::resume::Resume;
use crate::serializer::StreamSerializer;
use crate::storage::{StorageError, StorageResult};
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectStreamSerializer;

impl StreamSerializer for ObjectStreamSerializer {
    fn write(&self, resume: &Resume, sink: &mut dyn Write) -> StorageResult<()> {
        bincode::serialize_into(sink, resume).map_err(StorageError::codec)
    }

    fn read(&self, source: &mut dyn Read) -> StorageResult<Resume> {
        bincode::deserialize_from(source).map_err(StorageError::codec)
    }
}
