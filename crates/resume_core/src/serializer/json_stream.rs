//! Pretty-printed JSON encoding.

use crate::model::resume::Resume;
use crate::serializer::StreamSerializer;
use crate::storage::{StorageError, StorageResult};
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStreamSerializer;

impl StreamSerializer for JsonStreamSerializer {
    fn write(&self, resume: &Resume, sink: &mut dyn Write) -> StorageResult<()> {
        serde_json::to_writer_pretty(sink, resume).map_err(StorageError::codec)
    }

    fn read(&self, source: &mut dyn Read) -> StorageResult<Resume> {
        serde_json::from_reader(source).map_err(StorageError::codec)
    }
}

#[cfg(test)]
mod tests {
    use super::JsonStreamSerializer;
    use crate::model::resume::{ContactType, Resume};
    use crate::serializer::StreamSerializer;

    #[test]
    fn json_uses_persisted_contact_names() {
        let mut resume = Resume::with_id("uuid1", "FullName1");
        resume.add_contact(ContactType::LinkedIn, "https://linkedin.com/in/x");

        let mut buffer = Vec::new();
        JsonStreamSerializer.write(&resume, &mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(json["uuid"], "uuid1");
        assert_eq!(json["full_name"], "FullName1");
        assert_eq!(json["contacts"]["LINKEDIN"], "https://linkedin.com/in/x");
    }
}
