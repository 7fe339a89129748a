//! XML markup encoding.
//!
//! Layout:
//! `<resume uuid=".." fullName=".."><contact type="EMAIL" value="a@b.com"/></resume>`
//!
//! Every value lives in an attribute: attribute values are read back
//! verbatim, while text nodes are whitespace-trimmed by the reader.

use crate::model::resume::{ContactType, Resume};
use crate::serializer::StreamSerializer;
use crate::storage::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read, Write};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlStreamSerializer;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "resume")]
struct XmlResume {
    #[serde(rename = "@uuid")]
    uuid: String,
    #[serde(rename = "@fullName")]
    full_name: String,
    #[serde(rename = "contact", default)]
    contacts: Vec<XmlContact>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlContact {
    #[serde(rename = "@type")]
    kind: ContactType,
    #[serde(rename = "@value", default)]
    value: String,
}

impl From<&Resume> for XmlResume {
    fn from(resume: &Resume) -> Self {
        Self {
            uuid: resume.uuid().to_string(),
            full_name: resume.full_name().to_string(),
            contacts: resume
                .contacts()
                .iter()
                .map(|(kind, value)| XmlContact {
                    kind: *kind,
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

impl From<XmlResume> for Resume {
    fn from(xml: XmlResume) -> Self {
        let mut resume = Resume::with_id(xml.uuid, xml.full_name);
        for contact in xml.contacts {
            resume.add_contact(contact.kind, contact.value);
        }
        resume
    }
}

impl StreamSerializer for XmlStreamSerializer {
    fn write(&self, resume: &Resume, sink: &mut dyn Write) -> StorageResult<()> {
        let body =
            quick_xml::se::to_string(&XmlResume::from(resume)).map_err(StorageError::codec)?;
        write_document(sink, &body).map_err(|err| StorageError::io(Some(resume.uuid()), err))
    }

    fn read(&self, source: &mut dyn Read) -> StorageResult<Resume> {
        let xml: XmlResume =
            quick_xml::de::from_reader(BufReader::new(source)).map_err(StorageError::codec)?;
        Ok(xml.into())
    }
}

fn write_document(sink: &mut dyn Write, body: &str) -> std::io::Result<()> {
    writeln!(sink, "{XML_DECLARATION}")?;
    sink.write_all(body.as_bytes())?;
    sink.flush()
}
