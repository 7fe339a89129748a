//! Interactive menu commands over any `Storage`.

use resume_core::{ContactType, Resume, Storage, StorageResult};
use std::io::Write;

pub const HELP: &str = "commands:
  list                          all resumes, sorted by name
  size                          number of stored resumes
  save <full name>              create a resume with a new uuid
  update <uuid> <full name>     rename a resume (contacts kept)
  contact <uuid> <TYPE> <value> set one contact, e.g. contact <uuid> EMAIL a@b.com
  get <uuid>                    show one resume with contacts
  delete <uuid>                 remove one resume
  clear                         remove all resumes
  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Size,
    Save(String),
    Update { uuid: String, full_name: String },
    Contact {
        uuid: String,
        kind: ContactType,
        value: String,
    },
    Get(String),
    Delete(String),
    Clear,
    Help,
    Exit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "size" => Ok(Self::Size),
            "clear" => Ok(Self::Clear),
            "help" | "" => Ok(Self::Help),
            "exit" | "quit" => Ok(Self::Exit),
            "save" => non_empty(rest, "full name").map(Self::Save),
            "get" => single_arg(rest).map(Self::Get),
            "delete" => single_arg(rest).map(Self::Delete),
            "update" => {
                let (uuid, full_name) = split_head(rest, "uuid and full name")?;
                Ok(Self::Update {
                    uuid,
                    full_name: non_empty(&full_name, "full name")?,
                })
            }
            "contact" => {
                let (uuid, rest) = split_head(rest, "uuid, contact type and value")?;
                let (kind_text, value) = split_head(&rest, "contact type and value")?;
                let kind = ContactType::parse_db_str(&kind_text.to_ascii_uppercase())
                    .ok_or_else(|| format!("unknown contact type `{kind_text}`"))?;
                Ok(Self::Contact {
                    uuid,
                    kind,
                    value: non_empty(&value, "contact value")?,
                })
            }
            other => Err(format!("unknown command `{other}`; type `help`")),
        }
    }
}

/// Runs one command, writing its report to `out`.
pub fn execute(
    storage: &mut dyn Storage,
    command: Command,
    out: &mut dyn Write,
) -> StorageResult<()> {
    let report = match command {
        Command::List => {
            let resumes = storage.get_all_sorted()?;
            if resumes.is_empty() {
                "empty".to_string()
            } else {
                resumes
                    .iter()
                    .map(Resume::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Size => storage.size()?.to_string(),
        Command::Save(full_name) => {
            let resume = Resume::new(full_name);
            storage.save(&resume)?;
            format!("saved {resume}")
        }
        Command::Update { uuid, full_name } => {
            let mut resume = storage.get(&uuid)?;
            resume.set_full_name(full_name);
            storage.update(&resume)?;
            format!("updated {resume}")
        }
        Command::Contact { uuid, kind, value } => {
            let mut resume = storage.get(&uuid)?;
            resume.add_contact(kind, value);
            storage.update(&resume)?;
            format!("{}: {} set", resume, kind.title())
        }
        Command::Get(uuid) => describe(&storage.get(&uuid)?),
        Command::Delete(uuid) => {
            storage.delete(&uuid)?;
            format!("deleted {uuid}")
        }
        Command::Clear => {
            storage.clear()?;
            "cleared".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Exit => return Ok(()),
    };

    writeln!(out, "{report}").map_err(|err| resume_core::StorageError::io(None, err))
}

fn describe(resume: &Resume) -> String {
    let mut text = resume.to_string();
    for (kind, value) in resume.contacts() {
        text.push_str(&format!("\n  {}: {value}", kind.title()));
    }
    text
}

fn non_empty(value: &str, what: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("missing {what}"));
    }
    Ok(trimmed.to_string())
}

fn single_arg(rest: &str) -> Result<String, String> {
    let value = non_empty(rest, "uuid")?;
    if value.contains(char::is_whitespace) {
        return Err(format!("expected a single uuid, got `{value}`"));
    }
    Ok(value)
}

fn split_head(rest: &str, what: &str) -> Result<(String, String), String> {
    match rest.trim().split_once(char::is_whitespace) {
        Some((head, tail)) => Ok((head.to_string(), tail.trim().to_string())),
        None => Err(format!("missing {what}")),
    }
}
