//! Resume domain model.
//!
//! # Responsibility
//! - Define the record persisted by every storage backend.
//! - Own contact-type naming shared by SQL rows and wire formats.
//!
//! # Invariants
//! - `uuid` is caller-supplied (or generated once) and never changes.
//! - One contact value per `ContactType`; re-adding a type replaces it.
//! - Ordering is `(full_name, uuid)` ascending.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Closed set of contact kinds a resume can carry.
///
/// Declaration order is the iteration order of `Resume::contacts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContactType {
    #[serde(rename = "PHONE")]
    Phone,
    #[serde(rename = "MOBILE")]
    Mobile,
    #[serde(rename = "HOME_PHONE")]
    HomePhone,
    #[serde(rename = "SKYPE")]
    Skype,
    #[serde(rename = "EMAIL")]
    Email,
    #[serde(rename = "LINKEDIN")]
    LinkedIn,
    #[serde(rename = "GITHUB")]
    GitHub,
    #[serde(rename = "STACKOVERFLOW")]
    StackOverflow,
    #[serde(rename = "HOME_PAGE")]
    HomePage,
}

impl ContactType {
    pub const ALL: [ContactType; 9] = [
        ContactType::Phone,
        ContactType::Mobile,
        ContactType::HomePhone,
        ContactType::Skype,
        ContactType::Email,
        ContactType::LinkedIn,
        ContactType::GitHub,
        ContactType::StackOverflow,
        ContactType::HomePage,
    ];

    /// Persisted name, stable across storage formats.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Phone => "PHONE",
            Self::Mobile => "MOBILE",
            Self::HomePhone => "HOME_PHONE",
            Self::Skype => "SKYPE",
            Self::Email => "EMAIL",
            Self::LinkedIn => "LINKEDIN",
            Self::GitHub => "GITHUB",
            Self::StackOverflow => "STACKOVERFLOW",
            Self::HomePage => "HOME_PAGE",
        }
    }

    /// Parses a persisted name. Matching is exact.
    pub fn parse_db_str(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_db_str() == value)
    }

    /// Human-readable label for menus and listings.
    pub fn title(self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::Mobile => "Mobile",
            Self::HomePhone => "Home phone",
            Self::Skype => "Skype",
            Self::Email => "E-mail",
            Self::LinkedIn => "LinkedIn profile",
            Self::GitHub => "GitHub profile",
            Self::StackOverflow => "Stack Overflow profile",
            Self::HomePage => "Home page",
        }
    }
}

impl Display for ContactType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Validation failures for resume write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeValidationError {
    EmptyUuid,
}

impl Display for ResumeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUuid => write!(f, "resume uuid must not be empty"),
        }
    }
}

impl Error for ResumeValidationError {}

/// Persisted resume record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resume {
    uuid: String,
    full_name: String,
    #[serde(default)]
    contacts: BTreeMap<ContactType, String>,
}

impl Resume {
    /// Creates a resume with a freshly generated v4 uuid.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), full_name)
    }

    /// Creates a resume with a caller-provided uuid.
    ///
    /// Does not validate; write paths call `validate()` before persistence.
    pub fn with_id(uuid: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            full_name: full_name.into(),
            contacts: BTreeMap::new(),
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = full_name.into();
    }

    /// Sets the value for `kind`, returning the replaced value if any.
    pub fn add_contact(&mut self, kind: ContactType, value: impl Into<String>) -> Option<String> {
        self.contacts.insert(kind, value.into())
    }

    pub fn remove_contact(&mut self, kind: ContactType) -> Option<String> {
        self.contacts.remove(&kind)
    }

    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }

    pub fn contact(&self, kind: ContactType) -> Option<&str> {
        self.contacts.get(&kind).map(String::as_str)
    }

    pub fn contacts(&self) -> &BTreeMap<ContactType, String> {
        &self.contacts
    }

    /// Checks invariants required before any storage mutation.
    pub fn validate(&self) -> Result<(), ResumeValidationError> {
        if self.uuid.trim().is_empty() {
            return Err(ResumeValidationError::EmptyUuid);
        }
        Ok(())
    }
}

impl Ord for Resume {
    fn cmp(&self, other: &Self) -> Ordering {
        self.full_name
            .cmp(&other.full_name)
            .then_with(|| self.uuid.cmp(&other.uuid))
            .then_with(|| self.contacts.cmp(&other.contacts))
    }
}

impl PartialOrd for Resume {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Resume {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.full_name, self.uuid)
    }
}
