use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// The four document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Medications,
    Activities,
    Templates,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Medications,
        Collection::Activities,
        Collection::Templates,
        Collection::Users,
    ];

    /// Storage name (also the file stem in a JSON store)
    pub fn name(self) -> &'static str {
        match self {
            Collection::Medications => "medications",
            Collection::Activities => "activities",
            Collection::Templates => "templates",
            Collection::Users => "users",
        }
    }

    /// Tab label
    pub fn label(self) -> &'static str {
        match self {
            Collection::Medications => "Medications",
            Collection::Activities => "Activities",
            Collection::Templates => "Templates",
            Collection::Users => "Users",
        }
    }

    /// Singular noun for editor titles and messages
    pub fn noun(self) -> &'static str {
        match self {
            Collection::Medications => "medication",
            Collection::Activities => "activity",
            Collection::Templates => "template",
            Collection::Users => "user",
        }
    }

    pub fn id_prefix(self) -> &'static str {
        match self {
            Collection::Medications => "MED",
            Collection::Activities => "ACT",
            Collection::Templates => "TPL",
            Collection::Users => "USR",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Collection::Medications => super::Medication::FIELDS,
            Collection::Activities => super::Activity::FIELDS,
            Collection::Templates => super::ActivityTemplate::FIELDS,
            Collection::Users => super::UserAccount::FIELDS,
        }
    }

    pub fn parse_collection(s: &str) -> Option<Self> {
        match s {
            "medications" | "medication" | "med" => Some(Collection::Medications),
            "activities" | "activity" | "act" => Some(Collection::Activities),
            "templates" | "template" | "tpl" => Some(Collection::Templates),
            "users" | "user" | "usr" => Some(Collection::Users),
            _ => None,
        }
    }

    /// Find the collection an id belongs to by its prefix (`MED-3` → medications)
    pub fn from_id(id: &str) -> Option<Self> {
        let prefix = id.split('-').next()?;
        Collection::ALL
            .into_iter()
            .find(|c| c.id_prefix().eq_ignore_ascii_case(prefix))
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One editable field of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    /// Value written into a blank form
    pub default: &'static str,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        FieldSpec {
            key,
            label,
            default: "",
        }
    }

    pub const fn with_default(key: &'static str, label: &'static str, default: &'static str) -> Self {
        FieldSpec {
            key,
            label,
            default,
        }
    }
}

/// A document stored in one of the collections, editable through a form.
pub trait Record: Serialize + DeserializeOwned + Clone + Default {
    const COLLECTION: Collection;
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Current value of a form field (`None` for an unknown key)
    fn field(&self, key: &str) -> Option<String>;

    /// Set a form field from text. Returns false for an unknown key.
    fn set_field(&mut self, key: &str, value: &str) -> bool;

    fn updated(&self) -> Option<DateTime<Utc>>;
    fn touch(&mut self, now: DateTime<Utc>);

    /// One-line summary for list views
    fn summary(&self) -> String;
}
