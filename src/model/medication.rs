use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{Collection, FieldSpec, Record};

/// A medication on the patient's plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    /// Free-form schedule text ("08:00, 20:00")
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

impl Record for Medication {
    const COLLECTION: Collection = Collection::Medications;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name"),
        FieldSpec::new("dosage", "Dosage"),
        FieldSpec::with_default("schedule", "Schedule", "daily"),
        FieldSpec::new("notes", "Notes"),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => Some(self.name.clone()),
            "dosage" => Some(self.dosage.clone()),
            "schedule" => Some(self.schedule.clone()),
            "notes" => Some(self.notes.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "name" => &mut self.name,
            "dosage" => &mut self.dosage,
            "schedule" => &mut self.schedule,
            "notes" => &mut self.notes,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated = Some(now);
    }

    fn summary(&self) -> String {
        if self.dosage.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.dosage)
        }
    }
}
