use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{Collection, FieldSpec, Record};

/// An account that can sign in to the care front end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Role name as stored; role checks happen elsewhere
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

impl Record for UserAccount {
    const COLLECTION: Collection = Collection::Users;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name"),
        FieldSpec::new("email", "Email"),
        FieldSpec::with_default("role", "Role", "caregiver"),
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
            "email" => Some(self.email.clone()),
            "role" => Some(self.role.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "role" => &mut self.role,
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
        if self.role.is_empty() {
            self.name.clone()
        } else {
            format!("{} [{}]", self.name, self.role)
        }
    }
}
