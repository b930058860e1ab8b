use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{Collection, FieldSpec, Record};

/// A scheduled care activity, optionally based on a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    /// Id of the `ActivityTemplate` this activity was created from
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

impl Record for Activity {
    const COLLECTION: Collection = Collection::Activities;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "Title"),
        FieldSpec::new("date", "Date"),
        FieldSpec::with_default("time", "Time", "09:00"),
        FieldSpec::new("template", "Template"),
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
            "title" => Some(self.title.clone()),
            "date" => Some(self.date.clone()),
            "time" => Some(self.time.clone()),
            "template" => Some(self.template.clone()),
            "notes" => Some(self.notes.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "title" => &mut self.title,
            "date" => &mut self.date,
            "time" => &mut self.time,
            "template" => &mut self.template,
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
        match (self.date.is_empty(), self.time.is_empty()) {
            (true, true) => self.title.clone(),
            (false, true) => format!("{} {}", self.date, self.title),
            (true, false) => format!("{} {}", self.time, self.title),
            (false, false) => format!("{} {} {}", self.date, self.time, self.title),
        }
    }
}

/// A reusable activity blueprint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityTemplate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_minutes: String,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

impl Record for ActivityTemplate {
    const COLLECTION: Collection = Collection::Templates;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "Title"),
        FieldSpec::new("description", "Description"),
        FieldSpec::with_default("duration_minutes", "Duration (min)", "30"),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "title" => Some(self.title.clone()),
            "description" => Some(self.description.clone()),
            "duration_minutes" => Some(self.duration_minutes.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "duration_minutes" => &mut self.duration_minutes,
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
        if self.duration_minutes.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({} min)", self.title, self.duration_minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_summary_variants() {
        let mut act = Activity {
            title: "Walk".into(),
            ..Default::default()
        };
        assert_eq!(act.summary(), "Walk");
        act.time = "10:00".into();
        assert_eq!(act.summary(), "10:00 Walk");
        act.date = "2026-03-01".into();
        assert_eq!(act.summary(), "2026-03-01 10:00 Walk");
    }

    #[test]
    fn template_fields_are_settable() {
        let mut tpl = ActivityTemplate::default();
        for spec in ActivityTemplate::FIELDS {
            assert!(tpl.set_field(spec.key, spec.default));
        }
        assert_eq!(tpl.duration_minutes, "30");
        assert_eq!(tpl.summary(), " (30 min)");
    }
}
