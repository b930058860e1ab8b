use crate::io::store::{DocumentStore, StoreError, get_record, load_records, save_record};
use crate::model::{Activity, ActivityTemplate, Collection, FormState, Medication, Record, UserAccount};

/// A record as shown in a list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub id: String,
    pub summary: String,
}

/// List rows for a collection, in stored order
pub fn rows(store: &dyn DocumentStore, collection: Collection) -> Result<Vec<RecordRow>, StoreError> {
    match collection {
        Collection::Medications => rows_of::<Medication>(store),
        Collection::Activities => rows_of::<Activity>(store),
        Collection::Templates => rows_of::<ActivityTemplate>(store),
        Collection::Users => rows_of::<UserAccount>(store),
    }
}

fn rows_of<R: Record>(store: &dyn DocumentStore) -> Result<Vec<RecordRow>, StoreError> {
    Ok(load_records::<R>(store)?
        .iter()
        .map(|r| RecordRow {
            id: r.id().to_string(),
            summary: r.summary(),
        })
        .collect())
}

/// Field values of a stored record, in form order. `None` if it doesn't exist.
pub fn record_values(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<Option<Vec<(&'static str, String)>>, StoreError> {
    match collection {
        Collection::Medications => values_of::<Medication>(store, id),
        Collection::Activities => values_of::<Activity>(store, id),
        Collection::Templates => values_of::<ActivityTemplate>(store, id),
        Collection::Users => values_of::<UserAccount>(store, id),
    }
}

fn values_of<R: Record>(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Vec<(&'static str, String)>>, StoreError> {
    Ok(get_record::<R>(store, id)?.map(|r| FormState::values_of(&r)))
}

/// Persist a form. Existing records keep fields the form doesn't show.
/// Returns the record id (newly assigned when creating).
pub fn save_form(store: &mut dyn DocumentStore, form: &FormState) -> Result<String, StoreError> {
    match form.collection {
        Collection::Medications => save_form_as::<Medication>(store, form),
        Collection::Activities => save_form_as::<Activity>(store, form),
        Collection::Templates => save_form_as::<ActivityTemplate>(store, form),
        Collection::Users => save_form_as::<UserAccount>(store, form),
    }
}

fn save_form_as<R: Record>(store: &mut dyn DocumentStore, form: &FormState) -> Result<String, StoreError> {
    let mut record = match &form.record_id {
        Some(id) => {
            let mut existing = get_record::<R>(store, id)?.unwrap_or_default();
            existing.set_id(id.clone());
            existing
        }
        None => R::default(),
    };
    form.apply_to(&mut record);
    save_record(store, &mut record)
}

/// The stored document for an id, found through its prefix
pub fn show_record(store: &dyn DocumentStore, id: &str) -> Result<Option<serde_json::Value>, StoreError> {
    match Collection::from_id(id) {
        Some(collection) => store.get(collection, id),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn save_new_form_assigns_id() {
        let mut store = MemoryStore::new();
        let mut form = FormState::empty(Collection::Medications, None);
        form.set("name", "Aspirin");
        form.set("dosage", "81mg");
        let id = save_form(&mut store, &form).unwrap();
        assert_eq!(id, "MED-1");

        let listed = rows(&store, Collection::Medications).unwrap();
        assert_eq!(
            listed,
            vec![RecordRow {
                id: "MED-1".into(),
                summary: "Aspirin (81mg)".into()
            }]
        );
    }

    #[test]
    fn save_existing_form_updates_in_place() {
        let mut store = MemoryStore::new();
        let mut form = FormState::empty(Collection::Users, None);
        form.set("name", "Ada");
        let id = save_form(&mut store, &form).unwrap();

        let values = record_values(&store, Collection::Users, &id).unwrap().unwrap();
        let mut edit = FormState::empty(Collection::Users, Some(id.clone()));
        for (k, v) in values {
            edit.set(k, &v);
        }
        edit.set("role", "nurse");
        assert_eq!(save_form(&mut store, &edit).unwrap(), id);

        let listed = rows(&store, Collection::Users).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].summary, "Ada [nurse]");
    }

    #[test]
    fn record_values_missing_is_none() {
        let store = MemoryStore::new();
        assert!(record_values(&store, Collection::Templates, "TPL-4").unwrap().is_none());
    }

    #[test]
    fn show_record_by_prefix() {
        let mut store = MemoryStore::new();
        let mut form = FormState::empty(Collection::Templates, None);
        form.set("title", "Walk");
        save_form(&mut store, &form).unwrap();
        let doc = show_record(&store, "TPL-1").unwrap().unwrap();
        assert_eq!(doc["title"], "Walk");
        assert!(show_record(&store, "NOPE-1").unwrap().is_none());
    }
}
