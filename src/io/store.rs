use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::model::{Collection, Record};

/// Error type for document store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode document: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error("document has no id")]
    MissingId,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary: JSON documents grouped in collections
pub trait DocumentStore {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .list(collection)?
            .into_iter()
            .find(|doc| doc_id(doc) == Some(id)))
    }

    /// Insert or replace the document with the same `id`
    fn save(&mut self, collection: Collection, doc: Value) -> Result<(), StoreError>;

    /// Remove a document. Returns false when no document had that id.
    fn delete(&mut self, collection: Collection, id: &str) -> Result<bool, StoreError>;
}

fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Next free `<PREFIX>-<n>` id in a collection
pub fn next_id(docs: &[Value], collection: Collection) -> String {
    let prefix = collection.id_prefix();
    let max = docs
        .iter()
        .filter_map(doc_id)
        .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{}", prefix, max + 1)
}

fn upsert(docs: &mut Vec<Value>, doc: Value) -> Result<(), StoreError> {
    let id = doc_id(&doc).ok_or(StoreError::MissingId)?.to_string();
    match docs.iter_mut().find(|d| doc_id(d) == Some(id.as_str())) {
        Some(slot) => *slot = doc,
        None => docs.push(doc),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Typed helpers
// ---------------------------------------------------------------------------

/// Load every record of type `R`, skipping documents that don't decode
pub fn load_records<R: Record>(store: &dyn DocumentStore) -> Result<Vec<R>, StoreError> {
    let docs = store.list(R::COLLECTION)?;
    let mut records = Vec::with_capacity(docs.len());
    for doc in docs {
        match serde_json::from_value::<R>(doc) {
            Ok(r) => records.push(r),
            Err(e) => tracing::warn!(collection = %R::COLLECTION, "skipping document: {}", e),
        }
    }
    Ok(records)
}

pub fn get_record<R: Record>(store: &dyn DocumentStore, id: &str) -> Result<Option<R>, StoreError> {
    match store.get(R::COLLECTION, id)? {
        Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
        None => Ok(None),
    }
}

/// Save a record, assigning an id when it has none. Returns the id.
pub fn save_record<R: Record>(store: &mut dyn DocumentStore, record: &mut R) -> Result<String, StoreError> {
    if record.id().is_empty() {
        let docs = store.list(R::COLLECTION)?;
        record.set_id(next_id(&docs, R::COLLECTION));
    }
    record.touch(Utc::now());
    let doc = serde_json::to_value(&*record)?;
    store.save(R::COLLECTION, doc)?;
    tracing::debug!(collection = %R::COLLECTION, id = record.id(), "record saved");
    Ok(record.id().to_string())
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// One `<collection>.json` array per collection under a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.name()))
    }

    fn write_all(&self, collection: Collection, docs: &[Value]) -> Result<(), StoreError> {
        let path = self.path_for(collection);
        let content = serde_json::to_string_pretty(docs)?;
        atomic_write(&path, content.as_bytes())
            .map_err(|e| StoreError::WriteError { path, source: e })
    }
}

impl DocumentStore for JsonFileStore {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let path = self.path_for(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| StoreError::ParseError { path, source: e })
    }

    fn save(&mut self, collection: Collection, doc: Value) -> Result<(), StoreError> {
        let mut docs = self.list(collection)?;
        upsert(&mut docs, doc)?;
        self.write_all(collection, &docs)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        let mut docs = self.list(collection)?;
        let before = docs.len();
        docs.retain(|d| doc_id(d) != Some(id));
        if docs.len() == before {
            return Ok(false);
        }
        self.write_all(collection, &docs)?;
        Ok(true)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile store; `fail_writes` makes every save and delete fail
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: HashMap<Collection, Vec<Value>>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        Ok(self.docs.get(&collection).cloned().unwrap_or_default())
    }

    fn save(&mut self, collection: Collection, doc: Value) -> Result<(), StoreError> {
        self.check_writable()?;
        upsert(self.docs.entry(collection).or_default(), doc)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        self.check_writable()?;
        let docs = self.docs.entry(collection).or_default();
        let before = docs.len();
        docs.retain(|d| doc_id(d) != Some(id));
        Ok(docs.len() != before)
    }
}
