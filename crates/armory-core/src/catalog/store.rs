use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::{debug, warn};

use super::definition::Definition;
use crate::error::Result;

/// Persistent tier of the resolver, keyed by `"table:hash"`.
pub trait DefinitionStore {
    /// Raw stored payload; either a document or a JSON string holding one.
    fn load(&self, key: &str) -> Result<Option<Value>>;

    fn save(&self, key: &str, definition: &Definition) -> Result<()>;

    /// Persist pending writes.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: DefinitionStore + ?Sized> DefinitionStore for &T {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, definition: &Definition) -> Result<()> {
        (**self).save(key, definition)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}

/// Decode a stored payload, treating malformed data as a miss.
pub fn decode_payload(key: &str, payload: Value) -> Option<Definition> {
    let decoded = match payload {
        Value::String(text) => serde_json::from_str::<Definition>(&text),
        Value::Null => return None,
        other => serde_json::from_value::<Definition>(other),
    };
    match decoded {
        Ok(def) => Some(def),
        Err(e) => {
            warn!("Discarding malformed cached definition {}: {}", key, e);
            None
        }
    }
}

/// Definition store backed by a single JSON file.
///
/// The file is read once on open and rewritten on [`DefinitionStore::flush`].
#[derive(Debug)]
pub struct FileDefinitionStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, Value>>,
    dirty: AtomicBool,
}

impl FileDefinitionStore {
    pub const FILE_NAME: &'static str = "definitions.json";

    /// Open the store at `path`; a missing or unreadable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, Value>>(&content) {
                Ok(entries) => {
                    debug!("Loaded {} cached definitions from {:?}", entries.len(), path);
                    entries
                }
                Err(e) => {
                    warn!("Definition store {:?} is malformed, starting empty: {}", path, e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            entries: RwLock::new(entries),
            dirty: AtomicBool::new(false),
        }
    }

    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::open(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DefinitionStore for FileDefinitionStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, definition: &Definition) -> Result<()> {
        let value = serde_json::to_value(definition)?;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value);
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string(&*entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} definitions to {:?}", entries.len(), self.path);
        Ok(())
    }
}
