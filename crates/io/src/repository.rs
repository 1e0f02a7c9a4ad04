use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use match3_core::BoardConfig;

use crate::layout::{load_layout, LayoutError};

/// Loaded board configs keyed by id (for files: the path as given).
///
/// Configs are handed out as shared references; loading the same id twice
/// returns the cached config without touching the file system again.
#[derive(Debug, Default)]
pub struct LayoutRepository {
    configs: HashMap<String, Arc<BoardConfig>>,
}

impl LayoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Arc<BoardConfig>, LayoutError> {
        let path = path.as_ref();
        let id = path.to_string_lossy().into_owned();
        if let Some(config) = self.configs.get(&id) {
            return Ok(Arc::clone(config));
        }
        let config = Arc::new(load_layout(path)?);
        self.configs.insert(id, Arc::clone(&config));
        Ok(config)
    }

    /// Register a config under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, config: BoardConfig) -> Arc<BoardConfig> {
        let config = Arc::new(config);
        self.configs.insert(id.into(), Arc::clone(&config));
        config
    }

    pub fn get(&self, id: &str) -> Option<Arc<BoardConfig>> {
        self.configs.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.configs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
