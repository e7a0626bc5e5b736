use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use qadb_core::error::Result;
use qadb_core::types::{CorpusEntry, Resolution};

use crate::engine::QaEngine;

/// Cloneable handle to the engine currently serving queries.
///
/// Readers take an `Arc` snapshot and never block on a rebuild; a reload
/// builds a complete engine first and only then replaces the pointer, so
/// in-flight queries finish against the engine they started with.
#[derive(Clone)]
pub struct SharedEngine {
    current: Arc<RwLock<Arc<QaEngine>>>,
}

impl SharedEngine {
    pub fn new(engine: QaEngine) -> Self {
        Self { current: Arc::new(RwLock::new(Arc::new(engine))) }
    }

    pub fn current(&self) -> Arc<QaEngine> {
        self.current.read().clone()
    }

    /// Installs `engine` and returns the one it replaced.
    pub fn swap(&self, engine: QaEngine) -> Arc<QaEngine> {
        std::mem::replace(&mut *self.current.write(), Arc::new(engine))
    }

    /// Rebuilds from `entries` with the current tokenizer and resolver
    /// settings. On failure the serving engine is left untouched.
    pub fn reload(&self, entries: Vec<CorpusEntry>) -> Result<Arc<QaEngine>> {
        let previous = self.current();
        let engine = QaEngine::build(entries, previous.tokenizer_settings(), previous.resolver_settings().clone())?;
        let fresh = Arc::new(engine);
        *self.current.write() = Arc::clone(&fresh);
        info!(previous = previous.len(), current = fresh.len(), "corpus reloaded");
        Ok(fresh)
    }

    pub fn resolve(&self, query: &str) -> Result<Resolution> {
        self.current().resolve(query)
    }
}
