//! Engine registry holding search providers in fan-out priority order

use super::traits::Engine;
use std::sync::Arc;

/// Ordered registry of search engines. Iteration order is priority order.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    engines: Vec<Arc<dyn Engine>>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an engine at the lowest priority. A repeated name replaces the
    /// earlier registration in place.
    pub fn register(&mut self, engine: Arc<dyn Engine>) {
        match self.engines.iter().position(|e| e.name() == engine.name()) {
            Some(idx) => self.engines[idx] = engine,
            None => self.engines.push(engine),
        }
    }

    /// Engines in priority order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Engine>> {
        self.engines.iter()
    }

    /// Get all engine names, in priority order
    pub fn names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Get number of registered engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
