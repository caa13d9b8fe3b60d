//! Engine loader for initializing providers from configuration

use super::registry::EngineRegistry;
use super::traits::Engine;
use super::{duckduckgo, serper, tavily};
use crate::config::{ProviderConfig, ProviderSettings};
use std::sync::Arc;
use tracing::info;

/// Loader for initializing engines from configuration
pub struct EngineLoader;

impl EngineLoader {
    /// Build the registry in fixed priority order: serper, tavily, duckduckgo
    pub fn load(settings: &ProviderSettings) -> EngineRegistry {
        let mut registry = EngineRegistry::new();

        Self::add(
            &mut registry,
            &settings.serper,
            Arc::new(serper::Serper::new(&settings.serper)),
        );
        Self::add(
            &mut registry,
            &settings.tavily,
            Arc::new(tavily::Tavily::new(&settings.tavily)),
        );
        Self::add(
            &mut registry,
            &settings.duckduckgo,
            Arc::new(duckduckgo::DuckDuckGo::new(&settings.duckduckgo)),
        );

        registry
    }

    fn add(registry: &mut EngineRegistry, config: &ProviderConfig, engine: Arc<dyn Engine>) {
        if config.disabled {
            info!("Skipping disabled engine: {}", engine.name());
            return;
        }
        info!(
            "Loaded engine: {} (configured={})",
            engine.name(),
            engine.is_configured()
        );
        registry.register(engine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_order() {
        let registry = EngineLoader::load(&ProviderSettings::default());
        assert_eq!(registry.names(), vec!["serper", "tavily", "duckduckgo"]);
        let configured: Vec<bool> = registry.iter().map(|e| e.is_configured()).collect();
        assert_eq!(configured, vec![false, false, true]);
    }

    #[test]
    fn test_load_skips_disabled() {
        let mut settings = ProviderSettings::default();
        settings.tavily.disabled = true;
        settings.serper.api_key = Some("key".to_string());

        let registry = EngineLoader::load(&settings);
        assert_eq!(registry.names(), vec!["serper", "duckduckgo"]);
        assert!(registry.iter().next().unwrap().is_configured());
    }
}
