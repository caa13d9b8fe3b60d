//! Application state shared across handlers

use crate::agent::Agent;
use crate::engines::{EngineAbout, EngineRegistry};
use crate::mail::EmailSender;
use serde::Serialize;
use std::sync::Arc;

/// Provider entry reported by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub configured: bool,
    #[serde(flatten)]
    pub about: EngineAbout,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Drafting pipeline
    pub agent: Arc<Agent>,
    /// Outgoing mail
    pub mailer: Arc<dyn EmailSender>,
    /// Configured search providers, reported by `/health`
    pub registry: Arc<EngineRegistry>,
}

impl AppState {
    /// Create new application state
    pub fn new(agent: Agent, mailer: Arc<dyn EmailSender>, registry: Arc<EngineRegistry>) -> Self {
        Self {
            agent: Arc::new(agent),
            mailer,
            registry,
        }
    }

    /// Names of the providers that will actually be queried
    pub fn active_providers(&self) -> Vec<&str> {
        self.registry
            .iter()
            .filter(|engine| engine.is_configured())
            .map(|engine| engine.name())
            .collect()
    }

    /// Every registered provider in query order, configured or not
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.registry
            .iter()
            .map(|engine| ProviderStatus {
                name: engine.name().to_string(),
                configured: engine.is_configured(),
                about: engine.about(),
            })
            .collect()
    }
}
