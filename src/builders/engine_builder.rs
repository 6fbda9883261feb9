//! Builder for an in-memory admission engine.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::core::{AdmissionEngine, AdmissionError, AuditSink, EngineLimits, SharedAuditLog};
use crate::infra::{InMemoryStore, StaticResourceDirectory};
use crate::util::clock::Clock;

/// Engine backed by the in-memory store and directory.
pub type InMemoryEngine = AdmissionEngine<InMemoryStore, StaticResourceDirectory>;

/// Assembles an [`InMemoryEngine`] from an [`EngineConfig`].
pub struct EngineBuilder {
    config: EngineConfig,
    clock: Option<Arc<dyn Clock>>,
    audit: Option<Box<dyn AuditSink>>,
    audit_log: Option<SharedAuditLog>,
}

impl EngineBuilder {
    /// Start from a configuration. A bounded audit log is attached when
    /// `audit_buffer` is non-zero.
    pub fn new(config: EngineConfig) -> Self {
        let audit_log = (config.audit_buffer > 0).then(|| SharedAuditLog::new(config.audit_buffer));
        Self {
            config,
            clock: None,
            audit: None,
            audit_log,
        }
    }

    /// Configuration being built.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle to the default audit log, if one will be attached.
    pub fn audit_log(&self) -> Option<SharedAuditLog> {
        self.audit_log.clone()
    }

    /// Use a custom clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a custom audit sink instead of the default log.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self.audit_log = None;
        self
    }

    /// Validate the configuration and assemble the engine.
    pub fn build(self) -> Result<InMemoryEngine, AdmissionError> {
        self.config
            .validate()
            .map_err(|e| AdmissionError::Validation(format!("config invalid: {e}")))?;

        let directory = StaticResourceDirectory::from_resources(
            self.config
                .resources
                .iter()
                .map(|(id, resource)| resource.to_resource(id)),
        )?;
        let store = InMemoryStore::new(self.config.store.lock_timeout());
        let limits = EngineLimits {
            max_metadata_bytes: self.config.max_metadata_bytes,
        };

        let mut engine = AdmissionEngine::new(store, directory, limits);
        if let Some(clock) = self.clock {
            engine = engine.with_clock(clock);
        }
        if let Some(audit) = self.audit {
            engine = engine.with_audit(audit);
        } else if let Some(log) = self.audit_log {
            engine = engine.with_audit(Box::new(log));
        }
        tracing::info!(
            "admission engine built with {} resources",
            self.config.resources.len()
        );
        Ok(engine)
    }
}

/// Build an in-memory engine from configuration with default clock and audit.
pub fn build_engine(cfg: &EngineConfig) -> Result<InMemoryEngine, AdmissionError> {
    EngineBuilder::new(cfg.clone()).build()
}
