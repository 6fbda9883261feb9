//! Engine configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, CapacityResource, DEFAULT_MAX_METADATA_BYTES};

/// Environment variable naming the JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "ADMISSION_CONFIG_PATH";

const fn default_accepting() -> bool {
    true
}

const fn default_lock_timeout_ms() -> u64 {
    5_000
}

const fn default_max_metadata_bytes() -> usize {
    DEFAULT_MAX_METADATA_BYTES
}

const fn default_audit_buffer() -> usize {
    1024
}

/// Resource seeded into the in-memory directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Developer allowed to decide on applications.
    pub owner_id: String,
    /// Number of seats.
    pub capacity: u32,
    /// Whether applications are accepted at startup.
    #[serde(default = "default_accepting")]
    pub accepting_requests: bool,
}

/// Store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum wait for a resource's isolation, in milliseconds.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Lock timeout as a `Duration`.
    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// Root engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Map of resource id to configuration.
    #[serde(default)]
    pub resources: HashMap<String, ResourceConfig>,
    /// Store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Maximum serialized size of submission metadata.
    #[serde(default = "default_max_metadata_bytes")]
    pub max_metadata_bytes: usize,
    /// Number of audit events retained in memory; 0 disables auditing.
    #[serde(default = "default_audit_buffer")]
    pub audit_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resources: HashMap::new(),
            store: StoreConfig::default(),
            max_metadata_bytes: default_max_metadata_bytes(),
            audit_buffer: default_audit_buffer(),
        }
    }
}

impl ResourceConfig {
    /// Validate resource configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.owner_id.trim().is_empty() {
            return Err("owner_id must not be empty".into());
        }
        Ok(())
    }

    /// Snapshot for the resource directory.
    pub fn to_resource(&self, id: &str) -> CapacityResource {
        CapacityResource {
            id: id.to_string(),
            owner_id: self.owner_id.clone(),
            capacity: self.capacity,
            accepting_requests: self.accepting_requests,
        }
    }
}

impl EngineConfig {
    /// Validate store settings, limits and every resource.
    pub fn validate(&self) -> Result<(), String> {
        if self.store.lock_timeout_ms == 0 {
            return Err("store.lock_timeout_ms must be greater than 0".into());
        }
        if self.max_metadata_bytes == 0 {
            return Err("max_metadata_bytes must be greater than 0".into());
        }
        for (name, resource) in &self.resources {
            if name.trim().is_empty() {
                return Err("resource ids must not be empty".into());
            }
            resource
                .validate()
                .map_err(|e| format!("resource `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse engine configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `.env` if present, then read the file named by
    /// [`CONFIG_PATH_ENV`]. Falls back to defaults when the variable is unset.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env loaded: {}", e);
        }
        let Ok(path) = std::env::var(CONFIG_PATH_ENV) else {
            tracing::info!("{} not set, using default engine config", CONFIG_PATH_ENV);
            let cfg = Self::default();
            cfg.validate().map_err(anyhow::Error::msg)?;
            return Ok(cfg);
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading engine config from {path}"))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid engine config in {path}"))
    }
}
