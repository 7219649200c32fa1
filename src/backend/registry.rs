// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Backend registry for selecting a backend by name.
//!
//! Backends are stateful (they hold the circuit under construction), so the
//! registry stores factories rather than instances. Each [`create`] call
//! hands out a fresh, exclusively owned backend for one engine.
//!
//! [`create`]: BackendRegistry::create

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::{BackendType, QuantumBackend};
use crate::error::{BackendError, Error, Result};

/// Constructor for a backend instance.
pub type BackendFactory = Arc<dyn Fn() -> Box<dyn QuantumBackend> + Send + Sync>;

struct Entry {
    backend_type: BackendType,
    factory: BackendFactory,
}

/// Thread-safe map from backend name to factory.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use plateau_navigator::backend::{BackendFactory, BackendRegistry, BackendType, QuantumBackend};
///
/// let registry = BackendRegistry::new();
/// let factory: BackendFactory = Arc::new(|| -> Box<dyn QuantumBackend> { Box::new(MySim::new(4)) });
/// registry.register("local_sim", BackendType::Simulator, factory);
///
/// let backend = registry.create("local_sim")?;
/// ```
pub struct BackendRegistry {
    /// Registered factories
    entries: RwLock<HashMap<String, Entry>>,

    /// Default backend name
    default_backend: RwLock<Option<String>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_backend: RwLock::new(None),
        }
    }

    /// Register a factory under `name`.
    ///
    /// An existing entry with the same name is replaced. The first
    /// registered backend becomes the default.
    pub fn register(&self, name: &str, backend_type: BackendType, factory: BackendFactory) {
        info!(backend = %name, backend_type = %backend_type, "Registering backend");

        let mut entries = self.entries.write();
        entries.insert(
            name.to_string(),
            Entry {
                backend_type,
                factory,
            },
        );

        let mut default = self.default_backend.write();
        if default.is_none() {
            debug!(backend = %name, "Setting as default backend");
            *default = Some(name.to_string());
        }
    }

    /// Set the default backend.
    pub fn set_default(&self, name: &str) -> Result<()> {
        let entries = self.entries.read();
        if !entries.contains_key(name) {
            return Err(Error::Backend(BackendError::NotFound(name.to_string())));
        }

        let mut default = self.default_backend.write();
        *default = Some(name.to_string());
        info!(backend = %name, "Set as default backend");
        Ok(())
    }

    /// Build a new backend instance by name.
    pub fn create(&self, name: &str) -> Result<Box<dyn QuantumBackend>> {
        // Clone the factory so the lock is not held while it runs.
        let factory = {
            let entries = self.entries.read();
            entries
                .get(name)
                .map(|entry| Arc::clone(&entry.factory))
                .ok_or_else(|| Error::Backend(BackendError::NotFound(name.to_string())))?
        };
        debug!(backend = %name, "Creating backend instance");
        Ok(factory())
    }

    /// Build a new instance of the default backend.
    pub fn create_default(&self) -> Result<Box<dyn QuantumBackend>> {
        let name = self.default_backend.read().clone();
        match name {
            Some(name) => self.create(&name),
            None => Err(Error::Backend(BackendError::NotFound(
                "No default backend configured".to_string(),
            ))),
        }
    }

    /// Build by name, or the default if `name` is `None`.
    pub fn create_or_default(&self, name: Option<&str>) -> Result<Box<dyn QuantumBackend>> {
        match name {
            Some(n) => self.create(n),
            None => self.create_default(),
        }
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        let entries = self.entries.read();
        let mut names: Vec<String> = entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered names with their types, sorted by name.
    pub fn list_with_types(&self) -> Vec<(String, BackendType)> {
        let entries = self.entries.read();
        let mut listed: Vec<(String, BackendType)> = entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.backend_type))
            .collect();
        listed.sort_by(|a, b| a.0.cmp(&b.0));
        listed
    }

    /// Check if a backend is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a backend. Returns whether it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.entries.write().remove(name).is_some();

        if removed {
            info!(backend = %name, "Unregistered backend");

            let mut default = self.default_backend.write();
            if default.as_deref() == Some(name) {
                warn!(backend = %name, "Unregistered default backend");
                *default = None;
            }
        }

        removed
    }

    /// Get the default backend name.
    pub fn default_backend_name(&self) -> Option<String> {
        self.default_backend.read().clone()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
