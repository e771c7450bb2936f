//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::PayrollEngine;
use crate::config::ConfigLoader;
use crate::store::{InMemoryRepository, PayrollRepository};

/// Shared application state.
///
/// Holds the payroll engine and the repository that `/payroll/run` reads
/// snapshots from and stores results into.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<PayrollEngine>,
    repository: Arc<dyn PayrollRepository>,
}

impl AppState {
    /// Creates application state from a loaded configuration and a repository.
    pub fn new(config: ConfigLoader, repository: Arc<dyn PayrollRepository>) -> Self {
        Self::with_engine(PayrollEngine::new(config.policy().clone()), repository)
    }

    /// Creates application state around an already-built engine.
    pub fn with_engine(engine: PayrollEngine, repository: Arc<dyn PayrollRepository>) -> Self {
        Self {
            engine: Arc::new(engine),
            repository,
        }
    }

    /// Creates application state backed by an empty in-memory repository.
    pub fn in_memory(config: ConfigLoader) -> Self {
        Self::new(config, Arc::new(InMemoryRepository::new()))
    }

    /// Returns the payroll engine.
    pub fn engine(&self) -> &PayrollEngine {
        &self.engine
    }

    /// Returns the repository.
    pub fn repository(&self) -> &dyn PayrollRepository {
        self.repository.as_ref()
    }
}
