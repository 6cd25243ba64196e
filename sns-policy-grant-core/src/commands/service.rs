//! SNS Policy Grant Service Layer
//!
//! This module provides the main service interface that encapsulates the
//! fetch / reconcile / write cycle. The service owns its policy store for one
//! invocation and provides high-level operations (plan, apply, run) for the CLI.

use crate::aws::sns_client::{ClientConfig, SnsPolicyStore};
use crate::aws::store::PolicyStore;
use crate::error::PolicyGrantResult;

/// Main service struct that holds the policy store and provides business logic operations
pub struct PolicyGrantService<S = SnsPolicyStore> {
    pub(crate) store: S,
}

impl PolicyGrantService<SnsPolicyStore> {
    /// Create a new service instance backed by SNS
    ///
    /// The SDK configuration is loaded through the default credential provider
    /// chain, with the region and profile overrides from `config`.
    pub async fn new(config: &ClientConfig) -> PolicyGrantResult<Self> {
        let store = SnsPolicyStore::from_config(config).await?;
        Ok(Self::with_store(store))
    }
}

impl<S: PolicyStore> PolicyGrantService<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
