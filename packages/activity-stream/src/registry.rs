//! Registered-adapter mapping from provider tag to processing chain.

use std::collections::HashMap;
use std::sync::Arc;

use crate::normalize::Normalizer;
use crate::traits::adapter::ProviderAdapter;
use crate::traits::policy::VisibilityPolicy;
use crate::types::Provider;

/// One provider's full processing chain.
pub struct ProviderRegistration {
    pub adapter: Arc<dyn ProviderAdapter>,
    pub normalizer: Normalizer,
    pub policy: Arc<dyn VisibilityPolicy>,
}

/// Mapping from provider tag to its registered chain.
///
/// Providers without a registration (notably `Unknown`) are skipped
/// silently by the orchestrator, keeping the cycle forward-compatible
/// with provider tags this build does not know.
#[derive(Default)]
pub struct ProviderRegistry {
    registrations: HashMap<Provider, ProviderRegistration>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chain under the adapter's own provider tag.
    pub fn register(
        &mut self,
        adapter: Arc<dyn ProviderAdapter>,
        normalizer: Normalizer,
        policy: Arc<dyn VisibilityPolicy>,
    ) {
        self.registrations.insert(
            adapter.provider(),
            ProviderRegistration {
                adapter,
                normalizer,
                policy,
            },
        );
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(
        mut self,
        adapter: Arc<dyn ProviderAdapter>,
        normalizer: Normalizer,
        policy: Arc<dyn VisibilityPolicy>,
    ) -> Self {
        self.register(adapter, normalizer, policy);
        self
    }

    pub fn get(&self, provider: Provider) -> Option<&ProviderRegistration> {
        self.registrations.get(&provider)
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
