//! Dependencies injected into the storefront reducer.

use crate::api::ShopApi;
use larek_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Storefront environment
///
/// Cheap to clone; both dependencies are shared.
#[derive(Clone)]
pub struct StorefrontEnvironment {
    /// Shop API client
    pub api: Arc<dyn ShopApi>,
    /// Time source for receipts
    pub clock: Arc<dyn Clock>,
}

impl StorefrontEnvironment {
    /// Environment with an explicit clock
    #[must_use]
    pub fn new(api: Arc<dyn ShopApi>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// Environment using the system clock
    #[must_use]
    pub fn with_system_clock(api: Arc<dyn ShopApi>) -> Self {
        Self::new(api, Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for StorefrontEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontEnvironment").finish_non_exhaustive()
    }
}
