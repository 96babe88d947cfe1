//! Service-offering lookup trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use booking_store::ServiceId;
use domain::ServiceSnapshot;

use crate::error::LookupError;

/// Read-only access to the service-offering service.
#[async_trait]
pub trait ServiceOfferingClient: Send + Sync {
    /// Fetches a service offering by id.
    async fn get_service(&self, service_id: ServiceId) -> Result<ServiceSnapshot, LookupError>;
}

#[derive(Debug, Default)]
struct InMemoryOfferingState {
    services: HashMap<ServiceId, ServiceSnapshot>,
    lookups: usize,
}

/// In-memory service catalogue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceOfferingClient {
    state: Arc<RwLock<InMemoryOfferingState>>,
}

impl InMemoryServiceOfferingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a service offering.
    pub fn insert(&self, service: ServiceSnapshot) {
        self.state
            .write()
            .unwrap()
            .services
            .insert(service.id, service);
    }

    /// Returns the number of lookups served so far.
    pub fn lookup_count(&self) -> usize {
        self.state.read().unwrap().lookups
    }
}

#[async_trait]
impl ServiceOfferingClient for InMemoryServiceOfferingClient {
    async fn get_service(&self, service_id: ServiceId) -> Result<ServiceSnapshot, LookupError> {
        let mut state = self.state.write().unwrap();
        state.lookups += 1;
        state
            .services
            .get(&service_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("Service", service_id))
    }
}
