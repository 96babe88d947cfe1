//! Salon lookup trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use booking_store::SalonId;
use domain::SalonSnapshot;

use crate::error::LookupError;

/// Read-only access to the salon service.
#[async_trait]
pub trait SalonClient: Send + Sync {
    /// Fetches a salon by id.
    async fn get_salon(&self, salon_id: SalonId) -> Result<SalonSnapshot, LookupError>;
}

#[derive(Debug, Default)]
struct InMemorySalonState {
    salons: HashMap<SalonId, SalonSnapshot>,
    unavailable: bool,
}

/// In-memory salon directory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySalonClient {
    state: Arc<RwLock<InMemorySalonState>>,
}

impl InMemorySalonClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a salon.
    pub fn insert(&self, salon: SalonSnapshot) {
        self.state.write().unwrap().salons.insert(salon.id, salon);
    }

    /// Makes every lookup fail as if the service were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl SalonClient for InMemorySalonClient {
    async fn get_salon(&self, salon_id: SalonId) -> Result<SalonSnapshot, LookupError> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(LookupError::Unavailable {
                kind: "Salon",
                reason: "connection refused".to_string(),
            });
        }
        state
            .salons
            .get(&salon_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("Salon", salon_id))
    }
}
