use booking_store::{CustomerId, PaymentMethod, SalonId, ServiceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer's request to book one or more services at a salon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub salon_id: SalonId,
    pub service_ids: Vec<ServiceId>,
    pub start_time: DateTime<Utc>,
    pub payment_method: PaymentMethod,
}

/// The authenticated caller, as forwarded by the gateway.
///
/// Name and email, when present, take precedence over the user service's
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: CustomerId,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl CallerIdentity {
    pub fn new(user_id: CustomerId) -> Self {
        Self {
            user_id,
            full_name: None,
            email: None,
        }
    }

    pub fn with_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
