//! User lookup trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use booking_store::CustomerId;
use domain::CustomerSnapshot;

use crate::error::LookupError;

/// Read-only access to the user service.
#[async_trait]
pub trait UserClient: Send + Sync {
    /// Fetches a user by id.
    async fn get_user(&self, user_id: CustomerId) -> Result<CustomerSnapshot, LookupError>;
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<CustomerId, CustomerSnapshot>,
    unavailable: bool,
}

/// In-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserClient {
    state: Arc<RwLock<InMemoryUserState>>,
}

impl InMemoryUserClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user.
    pub fn insert(&self, user: CustomerSnapshot) {
        self.state.write().unwrap().users.insert(user.id, user);
    }

    /// Makes every lookup fail as if the service were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl UserClient for InMemoryUserClient {
    async fn get_user(&self, user_id: CustomerId) -> Result<CustomerSnapshot, LookupError> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(LookupError::Unavailable {
                kind: "User",
                reason: "connection refused".to_string(),
            });
        }
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("User", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_inserted_user() {
        let client = InMemoryUserClient::new();
        let user = CustomerSnapshot::new(CustomerId::new(), "Meera Shah", "meera@example.com");
        client.insert(user.clone());

        assert_eq!(client.get_user(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let client = InMemoryUserClient::new();
        let err = client.get_user(CustomerId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unavailable_fails_even_for_known_users() {
        let client = InMemoryUserClient::new();
        let user = CustomerSnapshot::new(CustomerId::new(), "Meera", "meera@example.com");
        client.insert(user.clone());
        client.set_unavailable(true);

        let err = client.get_user(user.id).await.unwrap_err();
        assert!(matches!(err, LookupError::Unavailable { kind: "User", .. }));
    }
}
