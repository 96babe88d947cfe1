//! Lookup client traits and in-memory implementations.

pub mod offering;
pub mod salon;
pub mod user;

pub use offering::{InMemoryServiceOfferingClient, ServiceOfferingClient};
pub use salon::{InMemorySalonClient, SalonClient};
pub use user::{InMemoryUserClient, UserClient};
