//! Booking creation workflow.
//!
//! A booking references entities owned by sibling services. The
//! [`BookingWorkflow`] resolves them through the lookup clients in
//! [`services`], hands the snapshots to the domain for validation and
//! persistence, and queues a confirmation notification.
//!
//! Every lookup client has an HTTP implementation in [`http`] and an
//! in-memory implementation for tests and local runs.

pub mod coordinator;
pub mod error;
pub mod http;
pub mod request;
pub mod services;

pub use coordinator::BookingWorkflow;
pub use error::{LookupError, WorkflowError};
pub use http::{HttpSalonClient, HttpServiceOfferingClient, HttpUserClient};
pub use request::{BookingRequest, CallerIdentity};
pub use services::{
    InMemorySalonClient, InMemoryServiceOfferingClient, InMemoryUserClient, SalonClient,
    ServiceOfferingClient, UserClient,
};
