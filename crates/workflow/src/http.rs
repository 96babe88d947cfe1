//! HTTP lookup clients for the user, salon and service-offering services.
//!
//! Each client issues `GET {base_url}/{resource}/{id}` and maps the camelCase
//! JSON body to a domain snapshot. A `404` becomes [`LookupError::NotFound`];
//! transport failures and other non-success statuses become
//! [`LookupError::Unavailable`].

use std::fmt::Display;

use async_trait::async_trait;
use booking_store::{CustomerId, Money, SalonId, ServiceId};
use chrono::NaiveTime;
use domain::{CustomerSnapshot, SalonSnapshot, ServiceSnapshot};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::LookupError;
use crate::services::{SalonClient, ServiceOfferingClient, UserClient};

#[derive(Debug, Clone)]
struct Endpoint {
    client: reqwest::Client,
    base_url: String,
    resource: &'static str,
    kind: &'static str,
}

impl Endpoint {
    fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        resource: &'static str,
        kind: &'static str,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            resource,
            kind,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, id: impl Display) -> Result<T, LookupError> {
        let url = format!("{}/{}/{}", self.base_url, self.resource, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Unavailable {
                kind: self.kind,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::not_found(self.kind, id));
        }
        if !status.is_success() {
            metrics::counter!("lookup_failures_total", "kind" => self.kind).increment(1);
            return Err(LookupError::Unavailable {
                kind: self.kind,
                reason: format!("GET {url} returned {status}"),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LookupError::InvalidResponse {
                kind: self.kind,
                reason: e.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    full_name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SalonDto {
    name: String,
    address: Option<String>,
    city: Option<String>,
    email: Option<String>,
    open_time: Option<NaiveTime>,
    close_time: Option<NaiveTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDto {
    name: String,
    price: i64,
    /// Minutes.
    duration: u32,
    salon_id: SalonId,
}

/// User service client (`GET /users/{id}`).
#[derive(Debug, Clone)]
pub struct HttpUserClient {
    endpoint: Endpoint,
}

impl HttpUserClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            endpoint: Endpoint::new(client, base_url, "users", "User"),
        }
    }
}

#[async_trait]
impl UserClient for HttpUserClient {
    #[tracing::instrument(skip(self))]
    async fn get_user(&self, user_id: CustomerId) -> Result<CustomerSnapshot, LookupError> {
        let dto: UserDto = self.endpoint.fetch(user_id).await?;
        Ok(CustomerSnapshot::new(user_id, dto.full_name, dto.email))
    }
}

/// Salon service client (`GET /salons/{id}`).
#[derive(Debug, Clone)]
pub struct HttpSalonClient {
    endpoint: Endpoint,
}

impl HttpSalonClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            endpoint: Endpoint::new(client, base_url, "salons", "Salon"),
        }
    }
}

#[async_trait]
impl SalonClient for HttpSalonClient {
    #[tracing::instrument(skip(self))]
    async fn get_salon(&self, salon_id: SalonId) -> Result<SalonSnapshot, LookupError> {
        let dto: SalonDto = self.endpoint.fetch(salon_id).await?;
        Ok(SalonSnapshot {
            id: salon_id,
            name: dto.name,
            address: dto.address,
            city: dto.city,
            email: dto.email,
            open_time: dto.open_time,
            close_time: dto.close_time,
        })
    }
}

/// Service-offering client (`GET /services/{id}`).
#[derive(Debug, Clone)]
pub struct HttpServiceOfferingClient {
    endpoint: Endpoint,
}

impl HttpServiceOfferingClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            endpoint: Endpoint::new(client, base_url, "services", "Service"),
        }
    }
}

#[async_trait]
impl ServiceOfferingClient for HttpServiceOfferingClient {
    #[tracing::instrument(skip(self))]
    async fn get_service(&self, service_id: ServiceId) -> Result<ServiceSnapshot, LookupError> {
        let dto: ServiceDto = self.endpoint.fetch(service_id).await?;
        Ok(ServiceSnapshot::new(
            service_id,
            dto.salon_id,
            dto.name,
            Money::new(dto.price),
            dto.duration,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = HttpUserClient::new(reqwest::Client::new(), "http://users:8001/");
        assert_eq!(client.endpoint.base_url, "http://users:8001");
    }

    #[test]
    fn salon_dto_parses_opening_hours() {
        let dto: SalonDto = serde_json::from_value(serde_json::json!({
            "name": "Glow",
            "openTime": "09:00:00",
            "closeTime": "18:30:00"
        }))
        .unwrap();

        assert_eq!(dto.open_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(dto.close_time, NaiveTime::from_hms_opt(18, 30, 0));
        assert!(dto.city.is_none());
    }
}
