//! Booking endpoints.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use booking_store::{
    Booking, BookingId, BookingRepository, BookingStatus, CustomerId, Money, PaymentMethod,
    PaymentStatus, SalonId, ServiceId,
};
use chrono::{DateTime, NaiveDate, Utc};
use domain::SalonReport;
use serde::{Deserialize, Serialize};
use workflow::{BookingRequest, BookingWorkflow, CallerIdentity};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<R: BookingRepository> {
    pub workflow: BookingWorkflow<R>,
}

pub const USER_ID_HEADER: &str = "user-id";
pub const USER_NAME_HEADER: &str = "user-name";
pub const USER_EMAIL_HEADER: &str = "user-email";

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub customer_id: Option<String>,
    pub salon_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParams {
    pub payment_status: Option<String>,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub customer_id: CustomerId,
    pub salon_id: SalonId,
    pub service_ids: Vec<ServiceId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_price: Money,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            customer_id: b.customer_id,
            salon_id: b.salon_id,
            service_ids: b.service_ids.into_iter().collect(),
            start_time: b.start_time,
            end_time: b.end_time,
            total_price: b.total_price,
            payment_method: b.payment_method,
            status: b.status,
            payment_status: b.payment_status,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

fn to_responses(bookings: Vec<Booking>) -> Json<Vec<BookingResponse>> {
    Json(bookings.into_iter().map(BookingResponse::from).collect())
}

// -- Parsing helpers --

fn parse_id<T, E: Display>(
    raw: &str,
    what: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, ApiError> {
    parse(raw).map_err(|e| ApiError::BadRequest(format!("Invalid {what} '{raw}': {e}")))
}

fn parse_enum<T: FromStr<Err = String>>(raw: Option<String>, param: &str) -> Result<T, ApiError> {
    let raw =
        raw.ok_or_else(|| ApiError::BadRequest(format!("Missing query parameter '{param}'")))?;
    raw.trim().to_ascii_uppercase().parse().map_err(ApiError::BadRequest)
}

/// Accepts `YYYY-MM-DD` or an ISO date-time, whose date part is used.
fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let date_part = raw.split_once('T').map_or(raw, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| ApiError::BadRequest(format!("Invalid date '{raw}': {e}")))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn caller_identity(headers: &HeaderMap) -> Result<CallerIdentity, ApiError> {
    let raw = header_value(headers, USER_ID_HEADER)
        .ok_or_else(|| ApiError::BadRequest("Missing User-Id header".to_string()))?;
    let user_id = parse_id(&raw, "user id", CustomerId::parse)?;

    let mut identity = CallerIdentity::new(user_id);
    if let Some(name) = header_value(headers, USER_NAME_HEADER) {
        identity = identity.with_name(name);
    }
    if let Some(email) = header_value(headers, USER_EMAIL_HEADER) {
        identity = identity.with_email(email);
    }
    Ok(identity)
}

// -- Handlers --

/// POST /bookings: create a booking for the caller named in the headers.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn create<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let identity = caller_identity(&headers)?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let booking = state.workflow.create_booking(request, &identity).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// GET /bookings?customerId= or ?salonId=: list bookings by actor.
#[tracing::instrument(skip(state))]
pub async fn list<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state.workflow.bookings();

    if let Some(raw) = params.customer_id.as_deref() {
        let customer_id = parse_id(raw, "customer id", CustomerId::parse)?;
        return Ok(to_responses(bookings.bookings_by_customer(customer_id).await?));
    }
    if let Some(raw) = params.salon_id.as_deref() {
        let salon_id = parse_id(raw, "salon id", SalonId::parse)?;
        return Ok(to_responses(bookings.bookings_by_salon(salon_id).await?));
    }

    Err(ApiError::BadRequest(
        "Either customerId or salonId is required".to_string(),
    ))
}

/// GET /bookings/report?salonId=: aggregate statistics for a salon.
#[tracing::instrument(skip(state))]
pub async fn report<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<SalonReport>, ApiError> {
    let raw = params
        .salon_id
        .ok_or_else(|| ApiError::BadRequest("Missing query parameter 'salonId'".to_string()))?;
    let salon_id = parse_id(&raw, "salon id", SalonId::parse)?;

    Ok(Json(state.workflow.bookings().salon_report(salon_id).await?))
}

/// GET /bookings/slots/salon/{id}/date/{date}: a salon's bookings on one day.
#[tracing::instrument(skip(state))]
pub async fn slots<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path((salon_id, date)): Path<(String, String)>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let salon_id = parse_id(&salon_id, "salon id", SalonId::parse)?;
    let date = parse_date(&date)?;

    let bookings = state
        .workflow
        .bookings()
        .bookings_by_date(salon_id, date)
        .await?;
    Ok(to_responses(bookings))
}

/// GET /bookings/{id}: fetch one booking.
#[tracing::instrument(skip(state))]
pub async fn get<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_id(&id, "booking id", BookingId::parse)?;
    let booking = state.workflow.bookings().get_booking(booking_id).await?;
    Ok(Json(booking.into()))
}

/// PUT /bookings/{id}/status?status=: set the booking status.
#[tracing::instrument(skip(state))]
pub async fn update_status<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Query(params): Query<StatusParams>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_id(&id, "booking id", BookingId::parse)?;
    let status: BookingStatus = parse_enum(params.status, "status")?;

    let booking = state
        .workflow
        .bookings()
        .update_status(booking_id, status)
        .await?;
    Ok(Json(booking.into()))
}

/// PUT /bookings/{id}/payment?paymentStatus=: set the payment status.
#[tracing::instrument(skip(state))]
pub async fn update_payment<R: BookingRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Query(params): Query<PaymentParams>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking_id = parse_id(&id, "booking id", BookingId::parse)?;
    let payment_status: PaymentStatus = parse_enum(params.payment_status, "paymentStatus")?;

    let booking = state
        .workflow
        .bookings()
        .update_payment_status(booking_id, payment_status)
        .await?;
    Ok(Json(booking.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_accepts_plain_and_datetime_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(parse_date("2025-06-02").unwrap(), expected);
        assert_eq!(parse_date("2025-06-02T18:45:00Z").unwrap(), expected);
        assert_eq!(parse_date("2025-06-02T18:45:00.000+05:30").unwrap(), expected);
        assert!(parse_date("02/06/2025").is_err());
    }

    #[test]
    fn enum_params_are_case_insensitive() {
        let status: BookingStatus = parse_enum(Some("cancelled".to_string()), "status").unwrap();
        assert_eq!(status, BookingStatus::Cancelled);

        let missing: Result<PaymentStatus, _> = parse_enum(None, "paymentStatus");
        assert!(matches!(missing, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn identity_requires_user_id() {
        let headers = HeaderMap::new();
        assert!(matches!(caller_identity(&headers), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn identity_reads_optional_headers() {
        let user_id = CustomerId::new();
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, user_id.to_string().parse().unwrap());
        headers.insert(USER_NAME_HEADER, "Isha".parse().unwrap());
        headers.insert(USER_EMAIL_HEADER, "  ".parse().unwrap());

        let identity = caller_identity(&headers).unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.full_name.as_deref(), Some("Isha"));
        assert_eq!(identity.email, None);
    }
}
