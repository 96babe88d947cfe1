//! The booking entity and its status enums.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{BookingId, CustomerId, Money, SalonId, ServiceId};

/// Lifecycle status of a booking.
///
/// ```text
/// Pending ──┬──► Confirm ──► Completed
///           │       │
///           └───────┴──► Cancelled
/// ```
///
/// Explicit status updates may set any status; the payment coupling in
/// [`Booking::apply_payment_status`] is the only forced transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created, awaiting payment or confirmation.
    #[default]
    Pending,

    /// Confirmed by the salon or by a successful payment.
    Confirm,

    /// The appointment took place.
    Completed,

    /// Cancelled explicitly or because payment failed.
    Cancelled,
}

impl BookingStatus {
    /// Returns true if the booking still occupies its time slot.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirm => "CONFIRM",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRM" => Ok(BookingStatus::Confirm),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

/// Payment status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Returns the booking status this payment status forces, if any.
    pub fn forced_booking_status(&self) -> Option<BookingStatus> {
        match self {
            PaymentStatus::Paid => Some(BookingStatus::Confirm),
            PaymentStatus::Failed => Some(BookingStatus::Cancelled),
            PaymentStatus::Pending | PaymentStatus::Refunded => None,
        }
    }

    /// Returns the wire name of the payment status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            "FAILED" => Ok(PaymentStatus::Failed),
            "REFUNDED" => Ok(PaymentStatus::Refunded),
            other => Err(format!("unknown payment status '{other}'")),
        }
    }
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Upi,
    Wallet,
    Cash,
}

impl PaymentMethod {
    /// Returns the wire name of the payment method.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Wallet => "WALLET",
            PaymentMethod::Cash => "CASH",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CARD" => Ok(PaymentMethod::Card),
            "UPI" => Ok(PaymentMethod::Upi),
            "WALLET" => Ok(PaymentMethod::Wallet),
            "CASH" => Ok(PaymentMethod::Cash),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

/// A scheduled reservation of one or more services at a salon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub customer_id: CustomerId,
    pub salon_id: SalonId,
    /// Services booked; duplicates collapse.
    pub service_ids: BTreeSet<ServiceId>,
    pub start_time: DateTime<Utc>,
    /// Start time plus the summed duration of all booked services.
    pub end_time: DateTime<Utc>,
    /// Sum of the booked services' prices at creation time.
    pub total_price: Money,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns the booked duration.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Returns true if `[start, end)` intersects this booking's interval.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Sets the booking status.
    pub fn set_status(&mut self, status: BookingStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Sets the payment status and applies the booking status it forces.
    ///
    /// `Paid` confirms the booking, `Failed` cancels it; other payment
    /// statuses leave the booking status untouched.
    pub fn apply_payment_status(&mut self, payment_status: PaymentStatus, now: DateTime<Utc>) {
        self.payment_status = payment_status;
        if let Some(status) = payment_status.forced_booking_status() {
            self.status = status;
        }
        self.updated_at = now;
    }
}
