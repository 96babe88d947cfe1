//! Aggregate statistics over a salon's bookings.

use booking_store::{Booking, BookingStatus, Money, PaymentStatus, SalonId};
use serde::{Deserialize, Serialize};

/// Per-salon booking statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonReport {
    pub salon_id: SalonId,
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub confirmed_bookings: u64,
    pub completed_bookings: u64,
    pub cancelled_bookings: u64,
    /// Sum of total prices of paid bookings.
    pub total_earnings: Money,
    /// Sum of total prices of refunded bookings.
    pub total_refund: Money,
    /// Non-cancelled bookings whose payment is still pending.
    pub pending_payments: u64,
}

impl SalonReport {
    /// Creates an empty report for a salon.
    pub fn empty(salon_id: SalonId) -> Self {
        Self {
            salon_id,
            total_bookings: 0,
            pending_bookings: 0,
            confirmed_bookings: 0,
            completed_bookings: 0,
            cancelled_bookings: 0,
            total_earnings: Money::zero(),
            total_refund: Money::zero(),
            pending_payments: 0,
        }
    }

    /// Folds bookings into a report. Bookings of other salons are ignored.
    pub fn from_bookings<'a>(salon_id: SalonId, bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        bookings
            .into_iter()
            .filter(|b| b.salon_id == salon_id)
            .fold(Self::empty(salon_id), |mut report, booking| {
                report.record(booking);
                report
            })
    }

    fn record(&mut self, booking: &Booking) {
        self.total_bookings += 1;
        match booking.status {
            BookingStatus::Pending => self.pending_bookings += 1,
            BookingStatus::Confirm => self.confirmed_bookings += 1,
            BookingStatus::Completed => self.completed_bookings += 1,
            BookingStatus::Cancelled => self.cancelled_bookings += 1,
        }
        match booking.payment_status {
            PaymentStatus::Paid => self.total_earnings += booking.total_price,
            PaymentStatus::Refunded => self.total_refund += booking.total_price,
            PaymentStatus::Pending if booking.status.holds_slot() => self.pending_payments += 1,
            PaymentStatus::Pending | PaymentStatus::Failed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use booking_store::{BookingId, CustomerId, PaymentMethod, ServiceId};
    use chrono::{Duration, Utc};

    use super::*;

    fn booking(salon_id: SalonId, price: i64, status: BookingStatus, payment: PaymentStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::new(),
            customer_id: CustomerId::new(),
            salon_id,
            service_ids: BTreeSet::from([ServiceId::new()]),
            start_time: now,
            end_time: now + Duration::minutes(30),
            total_price: Money::new(price),
            payment_method: PaymentMethod::Card,
            status,
            payment_status: payment,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_salon_reports_zeroes() {
        let salon = SalonId::new();
        let report = SalonReport::from_bookings(salon, &Vec::<Booking>::new());
        assert_eq!(report, SalonReport::empty(salon));
    }

    #[test]
    fn counts_statuses_and_sums_money() {
        let salon = SalonId::new();
        let bookings = vec![
            booking(salon, 500, BookingStatus::Confirm, PaymentStatus::Paid),
            booking(salon, 300, BookingStatus::Completed, PaymentStatus::Paid),
            booking(salon, 200, BookingStatus::Pending, PaymentStatus::Pending),
            booking(salon, 700, BookingStatus::Cancelled, PaymentStatus::Failed),
            booking(salon, 400, BookingStatus::Cancelled, PaymentStatus::Refunded),
            booking(salon, 100, BookingStatus::Cancelled, PaymentStatus::Pending),
        ];

        let report = SalonReport::from_bookings(salon, &bookings);

        assert_eq!(report.total_bookings, 6);
        assert_eq!(report.pending_bookings, 1);
        assert_eq!(report.confirmed_bookings, 1);
        assert_eq!(report.completed_bookings, 1);
        assert_eq!(report.cancelled_bookings, 3);
        assert_eq!(report.total_earnings, Money::new(800));
        assert_eq!(report.total_refund, Money::new(400));
        assert_eq!(report.pending_payments, 1);
    }

    #[test]
    fn other_salons_are_ignored() {
        let salon = SalonId::new();
        let bookings = vec![
            booking(salon, 500, BookingStatus::Pending, PaymentStatus::Pending),
            booking(SalonId::new(), 900, BookingStatus::Confirm, PaymentStatus::Paid),
        ];

        let report = SalonReport::from_bookings(salon, &bookings);
        assert_eq!(report.total_bookings, 1);
        assert_eq!(report.total_earnings, Money::zero());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(SalonReport::empty(SalonId::new())).unwrap();
        assert!(json.get("totalEarnings").is_some());
        assert!(json.get("pendingPayments").is_some());
    }
}
