//! Plain-text email bodies.

use chrono::DateTime;
use messaging::{BookingNotification, PaymentNotification};

/// Subject and body of a rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub body: String,
}

/// Formats an RFC 3339 timestamp for people; anything unparseable is shown
/// as received.
fn human_time(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.format("%A, %d %B %Y at %H:%M (UTC%:z)").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn booking_confirmation(n: &BookingNotification) -> Rendered {
    Rendered {
        subject: format!("Booking confirmed at {}", n.salon_name),
        body: format!(
            "Hi {name},\n\n\
             Your booking at {salon} is confirmed.\n\n\
             Services: {services}\n\
             When: {when}\n\
             Total: INR {total}\n\
             Booking reference: {id}\n\n\
             We look forward to seeing you.\n",
            name = n.customer_name,
            salon = n.salon_name,
            services = n.service_name,
            when = human_time(&n.start_time),
            total = n.total_price,
            id = n.booking_id,
        ),
    }
}

pub fn payment_receipt(n: &PaymentNotification) -> Rendered {
    Rendered {
        subject: format!("Payment receipt {}", n.payment_id),
        body: format!(
            "Hi {name},\n\n\
             We received your payment of INR {amount}.\n\n\
             Payment: {payment}\n\
             Transaction: {txn}\n\
             Booking reference: {booking}\n\n\
             Thank you.\n",
            name = n.customer_name,
            amount = n.amount,
            payment = n.payment_id,
            txn = n.transaction_id,
            booking = n.booking_id,
        ),
    }
}

#[cfg(test)]
mod tests {
    use common::{BookingId, Money};

    use super::*;

    fn booking(start_time: &str) -> BookingNotification {
        BookingNotification {
            booking_id: BookingId::new(),
            customer_email: "nisha@example.com".to_string(),
            customer_name: "Nisha".to_string(),
            salon_name: "Velvet".to_string(),
            service_name: "Manicure, Pedicure".to_string(),
            start_time: start_time.to_string(),
            total_price: Money::new(1100),
        }
    }

    #[test]
    fn confirmation_lists_services_and_total() {
        let rendered = booking_confirmation(&booking("2025-06-02T10:30:00+00:00"));

        assert_eq!(rendered.subject, "Booking confirmed at Velvet");
        assert!(rendered.body.starts_with("Hi Nisha,"));
        assert!(rendered.body.contains("Services: Manicure, Pedicure"));
        assert!(rendered.body.contains("Monday, 02 June 2025 at 10:30"));
        assert!(rendered.body.contains("Total: INR 1100"));
    }

    #[test]
    fn unparseable_time_is_shown_verbatim() {
        let rendered = booking_confirmation(&booking("tomorrow morning"));
        assert!(rendered.body.contains("When: tomorrow morning"));
    }

    #[test]
    fn receipt_mentions_transaction() {
        let rendered = payment_receipt(&PaymentNotification {
            payment_id: "PAY-7".to_string(),
            booking_id: BookingId::new(),
            customer_email: "nisha@example.com".to_string(),
            customer_name: "Nisha".to_string(),
            amount: Money::new(1100),
            transaction_id: "TXN-77".to_string(),
        });

        assert_eq!(rendered.subject, "Payment receipt PAY-7");
        assert!(rendered.body.contains("INR 1100"));
        assert!(rendered.body.contains("Transaction: TXN-77"));
    }
}
