//! Integration tests for notification handling.

use std::sync::Arc;

use common::{BookingId, Money};
use messaging::{
    BOOKING_SUBJECT, BookingNotification, MessagingError, NotificationMessage, PAYMENT_SUBJECT,
    PaymentNotification,
};
use notification::consumer::process;
use notification::{InMemoryEmailSender, default_registry};

fn booking_payload(email: &str) -> Vec<u8> {
    NotificationMessage::from(BookingNotification {
        booking_id: BookingId::new(),
        customer_email: email.to_string(),
        customer_name: "Tara".to_string(),
        salon_name: "Bloom".to_string(),
        service_name: "Facial, Threading".to_string(),
        start_time: "2025-09-10T15:00:00+00:00".to_string(),
        total_price: Money::new(1350),
    })
    .to_payload()
    .unwrap()
}

fn payment_payload() -> Vec<u8> {
    NotificationMessage::from(PaymentNotification {
        payment_id: "PAY-31".to_string(),
        booking_id: BookingId::new(),
        customer_email: "tara@example.com".to_string(),
        customer_name: "Tara".to_string(),
        amount: Money::new(1350),
        transaction_id: "TXN-31".to_string(),
    })
    .to_payload()
    .unwrap()
}

#[test]
fn registry_covers_both_subjects() {
    let registry = default_registry(Arc::new(InMemoryEmailSender::new()));
    assert_eq!(registry.subjects(), vec![BOOKING_SUBJECT, PAYMENT_SUBJECT]);
}

#[tokio::test]
async fn booking_notification_sends_confirmation() {
    let sender = InMemoryEmailSender::new();
    let registry = default_registry(Arc::new(sender.clone()));

    registry
        .dispatch(BOOKING_SUBJECT, &booking_payload("tara@example.com"))
        .await
        .unwrap();

    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "tara@example.com");
    assert_eq!(sent[0].subject, "Booking confirmed at Bloom");
    assert!(sent[0].body.contains("Facial, Threading"));
}

#[tokio::test]
async fn payment_notification_sends_receipt() {
    let sender = InMemoryEmailSender::new();
    let registry = default_registry(Arc::new(sender.clone()));

    registry.dispatch(PAYMENT_SUBJECT, &payment_payload()).await.unwrap();

    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Payment receipt PAY-31");
}

#[tokio::test]
async fn malformed_payload_is_a_serialization_error() {
    let registry = default_registry(Arc::new(InMemoryEmailSender::new()));

    let result = registry.dispatch(BOOKING_SUBJECT, b"{\"bookingId\": 42}").await;
    assert!(matches!(result, Err(MessagingError::Serialization(_))));
}

#[tokio::test]
async fn email_failure_names_the_handler() {
    let sender = InMemoryEmailSender::new();
    sender.set_fail_on_send(true);
    let registry = default_registry(Arc::new(sender));

    let result = registry.dispatch(PAYMENT_SUBJECT, &payment_payload()).await;
    assert!(matches!(
        result,
        Err(MessagingError::Handler { handler: "payment-receipt", .. })
    ));
}

#[tokio::test]
async fn process_swallows_failures_and_keeps_going() {
    let sender = InMemoryEmailSender::new();
    let registry = default_registry(Arc::new(sender.clone()));

    assert!(!process(&registry, BOOKING_SUBJECT, b"not json").await);
    assert!(!process(&registry, "notifications.unknown", b"{}").await);
    assert!(!process(&registry, BOOKING_SUBJECT, &booking_payload("no-at-sign")).await);
    assert!(process(&registry, BOOKING_SUBJECT, &booking_payload("ok@example.com")).await);

    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ok@example.com");
}
