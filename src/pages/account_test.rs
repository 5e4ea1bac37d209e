use super::*;
use crate::error::TransportError;
use crate::testing::Harness;

#[tokio::test]
async fn active_subscription_reports_meals_remaining() {
    let h = Harness::logged_in("acc", "ref");
    h.transport.respond(
        SUBSCRIPTION_ENDPOINT,
        200,
        r#"{"subscription":{"id":1,"subscription_type":"weekly","meals_remaining":4,"is_active":true}}"#,
    );

    let status = load_subscription(&h.dispatcher).await;

    assert_eq!(status, SubscriptionStatus::Active { meals_remaining: Some(4) });
    assert_eq!(status.label(), "Active");
    assert_eq!(status.meals_remaining_text(), "4");
}

#[tokio::test]
async fn subscription_without_count_is_still_active() {
    let h = Harness::logged_in("acc", "ref");
    h.transport.respond(
        SUBSCRIPTION_ENDPOINT,
        200,
        r#"{"subscription":{"id":1,"meals_remaining":null,"is_active":true}}"#,
    );

    let status = load_subscription(&h.dispatcher).await;

    assert_eq!(status, SubscriptionStatus::Active { meals_remaining: None });
    assert_eq!(status.label(), "Active");
    assert_eq!(status.meals_remaining_text(), "-");
}

#[tokio::test]
async fn null_subscription_is_none_not_error() {
    let h = Harness::logged_in("acc", "ref");
    h.transport
        .respond(SUBSCRIPTION_ENDPOINT, 200, r#"{"subscription":null}"#);

    let status = load_subscription(&h.dispatcher).await;

    assert_eq!(status, SubscriptionStatus::None);
    assert_eq!(status.meals_remaining_text(), "-");
}

#[tokio::test]
async fn subscription_failure_is_unavailable() {
    let h = Harness::logged_in("acc", "ref");
    h.transport
        .fail(SUBSCRIPTION_ENDPOINT, TransportError::Request("offline".to_owned()));

    assert_eq!(load_subscription(&h.dispatcher).await, SubscriptionStatus::Unavailable);
}

#[tokio::test]
async fn balance_reads_wallet_or_zero() {
    let h = Harness::logged_in("acc", "ref");
    h.transport
        .respond(WALLET_ENDPOINT, 200, r#"{"wallet":{"balance":152.5}}"#);
    h.transport.respond(WALLET_ENDPOINT, 200, r#"{"wallet":null}"#);
    h.transport.respond(WALLET_ENDPOINT, 500, "oops");

    assert!((load_balance(&h.dispatcher).await - 152.5).abs() < f64::EPSILON);
    assert!(load_balance(&h.dispatcher).await.abs() < f64::EPSILON);
    assert!(load_balance(&h.dispatcher).await.abs() < f64::EPSILON);
}

#[tokio::test]
async fn summary_loads_sequentially_and_falls_back_independently() {
    let h = Harness::logged_in("acc", "ref");
    h.transport.respond(SUBSCRIPTION_ENDPOINT, 503, "");
    h.transport
        .respond(WALLET_ENDPOINT, 200, r#"{"wallet":{"balance":20}}"#);

    let summary = load_account_summary(&h.dispatcher).await;

    assert_eq!(summary.subscription, SubscriptionStatus::Unavailable);
    assert!((summary.balance - 20.0).abs() < f64::EPSILON);
    let urls: Vec<_> = h.transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, vec![SUBSCRIPTION_ENDPOINT.to_owned(), WALLET_ENDPOINT.to_owned()]);
}

#[test]
fn format_balance_uses_two_decimals() {
    assert_eq!(format_balance(0.0), "0.00 ₽");
    assert_eq!(format_balance(99.999), "100.00 ₽");
}

#[test]
fn render_summary_includes_all_tiles() {
    let html = render_account_summary(&AccountSummary {
        subscription: SubscriptionStatus::Active { meals_remaining: Some(3) },
        balance: 12.3,
    });
    assert!(html.contains(">Active<"));
    assert!(html.contains(">3<"));
    assert!(html.contains(">12.30 ₽<"));

    let html = render_account_summary(&AccountSummary { subscription: SubscriptionStatus::None, balance: 0.0 });
    assert!(html.contains(">None<"));
    assert!(html.contains(">-<"));
}
