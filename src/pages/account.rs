//! Subscription status and wallet balance tiles.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use crate::dispatch::Dispatcher;
use crate::models::{SubscriptionResponse, WalletResponse};

pub const SUBSCRIPTION_ENDPOINT: &str = "/api/subscription";
pub const WALLET_ENDPOINT: &str = "/api/wallet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    /// `None` when the backend has no count for the subscription.
    Active { meals_remaining: Option<i64> },
    None,
    Unavailable,
}

impl SubscriptionStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Active { .. } => "Active",
            Self::None => "None",
            Self::Unavailable => "Error",
        }
    }

    /// Meals left, or `-` when there is no count to show.
    #[must_use]
    pub fn meals_remaining_text(self) -> String {
        match self {
            Self::Active { meals_remaining: Some(count) } => count.to_string(),
            Self::Active { meals_remaining: None } | Self::None | Self::Unavailable => "-".to_owned(),
        }
    }
}

/// The two dashboard tiles, loaded one after the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountSummary {
    pub subscription: SubscriptionStatus,
    /// Roubles. Unknown balances display as zero.
    pub balance: f64,
}

pub async fn load_subscription(dispatcher: &Dispatcher) -> SubscriptionStatus {
    match dispatcher.get_json::<SubscriptionResponse>(SUBSCRIPTION_ENDPOINT).await {
        Ok(body) => match body.subscription {
            Some(sub) => SubscriptionStatus::Active { meals_remaining: sub.meals_remaining },
            None => SubscriptionStatus::None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "subscription unavailable");
            SubscriptionStatus::Unavailable
        }
    }
}

/// Wallet balance; no wallet and any failure both read as zero.
pub async fn load_balance(dispatcher: &Dispatcher) -> f64 {
    match dispatcher.get_json::<WalletResponse>(WALLET_ENDPOINT).await {
        Ok(body) => body.wallet.map_or(0.0, |w| w.balance),
        Err(e) => {
            tracing::warn!(error = %e, "wallet unavailable");
            0.0
        }
    }
}

pub async fn load_account_summary(dispatcher: &Dispatcher) -> AccountSummary {
    let subscription = load_subscription(dispatcher).await;
    let balance = load_balance(dispatcher).await;
    AccountSummary { subscription, balance }
}

#[must_use]
pub fn format_balance(balance: f64) -> String {
    format!("{balance:.2} ₽")
}

#[must_use]
pub fn render_account_summary(summary: &AccountSummary) -> String {
    format!(
        concat!(
            r#"<div class="stat subscription"><span class="stat-label">Subscription</span>"#,
            r#"<span class="stat-value">{}</span></div>"#,
            r#"<div class="stat meals"><span class="stat-label">Meals remaining</span>"#,
            r#"<span class="stat-value">{}</span></div>"#,
            r#"<div class="stat balance"><span class="stat-label">Balance</span>"#,
            r#"<span class="stat-value">{}</span></div>"#,
        ),
        summary.subscription.label(),
        summary.subscription.meals_remaining_text(),
        format_balance(summary.balance),
    )
}
