//! JSON bodies exchanged with the cafeteria backend.
//!
//! DESIGN
//! ======
//! Only the fields the client reads are declared; serde ignores the rest, so
//! the backend can grow its payloads without breaking older clients. Optional
//! business data (no subscription, no published menu) is `Option`, never an
//! error.

use serde::{Deserialize, Serialize};

use crate::session::UserProfile;

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub recent_meals: Vec<RecentMeal>,
}

/// One meal pickup in the student's activity feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecentMeal {
    #[serde(default)]
    pub dish_name: Option<String>,
    /// ISO-8601 timestamp; the backend sends naive UTC (`2024-03-01T12:30:00`)
    /// or `null` for a pickup it has not timestamped.
    #[serde(default)]
    pub received_at: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
}

// =============================================================================
// SUBSCRIPTION / WALLET
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionResponse {
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub meals_remaining: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletResponse {
    #[serde(default)]
    pub wallet: Option<Wallet>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wallet {
    pub balance: f64,
}

// =============================================================================
// MENU
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuResponse {
    #[serde(default)]
    pub menu: Option<Menu>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItem {
    pub dish: Dish,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dish {
    pub name: String,
    pub category: String,
    pub price: f64,
}
