//! Recent-activity feed on the student dashboard.

#[cfg(test)]
#[path = "activity_test.rs"]
mod activity_test;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use super::escape_html;
use crate::dispatch::Dispatcher;
use crate::models::{DashboardResponse, RecentMeal};

pub const DASHBOARD_ENDPOINT: &str = "/api/dashboard";
const FALLBACK_DISH_NAME: &str = "Dish";
const MISSING_TIMESTAMP: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub dish_name: String,
    /// `dd.mm.yyyy HH:MM` in UTC, the raw timestamp when it does not parse, or
    /// `-` when the backend sent none.
    pub received_at: String,
    pub confirmed: bool,
}

impl ActivityEntry {
    #[must_use]
    pub fn from_meal(meal: &RecentMeal) -> Self {
        let dish_name = meal
            .dish_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_DISH_NAME)
            .to_owned();
        let received_at = meal
            .received_at
            .as_deref()
            .map_or_else(|| MISSING_TIMESTAMP.to_owned(), format_timestamp);
        Self { dish_name, received_at, confirmed: meal.is_confirmed }
    }

    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.confirmed { "Received" } else { "Pending" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityFeed {
    Items(Vec<ActivityEntry>),
    Empty,
    Unavailable,
}

/// Fetch `/api/dashboard` and build the feed.
pub async fn load_recent_activity(dispatcher: &Dispatcher) -> ActivityFeed {
    match dispatcher.get_json::<DashboardResponse>(DASHBOARD_ENDPOINT).await {
        Ok(body) => feed_from_meals(&body.recent_meals),
        Err(e) => {
            tracing::warn!(error = %e, "recent activity unavailable");
            ActivityFeed::Unavailable
        }
    }
}

#[must_use]
pub fn feed_from_meals(meals: &[RecentMeal]) -> ActivityFeed {
    if meals.is_empty() {
        return ActivityFeed::Empty;
    }
    ActivityFeed::Items(meals.iter().map(ActivityEntry::from_meal).collect())
}

/// Render an ISO-8601 timestamp as `dd.mm.yyyy HH:MM`.
///
/// Offset timestamps are shifted to UTC; naive ones are taken as UTC already,
/// which is what the backend emits. Anything else comes back verbatim.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    let display = format_description!("[day].[month].[year] [hour]:[minute]");

    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        if let Ok(text) = at.to_offset(UtcOffset::UTC).format(display) {
            return text;
        }
    }
    let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    PrimitiveDateTime::parse(raw, naive)
        .ok()
        .and_then(|at| at.format(display).ok())
        .unwrap_or_else(|| raw.to_owned())
}

#[must_use]
pub fn render_activity(feed: &ActivityFeed) -> String {
    match feed {
        ActivityFeed::Items(entries) => {
            let items: String = entries.iter().map(render_entry).collect();
            format!(r#"<ul class="activity-list">{items}</ul>"#)
        }
        ActivityFeed::Empty => r#"<p class="activity-empty">No recent activity</p>"#.to_owned(),
        ActivityFeed::Unavailable => r#"<p class="activity-empty">Activity is unavailable</p>"#.to_owned(),
    }
}

fn render_entry(entry: &ActivityEntry) -> String {
    let state = if entry.confirmed { "success" } else { "warning" };
    format!(
        r#"<li class="activity-item {state}"><div class="activity-title">{}</div><div class="activity-time">{} · {}</div></li>"#,
        escape_html(&entry.dish_name),
        escape_html(&entry.received_at),
        entry.status_label(),
    )
}
