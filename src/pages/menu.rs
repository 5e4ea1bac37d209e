//! Menu of the day.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use std::fmt;
use std::str::FromStr;

use time::{Date, OffsetDateTime};

use super::escape_html;
use crate::dispatch::Dispatcher;
use crate::models::{MenuItem, MenuResponse};

/// Menus are published per meal; the backend serves lunch unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
}

impl MealType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            other => Err(format!("unknown meal type '{other}' (expected 'breakfast' or 'lunch')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl From<&MenuItem> for MenuEntry {
    fn from(item: &MenuItem) -> Self {
        Self { name: item.dish.name.clone(), category: item.dish.category.clone(), price: item.dish.price }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuView {
    Items(Vec<MenuEntry>),
    NoMenu,
    Unavailable,
}

impl MenuView {
    /// Headline for the dashboard tile: dish count or "No menu".
    #[must_use]
    pub fn headline(&self) -> String {
        match self {
            Self::Items(entries) => format!("{} dishes", entries.len()),
            Self::NoMenu | Self::Unavailable => "No menu".to_owned(),
        }
    }
}

/// Today's date in UTC, which is the day the backend keys menus by.
#[must_use]
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// `/api/menu/YYYY-MM-DD`, with `?meal_type=` when one is requested.
#[must_use]
pub fn menu_path(date: Date, meal_type: Option<MealType>) -> String {
    let path = format!("/api/menu/{date}");
    match meal_type {
        Some(meal) => format!("{path}?meal_type={meal}"),
        None => path,
    }
}

pub async fn load_menu(dispatcher: &Dispatcher, date: Date, meal_type: Option<MealType>) -> MenuView {
    let path = menu_path(date, meal_type);
    match dispatcher.get_json::<MenuResponse>(&path).await {
        Ok(body) => match body.menu {
            Some(menu) if !menu.items.is_empty() => MenuView::Items(menu.items.iter().map(MenuEntry::from).collect()),
            _ => MenuView::NoMenu,
        },
        Err(e) => {
            tracing::warn!(error = %e, %path, "menu unavailable");
            MenuView::Unavailable
        }
    }
}

pub async fn load_today_menu(dispatcher: &Dispatcher) -> MenuView {
    load_menu(dispatcher, today_utc(), None).await
}

#[must_use]
pub fn render_menu(view: &MenuView) -> String {
    match view {
        MenuView::Items(entries) => entries
            .iter()
            .map(|entry| {
                format!(
                    concat!(
                        r#"<div class="menu-item-card"><div class="menu-item-info">"#,
                        r#"<div class="menu-item-name">{}</div><div class="menu-item-type">{}</div></div>"#,
                        r#"<div class="menu-item-price">{} &#8381;</div></div>"#,
                    ),
                    escape_html(&entry.name),
                    escape_html(&entry.category),
                    entry.price,
                )
            })
            .collect(),
        MenuView::NoMenu => r#"<p class="menu-empty">No menu published for today</p>"#.to_owned(),
        MenuView::Unavailable => r#"<p class="menu-empty">Menu is unavailable</p>"#.to_owned(),
    }
}
