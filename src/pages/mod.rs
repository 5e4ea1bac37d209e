//! Page loaders for the student dashboard and menu pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each loader issues dispatcher calls, reads one known JSON shape, and
//! returns a view state. Failures never escape a loader: they become an
//! explicit `Unavailable` (or zero-balance) state so the page always renders
//! something. `render_*` functions turn those states into HTML fragments.

pub mod account;
pub mod activity;
pub mod menu;

/// Escape text for interpolation into HTML element content or attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
