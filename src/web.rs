//! Browser entry points exported to page scripts.
//!
//! SYSTEM CONTEXT
//! ==============
//! Templates call these from inline scripts: a role guard on page load, then
//! one loader per widget. Each loader takes the id of the element it fills, so
//! markup stays owned by the templates. All exports share one dispatcher for
//! the lifetime of the page.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::auth::SessionManager;
use crate::dispatch::Dispatcher;
use crate::navigation::{BrowserNavigator, Navigator};
use crate::pages::{account, activity, menu};
use crate::session::{Role, SessionStore};
use crate::storage::LocalStorage;
use crate::transport::GlooTransport;

thread_local! {
    static PAGE_DISPATCHER: Dispatcher = Dispatcher::new(SessionManager::new(
        SessionStore::new(Arc::new(LocalStorage)),
        Arc::new(GlooTransport),
        Arc::new(BrowserNavigator),
        "",
    ));
}

/// The page-wide dispatcher. Clones share one session and refresh gate, so
/// loaders started together refresh an expired token once.
fn dispatcher() -> Dispatcher {
    PAGE_DISPATCHER.with(Dispatcher::clone)
}

fn element(id: &str) -> Option<web_sys::Element> {
    let found = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id));
    if found.is_none() {
        tracing::warn!(id, "target element not found");
    }
    found
}

fn set_html(id: &str, html: &str) {
    if let Some(el) = element(id) {
        el.set_inner_html(html);
    }
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen(js_name = isAuthenticated)]
pub fn is_authenticated() -> bool {
    dispatcher().session().is_authenticated()
}

/// Redirect to login unless the stored user has `role`. Unknown role names
/// always redirect.
#[wasm_bindgen(js_name = requireRole)]
pub fn require_role(role: &str) -> bool {
    let dispatcher = dispatcher();
    match role.parse::<Role>() {
        Ok(role) => dispatcher.session().require_role(role),
        Err(e) => {
            tracing::warn!(error = %e, "page guard given an unknown role");
            BrowserNavigator.go_to_login();
            false
        }
    }
}

#[wasm_bindgen(js_name = showUserName)]
pub fn show_user_name(target_id: &str) {
    if let Some(name) = dispatcher().session().display_name() {
        set_text(target_id, &name);
    }
}

/// Sign in and open the home page for the user's role. Rejected credentials
/// come back to the caller as the server's message.
#[wasm_bindgen]
pub async fn login(email: String, password: String) -> Result<(), JsValue> {
    let dispatcher = dispatcher();
    dispatcher
        .session()
        .login(&email, &password)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let target = dispatcher.session().landing_path().unwrap_or("/");
    if let Some(w) = web_sys::window() {
        w.location().set_href(target)?;
    }
    Ok(())
}

#[wasm_bindgen]
pub async fn logout() -> Result<(), JsValue> {
    dispatcher().session().logout().await;
    Ok(())
}

#[wasm_bindgen(js_name = loadRecentActivity)]
pub async fn load_recent_activity(target_id: String) -> Result<(), JsValue> {
    let feed = activity::load_recent_activity(&dispatcher()).await;
    set_html(&target_id, &activity::render_activity(&feed));
    Ok(())
}

#[wasm_bindgen(js_name = loadDashboardData)]
pub async fn load_dashboard_data(target_id: String) -> Result<(), JsValue> {
    let summary = account::load_account_summary(&dispatcher()).await;
    set_html(&target_id, &account::render_account_summary(&summary));
    Ok(())
}

#[wasm_bindgen(js_name = loadTodayMenu)]
pub async fn load_today_menu(target_id: String, headline_id: String) -> Result<(), JsValue> {
    let view = menu::load_today_menu(&dispatcher()).await;
    set_text(&headline_id, &view.headline());
    set_html(&target_id, &menu::render_menu(&view));
    Ok(())
}
