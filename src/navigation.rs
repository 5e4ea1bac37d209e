//! Navigation capability injected into the session manager.
//!
//! SYSTEM CONTEXT
//! ==============
//! Logout and unrecoverable auth failures end with "go to the login page".
//! Behind this trait that means `window.location` in a browser, a hint on
//! stderr in the terminal, and a recorded intent in tests.

pub const LOGIN_PATH: &str = "/login";

/// Where the client goes when the session ends.
pub trait Navigator {
    fn go_to_login(&self);
}

/// Navigates the current browser tab to the login page.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

#[cfg(feature = "hydrate")]
impl Navigator for BrowserNavigator {
    fn go_to_login(&self) {
        if let Some(w) = web_sys::window() {
            let _ = w.location().set_href(LOGIN_PATH);
        }
    }
}
