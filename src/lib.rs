//! Canteen client: session handling and page data for the cafeteria web app.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend issues JWT access/refresh tokens and serves JSON under `/api`.
//! This crate keeps the client side of that contract:
//!
//! - `session` / `storage`: the three persisted slots (access token, refresh
//!   token, user profile) behind a pluggable backend.
//! - `auth`: login, logout and token refresh.
//! - `dispatch`: authenticated calls with one-shot refresh-and-retry on 401.
//! - `pages`: dashboard and menu loaders plus their HTML renderers.
//!
//! The same code runs natively (`native`: `reqwest`, file-backed session; used
//! by the `canteen` CLI) and in the browser (`hydrate`: `gloo-net`,
//! `localStorage`). Neither is on by default.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod session;
pub mod storage;
pub mod transport;

#[cfg(feature = "hydrate")]
pub mod web;

#[cfg(test)]
mod testing;

pub use auth::SessionManager;
pub use dispatch::Dispatcher;
pub use error::{ApiError, ConfigError, TransportError};
pub use navigation::Navigator;
pub use session::{Role, Session, SessionStore, UserProfile};
pub use storage::Storage;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, RequestOptions};
