//! Test doubles for the transport and navigation seams.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::SessionManager;
use crate::dispatch::Dispatcher;
use crate::error::TransportError;
use crate::navigation::Navigator;
use crate::session::{SessionStore, UserProfile};
use crate::storage::MemoryStorage;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

type Scripted = Result<ApiResponse, TransportError>;

/// Replays queued responses per URL and records every request it sees.
/// URLs with nothing queued answer 404.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, url: &str, status: u16, body: &str) -> &Self {
        self.push(url, Ok(ApiResponse::new(status, body)))
    }

    pub(crate) fn fail(&self, url: &str, error: TransportError) -> &Self {
        self.push(url, Err(error))
    }

    fn push(&self, url: &str, outcome: Scripted) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_owned())
            .or_default()
            .push_back(outcome);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_to(&self, url: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == url)
            .collect()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let outcome = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&request.url)
            .and_then(VecDeque::pop_front);
        self.requests.lock().unwrap().push(request);
        // Suspend like real I/O so concurrent callers interleave.
        tokio::task::yield_now().await;
        outcome.unwrap_or_else(|| Ok(ApiResponse::new(404, r#"{"error":"not scripted"}"#)))
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    logins: AtomicUsize,
}

impl RecordingNavigator {
    pub(crate) fn login_visits(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn go_to_login(&self) {
        self.logins.fetch_add(1, Ordering::SeqCst);
    }
}

/// Everything a test needs to drive the client against scripted responses.
pub(crate) struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub transport: Arc<ScriptedTransport>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: SessionManager,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let transport = ScriptedTransport::new();
        let navigator = Arc::new(RecordingNavigator::default());
        let session = SessionManager::new(
            SessionStore::new(storage.clone()),
            transport.clone(),
            navigator.clone(),
            "",
        );
        let dispatcher = Dispatcher::new(session.clone());
        Self { storage, transport, navigator, session, dispatcher }
    }

    /// Harness with a complete student session already stored.
    pub(crate) fn logged_in(access: &str, refresh: &str) -> Self {
        let harness = Self::new();
        harness
            .session
            .store()
            .save_login(access, refresh, &sample_student());
        harness
    }
}

pub(crate) fn sample_student() -> UserProfile {
    UserProfile {
        id: 42,
        email: "ann@school.test".to_owned(),
        full_name: "Ann Petrova".to_owned(),
        role: "student".to_owned(),
        created_at: None,
        is_active: Some(true),
    }
}
