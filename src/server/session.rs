//! Per-browser-session dashboards
//!
//! Every browser session gets its own controller and mount, so one
//! visitor's selection never shows up on another visitor's page. Sessions
//! are identified by a cookie without an expiry and live only in memory;
//! once the registry is full the least recently used one is evicted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};
use dashmap::DashMap;
use tracing::{debug, info};

use crate::api::PhotoSource;
use crate::app::{Dashboard, DashboardHandle};
use crate::ui::SharedMount;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "mars_session";

/// Pending selections a session's controller queues before senders wait
const EVENT_CAPACITY: usize = 8;

/// One browser session's dashboard
#[derive(Debug, Clone)]
pub struct Session {
    pub handle: DashboardHandle,
    pub mount: SharedMount,
    last_seen: u64,
}

/// Registry of live sessions
///
/// Cheap to clone; all clones share the same sessions.
#[derive(Clone)]
pub struct SessionRegistry {
    /// session_id → Session
    sessions: Arc<DashMap<String, Session>>,
    source: Arc<dyn PhotoSource>,
    capacity: usize,
    /// Logical clock for least-recently-used eviction
    clock: Arc<AtomicU64>,
}

impl SessionRegistry {
    /// Create an empty registry holding at most `capacity` sessions
    pub fn new(source: Arc<dyn PhotoSource>, capacity: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            source,
            capacity: capacity.max(1),
            clock: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Look up a session and mark it as used
    pub fn get(&self, session_id: &str) -> Option<Session> {
        let tick = self.tick();
        self.sessions.get_mut(session_id).map(|mut entry| {
            entry.last_seen = tick;
            entry.value().clone()
        })
    }

    /// Start a new session with its own controller in the initial state
    ///
    /// Must be called from within a tokio runtime.
    pub fn create(&self) -> (String, Session) {
        while self.sessions.len() >= self.capacity {
            if !self.evict_oldest() {
                break;
            }
        }

        let session_id = format!("sess-{}", uuid::Uuid::new_v4().as_simple());
        let mount = SharedMount::new();
        let (handle, events) = DashboardHandle::channel(EVENT_CAPACITY);
        let dashboard = Dashboard::new(Arc::clone(&self.source), Arc::new(mount.clone()));
        // Renders the initial state, then stops once the session is evicted
        // and no request still holds its handle
        tokio::spawn(dashboard.run(events));

        let session = Session {
            handle,
            mount,
            last_seen: self.tick(),
        };
        self.sessions.insert(session_id.clone(), session.clone());
        info!(session = %session_id, live = self.sessions.len(), "🆕 dashboard session started");

        (session_id, session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.last_seen)
            .map(|entry| entry.key().clone());

        match oldest {
            Some(session_id) => {
                self.sessions.remove(&session_id);
                debug!(session = %session_id, "evicted least recently used session");
                true
            }
            None => false,
        }
    }
}

/// Session id from the request's `Cookie` headers, if any
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value for `session_id`
///
/// No `Max-Age`/`Expires`: the browser drops it when its session ends.
pub fn session_cookie(session_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}
