//! Per-session navigation state.
//!
//! Each browser session owns one `ViewSession`; sessions never share
//! state, so one user's navigation cannot move another user's view.
//! Idle sessions are dropped lazily once the store grows, and the store
//! never holds more than [`MAX_SESSIONS`] entries.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::ViewId;

/// Idle sweeps start once the store holds more than this many sessions.
const CLEANUP_THRESHOLD: usize = 1000;

/// Minimum time between two idle sweeps below capacity.
const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Hard cap; at capacity the least recently seen session is evicted.
const MAX_SESSIONS: usize = 10_000;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_simple())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionId)
    }
}

/// The only mutable state a user has: which view is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSession {
    current: ViewId,
}

impl ViewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: selecting the active view changes nothing.
    pub fn select_view(&mut self, view: ViewId) {
        self.current = view;
    }

    pub fn current_view(&self) -> ViewId {
        self.current
    }
}

struct Entry {
    session: ViewSession,
    last_seen: Instant,
}

/// All live sessions.
pub struct SessionStore {
    sessions: HashMap<SessionId, Entry>,
    ttl: Duration,
    capacity: usize,
    last_sweep: Instant,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_SESSIONS)
    }

    fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
            last_sweep: Instant::now(),
        }
    }

    /// Resolve `id` to a live session, creating a fresh one (view = Home)
    /// when the id is absent, unknown or expired. Returns the id to use
    /// and whether it is new.
    pub fn resolve(&mut self, id: Option<SessionId>) -> (SessionId, bool) {
        let now = Instant::now();
        if let Some(id) = id {
            if let Some(entry) = self.sessions.get_mut(&id) {
                if now.duration_since(entry.last_seen) < self.ttl {
                    entry.last_seen = now;
                    return (id, false);
                }
                self.sessions.remove(&id);
            }
        }

        self.make_room(now);

        let id = SessionId::new();
        self.sessions.insert(
            id,
            Entry {
                session: ViewSession::new(),
                last_seen: now,
            },
        );
        (id, true)
    }

    /// Current view of a session; unknown sessions read as the default.
    pub fn current_view(&self, id: SessionId) -> ViewId {
        self.sessions
            .get(&id)
            .map(|e| e.session.current_view())
            .unwrap_or_default()
    }

    /// Apply a navigation action. Returns `false` if the session is unknown.
    pub fn select_view(&mut self, id: SessionId, view: ViewId) -> bool {
        match self.sessions.get_mut(&id) {
            Some(entry) => {
                entry.session.select_view(view);
                entry.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Number of sessions currently held, expired ones included until
    /// the next sweep.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Called before every insert. Sweeps idle sessions at most once per
    /// [`SWEEP_INTERVAL`] unless the store is full, then evicts the least
    /// recently seen session if it is still full.
    fn make_room(&mut self, now: Instant) {
        let len = self.sessions.len();
        let full = len >= self.capacity;
        let sweep_due = len > CLEANUP_THRESHOLD
            && now.duration_since(self.last_sweep) >= SWEEP_INTERVAL;
        if full || sweep_due {
            self.cleanup(now);
        }

        if self.sessions.len() >= self.capacity {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, e)| e.last_seen)
                .map(|(id, _)| *id);
            if let Some(id) = oldest {
                self.sessions.remove(&id);
                tracing::debug!(session = %id, "Session store full, oldest session evicted");
            }
        }
    }

    fn cleanup(&mut self, now: Instant) {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, e| now.duration_since(e.last_seen) < ttl);
        self.last_sweep = now;
        tracing::debug!(evicted = before - self.sessions.len(), "Idle sessions evicted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Duration::from_secs(60))
    }

    #[test]
    fn view_session_defaults_to_home() {
        assert_eq!(ViewSession::new().current_view(), ViewId::Home);
    }

    #[test]
    fn select_view_is_idempotent() {
        let mut session = ViewSession::new();
        session.select_view(ViewId::About);
        let once = session;
        session.select_view(ViewId::About);
        assert_eq!(session, once);
        assert_eq!(session.current_view(), ViewId::About);
    }

    #[test]
    fn every_view_reachable_from_every_view() {
        for from in ViewId::ALL {
            for to in ViewId::ALL {
                let mut session = ViewSession::new();
                session.select_view(from);
                session.select_view(to);
                assert_eq!(session.current_view(), to);
            }
        }
    }

    #[test]
    fn resolve_without_id_creates_session() {
        let mut store = store();
        let (id, created) = store.resolve(None);
        assert!(created);
        assert_eq!(store.active_count(), 1);
        assert_eq!(store.current_view(id), ViewId::Home);
    }

    #[test]
    fn resolve_known_id_reuses_session() {
        let mut store = store();
        let (id, _) = store.resolve(None);
        assert!(store.select_view(id, ViewId::Prediction));
        let (again, created) = store.resolve(Some(id));
        assert_eq!(again, id);
        assert!(!created);
        assert_eq!(store.current_view(id), ViewId::Prediction);
    }

    #[test]
    fn unknown_id_gets_fresh_session() {
        let mut store = store();
        let (id, created) = store.resolve(Some(SessionId::new()));
        assert!(created);
        assert_eq!(store.current_view(id), ViewId::Home);
    }

    #[test]
    fn sessions_are_isolated() {
        let mut store = store();
        let (alice, _) = store.resolve(None);
        let (bob, _) = store.resolve(None);
        store.select_view(alice, ViewId::DataOverview);
        assert_eq!(store.current_view(alice), ViewId::DataOverview);
        assert_eq!(store.current_view(bob), ViewId::Home);
    }

    #[test]
    fn expired_session_is_replaced() {
        let mut store = SessionStore::new(Duration::ZERO);
        let (id, _) = store.resolve(None);
        store.select_view(id, ViewId::About);
        let (fresh, created) = store.resolve(Some(id));
        assert!(created);
        assert_ne!(fresh, id);
        assert_eq!(store.current_view(fresh), ViewId::Home);
    }

    #[test]
    fn select_on_unknown_session_is_rejected() {
        let mut store = store();
        assert!(!store.select_view(SessionId::new(), ViewId::About));
    }

    #[test]
    fn store_never_exceeds_capacity() {
        let mut store = SessionStore::with_capacity(Duration::from_secs(60), 3);
        let (first, _) = store.resolve(None);
        let (second, _) = store.resolve(None);
        let (third, _) = store.resolve(None);
        assert_eq!(store.active_count(), 3);

        // Touching `first` makes `second` the least recently seen.
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.select_view(first, ViewId::About));

        for _ in 0..2 {
            store.resolve(None);
            assert_eq!(store.active_count(), 3);
        }
        assert_eq!(store.current_view(first), ViewId::About);
        let (again, created) = store.resolve(Some(second));
        assert!(created);
        assert_ne!(again, second);
        let (_, created) = store.resolve(Some(third));
        assert!(created);
    }

    #[test]
    fn full_store_drops_expired_before_live() {
        let mut store = SessionStore::with_capacity(Duration::from_millis(200), 2);
        store.resolve(None);
        std::thread::sleep(Duration::from_millis(250));
        let (live, _) = store.resolve(None);
        store.resolve(None);
        assert_eq!(store.active_count(), 2);
        let (same, created) = store.resolve(Some(live));
        assert_eq!(same, live);
        assert!(!created);
    }

    #[test]
    fn session_id_round_trips_through_text() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
