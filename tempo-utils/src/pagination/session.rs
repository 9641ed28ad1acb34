//! Live pagination sessions and the process-wide session registry.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

use super::record::{PageHeader, PageSet};
use super::token::now_unix_secs;

/// A navigation event scoped to one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    First,
    Prev,
    Next,
    Last,
    Close,
}

impl NavAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "first" => Some(Self::First),
            "prev" => Some(Self::Prev),
            "next" => Some(Self::Next),
            "last" => Some(Self::Last),
            "close" => Some(Self::Close),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
            Self::Close => "close",
        }
    }
}

/// Navigation state bound to one outbound message.
///
/// Holds the full item list fetched at session start; every transition
/// re-renders from this set without refetching.
#[derive(Debug)]
pub struct PaginationSession {
    pub command: String,
    pub owner_user_id: u64,
    pub set: PageSet,
    pub header: PageHeader,
    pub current_page: usize,
    pub last_activity: u64,
}

impl PaginationSession {
    pub fn new(
        command: impl Into<String>,
        owner_user_id: u64,
        set: PageSet,
        header: PageHeader,
    ) -> Self {
        Self {
            command: command.into(),
            owner_user_id,
            set,
            header,
            current_page: 1,
            last_activity: now_unix_secs(),
        }
    }

    /// Apply a navigation action and return the (clamped) resulting page.
    ///
    /// `next` on the last page and `prev` on the first are no-ops.
    pub fn apply(&mut self, action: NavAction) -> usize {
        let total = self.set.total_pages();

        self.current_page = match action {
            NavAction::First => 1,
            NavAction::Prev => self.current_page.saturating_sub(1).max(1),
            NavAction::Next => self.current_page.saturating_add(1).min(total),
            NavAction::Last => total,
            NavAction::Close => self.current_page,
        };
        self.last_activity = now_unix_secs();

        self.current_page
    }
}

type SessionEntry = Arc<Mutex<PaginationSession>>;

/// Process-wide registry of active pagination sessions, keyed by message id.
///
/// The per-session mutex serializes navigation events for one session, so a
/// rapid double-click cannot interleave two re-renders. Removal happens at
/// most once per session whichever of close, expiry, or replacement fires
/// first.
#[derive(Default)]
pub struct PaginationRegistry {
    sessions: RwLock<HashMap<u64, SessionEntry>>,
    expiry_tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl PaginationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for a just-sent message.
    ///
    /// A stale session under the same message id (message reuse) is replaced
    /// and its expiry task aborted.
    pub async fn insert(&self, message_id: u64, session: PaginationSession) -> SessionEntry {
        let entry = Arc::new(Mutex::new(session));

        self.sessions
            .write()
            .await
            .insert(message_id, Arc::clone(&entry));
        debug!(message_id, "pagination session opened");

        entry
    }

    pub async fn get(&self, message_id: u64) -> Option<SessionEntry> {
        self.sessions.read().await.get(&message_id).cloned()
    }

    /// Remove a session and cancel its pending expiry task.
    ///
    /// Used for explicit close. Returns `None` when the session was already
    /// released, making concurrent close/expiry races harmless.
    pub async fn remove(&self, message_id: u64) -> Option<SessionEntry> {
        let removed = self.sessions.write().await.remove(&message_id);

        if let Some(task) = self.expiry_tasks.lock().await.remove(&message_id) {
            task.abort();
        }
        if removed.is_some() {
            debug!(message_id, "pagination session closed");
        }

        removed
    }

    /// Remove a session from inside its own expiry task.
    ///
    /// Drops the task handle without aborting it so the running task can
    /// finish stripping the message components.
    pub(crate) async fn expire(&self, message_id: u64) -> Option<SessionEntry> {
        let removed = self.sessions.write().await.remove(&message_id);

        self.expiry_tasks.lock().await.remove(&message_id);
        if removed.is_some() {
            debug!(message_id, "pagination session expired");
        }

        removed
    }

    /// Install the expiry task for a session, aborting any previous one.
    ///
    /// Called on session start and again on every accepted navigation, which
    /// gives the inactivity window its sliding behavior.
    pub(crate) async fn set_expiry_task(&self, message_id: u64, task: JoinHandle<()>) {
        let mut tasks = self.expiry_tasks.lock().await;
        if let Some(previous) = tasks.insert(message_id, task) {
            previous.abort();
        }
    }

    /// Number of live sessions; abandoned sessions must not accumulate.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::record::{DEFAULT_PAGE_SIZE, DisplayRecord};

    fn header() -> PageHeader {
        PageHeader {
            title: "Top Tracks".to_owned(),
            description: None,
            thumbnail: None,
            color: 0x07_E3_80,
        }
    }

    fn session_with(items: usize) -> PaginationSession {
        let records = (1..=items)
            .map(|rank| DisplayRecord::new(format!("Item {rank}"), "").with_rank(rank))
            .collect();
        PaginationSession::new("tracks", 42, PageSet::new(records, DEFAULT_PAGE_SIZE), header())
    }

    #[test]
    fn navigation_clamps_at_both_bounds() {
        let mut session = session_with(50);
        assert_eq!(session.set.total_pages(), 5);

        assert_eq!(session.apply(NavAction::Prev), 1);
        assert_eq!(session.apply(NavAction::Next), 2);
        assert_eq!(session.apply(NavAction::Last), 5);
        assert_eq!(session.apply(NavAction::Next), 5);
        assert_eq!(session.apply(NavAction::First), 1);
    }

    #[test]
    fn close_leaves_current_page_untouched() {
        let mut session = session_with(50);
        session.apply(NavAction::Next);

        assert_eq!(session.apply(NavAction::Close), 2);
        assert_eq!(session.current_page, 2);
    }

    #[tokio::test]
    async fn registry_insert_get_remove() {
        let registry = PaginationRegistry::new();

        registry.insert(1, session_with(30)).await;
        registry.insert(2, session_with(10)).await;
        assert_eq!(registry.len().await, 2);

        let entry = registry.get(1).await.unwrap();
        assert_eq!(entry.lock().await.owner_user_id, 42);

        assert!(registry.remove(1).await.is_some());
        assert!(registry.get(1).await.is_none());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn removal_is_idempotent_under_races() {
        let registry = PaginationRegistry::new();
        registry.insert(1, session_with(30)).await;

        // Whichever of close or expiry wins releases the session; the loser
        // sees None.
        let closed = registry.remove(1).await;
        let expired = registry.expire(1).await;

        assert!(closed.is_some());
        assert!(expired.is_none());
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn sessions_are_isolated_per_message() {
        let registry = PaginationRegistry::new();
        registry.insert(1, session_with(50)).await;
        registry.insert(2, session_with(50)).await;

        {
            let entry = registry.get(1).await.unwrap();
            let mut session = entry.lock().await;
            session.apply(NavAction::Next);
        }

        let untouched = registry.get(2).await.unwrap();
        assert_eq!(untouched.lock().await.current_page, 1);
    }
}
