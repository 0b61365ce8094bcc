//! Server-side sessions and the store that owns them.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::SystemTime;
use uuid::Uuid;

/// A server-side identity correlated with a client through a cookie.
#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: SystemTime,
    attributes: DashMap<String, String>,
}

impl Session {
    /// A session with a fresh random id, not yet registered anywhere.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: SystemTime::now(),
            attributes: DashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).map(|r| r.value().clone())
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.attributes.remove(name).map(|(_, v)| v)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Id to session mapping shared by every connection of one server.
///
/// Cloning is cheap and clones see the same sessions. Entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_session(&self, id: &str) -> Option<Arc<Session>> {
        self.inner.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Registers `session` under its id, replacing any previous entry.
    pub fn add(&self, session: Arc<Session>) {
        self.inner.insert(session.id().to_owned(), session);
    }

    pub fn create_session(&self) -> Arc<Session> {
        let session = Arc::new(Session::new());
        self.add(Arc::clone(&session));
        tracing::debug!(session_id = %session.id(), "created session");
        session
    }

    /// Returns the registered session with the same id, registering `session` if
    /// there is none. The check and the insert happen under one shard lock.
    pub fn find_or_add(&self, session: Arc<Session>) -> Arc<Session> {
        let entry = self
            .inner
            .entry(session.id().to_owned())
            .or_insert(session);
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn created_session_can_be_found() {
        let store = SessionStore::new();
        let session = store.create_session();
        let found = store.find_session(session.id()).unwrap();
        assert!(Arc::ptr_eq(&session, &found));
        assert!(Uuid::parse_str(session.id()).is_ok());
    }

    #[test]
    fn find_has_no_side_effects() {
        let store = SessionStore::new();
        assert!(store.find_session("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn add_overwrites_same_id() {
        let store = SessionStore::new();
        store.add(Arc::new(Session::with_id("fixed")));
        let second = Arc::new(Session::with_id("fixed"));
        store.add(Arc::clone(&second));
        assert_eq!(store.len(), 1);
        assert!(Arc::ptr_eq(&store.find_session("fixed").unwrap(), &second));
    }

    #[test]
    fn find_or_add_keeps_the_first_registration() {
        let store = SessionStore::new();
        let first = store.find_or_add(Arc::new(Session::with_id("a")));
        let again = store.find_or_add(Arc::new(Session::with_id("a")));
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clones_share_sessions() {
        let store = SessionStore::new();
        let other = store.clone();
        let session = store.create_session();
        assert!(other.find_session(session.id()).is_some());
    }

    #[test]
    fn attributes_are_visible_through_the_store() {
        let store = SessionStore::new();
        let session = store.create_session();
        session.set_attribute("user", "gugu");
        let found = store.find_session(session.id()).unwrap();
        assert_eq!(found.attribute("user").as_deref(), Some("gugu"));
        assert_eq!(found.remove_attribute("user").as_deref(), Some("gugu"));
        assert_eq!(session.attribute("user"), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_are_all_registered() {
        const N: usize = 256;
        let store = SessionStore::new();
        let handles: Vec<_> = (0..N)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_session().id().to_owned() })
            })
            .collect();
        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), N);
        assert_eq!(store.len(), N);
    }
}
