use std::sync::Arc;

use super::cookie::CookieJar;
use crate::session::{Session, SessionStore};

/// The session and cookies resolved for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    session: Arc<Session>,
    cookie: CookieJar,
    registered: bool,
}

impl RequestContext {
    /// Resolves the session for a request.
    ///
    /// Without a `Cookie` header the context gets a fresh placeholder session that is
    /// *not* registered; it only enters the store through
    /// [`HttpRequest::get_or_create_session`](crate::HttpRequest::get_or_create_session).
    /// With a cookie, a known session id is reused; an unknown or missing id gets a
    /// brand new registered session, never the id the client sent.
    pub fn resolve(cookie_header: Option<&str>, cookie_name: &str, store: &SessionStore) -> Self {
        let Some(header) = cookie_header else {
            tracing::trace!("no cookie header, deferring session creation");
            return Self {
                session: Arc::new(Session::new()),
                cookie: CookieJar::default(),
                registered: false,
            };
        };
        let cookie = CookieJar::parse(header);
        let session = match cookie.find(cookie_name).and_then(|id| store.find_session(id)) {
            Some(session) => {
                tracing::trace!(session_id = %session.id(), "reusing session");
                session
            }
            None => store.create_session(),
        };
        Self {
            session,
            cookie,
            registered: true,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn cookie(&self) -> &CookieJar {
        &self.cookie
    }

    /// Whether the session was taken from or put into the store during resolution.
    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::SESSION_COOKIE_NAME;

    #[test]
    fn missing_cookie_gives_unregistered_placeholder() {
        let store = SessionStore::new();
        let context = RequestContext::resolve(None, SESSION_COOKIE_NAME, &store);
        assert!(context.cookie().is_empty());
        assert!(!context.is_registered());
        assert!(!context.session().id().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn known_session_is_reused() {
        let store = SessionStore::new();
        let existing = store.create_session();
        let header = format!("theme=dark; JSESSIONID={}", existing.id());
        let context = RequestContext::resolve(Some(&header), SESSION_COOKIE_NAME, &store);
        assert!(Arc::ptr_eq(context.session(), &existing));
        assert_eq!(context.cookie().find("theme"), Some("dark"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_session_id_is_replaced() {
        let store = SessionStore::new();
        let context =
            RequestContext::resolve(Some("JSESSIONID=forged"), SESSION_COOKIE_NAME, &store);
        assert_ne!(context.session().id(), "forged");
        assert!(context.is_registered());
        assert!(store.find_session(context.session().id()).is_some());
        assert!(store.find_session("forged").is_none());
    }

    #[test]
    fn cookie_without_session_name_creates_session() {
        let store = SessionStore::new();
        let context = RequestContext::resolve(Some("theme=dark"), SESSION_COOKIE_NAME, &store);
        assert!(context.is_registered());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn custom_cookie_name_is_honoured() {
        let store = SessionStore::new();
        let existing = store.create_session();
        let header = format!("SID={}", existing.id());
        let context = RequestContext::resolve(Some(&header), "SID", &store);
        assert!(Arc::ptr_eq(context.session(), &existing));
    }
}
