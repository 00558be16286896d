//! # Session Store
//!
//! Server-side keyed session state. Each browser session is identified by a
//! `sid` cookie holding a UUID; the data itself never leaves the server.
//! One active topic submission per session at a time — the staged draft is
//! a single slot, not a queue.

use actix_web::cookie::Cookie;
use actix_web::HttpRequest;
use dashmap::DashMap;
use rf_core::forms::TopicDraft;
use rf_core::models::SessionUser;
use std::sync::Arc;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sid";

/// Everything a session carries between requests.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub user: Option<SessionUser>,
    /// The validated-but-unsaved topic draft between `confirm` and
    /// `create`/`back`.
    pub input_data: Option<TopicDraft>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<Uuid, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, sid: Uuid) -> Option<SessionUser> {
        self.inner.get(&sid).and_then(|data| data.user.clone())
    }

    pub fn set_user(&self, sid: Uuid, user: SessionUser) {
        self.inner.entry(sid).or_default().user = Some(user);
    }

    pub fn clear_user(&self, sid: Uuid) {
        if let Some(mut data) = self.inner.get_mut(&sid) {
            data.user = None;
        }
    }

    /// The staged draft, left in place.
    pub fn staged_draft(&self, sid: Uuid) -> Option<TopicDraft> {
        self.inner.get(&sid).and_then(|data| data.input_data.clone())
    }

    pub fn stage_draft(&self, sid: Uuid, draft: TopicDraft) {
        self.inner.entry(sid).or_default().input_data = Some(draft);
    }

    pub fn remove_draft(&self, sid: Uuid) -> Option<TopicDraft> {
        self.inner.get_mut(&sid).and_then(|mut data| data.input_data.take())
    }
}

/// Resolves the request's session id, minting a fresh one (and the cookie
/// that must accompany the response) when the request carries none.
pub fn session_id(req: &HttpRequest) -> (Uuid, Option<Cookie<'static>>) {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Ok(id) = Uuid::parse_str(cookie.value()) {
            return (id, None);
        }
    }
    let id = Uuid::new_v4();
    let cookie = Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .finish();
    (id, Some(cookie))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TopicDraft {
        TopicDraft {
            title: "Hello".into(),
            user_name: "Alice".into(),
            category: 2,
            message: "Hi there".into(),
        }
    }

    #[test]
    fn staged_draft_survives_reads_until_removed() {
        let store = SessionStore::new();
        let sid = Uuid::new_v4();

        assert_eq!(store.staged_draft(sid), None);
        store.stage_draft(sid, draft());
        assert_eq!(store.staged_draft(sid), Some(draft()));
        assert_eq!(store.staged_draft(sid), Some(draft()));

        assert_eq!(store.remove_draft(sid), Some(draft()));
        assert_eq!(store.staged_draft(sid), None);
        assert_eq!(store.remove_draft(sid), None);
    }

    #[test]
    fn sessions_are_isolated_by_id() {
        let store = SessionStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.stage_draft(a, draft());
        assert_eq!(store.staged_draft(b), None);
    }

    #[test]
    fn user_slot_is_independent_of_the_draft_slot() {
        let store = SessionStore::new();
        let sid = Uuid::new_v4();
        let user = SessionUser { id: 1, username: "bob".into() };

        store.set_user(sid, user.clone());
        store.stage_draft(sid, draft());
        assert_eq!(store.user(sid), Some(user));

        store.clear_user(sid);
        assert_eq!(store.user(sid), None);
        assert_eq!(store.staged_draft(sid), Some(draft()));
    }
}
