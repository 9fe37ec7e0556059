use std::sync::Mutex;

use crate::{
    cookie::{AUTH_COOKIE_NAME, CookieAttributes},
    jar::{CookieJar, PersistenceError},
};

/// Server request-scoped cookie jar.
///
/// Constructed once per request from the incoming `Cookie` header; mutations
/// are queued as `Set-Cookie` header values for the host framework to attach
/// to the response via [`RequestCookieJar::take_set_cookies`].
///
/// Some server execution phases (streaming a response body, rendering
/// outside a request handler) can no longer mutate response headers. Model
/// those with [`RequestCookieJar::read_only`]: mutations fail with
/// [`PersistenceError::Immutable`], which the sync store drops. The request
/// still sees a working in-memory session; middleware that refreshes the
/// cookie on a mutable phase keeps it persisted.
pub struct RequestCookieJar {
    initial: Option<String>,
    read_only: bool,
    queued: Mutex<Vec<String>>,
}

impl RequestCookieJar {
    /// Creates a jar from a request's `Cookie` header, if one was sent.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        Self {
            initial: header.and_then(find_auth_cookie),
            read_only: false,
            queued: Mutex::new(Vec::new()),
        }
    }

    /// Creates a jar for an execution phase where response headers are no
    /// longer mutable.
    pub fn read_only(header: Option<&str>) -> Self {
        Self {
            read_only: true,
            ..Self::from_cookie_header(header)
        }
    }

    /// Drains the queued `Set-Cookie` header values, in the order the
    /// mutations happened. Last-write-wins at the browser, so the host may
    /// also attach only the final entry.
    pub fn take_set_cookies(&self) -> Vec<String> {
        let mut queued = self.queued.lock().expect("Mutex should not be poisoned");
        std::mem::take(&mut *queued)
    }

    fn queue(&self, header: String) -> Result<(), PersistenceError> {
        if self.read_only {
            return Err(PersistenceError::Immutable(
                "response headers for this request can no longer be modified".to_string(),
            ));
        }
        let mut queued = self.queued.lock().expect("Mutex should not be poisoned");
        queued.push(header);
        Ok(())
    }
}

impl CookieJar for RequestCookieJar {
    fn read_initial(&self) -> Option<String> {
        self.initial.clone()
    }

    fn persist(
        &self,
        serialized: &str,
        attributes: &CookieAttributes,
    ) -> Result<(), PersistenceError> {
        self.queue(attributes.render(AUTH_COOKIE_NAME, serialized))
    }

    fn clear(&self, attributes: &CookieAttributes) -> Result<(), PersistenceError> {
        self.queue(attributes.render_expired(AUTH_COOKIE_NAME))
    }
}

/// Extracts the auth cookie value from a `Cookie` header (RFC 6265 §5.4:
/// `name=value` pairs separated by `"; "`).
fn find_auth_cookie(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == AUTH_COOKIE_NAME).then(|| value.to_string())
    })
}
