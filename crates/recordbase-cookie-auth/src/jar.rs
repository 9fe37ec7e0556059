use crate::cookie::CookieAttributes;

/// Errors raised by cookie jar implementations.
///
/// These never reach users of [`crate::SyncAuthStore`]; the store traces and
/// drops them, treating the cookie medium as a durability layer rather than
/// a correctness dependency.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The cookie medium cannot be mutated in the current execution phase,
    /// e.g. a server response whose headers have already been sent.
    #[error("Cookie jar is not mutable in the current context: {0}")]
    Immutable(String),

    /// The storage backend failed.
    #[error("Cookie storage operation failed: {0}")]
    Backend(String),
}

/// Abstraction over the cookie medium backing a [`crate::SyncAuthStore`].
///
/// One implementation exists per execution context (browser page, server
/// request, in-memory for tests); the store is written once against this
/// trait and never branches on environment.
///
/// Methods are synchronous: the store's mutators run to completion without
/// suspending, and persistence is fire-and-forget from the caller's point
/// of view.
pub trait CookieJar: Send + Sync {
    /// Returns the previously persisted auth cookie value, if any.
    ///
    /// Called at most once, when the store is constructed. Context-specific
    /// failures (no cookie header available, no browser document) map to
    /// `None` rather than an error.
    fn read_initial(&self) -> Option<String>;

    /// Writes the serialized auth state under the fixed auth cookie name.
    fn persist(&self, serialized: &str, attributes: &CookieAttributes)
    -> Result<(), PersistenceError>;

    /// Removes the persisted auth state. Removing an absent cookie is not
    /// an error.
    ///
    /// `attributes` are the same ones the value was persisted with; jars
    /// that emit deletion cookies must target the same Path and Domain or
    /// the browser keeps the stored cookie.
    fn clear(&self, attributes: &CookieAttributes) -> Result<(), PersistenceError>;
}

// Hosts often need to keep a handle on the jar after handing it to a store,
// e.g. to drain queued Set-Cookie headers once the request completes.
impl<T: CookieJar + ?Sized> CookieJar for std::sync::Arc<T> {
    fn read_initial(&self) -> Option<String> {
        (**self).read_initial()
    }

    fn persist(
        &self,
        serialized: &str,
        attributes: &CookieAttributes,
    ) -> Result<(), PersistenceError> {
        (**self).persist(serialized, attributes)
    }

    fn clear(&self, attributes: &CookieAttributes) -> Result<(), PersistenceError> {
        (**self).clear(attributes)
    }
}
