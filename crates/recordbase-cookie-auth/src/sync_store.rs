use crate::{
    base_state::{BaseAuthState, OnChange, Subscription},
    cookie::CookieAttributes,
    envelope::{self, AuthEnvelope, AuthRecord},
    jar::CookieJar,
    token::token_expiration,
};

/// Keeps the in-memory auth state and its cookie-backed copy in sync.
///
/// Composes a [`BaseAuthState`] (authoritative state plus notifications)
/// with a [`CookieJar`] (the environment-specific cookie medium). Every
/// mutation updates the in-memory state first and then mirrors it into the
/// jar; persistence is strictly best-effort and no method here ever returns
/// an error to its caller. The worst case on any internal failure is a
/// session that behaves as freshly unauthenticated (unreadable persisted
/// value at construction) or one that works in memory but fails to persist.
pub struct SyncAuthStore {
    base: BaseAuthState,
    jar: Box<dyn CookieJar>,
    attributes: CookieAttributes,
}

impl SyncAuthStore {
    /// Creates a store backed by `jar`, priming the in-memory state from
    /// the jar's previously persisted value when one decodes cleanly.
    ///
    /// Priming goes through the normal [`SyncAuthStore::save`] path so the
    /// persisted copy is refreshed with the current `attributes`. An
    /// undecodable value is logged and discarded; the store stays
    /// unauthenticated and the bad value is overwritten on the next save.
    pub fn new(jar: Box<dyn CookieJar>, attributes: CookieAttributes) -> Self {
        let store = Self {
            base: BaseAuthState::new(),
            jar,
            attributes,
        };

        if let Some(initial) = store.jar.read_initial() {
            match envelope::decode(&initial) {
                Ok(envelope) => store.save(&envelope.token, envelope.record),
                Err(e) => {
                    tracing::warn!("Discarding unreadable persisted auth state: {e}");
                }
            }
        }

        store
    }

    /// Saves a new token/record pair.
    ///
    /// The in-memory state is replaced and observers notified before the
    /// persistence attempt begins. The cookie expiration is taken from the
    /// token's own `exp` claim when it has one; otherwise the configured
    /// attributes apply unchanged. An encode failure is logged and the jar
    /// is overwritten with an empty placeholder instead of stale state.
    pub fn save(&self, token: &str, record: Option<AuthRecord>) {
        self.base.save(token, record.clone());

        let mut attributes = self.attributes.clone();
        let envelope = AuthEnvelope {
            token: token.to_string(),
            record,
        };
        let serialized = match envelope::encode(&envelope) {
            Ok(serialized) => {
                if let Some(expires) = token_expiration(token) {
                    attributes.expires = Some(expires);
                }
                serialized
            }
            Err(e) => {
                tracing::warn!("Failed to serialize the new auth state: {e}");
                String::new()
            }
        };

        if let Err(e) = self.jar.persist(&serialized, &attributes) {
            tracing::debug!("Auth state not persisted: {e}");
        }
    }

    /// Clears the auth state, in the jar and in memory.
    ///
    /// Always performs both steps, even when already unauthenticated, so a
    /// stale persisted value cannot outlive an explicit sign-out.
    pub fn clear(&self) {
        if let Err(e) = self.jar.clear(&self.attributes) {
            tracing::debug!("Persisted auth state not cleared: {e}");
        }
        self.base.clear();
    }

    /// Returns the current token, empty when unauthenticated.
    pub fn token(&self) -> String {
        self.base.token()
    }

    /// Returns the current user record, if one is set.
    pub fn record(&self) -> Option<AuthRecord> {
        self.base.record()
    }

    /// Whether a non-expired token is present.
    pub fn is_valid(&self) -> bool {
        self.base.is_valid()
    }

    /// Registers a change observer; see [`BaseAuthState::on_change`].
    pub fn on_change(&self, callback: OnChange) -> Subscription {
        self.base.on_change(callback)
    }
}

impl std::fmt::Debug for SyncAuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncAuthStore")
            .field("is_valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}
