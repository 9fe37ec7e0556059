use std::sync::{
    Arc, Mutex, RwLock,
    atomic::{AtomicU64, Ordering},
};

use crate::{envelope::AuthRecord, token::token_expiration};

/// Callback invoked with the new token and record after every state change.
pub type OnChange = Arc<dyn Fn(&str, Option<&AuthRecord>) + Send + Sync>;

struct Observer {
    id: u64,
    callback: OnChange,
}

/// Holds the in-memory auth state and its change observers.
///
/// This is the authoritative state for the lifetime of a client instance.
/// [`crate::SyncAuthStore`] composes it and layers the cookie persistence
/// side effects on top; notification semantics live here and only here.
#[derive(Default)]
pub struct BaseAuthState {
    state: RwLock<(String, Option<AuthRecord>)>,
    observers: Arc<Mutex<Vec<Observer>>>,
    next_observer_id: AtomicU64,
}

/// Handle to a registered observer; dropping it unregisters the observer.
#[must_use = "dropping the subscription unregisters the observer"]
pub struct Subscription {
    observers: Arc<Mutex<Vec<Observer>>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut observers = self.observers.lock().expect("Mutex should not be poisoned");
        observers.retain(|observer| observer.id != self.id);
    }
}

impl BaseAuthState {
    /// Creates an empty, unauthenticated state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current token, empty when unauthenticated.
    pub fn token(&self) -> String {
        self.state
            .read()
            .expect("RwLock should not be poisoned")
            .0
            .clone()
    }

    /// Returns the current user record, if one is set.
    pub fn record(&self) -> Option<AuthRecord> {
        self.state
            .read()
            .expect("RwLock should not be poisoned")
            .1
            .clone()
    }

    /// Whether a token is present and, when it carries an expiration claim,
    /// not yet expired.
    pub fn is_valid(&self) -> bool {
        let token = self.token();
        if token.is_empty() {
            return false;
        }
        match token_expiration(&token) {
            Some(expires) => expires > chrono::Utc::now(),
            None => true,
        }
    }

    /// Replaces the token/record pair and notifies observers with the new
    /// state.
    pub fn save(&self, token: &str, record: Option<AuthRecord>) {
        {
            let mut state = self.state.write().expect("RwLock should not be poisoned");
            *state = (token.to_string(), record.clone());
        }
        self.notify(token, record.as_ref());
    }

    /// Resets to the unauthenticated state and notifies observers.
    pub fn clear(&self) {
        {
            let mut state = self.state.write().expect("RwLock should not be poisoned");
            *state = (String::new(), None);
        }
        self.notify("", None);
    }

    /// Registers a change observer. The callback fires synchronously after
    /// every [`BaseAuthState::save`] and [`BaseAuthState::clear`], observing
    /// the state that was just written.
    pub fn on_change(&self, callback: OnChange) -> Subscription {
        let id = self.next_observer_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut observers = self.observers.lock().expect("Mutex should not be poisoned");
            observers.push(Observer { id, callback });
        }
        Subscription {
            observers: Arc::clone(&self.observers),
            id,
        }
    }

    fn notify(&self, token: &str, record: Option<&AuthRecord>) {
        // Callbacks run outside the lock so they may register/unregister
        // observers or mutate the state themselves.
        let callbacks: Vec<OnChange> = {
            let observers = self.observers.lock().expect("Mutex should not be poisoned");
            observers
                .iter()
                .map(|observer| Arc::clone(&observer.callback))
                .collect()
        };
        for callback in callbacks {
            callback(token, record);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> AuthRecord {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn starts_unauthenticated() {
        let state = BaseAuthState::new();
        assert_eq!(state.token(), "");
        assert_eq!(state.record(), None);
        assert!(!state.is_valid());
    }

    #[test]
    fn save_replaces_state() {
        let state = BaseAuthState::new();
        state.save("t1", Some(record(json!({"id": "u1"}))));

        assert_eq!(state.token(), "t1");
        assert_eq!(state.record(), Some(record(json!({"id": "u1"}))));
        assert!(state.is_valid());

        state.save("t2", None);
        assert_eq!(state.token(), "t2");
        assert_eq!(state.record(), None);
    }

    #[test]
    fn clear_resets_state() {
        let state = BaseAuthState::new();
        state.save("t1", Some(record(json!({"id": "u1"}))));
        state.clear();

        assert_eq!(state.token(), "");
        assert_eq!(state.record(), None);
        assert!(!state.is_valid());
    }

    #[test]
    fn observer_sees_new_state_once_per_mutation() {
        let state = BaseAuthState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_by_callback = Arc::clone(&seen);
        let _subscription = state.on_change(Arc::new(move |token, record| {
            seen_by_callback
                .lock()
                .unwrap()
                .push((token.to_string(), record.cloned()));
        }));

        state.save("t1", Some(record(json!({"id": "u1"}))));
        state.clear();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("t1".to_string(), Some(record(json!({"id": "u1"})))),
                ("".to_string(), None),
            ]
        );
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let state = BaseAuthState::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_by_callback = Arc::clone(&calls);
        let subscription = state.on_change(Arc::new(move |_, _| {
            calls_by_callback.fetch_add(1, Ordering::SeqCst);
        }));

        state.save("t1", None);
        drop(subscription);
        state.save("t2", None);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn multiple_observers_all_fire() {
        let state = BaseAuthState::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = Arc::clone(&calls);
        let _first = state.on_change(Arc::new(move |_, _| {
            first.fetch_add(1, Ordering::SeqCst);
        }));
        let second = Arc::clone(&calls);
        let _second = state.on_change(Arc::new(move |_, _| {
            second.fetch_add(1, Ordering::SeqCst);
        }));

        state.save("t1", None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn expired_token_is_not_valid() {
        let state = BaseAuthState::new();
        // Payload: {"exp": 1000000000} (2001), long expired.
        let expired = "header.eyJleHAiOiAxMDAwMDAwMDAwfQ.sig";
        state.save(expired, None);
        assert!(!state.is_valid());
    }
}
