use std::sync::RwLock;

use chrono::Utc;

use crate::{
    cookie::CookieAttributes,
    jar::{CookieJar, PersistenceError},
};

/// In-memory cookie jar holding the single auth cookie value.
///
/// Used by tests and by clients that do not need the auth state to outlive
/// the process.
#[derive(Default)]
pub struct MemoryCookieJar {
    stored: RwLock<Option<(String, CookieAttributes)>>,
}

impl MemoryCookieJar {
    /// Creates a new empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a jar pre-seeded with a serialized value, as if a previous
    /// session had persisted it.
    pub fn with_value(serialized: impl Into<String>) -> Self {
        Self {
            stored: RwLock::new(Some((serialized.into(), CookieAttributes::default()))),
        }
    }

    /// Returns the currently stored serialized value.
    pub fn value(&self) -> Option<String> {
        self.stored
            .read()
            .expect("RwLock should not be poisoned")
            .as_ref()
            .map(|(value, _)| value.clone())
    }

    /// Returns the attributes the stored value was persisted with.
    pub fn attributes(&self) -> Option<CookieAttributes> {
        self.stored
            .read()
            .expect("RwLock should not be poisoned")
            .as_ref()
            .map(|(_, attributes)| attributes.clone())
    }
}

impl CookieJar for MemoryCookieJar {
    fn read_initial(&self) -> Option<String> {
        let stored = self.stored.read().expect("RwLock should not be poisoned");
        // An expired cookie would not have been sent by a browser either.
        let (value, attributes) = stored.as_ref()?;
        if attributes.expires.is_some_and(|expires| expires < Utc::now()) {
            return None;
        }
        Some(value.clone())
    }

    fn persist(
        &self,
        serialized: &str,
        attributes: &CookieAttributes,
    ) -> Result<(), PersistenceError> {
        let mut stored = self.stored.write().expect("RwLock should not be poisoned");
        *stored = Some((serialized.to_string(), attributes.clone()));
        Ok(())
    }

    fn clear(&self, _attributes: &CookieAttributes) -> Result<(), PersistenceError> {
        let mut stored = self.stored.write().expect("RwLock should not be poisoned");
        *stored = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn persist_and_read_back() {
        let jar = MemoryCookieJar::new();
        assert_eq!(jar.read_initial(), None);

        jar.persist("serialized", &CookieAttributes::default())
            .unwrap();
        assert_eq!(jar.read_initial(), Some("serialized".to_string()));
        assert_eq!(jar.value(), Some("serialized".to_string()));
    }

    #[test]
    fn clear_removes_value() {
        let jar = MemoryCookieJar::with_value("serialized");
        jar.clear(&CookieAttributes::default()).unwrap();
        assert_eq!(jar.read_initial(), None);
        assert_eq!(jar.value(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let jar = MemoryCookieJar::new();
        jar.clear(&CookieAttributes::default()).unwrap();
        jar.clear(&CookieAttributes::default()).unwrap();
        assert_eq!(jar.value(), None);
    }

    #[test]
    fn expired_value_reads_as_absent() {
        let jar = MemoryCookieJar::new();
        let expired = CookieAttributes {
            expires: Some(Utc::now() - Duration::hours(1)),
            ..CookieAttributes::default()
        };

        jar.persist("serialized", &expired).unwrap();
        assert_eq!(jar.read_initial(), None);
    }

    #[test]
    fn stores_attributes_alongside_value() {
        let jar = MemoryCookieJar::new();
        let attributes = CookieAttributes {
            http_only: true,
            ..CookieAttributes::default()
        };

        jar.persist("serialized", &attributes).unwrap();
        assert_eq!(jar.attributes(), Some(attributes));
    }
}
