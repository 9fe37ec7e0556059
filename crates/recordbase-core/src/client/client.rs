use std::sync::Arc;

use chrono::Utc;
use recordbase_cookie_auth::{CookieAttributes, CookieJar, SyncAuthStore};

use super::client_settings::ClientSettings;

/// The main struct to interact with the Recordbase SDK.
///
/// Construct one per browser page session or per server request and thread
/// the handle through the host application; `Clone` returns an owned
/// reference to the same instance, so all clones share one auth store.
#[derive(Debug, Clone)]
pub struct Client {
    internal: Arc<InternalClient>,
}

#[derive(Debug)]
struct InternalClient {
    settings: ClientSettings,
    auth_store: SyncAuthStore,
}

impl Client {
    /// Creates a client for a browser page, wired to the page's cookie
    /// storage. Outside the `wasm` feature the auth state is held in memory
    /// only, which keeps the construction path usable in native tests.
    pub fn new_browser(
        settings: Option<ClientSettings>,
        attributes: Option<CookieAttributes>,
    ) -> Self {
        #[cfg(feature = "wasm")]
        let jar: Box<dyn CookieJar> = Box::new(recordbase_cookie_auth::BrowserCookieJar::new());
        #[cfg(not(feature = "wasm"))]
        let jar: Box<dyn CookieJar> = Box::new(recordbase_cookie_auth::MemoryCookieJar::new());

        Self::new_internal(jar, settings, attributes)
    }

    /// Creates a client for a server request, over the caller-supplied
    /// request-scoped cookie jar.
    pub fn new_server(
        jar: Box<dyn CookieJar>,
        settings: Option<ClientSettings>,
        attributes: Option<CookieAttributes>,
    ) -> Self {
        Self::new_internal(jar, settings, attributes)
    }

    fn new_internal(
        jar: Box<dyn CookieJar>,
        settings: Option<ClientSettings>,
        attributes: Option<CookieAttributes>,
    ) -> Self {
        let settings = settings.unwrap_or_default();
        let attributes = attributes
            .unwrap_or_else(|| CookieAttributes::default().with_default_expiry(Utc::now()));

        Self {
            internal: Arc::new(InternalClient {
                settings,
                auth_store: SyncAuthStore::new(jar, attributes),
            }),
        }
    }

    /// The auth store backing this client.
    pub fn auth_store(&self) -> &SyncAuthStore {
        &self.internal.auth_store
    }

    /// The settings this client was constructed with.
    pub fn settings(&self) -> &ClientSettings {
        &self.internal.settings
    }
}

#[cfg(test)]
mod tests {
    use recordbase_cookie_auth::{AuthEnvelope, MemoryCookieJar, encode};
    use serde_json::json;

    use super::*;

    #[test]
    fn browser_client_starts_unauthenticated() {
        let client = Client::new_browser(None, None);
        assert!(!client.auth_store().is_valid());
        assert_eq!(client.settings().base_url, "https://api.recordbase.io");
    }

    #[test]
    fn server_client_primes_from_supplied_jar() {
        let envelope = AuthEnvelope {
            token: "abc".to_string(),
            record: Some(json!({"id": "u1"}).as_object().unwrap().clone()),
        };
        let jar = MemoryCookieJar::with_value(encode(&envelope).unwrap());

        let client = Client::new_server(Box::new(jar), None, None);
        assert!(client.auth_store().is_valid());
        assert_eq!(client.auth_store().token(), "abc");
    }

    #[test]
    fn clones_share_the_auth_store() {
        let client = Client::new_browser(None, None);
        let clone = client.clone();

        client.auth_store().save("t1", None);
        assert_eq!(clone.auth_store().token(), "t1");
    }

    #[test]
    fn custom_settings_are_kept() {
        let settings = ClientSettings {
            base_url: "https://pb.example.com".to_string(),
            lang: Some("en-US".to_string()),
            ..ClientSettings::default()
        };
        let client = Client::new_browser(Some(settings), None);
        assert_eq!(client.settings().base_url, "https://pb.example.com");
        assert_eq!(client.settings().lang.as_deref(), Some("en-US"));
    }
}
