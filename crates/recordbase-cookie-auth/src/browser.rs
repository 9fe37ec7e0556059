use wasm_bindgen::JsCast;

use crate::{
    cookie::{AUTH_COOKIE_NAME, CookieAttributes},
    jar::{CookieJar, PersistenceError},
};

/// `document.cookie` adapter used when the SDK runs in a browser page.
///
/// Requires the default `http_only = false` attribute: an HttpOnly cookie
/// is invisible to `document.cookie` and the store could never read it back
/// on the next page load.
#[derive(Default)]
pub struct BrowserCookieJar;

impl BrowserCookieJar {
    /// Creates a new jar over the current page's document.
    pub fn new() -> Self {
        Self
    }
}

fn document() -> Result<web_sys::HtmlDocument, PersistenceError> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.dyn_into::<web_sys::HtmlDocument>().ok())
        .ok_or_else(|| PersistenceError::Backend("no browser document available".to_string()))
}

impl CookieJar for BrowserCookieJar {
    fn read_initial(&self) -> Option<String> {
        let cookies = document().ok()?.cookie().ok()?;
        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == AUTH_COOKIE_NAME).then(|| value.to_string())
        })
    }

    fn persist(
        &self,
        serialized: &str,
        attributes: &CookieAttributes,
    ) -> Result<(), PersistenceError> {
        document()?
            .set_cookie(&attributes.render(AUTH_COOKIE_NAME, serialized))
            .map_err(|_| PersistenceError::Backend("document.cookie rejected the write".into()))
    }

    fn clear(&self, attributes: &CookieAttributes) -> Result<(), PersistenceError> {
        document()?
            .set_cookie(&attributes.render_expired(AUTH_COOKIE_NAME))
            .map_err(|_| PersistenceError::Backend("document.cookie rejected the write".into()))
    }
}
