use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Name of the cookie holding the serialized auth state.
pub const AUTH_COOKIE_NAME: &str = "rb_auth";

/// Fallback cookie lifetime applied when a save carries no token-derived
/// expiration. Fourteen days, matching the hosted Recordbase session length.
pub const DEFAULT_COOKIE_LIFETIME: std::time::Duration =
    std::time::Duration::from_secs(14 * 24 * 60 * 60);

/// SameSite cookie attribute (cross-site request policy).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum SameSite {
    /// Cookie only sent on same-site requests.
    Strict,
    /// Cookie also sent on top-level cross-site navigation.
    Lax,
    /// Cookie sent on all requests (browsers require Secure alongside).
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        write!(f, "{}", s)
    }
}

/// Attributes applied when the auth cookie is written.
///
/// These are passed through to the cookie medium as-is; the store only ever
/// fills in [`CookieAttributes::expires`] from the token's own expiration
/// claim. Defaults keep the cookie client-readable (`http_only = false`,
/// the SDK reads it back in the browser) but otherwise locked down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct CookieAttributes {
    /// HttpOnly attribute. Defaults to `false` so the browser SDK can read
    /// the cookie back.
    pub http_only: bool,
    /// Secure attribute (HTTPS-only). Defaults to `true`.
    pub secure: bool,
    /// SameSite attribute. Defaults to [`SameSite::Strict`].
    pub same_site: SameSite,
    /// Cookie path. Defaults to `/`.
    pub path: String,
    /// Cookie domain, host-only when absent.
    pub domain: Option<String>,
    /// Expiration instant; session cookie when absent.
    pub expires: Option<DateTime<Utc>>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            http_only: false,
            secure: true,
            same_site: SameSite::Strict,
            path: "/".to_string(),
            domain: None,
            expires: None,
        }
    }
}

impl CookieAttributes {
    /// Sets the expiration to `now` plus [`DEFAULT_COOKIE_LIFETIME`].
    pub fn with_default_expiry(mut self, now: DateTime<Utc>) -> Self {
        self.expires = Some(now + DEFAULT_COOKIE_LIFETIME);
        self
    }

    /// Renders `name=value` plus these attributes in `Set-Cookie` /
    /// `document.cookie` assignment form.
    pub fn render(&self, name: &str, value: &str) -> String {
        let mut rendered = format!("{}={}", name, value);
        rendered.push_str(&format!("; Path={}", self.path));
        if let Some(domain) = &self.domain {
            rendered.push_str(&format!("; Domain={}", domain));
        }
        if let Some(expires) = self.expires {
            rendered.push_str(&format!(
                "; Expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }
        rendered.push_str(&format!("; SameSite={}", self.same_site));
        if self.secure {
            rendered.push_str("; Secure");
        }
        if self.http_only {
            rendered.push_str("; HttpOnly");
        }
        rendered
    }

    /// Renders the deletion form of the cookie, expired in the past.
    ///
    /// Browsers only remove a cookie when the deletion's Path and Domain
    /// match the stored cookie's, so these are carried over from the
    /// attributes the value was persisted with. Max-Age covers clients
    /// that ignore Expires.
    pub fn render_expired(&self, name: &str) -> String {
        let mut rendered = format!("{}=; Path={}", name, self.path);
        if let Some(domain) = &self.domain {
            rendered.push_str(&format!("; Domain={}", domain));
        }
        rendered.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0");
        rendered
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn defaults_match_documented_surface() {
        let attributes = CookieAttributes::default();
        assert!(!attributes.http_only);
        assert!(attributes.secure);
        assert_eq!(attributes.same_site, SameSite::Strict);
        assert_eq!(attributes.path, "/");
        assert_eq!(attributes.domain, None);
        assert_eq!(attributes.expires, None);
    }

    #[test]
    fn default_expiry_is_fourteen_days() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let attributes = CookieAttributes::default().with_default_expiry(now);
        assert_eq!(
            attributes.expires,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn renders_full_attribute_set() {
        let now = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        let attributes = CookieAttributes {
            http_only: true,
            secure: true,
            same_site: SameSite::Lax,
            path: "/app".to_string(),
            domain: Some("example.com".to_string()),
            expires: Some(now),
        };

        assert_eq!(
            attributes.render(AUTH_COOKIE_NAME, "v"),
            "rb_auth=v; Path=/app; Domain=example.com; \
             Expires=Tue, 14 Nov 2023 22:13:20 GMT; SameSite=Lax; Secure; HttpOnly"
        );
    }

    #[test]
    fn renders_minimal_attribute_set() {
        let attributes = CookieAttributes {
            secure: false,
            ..CookieAttributes::default()
        };

        assert_eq!(
            attributes.render(AUTH_COOKIE_NAME, "v"),
            "rb_auth=v; Path=/; SameSite=Strict"
        );
    }

    #[test]
    fn expired_render_keeps_path_and_domain() {
        let attributes = CookieAttributes {
            path: "/app".to_string(),
            domain: Some("example.com".to_string()),
            ..CookieAttributes::default()
        };

        assert_eq!(
            attributes.render_expired(AUTH_COOKIE_NAME),
            "rb_auth=; Path=/app; Domain=example.com; \
             Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0"
        );
    }

    #[test]
    fn serde_uses_camel_case_and_defaults() {
        let attributes: CookieAttributes = serde_json::from_str("{\"httpOnly\": true}").unwrap();
        assert!(attributes.http_only);
        assert!(attributes.secure);
        assert_eq!(attributes.same_site, SameSite::Strict);

        let json = serde_json::to_value(&attributes).unwrap();
        assert_eq!(json["sameSite"], "strict");
    }
}
