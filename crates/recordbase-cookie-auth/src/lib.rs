#![doc = include_str!("../README.md")]

mod base_state;
#[cfg(feature = "wasm")]
mod browser;
mod cookie;
mod envelope;
mod jar;
mod memory;
mod request;
mod sync_store;
mod token;

pub use base_state::{BaseAuthState, OnChange, Subscription};
#[cfg(feature = "wasm")]
pub use browser::BrowserCookieJar;
pub use cookie::{AUTH_COOKIE_NAME, CookieAttributes, DEFAULT_COOKIE_LIFETIME, SameSite};
pub use envelope::{AuthEnvelope, AuthRecord, DecodeError, EncodeError, decode, encode};
pub use jar::{CookieJar, PersistenceError};
pub use memory::MemoryCookieJar;
pub use request::RequestCookieJar;
pub use sync_store::SyncAuthStore;
pub use token::token_expiration;
