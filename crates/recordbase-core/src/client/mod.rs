#[allow(clippy::module_inception)]
mod client;
mod client_settings;

pub use client::Client;
pub use client_settings::ClientSettings;
