use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Basic client behavior settings. These specify the targeted Recordbase
/// instance and are uneditable once the client is initialized.
///
/// Defaults to
///
/// ```
/// # use recordbase_core::ClientSettings;
/// let settings = ClientSettings {
///     base_url: "https://api.recordbase.io".to_string(),
///     user_agent: "Recordbase Rust-SDK".to_string(),
///     lang: None,
/// };
/// let default = ClientSettings::default();
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct ClientSettings {
    /// The base url of the targeted Recordbase instance. Defaults to `https://api.recordbase.io`
    pub base_url: String,
    /// The user_agent sent to Recordbase. Defaults to `Recordbase Rust-SDK`
    pub user_agent: String,
    /// Optional language reported with every request.
    pub lang: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.recordbase.io".into(),
            user_agent: "Recordbase Rust-SDK".into(),
            lang: None,
        }
    }
}
