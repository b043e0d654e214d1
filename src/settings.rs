use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const ROOT_URL: &str = "https://core.telegram.org";
pub const API_PATH: &str = "/bots/api";
pub const CONTENT_SELECTOR: &str = "div#dev_page_content";
pub const OUTPUT_PATH: &str = "api.json";

/// Primitive types every reference may use without a matching type entry.
pub const CORE_TYPES: &[&str] = &["String", "Boolean", "Integer", "Float"];

/// Types documented with neither fields nor subtypes.
pub const APPROVED_NO_SUBTYPES: &[&str] = &["VoiceChatStarted", "InputFile", "CallbackGame"];

/// Types whose bullet lists are prose, not subtype declarations.
pub const NO_SUBTYPE_LISTS: &[&str] = &["InputFile"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub root_url: String,
    #[serde(default)]
    pub api_url: Option<String>,
    pub content_selector: String,
    pub output: String,
}

impl Settings {
    /// Defaults overlaid with `BOTAPI_*` environment variables.
    pub fn load() -> Result<Self> {
        Config::builder()
            .set_default("root_url", ROOT_URL)?
            .set_default("content_selector", CONTENT_SELECTOR)?
            .set_default("output", OUTPUT_PATH)?
            .add_source(Environment::with_prefix("BOTAPI"))
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid BOTAPI_* settings")
    }

    /// The page every relative link in the document is resolved against.
    pub fn api_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.clone(),
            None => format!("{}{}", self.root_url.trim_end_matches('/'), API_PATH),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            root_url: ROOT_URL.to_string(),
            api_url: None,
            content_selector: CONTENT_SELECTOR.to_string(),
            output: OUTPUT_PATH.to_string(),
        }
    }
}
