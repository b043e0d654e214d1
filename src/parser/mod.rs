pub mod extract;
pub mod segment;
pub mod text;
pub mod types;

use reqwest::Url;
use scraper::{Html, Selector};

use crate::error::ExtractError;
use crate::schema::Registry;
use crate::settings::Settings;

/// Document → content container → segmented registry.
pub fn process_document(html: &str, settings: &Settings) -> Result<Registry, ExtractError> {
    let api_url = settings.api_url();
    let base = Url::parse(&api_url).map_err(|e| ExtractError::InvalidBaseUrl {
        url: api_url.clone(),
        reason: e.to_string(),
    })?;
    let selector =
        Selector::parse(&settings.content_selector).map_err(|e| ExtractError::InvalidSelector {
            selector: settings.content_selector.clone(),
            reason: format!("{:?}", e),
        })?;

    let doc = Html::parse_document(html);
    let content = doc
        .select(&selector)
        .next()
        .ok_or_else(|| ExtractError::MissingContent(settings.content_selector.clone()))?;

    segment::segment(content, &base)
}

// ── Tests ──
