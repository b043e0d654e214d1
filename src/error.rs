use thiserror::Error;

use crate::schema::Category;

/// Extraction failures that mean the document layout is no longer understood.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid API page URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid content selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("content container `{0}` not found in document")]
    MissingContent(String),

    #[error(
        "unexpected table shape in {category} `{entity}`: {} cells, expected {expected}: {cells:?}",
        .cells.len()
    )]
    UnexpectedTableShape {
        entity: String,
        category: Category,
        expected: usize,
        cells: Vec<String>,
    },
}
