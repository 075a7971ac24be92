use thiserror::Error;

use crate::models::Category;

/// Recoverable failures surfaced to the operator. None of these are fatal:
/// every variant leaves the previous valid state intact.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("form is not ready to send: {0}")]
    Validation(String),

    #[error("bulk payload rejected: {0}")]
    Payload(String),

    #[error("{url} is not a {category} store listing")]
    StoreMismatch { category: Category, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("the listing returned no usable data")]
    NoData,
}
