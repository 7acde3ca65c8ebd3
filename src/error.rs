use thiserror::Error;

/// Errors that can occur while extracting a karaoke video or recording
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The site redirected the page request to its rate-limit landing page
    #[error("You are rate-limited. Try again later.")]
    RateLimited,

    /// The page body carries the site's generic error banner
    #[error("There is an error on server-side. Try again later.")]
    ServerError,

    /// The stream document had no usable `streamingUrl` element
    #[error("Failed to obtain m3u8 URL")]
    ManifestNotFound,

    /// A label the result needs was not scraped from the page
    #[error("Missing field in page: {0}")]
    MissingField(String),

    /// No extractor accepts the given URL
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// Failed to fetch a page or stream document
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The stream document is not well-formed XML
    #[error("Failed to parse stream document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ExtractError {
    /// Whether the failure is a known site condition rather than a bug.
    ///
    /// Expected errors are shown to the user as-is; the caller may try again
    /// later, but nothing here retries.
    pub fn is_expected(&self) -> bool {
        matches!(self, ExtractError::RateLimited | ExtractError::ServerError)
    }

    pub(crate) fn missing(label: &str) -> Self {
        ExtractError::MissingField(label.to_string())
    }
}
