use crate::error::ExtractError;
use encoding_rs::SHIFT_JIS;
use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use url::Url;

/// Banner the site renders in place of content when its backend fails
pub const SERVER_ERROR_MARKER: &str = "<h2>予期せぬエラーが発生しました。</h2>";

/// A fetched document, decoded to text
#[derive(Debug, Clone)]
pub struct Page {
    pub text: String,
    /// URL after following redirects
    pub final_url: Url,
}

pub struct RequestFetcher {
    client: Client,
    rate_limit_url: Url,
}

impl RequestFetcher {
    /// `rate_limit_url` is the landing page the site redirects to when it
    /// throttles a client.
    pub fn new(
        timeout: Option<Duration>,
        user_agent: &str,
        rate_limit_url: Url,
    ) -> Result<Self, ExtractError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent.parse()?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ja,en;q=0.8"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            rate_limit_url,
        })
    }

    /// Fetch an HTML page, failing on the site's two known error conditions.
    pub fn fetch_page(&self, url: &str) -> Result<Page, ExtractError> {
        debug!("Downloading webpage {}", url);
        let response = self.client.get(url).send()?;

        if response.url() == &self.rate_limit_url {
            warn!("Redirected to {}", self.rate_limit_url);
            return Err(ExtractError::RateLimited);
        }

        let page = decode(response.error_for_status()?)?;
        if page.text.contains(SERVER_ERROR_MARKER) {
            return Err(ExtractError::ServerError);
        }

        Ok(page)
    }

    /// Fetch any other document (the stream XML) without page checks.
    pub fn fetch_document(&self, url: &str) -> Result<Page, ExtractError> {
        debug!("Requesting stream information {}", url);
        let response = self.client.get(url).send()?.error_for_status()?;
        decode(response)
    }
}

fn decode(response: Response) -> Result<Page, ExtractError> {
    let final_url = response.url().clone();
    let bytes = response.bytes()?;

    let (text, _, had_errors) = SHIFT_JIS.decode(&bytes);
    if had_errors {
        debug!("Malformed Shift_JIS sequences in {}", final_url);
    }

    Ok(Page {
        text: text.into_owned(),
        final_url,
    })
}
