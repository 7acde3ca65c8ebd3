use std::time::Duration;

use log::debug;

use crate::config::{ScrapeStrategy, Settings};
use crate::error::ExtractError;
use crate::extractors::{all_extractors, find_extractor, Extractor};
use crate::model::ExtractionResult;

/// Builder for configuring a [`Damtomo`] client
#[derive(Debug, Default)]
pub struct DamtomoBuilder {
    settings: Option<Settings>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    scrape_strategy: Option<ScrapeStrategy>,
}

impl DamtomoBuilder {
    /// Start from a loaded or hand-built [`Settings`] instead of the defaults
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Point every request at another host
    ///
    /// # Example
    /// ```
    /// use damtomo_extract::Damtomo;
    ///
    /// let builder = Damtomo::builder().base_url("http://127.0.0.1:8080");
    /// ```
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// Sub-second parts are dropped.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Choose how labelled fields are read from a page
    ///
    /// # Example
    /// ```
    /// use damtomo_extract::{Damtomo, ScrapeStrategy};
    ///
    /// let builder = Damtomo::builder().scrape_strategy(ScrapeStrategy::Dom);
    /// ```
    pub fn scrape_strategy(mut self, strategy: ScrapeStrategy) -> Self {
        self.scrape_strategy = Some(strategy);
        self
    }

    /// Build the client
    ///
    /// # Errors
    /// Returns `ExtractError` if the base URL does not parse or the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<Damtomo, ExtractError> {
        let mut settings = self.settings.unwrap_or_default();
        if let Some(base_url) = self.base_url {
            settings.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            settings.timeout = timeout.as_secs();
        }
        if let Some(user_agent) = self.user_agent {
            settings.user_agent = user_agent;
        }
        if let Some(strategy) = self.scrape_strategy {
            settings.scrape_strategy = strategy;
        }
        debug!("{:?}", settings);

        Ok(Damtomo {
            extractors: all_extractors(&settings)?,
        })
    }
}

/// Client holding both extractors
pub struct Damtomo {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Damtomo {
    /// Creates a new builder
    pub fn builder() -> DamtomoBuilder {
        DamtomoBuilder::default()
    }

    /// Whether any extractor accepts `url`
    pub fn suitable(&self, url: &str) -> bool {
        find_extractor(&self.extractors, url).is_some()
    }

    /// Extract the resource behind `url`
    ///
    /// # Example
    /// ```no_run
    /// # use damtomo_extract::Damtomo;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = Damtomo::builder().build()?.extract(
    ///     "https://www.clubdam.com/app/damtomo/karaokeMovie/StreamingDkm.do?karaokeMovieId=2414316",
    /// )?;
    /// println!("{}", result.title);
    /// # Ok(())
    /// # }
    /// ```
    pub fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        let extractor = find_extractor(&self.extractors, url)
            .ok_or_else(|| ExtractError::UnsupportedUrl(url.to_string()))?;
        debug!("Using extractor {}", extractor.name());
        extractor.extract(url)
    }
}
