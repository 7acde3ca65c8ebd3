pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;

pub use builder::{Damtomo, DamtomoBuilder};
pub use crate::config::{ScrapeStrategy, Settings};
pub use error::ExtractError;
pub use extractors::{DamtomoExtractor, Extractor, FieldMap};
pub use model::{ExtractionResult, Format, MediaType, Protocol};

/// Extract a DAM★とも video or recording with settings from `damtomo.toml`
/// and the environment.
///
/// # Example
/// ```no_run
/// # fn main() -> Result<(), damtomo_extract::ExtractError> {
/// let result = damtomo_extract::extract(
///     "https://www.clubdam.com/app/damtomo/karaokePost/StreamingKrk.do?karaokeContributeId=27376862",
/// )?;
/// assert_eq!(result.formats.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn extract(url: &str) -> Result<ExtractionResult, ExtractError> {
    let settings = Settings::load()?;
    Damtomo::builder().settings(settings).build()?.extract(url)
}
