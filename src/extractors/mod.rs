use crate::config::Settings;
use crate::error::ExtractError;
use crate::model::ExtractionResult;

mod damtomo;
pub mod fields;
pub mod manifest;

pub use damtomo::{assemble, DamtomoExtractor, Variant, RECORD, VIDEO};
pub use fields::{FieldMap, PageMetadata};

pub trait Extractor {
    /// Short identifier, e.g. `damtomo:video`
    fn name(&self) -> &'static str;
    fn suitable(&self, url: &str) -> bool;
    fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError>;
}

/// Every extractor this crate provides, sharing one set of settings
pub fn all_extractors(settings: &Settings) -> Result<Vec<Box<dyn Extractor>>, ExtractError> {
    Ok(vec![
        Box::new(DamtomoExtractor::video(settings.clone())?),
        Box::new(DamtomoExtractor::record(settings.clone())?),
    ])
}

/// First extractor that accepts `url`
pub fn find_extractor<'a>(
    extractors: &'a [Box<dyn Extractor>],
    url: &str,
) -> Option<&'a dyn Extractor> {
    extractors
        .iter()
        .find(|extractor| extractor.suitable(url))
        .map(|extractor| extractor.as_ref())
}
