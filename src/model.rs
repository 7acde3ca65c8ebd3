use serde::Serialize;

/// Delivery protocol of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Protocol {
    /// HLS playlist, downloaded segment by segment
    #[serde(rename = "m3u8_native")]
    M3u8Native,
}

/// Kind of content a format carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
}

/// One downloadable rendition of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Format {
    pub format_id: String,
    pub url: String,
    pub ext: String,
    pub protocol: Protocol,
    pub media_type: MediaType,
}

impl Format {
    /// The single HLS rendition served for every video and recording
    pub fn hls(manifest_url: impl Into<String>) -> Self {
        Self {
            format_id: "hls".to_string(),
            url: manifest_url.into(),
            ext: "mp4".to_string(),
            protocol: Protocol::M3u8Native,
            media_type: MediaType::Video,
        }
    }
}

/// Normalised metadata for a karaoke video or recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub id: String,
    pub title: String,
    pub uploader: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub song_title: String,
    pub song_artist: String,
    /// `YYYYMMDD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    pub formats: Vec<Format>,
}
