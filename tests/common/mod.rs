#![allow(dead_code)]

use damtomo_extract::Damtomo;
use encoding_rs::SHIFT_JIS;
use mockito::{Matcher, Mock, ServerGuard};

pub const VIDEO_PAGE: &str = "/app/damtomo/karaokeMovie/StreamingDkm.do";
pub const VIDEO_STREAM: &str = "/app/damtomo/karaokeMovie/GetStreamingDkmUrlXML.do";
pub const VIDEO_NS: &str = "https://www.clubdam.com/app/damtomo/karaokeMovie/GetStreamingDkmUrlXML";

pub const RECORD_PAGE: &str = "/app/damtomo/karaokePost/StreamingKrk.do";
pub const RECORD_STREAM: &str = "/app/damtomo/karaokePost/GetStreamingKrkUrlXML.do";
pub const RECORD_NS: &str = "https://www.clubdam.com/app/damtomo/karaokePost/GetStreamingKrkUrlXML";

pub fn video_url(id: &str) -> String {
    format!("https://www.clubdam.com/app/damtomo/karaokeMovie/StreamingDkm.do?karaokeMovieId={id}")
}

pub fn record_url(id: &str) -> String {
    format!("https://www.clubdam.com/app/damtomo/karaokePost/StreamingKrk.do?karaokeContributeId={id}")
}

/// A client whose requests all go to `server`
pub fn client(server: &ServerGuard) -> Damtomo {
    Damtomo::builder()
        .base_url(server.url())
        .user_agent("damtomo-tests")
        .build()
        .unwrap()
}

/// Serve `body` as Shift_JIS at `path` for the given query parameter
pub fn serve_sjis(
    server: &mut ServerGuard,
    path: &str,
    query: Vec<(&str, &str)>,
    content_type: &str,
    body: &str,
) -> Mock {
    let (bytes, _, _) = SHIFT_JIS.encode(body);
    server
        .mock("GET", path)
        .match_query(Matcher::AllOf(
            query
                .into_iter()
                .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
                .collect(),
        ))
        .with_status(200)
        .with_header("content-type", content_type)
        .with_body(bytes)
        .create()
}

/// Stream document with the given `streamingUrl` text
pub fn stream_xml(namespace: &str, streaming_url: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="Shift_JIS"?>
<document xmlns="{namespace}">
  <result>
    <status>0000</status>
    <statusCode>0</statusCode>
    <message></message>
  </result>
  <data>
    <streamingUrl>{streaming_url}</streamingUrl>
  </data>
</document>
"#
    )
}

/// A karaoke page laid out the way the site renders it
pub fn karaoke_page(
    user_name: &str,
    damtomo_id: &str,
    song_title: &str,
    song_artist: &str,
    date: &str,
    audience: &str,
    nice: &str,
    comment: Option<&str>,
) -> String {
    let comment = comment
        .map(|text| {
            format!(
                r#"
                <div id="public_comment">
                    <p>
                        {text}
                    </p>
                </div>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">
    <title>DAM★とも</title>
</head>
<body>
    <div id="wrapper">
        <div class="contents-inner clearfix">
            <div class="song-info clearfix">
                <div class="song_title">
                    {song_title}
                </div>
                <div class="song_artist">
                    {song_artist}
                </div>
            </div>
            <div class="user-info clearfix">
                <a href="https://www.clubdam.com/app/damtomo/member/info/Profile.do?damtomoId={damtomo_id}">
                    <img src="/img/icon.png" alt="">
                </a>
                <p class="user_name">
                    {user_name}
                    さん
                </p>
            </div>
            <ul class="data-list">
                <li><p class="date">{date}</p></li>
                <li><p class="audience">{audience}</p></li>
                <li><p class="nice">{nice}</p></li>
            </ul>{comment}
        </div>
    </div>
</body>
</html>
"#
    )
}
