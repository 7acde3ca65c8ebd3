use crate::config::ScrapeStrategy;
use crate::error::ExtractError;
use html_escape::decode_html_entities;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;

// `<p class="x">..</p>` or `<div class="x">..</div>`; the opening tag picks
// the branch, so the closing tag always pairs with it.
static LABELLED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<p\s+class="([^" ]+?)">(.+?)</p>|<div\s+class="([^" ]+?)">(.+?)</div>"#)
        .unwrap()
});

static PUBLIC_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)<div id="public_comment">\s*<p>\s*([^<]*?)\s*</p>"#).unwrap()
});

static PROFILE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<a href="https://www\.clubdam\.com/app/damtomo/member/info/Profile\.do\?damtomoId=([^"]+)""#,
    )
    .unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static POLITE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*さん\s*$").unwrap());
static SLASH_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4}/\d{2}/\d{2})").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").unwrap());
static DECIMAL_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").unwrap());

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*<\s*br\s*/?\s*>\s*").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\s*/\s*p\s*>\s*<\s*p[^>]*>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());

/// Labelled text values scraped from a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(HashMap<String, String>);

impl FieldMap {
    /// Build from `(label, raw content)` pairs in document order.
    ///
    /// A repeated label keeps its last value, and empty values are dropped
    /// only after that, so an empty repeat removes the label.
    fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map: HashMap<String, String> = pairs.into_iter().collect();
        map.retain(|_, value| !value.is_empty());
        for value in map.values_mut() {
            *value = collapse_whitespace(value);
        }
        FieldMap(map)
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    /// Value for a label the result cannot do without
    pub fn require(&self, label: &str) -> Result<&str, ExtractError> {
        self.get(label).ok_or_else(|| ExtractError::missing(label))
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.insert(label.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything read from the page itself
#[derive(Debug, Clone)]
pub struct PageMetadata {
    pub description: Option<String>,
    pub uploader_id: Option<String>,
    pub fields: FieldMap,
    pub title: String,
}

/// Scrape description, uploader id, the labelled fields and a title.
///
/// `user_name` loses its trailing `さん` in the returned map. Videos and
/// recordings carry no title of their own, so one is composed as
/// `song_title-song_artist-user_name`.
pub fn scrape_page(html: &str, strategy: ScrapeStrategy) -> Result<PageMetadata, ExtractError> {
    let description = PUBLIC_COMMENT
        .captures(html)
        .map(|caps| caps[1].to_string());
    let uploader_id = PROFILE_LINK.captures(html).map(|caps| caps[1].to_string());

    let mut fields = match strategy {
        ScrapeStrategy::Regex => scrape_fields(html),
        ScrapeStrategy::Dom => scrape_fields_dom(html),
    };
    debug!("Scraped {} labelled fields", fields.len());

    let user_name = strip_polite_suffix(fields.require("user_name")?);
    fields.insert("user_name", user_name.clone());

    let title = format!(
        "{}-{}-{}",
        fields.require("song_title")?,
        fields.require("song_artist")?,
        user_name
    );

    Ok(PageMetadata {
        description,
        uploader_id,
        fields,
        title,
    })
}

/// Every `<p|div class="LABEL">CONTENT</p|div>` in the page, cleaned.
pub fn scrape_fields(html: &str) -> FieldMap {
    FieldMap::from_pairs(LABELLED_BLOCK.captures_iter(html).filter_map(|caps| {
        let label = caps.get(1).or_else(|| caps.get(3))?;
        let content = caps.get(2).or_else(|| caps.get(4))?;
        Some((label.as_str().to_string(), clean_html(content.as_str())))
    }))
}

/// Same labels as [`scrape_fields`], read through an HTML tree query.
///
/// Nested labelled blocks are all visited, which the pattern match cannot
/// do, so pages with deeper markup yield a superset of its labels.
pub fn scrape_fields_dom(html: &str) -> FieldMap {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("p[class], div[class]") {
        Ok(selector) => selector,
        Err(_) => return FieldMap::default(),
    };

    FieldMap::from_pairs(document.select(&selector).filter_map(|element| {
        let class = element.value().attr("class")?;
        if class.is_empty() || class.contains(char::is_whitespace) {
            return None;
        }
        let text = element.text().collect::<Vec<_>>().join(" ");
        Some((class.to_string(), text.trim().to_string()))
    }))
}

/// Turn a markup fragment into plain text.
///
/// Line breaks and paragraph boundaries become newlines, every other tag is
/// removed, entities are decoded and the result is trimmed.
pub fn clean_html(fragment: &str) -> String {
    let text = fragment.replace('\n', " ");
    let text = BR_TAG.replace_all(&text, "\n");
    let text = PARAGRAPH_BREAK.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    decode_html_entities(&text).trim().to_string()
}

pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE.replace_all(value, " ").into_owned()
}

/// `"ＮＡＮＡさん"` -> `"ＮＡＮＡ"`
pub fn strip_polite_suffix(user_name: &str) -> String {
    POLITE_SUFFIX.replace(user_name, "").into_owned()
}

/// First `YYYY/MM/DD` in `value` as `YYYYMMDD`
pub fn upload_date(value: &str) -> Option<String> {
    let caps = SLASH_DATE.captures(value)?;
    ascii_digits(&caps[1].replace('/', ""))
}

/// First run of digits in `value`
///
/// Any Unicode decimal digits count, so `"４ 回視聴"` reads as 4.
pub fn first_number(value: &str) -> Option<u64> {
    let caps = DIGITS.captures(value)?;
    ascii_digits(&caps[1])?.parse().ok()
}

/// Rewrite a run of decimal digits from any script as ASCII digits.
fn ascii_digits(digits: &str) -> Option<String> {
    digits
        .chars()
        .map(|c| digit_value(c).and_then(|d| char::from_digit(d, 10)))
        .collect()
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

// Decimal digits are encoded in contiguous runs of ten starting at zero, so
// the offset from the start of the run is the value.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = c;
    while let Some(prev) = (start as u32).checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start = prev;
    }
    Some((c as u32 - start as u32) % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html>
        <body>
            <div class="song-info clearfix">
                <div class="song_title">
                    Get   Wild
                </div>
                <div class="song_artist"><a href="/artist/1">TM NETWORK(TMN)</a></div>
            </div>
            <div id="public_comment">
                <p>
                    やっぱりキーを下げて正解だった感じ。
                </p>
            </div>
            <p class="user_name">
                <a href="https://www.clubdam.com/app/damtomo/member/info/Profile.do?damtomoId=ODk5NTQwMzQ">Ｋドロン</a>
                さん
            </p>
            <p class="date">2020/12/26 21:05</p>
            <p class="audience">12 回視聴</p>
            <p class="nice">いいね 3</p>
            <p class="empty">   </p>
        </body>
    </html>
    "#;

    #[test]
    fn test_scrape_fields() {
        let fields = scrape_fields(PAGE);
        assert_eq!(fields.get("song_title"), Some("Get Wild"));
        assert_eq!(fields.get("song_artist"), Some("TM NETWORK(TMN)"));
        assert_eq!(fields.get("user_name"), Some("Ｋドロン さん"));
        assert_eq!(fields.get("date"), Some("2020/12/26 21:05"));
        assert_eq!(fields.get("empty"), None);
        assert_eq!(fields.get("song-info"), None);
    }

    #[test]
    fn test_scrape_is_deterministic() {
        assert_eq!(scrape_fields(PAGE), scrape_fields(PAGE));
    }

    #[test]
    fn test_scrape_page() {
        let metadata = scrape_page(PAGE, ScrapeStrategy::Regex).unwrap();
        assert_eq!(metadata.title, "Get Wild-TM NETWORK(TMN)-Ｋドロン");
        assert_eq!(metadata.fields.get("user_name"), Some("Ｋドロン"));
        assert_eq!(metadata.uploader_id.as_deref(), Some("ODk5NTQwMzQ"));
        assert_eq!(
            metadata.description.as_deref(),
            Some("やっぱりキーを下げて正解だった感じ。")
        );
    }

    #[test]
    fn test_dom_strategy_agrees_on_fixture() {
        let regex = scrape_page(PAGE, ScrapeStrategy::Regex).unwrap();
        let dom = scrape_page(PAGE, ScrapeStrategy::Dom).unwrap();
        assert_eq!(regex.title, dom.title);
        for label in ["song_title", "song_artist", "user_name", "date", "audience", "nice"] {
            assert_eq!(regex.fields.get(label), dom.fields.get(label), "{label}");
        }
    }

    #[test]
    fn test_dom_strategy_reaches_nested_blocks() {
        let html = r#"<div class="outer"><div class="inner">x</div> tail</div>"#;
        assert_eq!(scrape_fields(html).get("inner"), None);
        assert_eq!(scrape_fields_dom(html).get("inner"), Some("x"));
    }

    #[test]
    fn test_missing_user_name() {
        let html = r#"<p class="song_title">a</p><p class="song_artist">b</p>"#;
        let err = scrape_page(html, ScrapeStrategy::Regex).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField(ref label) if label == "user_name"));
    }

    #[test]
    fn test_missing_song_artist() {
        let html = r#"<p class="song_title">a</p><p class="user_name">c</p>"#;
        let err = scrape_page(html, ScrapeStrategy::Regex).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField(ref label) if label == "song_artist"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let html = r#"<p class="nice">1</p><p class="nice">2</p>"#;
        assert_eq!(scrape_fields(html).get("nice"), Some("2"));

        let html = r#"<p class="nice">1</p><p class="nice"> </p>"#;
        assert_eq!(scrape_fields(html).get("nice"), None);
    }

    #[test]
    fn test_class_with_extra_attribute_is_skipped() {
        let html = r#"<p class="nice" id="n">1</p>"#;
        assert!(scrape_fields(html).is_empty());
    }

    #[test]
    fn test_description_absent() {
        let html = r#"<p class="song_title">a</p><p class="song_artist">b</p><p class="user_name">c</p>"#;
        let metadata = scrape_page(html, ScrapeStrategy::Regex).unwrap();
        assert_eq!(metadata.description, None);
        assert_eq!(metadata.uploader_id, None);
    }

    #[test]
    fn test_clean_html() {
        assert_eq!(clean_html("a<br/>b"), "a\nb");
        assert_eq!(clean_html("<p>a</p> <p class=\"x\">b</p>"), "a\nb");
        assert_eq!(clean_html(" <b>Tom &amp; Jerry</b>\n"), "Tom & Jerry");
        assert_eq!(clean_html("&lt;3"), "<3");
        assert_eq!(
            collapse_whitespace(&clean_html("x < y<br>z > w")),
            "x < y z > w"
        );
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \t\n  b\r\nc"), "a b c");
        assert_eq!(collapse_whitespace("a\u{3000}b"), "a b");
    }

    #[test]
    fn test_strip_polite_suffix() {
        assert_eq!(strip_polite_suffix("箱の「中の人」さん"), "箱の「中の人」");
        assert_eq!(strip_polite_suffix("ＮＡＮＡ"), "ＮＡＮＡ");
        assert_eq!(strip_polite_suffix("Ｋドロン さん "), "Ｋドロン");
        assert_eq!(strip_polite_suffix("さんぽ"), "さんぽ");
    }

    #[test]
    fn test_upload_date() {
        assert_eq!(upload_date("2021/07/21 12:00"), Some("20210721".to_string()));
        assert_eq!(upload_date("投稿日：2020/12/26"), Some("20201226".to_string()));
        assert_eq!(upload_date("昨日"), None);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("4 回視聴"), Some(4));
        assert_eq!(first_number("いいね 12 件 (3)"), Some(12));
        assert_eq!(first_number("再生無し"), None);
    }

    #[test]
    fn test_full_width_digits() {
        assert_eq!(first_number("４ 回視聴"), Some(4));
        assert_eq!(first_number("いいね １２"), Some(12));
        assert_eq!(first_number("٣ views"), Some(3));
        assert_eq!(upload_date("２０２１/０７/２１"), Some("20210721".to_string()));
    }
}
