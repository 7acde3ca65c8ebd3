use crate::error::ExtractError;
use log::debug;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

const STREAMING_URL: &[u8] = b"streamingUrl";

/// Find the first `streamingUrl` element bound to `namespace` and return its
/// trimmed text.
///
/// Only the element's leading text counts; text inside or after a child
/// element is ignored. A missing element, or one with blank text, is
/// [`ExtractError::ManifestNotFound`].
pub fn find_streaming_url(xml: &str, namespace: &str) -> Result<String, ExtractError> {
    let mut reader = NsReader::from_str(xml);

    // Depth below the matched element; None until it is found
    let mut depth: Option<usize> = None;
    // Set once the matched element opens its first child
    let mut child_seen = false;
    let mut text = String::new();

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        match (depth, event) {
            (None, Event::Start(e)) => {
                if is_target(&ns, e.local_name().as_ref(), namespace) {
                    depth = Some(0);
                }
            }
            (None, Event::Empty(e)) => {
                if is_target(&ns, e.local_name().as_ref(), namespace) {
                    break;
                }
            }
            (None, Event::Eof) => break,
            (None, _) => {}
            (Some(d), Event::Start(_)) => {
                child_seen = true;
                depth = Some(d + 1);
            }
            (Some(0), Event::Empty(_)) => child_seen = true,
            (Some(0), Event::End(_)) => break,
            (Some(d), Event::End(_)) => depth = Some(d - 1),
            (Some(_), _) if child_seen => {}
            (Some(0), Event::Text(e)) => text.push_str(&e.decode().map_err(quick_xml::Error::from)?),
            (Some(0), Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()))
            }
            (Some(0), Event::GeneralRef(e)) => {
                if let Some(c) = e.resolve_char_ref()? {
                    text.push(c);
                } else {
                    let name = e.decode().map_err(quick_xml::Error::from)?;
                    if let Some(value) = resolve_xml_entity(&name) {
                        text.push_str(value);
                    }
                }
            }
            (Some(_), Event::Eof) => break,
            (Some(_), _) => {}
        }
    }

    let url = text.trim();
    if url.is_empty() {
        return Err(ExtractError::ManifestNotFound);
    }
    debug!("Resolved stream manifest {}", url);
    Ok(url.to_string())
}

fn is_target(ns: &ResolveResult, local_name: &[u8], namespace: &str) -> bool {
    local_name == STREAMING_URL
        && matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == namespace.as_bytes())
}
