//! Sitemap document (`sitemap.xml`) per the sitemaps.org protocol
//!
//! Only `<loc>` is written. Reading collects the `<loc>` of every `<url>`
//! and ignores the optional metadata elements.

use crate::WeaveError;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File name of the sitemap inside a corpus folder
pub const SITEMAP_FILE: &str = "sitemap.xml";

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Renders a sitemap with one `<url><loc>` per URL, sorted and deduplicated
pub fn render_sitemap(urls: &[String]) -> String {
    let sorted: BTreeSet<&str> = urls.iter().map(String::as_str).collect();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NAMESPACE));
    for url in sorted {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(url)));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Writes `<folder>/sitemap.xml` and returns its path
pub fn write_sitemap(folder: &Path, urls: &[String]) -> Result<PathBuf, WeaveError> {
    let path = folder.join(SITEMAP_FILE);
    std::fs::write(&path, render_sitemap(urls))?;
    Ok(path)
}

/// Reads the `<loc>` entries of a sitemap in document order
pub fn read_sitemap(path: &Path) -> Result<Vec<String>, WeaveError> {
    let content = std::fs::read_to_string(path)?;
    parse_sitemap(&content)
}

pub(crate) fn parse_sitemap(xml: &str) -> Result<Vec<String>, WeaveError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut buf = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"url" => in_url = true,
                b"loc" if in_url => in_loc = true,
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"url" {
                    in_url = false;
                }
                in_loc = false;
            }
            Ok(Event::Text(e)) if in_loc => {
                let text = e
                    .unescape()
                    .map_err(|e| WeaveError::Manifest(format!("invalid sitemap text: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    urls.push(text.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(WeaveError::Manifest(format!(
                    "XML parse error at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(urls)
}
