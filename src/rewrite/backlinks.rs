//! Mention index and backlink injection
//!
//! A document mentions another when its text contains the other's display
//! slug (last key segment, hyphens as spaces) as a whole word, ignoring case.
//! Text from an existing backlink section on is not searched, so injected
//! sections never create mentions of their own.
//! Building the index compares every pair of documents, so cost grows with
//! the square of the corpus size.

use crate::config::OutputFormat;
use crate::corpus::Corpus;
use crate::WeaveError;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Presence of this text marks a document as already carrying backlinks
pub const RELATED_MARKER: &str = "**Related:**";

/// Human-readable form of a key's last segment
///
/// ```
/// use docweave::rewrite::display_slug;
///
/// assert_eq!(display_slug("guide/getting-started"), "getting started");
/// assert_eq!(display_slug("index"), "index");
/// ```
pub fn display_slug(key: &str) -> String {
    key.rsplit('/').next().unwrap_or(key).replace('-', " ")
}

/// Target key → keys of the documents that mention it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionIndex {
    mentions: BTreeMap<String, BTreeSet<String>>,
}

impl MentionIndex {
    /// Builds the index over a corpus snapshot
    pub fn build(corpus: &Corpus) -> Result<Self, WeaveError> {
        Self::from_documents(corpus.documents().map(|d| (d.key(), d.content())))
    }

    /// Builds the index over `(key, content)` pairs
    pub fn from_documents<'a>(
        documents: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, WeaveError> {
        let documents: Vec<(&str, &str)> = documents.into_iter().collect();
        let mut mentions: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (target, _) in &documents {
            let slug = display_slug(target);
            if slug.trim().is_empty() {
                continue;
            }
            let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&slug)))?;

            for (source, content) in &documents {
                if source != target && pattern.is_match(body(content)) {
                    mentions
                        .entry(target.to_string())
                        .or_default()
                        .insert(source.to_string());
                }
            }
        }

        Ok(Self { mentions })
    }

    /// Keys mentioning `key`, sorted
    pub fn mentions_of(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.mentions.get(key)
    }

    /// Number of documents with at least one mention
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.mentions.iter()
    }
}

/// Document text before any backlink section
fn body(content: &str) -> &str {
    match content.find(RELATED_MARKER) {
        Some(at) => &content[..at],
        None => content,
    }
}

/// Renders the appended backlink section
pub fn related_section<'a>(
    sources: impl IntoIterator<Item = &'a String>,
    format: OutputFormat,
) -> String {
    let mut section = format!("\n\n---\n\n{}\n\n", RELATED_MARKER);
    for source in sources {
        let line = match format {
            OutputFormat::Markdown => format!("- [[{}]]\n", source),
            OutputFormat::Html => format!("- [{}]({}.html)\n", display_slug(source), source),
        };
        section.push_str(&line);
    }
    section
}

/// Outcome of one injection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BacklinkReport {
    /// Documents that received a new section
    pub injected: Vec<String>,

    /// Mentioned documents left alone because they already had one
    pub already_present: usize,
}

/// Appends a backlink section to every mentioned document lacking one
pub fn inject_backlinks(
    corpus: &mut Corpus,
    index: &MentionIndex,
    format: OutputFormat,
) -> BacklinkReport {
    let mut report = BacklinkReport::default();

    for (target, sources) in index.iter() {
        let Some(document) = corpus.get_mut(target) else {
            continue;
        };

        if document.content().contains(RELATED_MARKER) {
            report.already_present += 1;
            continue;
        }

        let mut content = document.content().to_string();
        content.push_str(&related_section(sources, format));
        document.set_content(content);

        tracing::debug!("Injected {} backlinks into {}", sources.len(), target);
        report.injected.push(target.clone());
    }

    report
}
