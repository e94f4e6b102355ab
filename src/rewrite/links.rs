//! Link rewriting
//!
//! Every document is scanned for absolute `http(s)://` URLs and root-relative
//! `/path` references. Each distinct token is resolved once per run into a
//! shared [`UrlMap`]; every document then has all known tokens substituted.
//!
//! Resolution rules:
//! - Absolute URLs must pass the [`LinkChecker`]; failures go to the skip set
//!   and stay literal in the text.
//! - Reachable absolute URLs outside the configured scope map to themselves.
//! - Everything else becomes a corpus link to its key, relative to the folder
//!   of the document where the token was first seen.
//!
//! Substitution works on scanned tokens rather than raw substrings, so a
//! corpus link written by an earlier pass is never matched again.

use crate::config::OutputFormat;
use crate::corpus::Corpus;
use crate::rewrite::reachability::LinkChecker;
use crate::url::{normalize_url, relative_key, to_corpus_key, DomainScope};
use crate::WeaveError;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

/// Absolute URLs anywhere; root-relative paths only after a boundary
const TOKEN_PATTERN: &str =
    r#"(?m)(?P<abs>https?://[^\s)>\]]+)|(?:^|[\s(<"'=])(?P<rel>/[^\s)>\]]+)"#;

/// Sentence punctuation that ends a token rather than belonging to it
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"', '\''];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Absolute,
    RootRelative,
}

/// A URL reference located in document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

/// Finds URL tokens in document text
#[derive(Debug, Clone)]
pub struct TokenScanner {
    pattern: Regex,
}

impl TokenScanner {
    pub fn new() -> Result<Self, WeaveError> {
        Ok(Self {
            pattern: Regex::new(TOKEN_PATTERN)?,
        })
    }

    /// Tokens in order of appearance
    pub fn scan<'a>(&self, content: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();

        for caps in self.pattern.captures_iter(content) {
            let (m, kind) = match (caps.name("abs"), caps.name("rel")) {
                (Some(m), _) => (m, TokenKind::Absolute),
                (None, Some(m)) => (m, TokenKind::RootRelative),
                (None, None) => continue,
            };

            let text = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            // Protocol-relative `//host/path` is not a corpus path
            if kind == TokenKind::RootRelative && (text.len() < 2 || text.starts_with("//")) {
                continue;
            }

            tokens.push(Token {
                text,
                start: m.start(),
                end: m.start() + text.len(),
                kind,
            });
        }

        tokens
    }
}

/// Run-wide mapping from a literal token to its replacement markup
///
/// The first resolution of a token is final for the life of the map.
#[derive(Debug, Clone, Default)]
pub struct UrlMap {
    entries: HashMap<String, String>,
}

impl UrlMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a replacement unless the token already has one
    ///
    /// Returns true if the entry was added.
    pub fn insert(&mut self, token: &str, replacement: String) -> bool {
        if self.entries.contains_key(token) {
            return false;
        }
        self.entries.insert(token.to_string(), replacement);
        true
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of one rewrite run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Documents scanned
    pub documents: usize,

    /// Documents whose text changed
    pub documents_changed: usize,

    /// Token occurrences replaced with corpus links
    pub links_rewritten: usize,

    /// Distinct URLs left untouched because they were invalid or unreachable
    pub skipped: Vec<String>,
}

/// Rewrites URL references across a corpus using one shared [`UrlMap`]
pub struct LinkRewriter<C: LinkChecker> {
    checker: C,
    format: OutputFormat,
    scanner: TokenScanner,
    scope: Option<DomainScope>,
    cleanup: Option<Regex>,
    map: UrlMap,
    skipped: BTreeSet<String>,
}

impl<C: LinkChecker> LinkRewriter<C> {
    pub fn new(checker: C, format: OutputFormat) -> Result<Self, WeaveError> {
        Ok(Self {
            checker,
            format,
            scanner: TokenScanner::new()?,
            scope: None,
            cleanup: None,
            map: UrlMap::new(),
            skipped: BTreeSet::new(),
        })
    }

    /// Restricts corpus links to URLs in `scope`; other reachable URLs are
    /// left as they are
    pub fn with_scope(mut self, scope: DomainScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Collapses `[[label]]/path` artifacts to `path` after substitution
    pub fn with_self_label(mut self, label: &str) -> Result<Self, WeaveError> {
        let pattern = format!(r"\[\[{}\]\]/([^\s)]+)", regex::escape(label));
        self.cleanup = Some(Regex::new(&pattern)?);
        Ok(self)
    }

    pub fn url_map(&self) -> &UrlMap {
        &self.map
    }

    /// Distinct URLs skipped so far, sorted
    pub fn skipped(&self) -> Vec<String> {
        self.skipped.iter().cloned().collect()
    }

    /// Rewrites one document's text
    ///
    /// New tokens are resolved first, then every token with a map entry is
    /// substituted. Returns the new text and the number of links rewritten.
    pub async fn rewrite_document(&mut self, source_key: &str, content: &str) -> (String, usize) {
        let tokens = self.scanner.scan(content);

        for token in &tokens {
            self.resolve(source_key, token).await;
        }

        let mut output = String::with_capacity(content.len());
        let mut last = 0;
        let mut rewritten = 0;

        for token in &tokens {
            let Some(replacement) = self.map.get(token.text) else {
                continue;
            };
            if replacement == token.text {
                continue;
            }
            output.push_str(&content[last..token.start]);
            output.push_str(replacement);
            last = token.end;
            rewritten += 1;
        }
        output.push_str(&content[last..]);

        if let Some(cleanup) = &self.cleanup {
            if cleanup.is_match(&output) {
                output = cleanup.replace_all(&output, "$1").into_owned();
            }
        }

        (output, rewritten)
    }

    /// Rewrites every document of the corpus in key order
    pub async fn rewrite_corpus(&mut self, corpus: &mut Corpus) -> RewriteReport {
        let mut report = RewriteReport::default();

        for key in corpus.keys() {
            let Some(content) = corpus.get(&key).map(|d| d.content().to_string()) else {
                continue;
            };

            let (rewritten, count) = self.rewrite_document(&key, &content).await;
            report.documents += 1;
            report.links_rewritten += count;

            if let Some(document) = corpus.get_mut(&key) {
                if document.set_content(rewritten) {
                    tracing::debug!("Rewrote {} links in {}", count, key);
                    report.documents_changed += 1;
                }
            }
        }

        report.skipped = self.skipped();
        report
    }

    async fn resolve(&mut self, source_key: &str, token: &Token<'_>) {
        if self.map.contains(token.text) || self.skipped.contains(token.text) {
            return;
        }

        let replacement = match token.kind {
            TokenKind::Absolute => {
                if normalize_url(token.text).is_err() {
                    tracing::debug!("Skipping invalid URL: {}", token.text);
                    self.skipped.insert(token.text.to_string());
                    return;
                }

                if !self.checker.is_reachable(token.text).await {
                    tracing::debug!("Skipping unreachable URL: {}", token.text);
                    self.skipped.insert(token.text.to_string());
                    return;
                }

                match &self.scope {
                    Some(scope) if !scope.in_scope(token.text) => token.text.to_string(),
                    _ => self.corpus_link(source_key, token.text),
                }
            }
            TokenKind::RootRelative => self.corpus_link(source_key, token.text),
        };

        self.map.insert(token.text, replacement);
    }

    fn corpus_link(&self, source_key: &str, url: &str) -> String {
        let target = relative_key(source_key, &to_corpus_key(url));
        self.format.link(&target)
    }
}
