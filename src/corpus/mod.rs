//! Document corpus: harvested text files addressed by corpus key
//!
//! A corpus is a folder of UTF-8 `.md` files. A document's key is its path
//! relative to the folder, `/`-separated, without the extension. Documents are
//! held in key order so every stage processes them deterministically.

mod cleaner;
mod harvest;

pub use cleaner::{clean_corpus, clean_text, is_placeholder, CleanReport};
pub use harvest::{content_hash, harvest, harvest_site, HarvestReport};

use crate::WeaveError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extension of corpus document files
pub const DOCUMENT_EXTENSION: &str = "md";

/// One corpus document and its in-memory content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    key: String,
    path: PathBuf,
    content: String,
    dirty: bool,
}

impl Document {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the content; returns true if it changed
    pub fn set_content(&mut self, content: String) -> bool {
        if content == self.content {
            return false;
        }
        self.content = content;
        self.dirty = true;
        true
    }

    /// True if the content differs from what is on disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// All documents under one output folder
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    documents: BTreeMap<String, Document>,
}

impl Corpus {
    /// Creates an empty corpus rooted at `root` without touching the disk
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            documents: BTreeMap::new(),
        }
    }

    /// Loads every `.md` document under `root`, recursively
    ///
    /// Files that are not valid UTF-8 are skipped with a warning.
    ///
    /// # Returns
    ///
    /// * `Ok(Corpus)` - Loaded corpus (possibly empty)
    /// * `Err(WeaveError::Io)` - The folder could not be listed
    pub fn load(root: &Path) -> Result<Self, WeaveError> {
        let mut corpus = Self::new(root);
        let mut files = Vec::new();
        collect_documents(root, &mut files)?;

        for path in files {
            let Some(key) = key_for_path(root, &path) else {
                continue;
            };

            match std::fs::read(&path) {
                Ok(bytes) => match String::from_utf8(bytes) {
                    Ok(content) => {
                        corpus.documents.insert(
                            key.clone(),
                            Document {
                                key,
                                path,
                                content,
                                dirty: false,
                            },
                        );
                    }
                    Err(_) => {
                        tracing::warn!("Skipping {}: not valid UTF-8", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        tracing::debug!(
            "Loaded {} documents from {}",
            corpus.documents.len(),
            root.display()
        );
        Ok(corpus)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.documents.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.documents.get_mut(key)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn documents_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.values_mut()
    }

    /// Adds or replaces a document in memory; it is written on the next save
    pub fn insert(&mut self, key: &str, content: impl Into<String>) {
        let path = self.path_for_key(key);
        self.documents.insert(
            key.to_string(),
            Document {
                key: key.to_string(),
                path,
                content: content.into(),
                dirty: true,
            },
        );
    }

    /// Removes a document from the corpus and deletes its file
    ///
    /// Returns the path that was deleted, if the document existed.
    pub fn delete(&mut self, key: &str) -> Result<Option<PathBuf>, WeaveError> {
        let Some(document) = self.documents.remove(key) else {
            return Ok(None);
        };

        match std::fs::remove_file(&document.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(Some(document.path))
    }

    /// Writes every modified document back to disk
    ///
    /// Returns the number of files written.
    pub fn save(&mut self) -> Result<usize, WeaveError> {
        let mut written = 0;
        for document in self.documents.values_mut().filter(|d| d.dirty) {
            if let Some(parent) = document.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&document.path, &document.content)?;
            document.dirty = false;
            written += 1;
        }
        Ok(written)
    }

    /// File path a document with `key` lives at
    pub fn path_for_key(&self, key: &str) -> PathBuf {
        document_path(&self.root, key)
    }
}

/// `<root>/<key>.md`
pub fn document_path(root: &Path, key: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    let Some((file, dirs)) = segments.split_last() else {
        return path.join(format!("index.{}", DOCUMENT_EXTENSION));
    };
    for dir in dirs {
        path.push(dir);
    }
    // Appended, not set: keys like `v1.2` keep their dot
    path.push(format!("{}.{}", file, DOCUMENT_EXTENSION));
    path
}

fn collect_documents(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), WeaveError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_documents(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

fn key_for_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}
