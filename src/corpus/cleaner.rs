//! Clean stage: whitespace normalization and placeholder removal

use crate::corpus::Corpus;
use crate::WeaveError;
use std::path::{Path, PathBuf};

/// Outcome of one clean run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Documents whose whitespace was normalized
    pub trimmed: usize,

    /// Placeholder documents deleted
    pub removed_files: Vec<PathBuf>,

    /// Directories deleted because they were left empty
    pub removed_dirs: Vec<PathBuf>,
}

/// Strips trailing whitespace from every line
pub fn clean_text(content: &str) -> String {
    content
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// True for documents with no real content: empty, a bare `#`, or the
/// `# untitled_page` stub some sites render for missing pages
pub fn is_placeholder(content: &str) -> bool {
    matches!(
        content.trim().to_lowercase().as_str(),
        "" | "#" | "# untitled_page"
    )
}

/// Cleans every document under `folder`, then prunes empty directories
pub fn clean_corpus(folder: &Path) -> Result<CleanReport, WeaveError> {
    let mut corpus = Corpus::load(folder)?;
    let mut report = CleanReport::default();

    for key in corpus.keys() {
        let Some(document) = corpus.get_mut(&key) else {
            continue;
        };

        if is_placeholder(document.content()) {
            if let Some(path) = corpus.delete(&key)? {
                tracing::info!("Deleted empty file: {}", path.display());
                report.removed_files.push(path);
            }
            continue;
        }

        let cleaned = clean_text(document.content());
        if document.set_content(cleaned) {
            report.trimmed += 1;
        }
    }

    corpus.save()?;
    remove_empty_dirs(folder, folder, &mut report.removed_dirs)?;

    Ok(report)
}

/// Removes empty directories below `root`, deepest first; `root` itself stays
fn remove_empty_dirs(root: &Path, dir: &Path, removed: &mut Vec<PathBuf>) -> Result<(), WeaveError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            remove_empty_dirs(root, &path, removed)?;
        }
    }

    if dir != root && std::fs::read_dir(dir)?.next().is_none() {
        std::fs::remove_dir(dir)?;
        tracing::info!("Deleted empty folder: {}", dir.display());
        removed.push(dir.to_path_buf());
    }

    Ok(())
}
