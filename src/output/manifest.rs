//! URL manifest (`urls.txt`): one canonical URL per line, sorted

use crate::url::normalize_url;
use crate::WeaveError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File name of the URL manifest inside a corpus folder
pub const MANIFEST_FILE: &str = "urls.txt";

/// Writes `urls` to `<folder>/urls.txt`, sorted and deduplicated
///
/// Returns the path of the written file.
pub fn write_manifest(folder: &Path, urls: &[String]) -> Result<PathBuf, WeaveError> {
    let sorted: BTreeSet<&str> = urls.iter().map(String::as_str).collect();

    let mut content = String::new();
    for url in sorted {
        content.push_str(url);
        content.push('\n');
    }

    let path = folder.join(MANIFEST_FILE);
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Reads a manifest, skipping blank lines and `#` comments
///
/// Every entry must be an HTTP(S) URL.
pub fn read_manifest(path: &Path) -> Result<Vec<String>, WeaveError> {
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

pub(crate) fn parse_manifest(content: &str) -> Result<Vec<String>, WeaveError> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .enumerate()
        .map(|(index, line)| {
            normalize_url(line).map_err(|e| {
                WeaveError::Manifest(format!("entry {} ('{}'): {}", index + 1, line, e))
            })?;
            Ok(line.to_string())
        })
        .collect()
}
