use url::Url;

/// Maps a URL or a root-relative path to its corpus key
///
/// The key is the path component with leading and trailing slashes removed.
/// An empty path becomes `index`. No extension is appended; callers add
/// `.md` or `.html` themselves. Query and fragment are ignored, so distinct
/// URLs may share a key.
///
/// # Examples
///
/// ```
/// use docweave::url::to_corpus_key;
///
/// assert_eq!(to_corpus_key("https://example.com/docs/page1"), "docs/page1");
/// assert_eq!(to_corpus_key("https://example.com/"), "index");
/// assert_eq!(to_corpus_key("/guide/intro"), "guide/intro");
/// ```
pub fn to_corpus_key(url: &str) -> String {
    let path = match Url::parse(url.trim()) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .trim()
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Expresses `target_key` relative to the folder holding `source_key`
///
/// Both keys are corpus keys (no extension). The result uses `/` separators
/// and `..` segments, mirroring how a document at `source_key.md` would
/// reference `target_key.md` on disk, minus the extension.
///
/// # Examples
///
/// ```
/// use docweave::url::relative_key;
///
/// assert_eq!(relative_key("test", "docs/page1"), "docs/page1");
/// assert_eq!(relative_key("guide/intro", "docs/page1"), "../docs/page1");
/// assert_eq!(relative_key("docs/a", "docs/b"), "b");
/// ```
pub fn relative_key(source_key: &str, target_key: &str) -> String {
    let source_dir: Vec<&str> = {
        let mut parts: Vec<&str> = source_key.split('/').filter(|s| !s.is_empty()).collect();
        parts.pop();
        parts
    };

    let target: Vec<&str> = target_key.split('/').filter(|s| !s.is_empty()).collect();
    let Some((file, target_dir)) = target.split_last() else {
        return target_key.to_string();
    };

    let common = source_dir
        .iter()
        .zip(target_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = Vec::new();
    segments.extend(std::iter::repeat("..").take(source_dir.len() - common));
    segments.extend(&target_dir[common..]);
    segments.push(*file);

    segments.join("/")
}
