//! Plain-text corpora and keyword lists.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::batch::Window;
use crate::error::Result;

/// Non-blank lines of a corpus, trimmed, selected by `window`.
pub fn parse_corpus(content: &str, window: Window) -> Vec<String> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines[window.bounds(lines.len())]
        .iter()
        .map(|l| l.to_string())
        .collect()
}

/// One candidate text per line; blank lines are skipped.
pub fn read_corpus(path: impl AsRef<Path>, window: Window) -> Result<Vec<String>> {
    Ok(parse_corpus(&fs::read_to_string(path)?, window))
}

/// Append one line to a text file, creating it if needed
pub fn append_line(path: impl AsRef<Path>, line: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Merge `words` into the keyword list at `path`, one per line, sorted and
/// deduplicated. Existing entries are kept. Returns the list size.
pub fn merge_keywords<'a>(path: impl AsRef<Path>, words: impl IntoIterator<Item = &'a str>) -> Result<usize> {
    let path = path.as_ref();
    let mut keywords: BTreeSet<String> = if path.exists() {
        fs::read_to_string(path)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    } else {
        BTreeSet::new()
    };

    let before = keywords.len();
    keywords.extend(words.into_iter().map(str::trim).filter(|w| !w.is_empty()).map(String::from));
    debug!(added = keywords.len() - before, "keyword list merged");

    let mut out = String::new();
    for keyword in &keywords {
        out.push_str(keyword);
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(keywords.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corpus_window() {
        let content = "first tweet\n\n  second tweet  \nthird\n\nfourth\n";
        assert_eq!(
            parse_corpus(content, Window::default()),
            vec!["first tweet", "second tweet", "third", "fourth"]
        );
        assert_eq!(parse_corpus(content, Window::new(1, Some(2))), vec!["second tweet", "third"]);
        assert!(parse_corpus(content, Window::new(10, None)).is_empty());
    }

    #[test]
    fn test_append_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interesting.txt");
        append_line(&path, "one").unwrap();
        append_line(&path, "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_merge_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.txt");
        fs::write(&path, "tokio\nRust\n").unwrap();

        let count = merge_keywords(&path, ["serde", "Rust", " ", "axum"]).unwrap();
        assert_eq!(count, 4);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Rust\naxum\nserde\ntokio\n");
    }
}
