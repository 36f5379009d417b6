use anyhow::{bail, Context, Result};
use std::fs;
use std::ops::Deref;
use std::path::Path;

/// Ordered, non-empty list of credential tokens.
///
/// Entries are trimmed and blank entries are dropped. Order and duplicates are kept,
/// so the sweep visits tokens exactly as the file lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wordlist(Vec<String>);

impl Wordlist {
    /// Build a wordlist from raw entries. Errors if nothing is left after trimming.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if words.is_empty() {
            bail!("wordlist is empty");
        }
        Ok(Self(words))
    }

    /// Load a wordlist from a UTF-8 file, one token per line.
    ///
    /// `label` names the list in the error raised for a file with no usable lines,
    /// e.g. `No usernames were loaded from users.txt`.
    pub fn load(path: impl AsRef<Path>, label: &str) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {label} file: {}", path.display()))?;
        let words = parse_wordlist_str(&content);
        if words.is_empty() {
            bail!("No {label} were loaded from {}", path.display());
        }
        Ok(Self(words))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Deref for Wordlist {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

/// Split file content into trimmed, non-blank lines. `\n`, `\r\n` and a lone `\r` all
/// end a line. No comments, no escaping.
pub fn parse_wordlist_str(s: &str) -> Vec<String> {
    s.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_skips_blanks() {
        let input = "admin\n\n   guest  \n\t\nroot\r\n";
        assert_eq!(parse_wordlist_str(input), vec!["admin", "guest", "root"]);
    }

    #[test]
    fn parse_keeps_duplicates_and_hash_lines() {
        let input = "#notacomment\nadmin\nadmin\n";
        assert_eq!(
            parse_wordlist_str(input),
            vec!["#notacomment", "admin", "admin"]
        );
    }

    #[test]
    fn parse_splits_on_lone_carriage_return() {
        assert_eq!(
            parse_wordlist_str("admin\rguest\r\rroot"),
            vec!["admin", "guest", "root"]
        );
    }

    #[test]
    fn from_entries_rejects_blank_only() {
        assert!(Wordlist::from_entries(["", "  ", "\t"]).is_err());
    }

    #[test]
    fn from_entries_normalizes() {
        let w = Wordlist::from_entries([" a ", "", "b"]).unwrap();
        assert_eq!(w.as_slice(), &["a".to_string(), "b".to_string()]);
        assert_eq!(w.len(), 2);
    }
}
