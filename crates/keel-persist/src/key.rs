//! Storage key grammar.
//!
//! - A key is *hierarchical* if it starts with `/`; anything else is a plain
//!   key with no index bookkeeping.
//! - The directory of a hierarchical key is the key truncated at its last
//!   `/`, so `/a/1` lives in `/a` and `/a` lives in the root directory `""`.
//! - A directory's index record is stored at `<directory>/_items`.
//! - `<directory>/*` is the wildcard form, valid only for restore.
//! - Keys must be non-empty and must not end in `/` or `*` (except the
//!   wildcard form), and the last segment must not be `_items`.

use crate::error::{PersistError, PersistResult};

/// Path separator of hierarchical keys.
pub const SEPARATOR: char = '/';

/// Trailing character of the wildcard form.
pub const WILDCARD: char = '*';

/// Reserved last segment naming a directory's index record.
pub const INDEX_SEGMENT: &str = "_items";

/// A validated storage key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKey<'a> {
    /// A key outside the hierarchy, e.g. a bare class tag.
    Plain(&'a str),
    /// A hierarchical key tracked in its directory's index.
    Entry { key: &'a str, directory: &'a str },
    /// `<directory>/*`: everything indexed under `directory`.
    Wildcard { directory: &'a str },
}

impl<'a> StorageKey<'a> {
    /// Parse a key that may be a wildcard.
    pub fn parse(key: &'a str) -> PersistResult<Self> {
        if key.is_empty() {
            return Err(invalid(key, "key must not be empty"));
        }
        if key.ends_with(SEPARATOR) {
            return Err(invalid(key, "key must not end with '/'"));
        }
        if let Some(prefix) = key.strip_suffix(WILDCARD) {
            return match prefix.strip_suffix(SEPARATOR) {
                Some(directory) if is_hierarchical(key) => {
                    Ok(StorageKey::Wildcard { directory })
                }
                _ => Err(invalid(
                    key,
                    "'*' is only allowed as the last segment of a hierarchical key",
                )),
            };
        }
        if !is_hierarchical(key) {
            return Ok(StorageKey::Plain(key));
        }

        let (directory, name) = split_last(key);
        if name == INDEX_SEGMENT {
            return Err(invalid(key, "'_items' is reserved for index records"));
        }
        Ok(StorageKey::Entry { key, directory })
    }

    /// Parse a key naming exactly one record. Wildcards are rejected.
    pub fn parse_entry(key: &'a str) -> PersistResult<Self> {
        match Self::parse(key)? {
            StorageKey::Wildcard { .. } => Err(invalid(key, "wildcard keys only apply to restore")),
            parsed => Ok(parsed),
        }
    }

    /// Directory whose index tracks this key, if any.
    pub fn directory(&self) -> Option<&'a str> {
        match self {
            StorageKey::Plain(_) => None,
            StorageKey::Entry { directory, .. } | StorageKey::Wildcard { directory } => {
                Some(directory)
            }
        }
    }
}

pub fn is_hierarchical(key: &str) -> bool {
    key.starts_with(SEPARATOR)
}

/// Key of the index record for `directory`.
pub fn index_key(directory: &str) -> String {
    format!("{directory}{SEPARATOR}{INDEX_SEGMENT}")
}

/// Normalize a caller-supplied directory: `"/"` and `"/a/"` name the same
/// directories as `""` and `"/a"`.
pub fn normalize_directory(directory: &str) -> &str {
    directory.strip_suffix(SEPARATOR).unwrap_or(directory)
}

fn split_last(key: &str) -> (&str, &str) {
    match key.rfind(SEPARATOR) {
        Some(at) => (&key[..at], &key[at + 1..]),
        None => ("", key),
    }
}

fn invalid(key: &str, reason: &str) -> PersistError {
    PersistError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(key: &str) -> String {
        match StorageKey::parse(key).unwrap_err() {
            PersistError::InvalidKey { reason, .. } => reason,
            other => panic!("expected InvalidKey, got {other:?}"),
        }
    }

    #[test]
    fn plain_keys() {
        assert_eq!(StorageKey::parse("Model").unwrap(), StorageKey::Plain("Model"));
        assert_eq!(StorageKey::parse("a/b").unwrap(), StorageKey::Plain("a/b"));
        assert_eq!(StorageKey::parse("Model").unwrap().directory(), None);
    }

    #[test]
    fn entry_directories() {
        assert_eq!(
            StorageKey::parse("/a").unwrap(),
            StorageKey::Entry { key: "/a", directory: "" }
        );
        assert_eq!(StorageKey::parse("/a/1").unwrap().directory(), Some("/a"));
        assert_eq!(StorageKey::parse("/a/b/c").unwrap().directory(), Some("/a/b"));
    }

    #[test]
    fn wildcard_directories() {
        assert_eq!(
            StorageKey::parse("/*").unwrap(),
            StorageKey::Wildcard { directory: "" }
        );
        assert_eq!(
            StorageKey::parse("/a/*").unwrap(),
            StorageKey::Wildcard { directory: "/a" }
        );
    }

    #[test]
    fn index_keys() {
        assert_eq!(index_key(""), "/_items");
        assert_eq!(index_key("/a"), "/a/_items");
    }

    #[test]
    fn trailing_separator_rejected() {
        assert!(reason("key/").contains("'/'"));
        assert!(reason("/a/").contains("'/'"));
        assert!(reason("/").contains("'/'"));
    }

    #[test]
    fn stray_wildcards_rejected() {
        reason("key*");
        reason("/a*");
        reason("*");
    }

    #[test]
    fn reserved_and_empty_rejected() {
        assert!(reason("/a/_items").contains("reserved"));
        assert!(reason("/_items").contains("reserved"));
        assert!(reason("").contains("empty"));
    }

    #[test]
    fn entry_parse_rejects_wildcards() {
        assert!(StorageKey::parse_entry("/a/*").is_err());
        assert!(StorageKey::parse_entry("/a/1").is_ok());
    }

    #[test]
    fn directory_normalization() {
        assert_eq!(normalize_directory("/"), "");
        assert_eq!(normalize_directory("/a/"), "/a");
        assert_eq!(normalize_directory("/a"), "/a");
        assert_eq!(normalize_directory(""), "");
    }
}
