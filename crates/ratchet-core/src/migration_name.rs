//! Strongly-typed migration name wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Suffix of the forward half of a migration pair.
pub const UP_SUFFIX: &str = ".up.sql";

/// Suffix of the reverse half of a migration pair.
pub const DOWN_SUFFIX: &str = ".down.sql";

/// Width of the sortable timestamp prefix at the start of every migration name.
pub const CREATED_AT_PREFIX_LEN: usize = 18;

/// Canonical migration identifier: the file name with its `.up.sql` /
/// `.down.sql` suffix removed, e.g. `2024_01_01_00_0000_init`.
///
/// This is the value stored in the `migration` column of the bookkeeping
/// table, and the key that pairs an up file with its down file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationName(String);

impl MigrationName {
    /// Create a new `MigrationName`, panicking in debug builds if the name is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        debug_assert!(!s.is_empty(), "MigrationName must not be empty");
        Self(s)
    }

    /// Try to create a new `MigrationName`, returning `None` if the name is empty.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Derive the canonical name from a migration file name.
    ///
    /// Returns `None` when the file carries neither suffix, or when nothing
    /// is left after stripping it.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        file_name
            .strip_suffix(UP_SUFFIX)
            .or_else(|| file_name.strip_suffix(DOWN_SUFFIX))
            .and_then(Self::try_new)
    }

    /// The lexicographic ordering key: the first
    /// [`CREATED_AT_PREFIX_LEN`] characters, or the whole name when shorter.
    pub fn created_at_prefix(&self) -> &str {
        match self.0.char_indices().nth(CREATED_AT_PREFIX_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// File name of the forward half.
    pub fn up_file_name(&self) -> String {
        format!("{}{}", self.0, UP_SUFFIX)
    }

    /// File name of the reverse half.
    pub fn down_file_name(&self) -> String {
        format!("{}{}", self.0, DOWN_SUFFIX)
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MigrationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MigrationName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_up_file_name() {
        let name = MigrationName::from_file_name("2024_01_01_00_0000_init.up.sql").unwrap();
        assert_eq!(name, "2024_01_01_00_0000_init");
    }

    #[test]
    fn test_from_down_file_name() {
        let name = MigrationName::from_file_name("2024_01_01_00_0000_init.down.sql").unwrap();
        assert_eq!(name, "2024_01_01_00_0000_init");
    }

    #[test]
    fn test_up_and_down_halves_share_a_name() {
        let up = MigrationName::from_file_name("2024_01_02_00_0000_add_col.up.sql").unwrap();
        let down = MigrationName::from_file_name("2024_01_02_00_0000_add_col.down.sql").unwrap();
        assert_eq!(up, down);
    }

    #[test]
    fn test_from_file_name_rejects_other_files() {
        assert!(MigrationName::from_file_name("README.md").is_none());
        assert!(MigrationName::from_file_name("2024_01_01_00_0000_init.sql").is_none());
        assert!(MigrationName::from_file_name(".up.sql").is_none());
    }

    #[test]
    fn test_created_at_prefix() {
        let name = MigrationName::new("2024_01_01_00_0000_init");
        assert_eq!(name.created_at_prefix(), "2024_01_01_00_0000");
        assert_eq!(name.created_at_prefix().len(), CREATED_AT_PREFIX_LEN);
    }

    #[test]
    fn test_created_at_prefix_short_name() {
        let name = MigrationName::new("init");
        assert_eq!(name.created_at_prefix(), "init");
    }

    #[test]
    fn test_file_names() {
        let name = MigrationName::new("2024_01_01_00_0000_init");
        assert_eq!(name.up_file_name(), "2024_01_01_00_0000_init.up.sql");
        assert_eq!(name.down_file_name(), "2024_01_01_00_0000_init.down.sql");
    }

    #[test]
    fn test_borrow_lookup() {
        use std::collections::HashMap;
        let mut map: HashMap<MigrationName, i64> = HashMap::new();
        map.insert(MigrationName::new("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
