// src/watch/filters.rs

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;

/// Compiled name filters.
///
/// Each pattern is matched against an entry's *base name* only, using
/// `*`, `?`, `[seq]` and `[!seq]` wildcards. A pattern that fails to compile
/// is logged and ignored, so a single typo does not disable the other filters.
#[derive(Clone)]
pub struct NameFilters {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for NameFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameFilters")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl Default for NameFilters {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl NameFilters {
    pub fn compile(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            match Glob::new(pat) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => warn!(pattern = %pat, error = %err, "ignoring invalid name filter"),
            }
        }

        let set = builder.build().unwrap_or_else(|err| {
            warn!(error = %err, "failed to build name filter set; filtering disabled");
            GlobSet::empty()
        });

        Self {
            patterns: patterns.to_vec(),
            set,
        }
    }

    /// Check every pattern up front, failing on the first invalid one.
    ///
    /// Used by config validation, where a bad pattern is a hard error.
    pub fn validate(patterns: &[String]) -> Result<(), String> {
        for pat in patterns {
            Glob::new(pat).map_err(|e| format!("invalid name filter {pat:?}: {e}"))?;
        }
        Ok(())
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True if `name` matches at least one pattern.
    pub fn is_filtered(&self, name: &str) -> bool {
        self.set.is_match(name)
    }
}

/// `.` and `..` are never watched, whatever the filters say.
pub fn is_dot_entry(name: &str) -> bool {
    name == "." || name == ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(patterns: &[&str]) -> NameFilters {
        let owned: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        NameFilters::compile(&owned)
    }

    #[test]
    fn star_question_and_sequences() {
        let f = filters(&["*.pyc", "?.tmp", "[ab]*.log", "[!x]y"]);

        assert!(f.is_filtered("module.pyc"));
        assert!(f.is_filtered("a.tmp"));
        assert!(!f.is_filtered("ab.tmp"));
        assert!(f.is_filtered("alpha.log"));
        assert!(!f.is_filtered("gamma.log"));
        assert!(f.is_filtered("zy"));
        assert!(!f.is_filtered("xy"));
    }

    #[test]
    fn star_matches_hidden_files() {
        let f = filters(&["*"]);
        assert!(f.is_filtered(".git"));
    }

    #[test]
    fn empty_filters_match_nothing() {
        let f = NameFilters::default();
        assert!(!f.is_filtered("main.py"));
    }

    #[test]
    fn invalid_pattern_is_skipped_but_others_apply() {
        let f = filters(&["[unclosed", "*.bak"]);
        assert!(f.is_filtered("old.bak"));
        assert!(!f.is_filtered("[unclosed"));
        assert_eq!(f.patterns().len(), 2);
    }

    #[test]
    fn validate_reports_bad_pattern() {
        let err = NameFilters::validate(&["*.ok".into(), "[bad".into()]).unwrap_err();
        assert!(err.contains("[bad"));
    }

    #[test]
    fn dot_entries() {
        assert!(is_dot_entry("."));
        assert!(is_dot_entry(".."));
        assert!(!is_dot_entry(".hidden"));
    }
}
