use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// A mutable set of glob patterns, backed by gitignore-style matching.
///
/// A pattern containing no `/` matches any path segment at any depth, which
/// is exactly the "a path is excluded if any of its segments matches any
/// pattern" rule the Index's ignore set is specified with. Patterns with a
/// `/` behave like a normal `.gitignore` rule (anchored, optionally
/// directory-only).
///
/// `Gitignore` itself is immutable once built, so mutation rebuilds the
/// matcher; this is cheap at the pattern counts this daemon is expected to
/// carry (tens, not thousands).
#[derive(Clone)]
pub struct IgnoreEngine {
    patterns: Vec<String>,
    matcher: Gitignore,
}

impl Default for IgnoreEngine {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl IgnoreEngine {
    pub fn new(patterns: &[&str]) -> Self {
        let mut engine = IgnoreEngine {
            patterns: Vec::new(),
            matcher: empty_matcher(),
        };
        for pattern in patterns {
            engine.add(pattern);
        }
        engine
    }

    /// Add `pattern` to the set if it is not already present. Returns
    /// `true` if it was newly added.
    pub fn add(&mut self, pattern: &str) -> bool {
        if self.patterns.iter().any(|p| p == pattern) {
            return false;
        }
        self.patterns.push(pattern.to_string());
        self.rebuild();
        true
    }

    /// Remove `pattern` from the set. Returns `true` if it was present.
    pub fn remove(&mut self, pattern: &str) -> bool {
        let before = self.patterns.len();
        self.patterns.retain(|p| p != pattern);
        let removed = self.patterns.len() != before;
        if removed {
            self.rebuild();
        }
        removed
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[must_use]
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.matcher.matched(path, is_dir).is_ignore()
    }

    fn rebuild(&mut self) {
        let mut builder = GitignoreBuilder::new(".");
        for pattern in &self.patterns {
            // Patterns are user input validated at the API boundary; a bad
            // glob is simply dropped rather than poisoning the whole set.
            let _ = builder.add_line(None, pattern);
        }
        self.matcher = builder.build().unwrap_or_else(|_| empty_matcher());
    }
}

fn empty_matcher() -> Gitignore {
    GitignoreBuilder::new(".")
        .build()
        .expect("build empty ignore matcher")
}

#[cfg(test)]
#[path = "excludes_tests.rs"]
mod tests;
