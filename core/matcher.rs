use crate::error::{AppError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Case-insensitive wildcard exclude rules, compiled once at load time.
///
/// A path is excluded when any pattern matches its lowercase base name OR
/// its lowercase root-relative path (forward-slash form). Patterns support
/// `*`, `?` and `[...]`; `*` may cross path separators.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    set: GlobSet,
    patterns: Vec<String>,
}

impl PatternMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut normalized = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let processed = normalize(pattern.trim());
            let glob = Glob::new(&processed).map_err(|e| {
                log::error!("Invalid exclude pattern \"{}\": {}", pattern, e);
                AppError::Glob(format!(
                    "Invalid exclude pattern \"{}\" (processed as \"{}\"): {}",
                    pattern, processed, e
                ))
            })?;
            builder.add(glob);
            normalized.push(processed);
        }
        let set = builder.build()?;
        Ok(PatternMatcher {
            set,
            patterns: normalized,
        })
    }

    pub fn empty() -> Self {
        PatternMatcher {
            set: GlobSet::empty(),
            patterns: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when `path` should be excluded relative to `root`.
    pub fn is_excluded(&self, path: &Path, root: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let rel = match path.strip_prefix(root) {
            Ok(rel) => normalize(&rel.to_string_lossy()),
            Err(_) => normalize(&path.to_string_lossy()),
        };
        self.set.is_match(Path::new(&name)) || self.set.is_match(Path::new(&rel))
    }
}

/// Uniform path/name form for matching: forward slashes, lowercase.
fn normalize(s: &str) -> String {
    s.replace('\\', "/").to_lowercase()
}
