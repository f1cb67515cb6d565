use crate::config::Config;
use crate::matcher::PatternMatcher;
use crate::reader;
use crate::walker;
use std::path::{Path, PathBuf};

/// One collected source file: its path, forward-slash display path relative
/// to the root, fence language tag, and decoded content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub relative: String,
    pub language: String,
    pub content: String,
}

/// Collect every source file under `root` in deterministic order, with its
/// language tag and decoded content. Ordering and filtering follow
/// `walker::list_files`; content honors the configured per-file byte cap.
pub fn collect(root: &Path, config: &Config, matcher: &PatternMatcher) -> Vec<SourceFile> {
    let paths = walker::list_files(
        root,
        &config.source.extensions,
        &config.repo_tree.ignore,
        matcher,
    );
    log::info!("Collecting content for {} source files", paths.len());

    paths
        .into_iter()
        .map(|path| {
            let content = reader::read_text(&path, config.limits.max_file_bytes);
            SourceFile {
                relative: relative_display(&path, root),
                language: config.language_for(&path),
                content,
                path,
            }
        })
        .collect()
}

/// Forward-slash path relative to `root`, falling back to the full path
/// string when no relative form exists.
pub fn relative_display(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn collects_only_matching_files_in_order() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "a.cs", "class A {}");
        write(root, "bin/b.cs", "class B {}");
        write(root, "x.bak", "old");

        let config = Config::default();
        let matcher = PatternMatcher::new(&config.source.exclude).unwrap();
        let sources = collect(root, &config, &matcher);

        let relatives: Vec<&str> = sources.iter().map(|s| s.relative.as_str()).collect();
        assert_eq!(relatives, vec!["a.cs"]);
        assert_eq!(sources[0].language, "csharp");
        assert_eq!(sources[0].content, "class A {}");
    }

    #[test]
    fn unmapped_extension_gets_text_tag() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "app.config", "<configuration/>");
        write(root, "readme.weird", "hello");

        let mut config = Config::default();
        config.source.extensions = crate::config::ExtensionSet::new([".config", ".weird"]);
        config.source.exclude.clear();
        let matcher = PatternMatcher::empty();
        let sources = collect(root, &config, &matcher);

        let tags: Vec<(&str, &str)> = sources
            .iter()
            .map(|s| (s.relative.as_str(), s.language.as_str()))
            .collect();
        assert_eq!(tags, vec![("app.config", "xml"), ("readme.weird", "text")]);
    }

    #[test]
    fn honors_per_file_byte_cap() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "big.md", "0123456789abcdef");

        let mut config = Config::default();
        config.limits.max_file_bytes = Some(8);
        config.source.exclude.clear();
        let matcher = PatternMatcher::empty();
        let sources = collect(root, &config, &matcher);

        assert_eq!(sources.len(), 1);
        assert!(sources[0].content.starts_with("01234567"));
        assert!(sources[0].content.contains("truncated"));
        assert!(!sources[0].content.contains("89abcdef"));
    }
}
