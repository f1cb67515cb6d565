use crate::config::{ExtensionSet, IgnoreNameSet};
use crate::matcher::PatternMatcher;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One rendered tree line: indentation depth, display text, and whether it
/// is a literal entry, an elision marker, or an error marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub text: String,
    pub kind: TreeLineKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeLineKind {
    Entry,
    Elision,
    Error,
}

impl TreeLine {
    fn entry(depth: usize, text: String) -> Self {
        TreeLine {
            depth,
            text,
            kind: TreeLineKind::Entry,
        }
    }

    fn elision(depth: usize) -> Self {
        TreeLine {
            depth,
            text: "... (further entries omitted)".to_string(),
            kind: TreeLineKind::Elision,
        }
    }

    fn error(depth: usize, text: String) -> Self {
        TreeLine {
            depth,
            text,
            kind: TreeLineKind::Error,
        }
    }
}

/// Bounds for `render_tree`. `sample_dir` names one directory that renders
/// as a single representative file instead of its full contents.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub max_depth: usize,
    pub max_entries_per_dir: usize,
    pub sample_dir: Option<String>,
}

/// Every source file under `root`, fully recursive, deterministically
/// ordered (case-insensitive full-path sort).
///
/// A path is skipped when any segment is in the ignore set (ignored
/// directories are pruned whole), when it is not a regular file, when its
/// extension is not in `extensions`, or when the exclude patterns match.
/// Unreadable entries are skipped, never fatal. A missing root yields an
/// empty list.
pub fn list_files(
    root: &Path,
    extensions: &ExtensionSet,
    ignore: &IgnoreNameSet,
    matcher: &PatternMatcher,
) -> Vec<PathBuf> {
    if !root.exists() {
        log::debug!("List root does not exist: {}", root.display());
        return Vec::new();
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !ignore.contains_os(e.file_name()));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !extensions.matches(path) {
            continue;
        }
        if matcher.is_excluded(path, root) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort_by_key(|p| p.to_string_lossy().to_lowercase());
    files
}

/// Render the directory tree under `root` as `TreeLine`s.
///
/// Children sort directories-first, then by lowercase name. Ignored names
/// and pattern-excluded files are dropped before the per-directory entry
/// counter; once the counter reaches the cap one elision marker is emitted
/// and remaining siblings are abandoned. Descent stops past `max_depth`.
/// An unlistable directory produces a single error line and no descent.
pub fn render_tree(
    root: &Path,
    options: &TreeOptions,
    ignore: &IgnoreNameSet,
    matcher: &PatternMatcher,
) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    walk(root, root, 0, options, ignore, matcher, &mut lines);
    lines
}

struct Child {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

#[allow(clippy::too_many_arguments)]
fn walk(
    current: &Path,
    root: &Path,
    depth: usize,
    options: &TreeOptions,
    ignore: &IgnoreNameSet,
    matcher: &PatternMatcher,
    lines: &mut Vec<TreeLine>,
) {
    if depth > options.max_depth {
        return;
    }
    if !current.exists() {
        lines.push(TreeLine::error(
            depth,
            format!("[path not found] {}", current.display()),
        ));
        return;
    }

    let mut children = match list_children(current) {
        Ok(children) => children,
        Err(e) => {
            lines.push(TreeLine::error(
                depth,
                format!("[error listing {}: {}]", current.display(), e),
            ));
            return;
        }
    };
    children.sort_by_key(|c| (!c.is_dir, c.name.to_lowercase()));

    let mut count = 0;
    for child in children {
        if ignore.contains(&child.name) {
            continue;
        }

        // Named exception: the sample directory shows one representative
        // file and is neither recursed into nor counted against the cap.
        if child.is_dir
            && let Some(sample_dir) = options.sample_dir.as_deref()
            && child.name.to_lowercase() == sample_dir.to_lowercase()
        {
            lines.push(TreeLine::entry(depth, format!("{}/", child.name)));
            if let Some(sample) = first_sample_file(&child.path, root, matcher) {
                lines.push(TreeLine::entry(depth + 1, sample));
            }
            continue;
        }

        if !child.is_dir && matcher.is_excluded(&child.path, root) {
            continue;
        }

        let display = if child.is_dir {
            format!("{}/", child.name)
        } else {
            child.name.clone()
        };
        lines.push(TreeLine::entry(depth, display));
        count += 1;
        if count >= options.max_entries_per_dir {
            lines.push(TreeLine::elision(depth));
            break;
        }
        if child.is_dir {
            walk(&child.path, root, depth + 1, options, ignore, matcher, lines);
        }
    }
}

fn list_children(dir: &Path) -> std::io::Result<Vec<Child>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable child of {}: {}", dir.display(), e);
                continue;
            }
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        children.push(Child {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir,
        });
    }
    Ok(children)
}

/// First non-excluded file (lowercase-name order) directly inside `dir`.
fn first_sample_file(dir: &Path, root: &Path, matcher: &PatternMatcher) -> Option<String> {
    let mut files: Vec<Child> = list_children(dir)
        .ok()?
        .into_iter()
        .filter(|c| !c.is_dir && !matcher.is_excluded(&c.path, root))
        .collect();
    files.sort_by_key(|c| c.name.to_lowercase());
    files.into_iter().next().map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap();
    }

    fn entries(lines: &[TreeLine]) -> Vec<(usize, String)> {
        lines
            .iter()
            .filter(|l| l.kind == TreeLineKind::Entry)
            .map(|l| (l.depth, l.text.clone()))
            .collect()
    }

    #[test]
    fn list_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("b.cs"));
        touch(&root.join("A.cs"));
        touch(&root.join("x.bak"));
        touch(&root.join("notes.txt"));
        touch(&root.join("bin").join("c.cs"));
        touch(&root.join("sub").join("d.CS"));

        let extensions = ExtensionSet::new([".cs"]);
        let ignore = IgnoreNameSet::new(["bin"]);
        let matcher = PatternMatcher::new(&["*.bak".to_string()]).unwrap();

        let files = list_files(root, &extensions, &ignore, &matcher);
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["A.cs", "b.cs", "sub/d.CS"]);
    }

    #[test]
    fn list_files_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for name in ["z.cs", "m.cs", "a.cs", "deep/q.cs"] {
            touch(&root.join(name));
        }
        let extensions = ExtensionSet::new([".cs"]);
        let ignore = IgnoreNameSet::default();
        let matcher = PatternMatcher::empty();
        let first = list_files(root, &extensions, &ignore, &matcher);
        let second = list_files(root, &extensions, &ignore, &matcher);
        assert_eq!(first, second);
    }

    #[test]
    fn list_files_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("missing");
        let files = list_files(
            &gone,
            &ExtensionSet::new([".cs"]),
            &IgnoreNameSet::default(),
            &PatternMatcher::empty(),
        );
        assert!(files.is_empty());
    }

    #[test]
    fn render_sorts_directories_before_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("aaa.txt"));
        fs::create_dir(root.join("zzz")).unwrap();

        let options = TreeOptions {
            max_depth: 5,
            max_entries_per_dir: 10,
            sample_dir: None,
        };
        let lines = render_tree(root, &options, &IgnoreNameSet::default(), &PatternMatcher::empty());
        assert_eq!(
            entries(&lines),
            vec![(0, "zzz/".to_string()), (0, "aaa.txt".to_string())]
        );
    }

    #[test]
    fn render_caps_entries_with_single_elision() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for name in ["a.txt", "b.txt", "c.txt", "d.txt", "e.txt"] {
            touch(&root.join(name));
        }

        let options = TreeOptions {
            max_depth: 5,
            max_entries_per_dir: 3,
            sample_dir: None,
        };
        let lines = render_tree(root, &options, &IgnoreNameSet::default(), &PatternMatcher::empty());
        let literal: Vec<_> = entries(&lines);
        assert_eq!(
            literal,
            vec![
                (0, "a.txt".to_string()),
                (0, "b.txt".to_string()),
                (0, "c.txt".to_string())
            ]
        );
        let elisions = lines
            .iter()
            .filter(|l| l.kind == TreeLineKind::Elision)
            .count();
        assert_eq!(elisions, 1);
    }

    #[test]
    fn render_skips_ignored_and_excluded_before_counting() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for name in ["a.bak", "b.txt", "c.txt", "d.txt"] {
            touch(&root.join(name));
        }
        fs::create_dir(root.join("bin")).unwrap();

        let options = TreeOptions {
            max_depth: 5,
            max_entries_per_dir: 3,
            sample_dir: None,
        };
        let ignore = IgnoreNameSet::new(["bin"]);
        let matcher = PatternMatcher::new(&["*.bak".to_string()]).unwrap();
        let lines = render_tree(root, &options, &ignore, &matcher);
        // The ignored directory and the excluded file do not consume cap
        // slots, so all three visible files fit.
        assert_eq!(
            entries(&lines),
            vec![
                (0, "b.txt".to_string()),
                (0, "c.txt".to_string()),
                (0, "d.txt".to_string())
            ]
        );
    }

    #[test]
    fn render_stops_past_max_depth() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("a").join("b").join("c").join("deep.txt"));

        let options = TreeOptions {
            max_depth: 1,
            max_entries_per_dir: 10,
            sample_dir: None,
        };
        let lines = render_tree(root, &options, &IgnoreNameSet::default(), &PatternMatcher::empty());
        assert_eq!(
            entries(&lines),
            vec![(0, "a/".to_string()), (1, "b/".to_string())]
        );
    }

    #[test]
    fn render_missing_root_emits_error_marker() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("missing");
        let options = TreeOptions {
            max_depth: 5,
            max_entries_per_dir: 10,
            sample_dir: None,
        };
        let lines = render_tree(&gone, &options, &IgnoreNameSet::default(), &PatternMatcher::empty());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, TreeLineKind::Error);
        assert!(lines[0].text.contains("[path not found]"));
    }

    #[test]
    fn sample_dir_shows_single_representative_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("logs").join("b.log"));
        touch(&root.join("logs").join("a.log"));
        touch(&root.join("logs").join("c.log"));
        touch(&root.join("data.txt"));

        let options = TreeOptions {
            max_depth: 5,
            max_entries_per_dir: 10,
            sample_dir: Some("logs".to_string()),
        };
        let lines = render_tree(root, &options, &IgnoreNameSet::default(), &PatternMatcher::empty());
        assert_eq!(
            entries(&lines),
            vec![
                (0, "logs/".to_string()),
                (1, "a.log".to_string()),
                (0, "data.txt".to_string())
            ]
        );
    }

    #[test]
    fn sample_dir_filters_excluded_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("logs").join("a.bak"));
        touch(&root.join("logs").join("b.log"));

        let options = TreeOptions {
            max_depth: 5,
            max_entries_per_dir: 10,
            sample_dir: Some("logs".to_string()),
        };
        let matcher = PatternMatcher::new(&["*.bak".to_string()]).unwrap();
        let lines = render_tree(root, &options, &IgnoreNameSet::default(), &matcher);
        assert_eq!(
            entries(&lines),
            vec![(0, "logs/".to_string()), (1, "b.log".to_string())]
        );
    }
}
