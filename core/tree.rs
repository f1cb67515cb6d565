use crate::config::Config;
use crate::matcher::PatternMatcher;
use crate::reader;
use crate::walker::{self, TreeLine, TreeOptions};
use std::path::Path;

/// Renders the configured tree views as indented text, headed by the root
/// path. Both views share the one `PatternMatcher`; the data view adds the
/// log-directory exception rule.
pub struct TreeRenderer<'a> {
    config: &'a Config,
    matcher: &'a PatternMatcher,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(config: &'a Config, matcher: &'a PatternMatcher) -> Self {
        TreeRenderer { config, matcher }
    }

    pub fn repo_tree(&self, root: &Path) -> String {
        let options = TreeOptions {
            max_depth: self.config.repo_tree.max_depth,
            max_entries_per_dir: self.config.repo_tree.max_entries_per_dir,
            sample_dir: None,
        };
        let lines = walker::render_tree(root, &options, &self.config.repo_tree.ignore, self.matcher);
        render_lines(root, &lines)
    }

    pub fn data_tree(&self, data_root: &Path) -> String {
        let options = TreeOptions {
            max_depth: self.config.data_tree.max_depth,
            max_entries_per_dir: self.config.data_tree.max_entries_per_dir,
            sample_dir: Some(self.config.data_tree.log_dir.clone()),
        };
        let lines =
            walker::render_tree(data_root, &options, &self.config.data_tree.ignore, self.matcher);
        render_lines(data_root, &lines)
    }
}

fn render_lines(root: &Path, lines: &[TreeLine]) -> String {
    let mut rendered = Vec::with_capacity(lines.len() + 1);
    rendered.push(root.display().to_string());
    rendered.extend(
        lines
            .iter()
            .map(|line| format!("{}{}", "  ".repeat(line.depth), line.text)),
    );
    rendered.join("\n")
}

/// First `head` and last `tail` lines of a text file, with one elision line
/// reporting the omitted count in between. Files with no more than
/// `head + tail` lines are returned verbatim. Missing or unreadable files
/// yield a one-line diagnostic instead of failing.
pub fn head_tail(path: &Path, head: usize, tail: usize) -> String {
    if !path.exists() {
        return format!("[log file not found: {}]", path.display());
    }
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return format!("[error reading log file {}: {}]", path.display(), e),
    };
    let text = reader::decode_text(&bytes);
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let total = lines.len();
    if total <= head + tail {
        return text;
    }

    let mut sampled = String::new();
    for line in &lines[..head] {
        sampled.push_str(line);
    }
    sampled.push_str(&format!("... ({} lines omitted) ...\n", total - head - tail));
    for line in &lines[total - tail..] {
        sampled.push_str(line);
    }
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn numbered_lines(count: usize) -> String {
        (1..=count).map(|i| format!("line {}\n", i)).collect()
    }

    #[test]
    fn head_tail_returns_short_files_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.log");
        let content = numbered_lines(39);
        fs::write(&path, &content).unwrap();
        assert_eq!(head_tail(&path, 20, 20), content);
    }

    #[test]
    fn head_tail_boundary_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exact.log");
        let content = numbered_lines(40);
        fs::write(&path, &content).unwrap();
        assert_eq!(head_tail(&path, 20, 20), content);
    }

    #[test]
    fn head_tail_elides_the_middle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.log");
        fs::write(&path, numbered_lines(41)).unwrap();

        let sampled = head_tail(&path, 20, 20);
        let lines: Vec<&str> = sampled.lines().collect();
        assert_eq!(lines.len(), 41);
        assert_eq!(lines[0], "line 1");
        assert_eq!(lines[19], "line 20");
        assert_eq!(lines[20], "... (1 lines omitted) ...");
        assert_eq!(lines[21], "line 22");
        assert_eq!(lines[40], "line 41");
    }

    #[test]
    fn head_tail_missing_file_yields_diagnostic() {
        let dir = TempDir::new().unwrap();
        let sampled = head_tail(&dir.path().join("absent.log"), 20, 20);
        assert!(sampled.starts_with("[log file not found:"));
    }

    #[test]
    fn repo_tree_is_headed_by_root_and_indented() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src").join("main.cs"), "x").unwrap();

        let config = Config::default();
        let matcher = PatternMatcher::empty();
        let renderer = TreeRenderer::new(&config, &matcher);
        let tree = renderer.repo_tree(root);

        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], root.display().to_string());
        assert_eq!(lines[1], "src/");
        assert_eq!(lines[2], "  main.cs");
    }

    #[test]
    fn data_tree_applies_log_sample_rule() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("measurements")).unwrap();
        fs::write(root.join("measurements").join("run1.csv"), "a,b").unwrap();
        fs::create_dir_all(root.join("logs")).unwrap();
        fs::write(root.join("logs").join("2024-01-01.log"), "x").unwrap();
        fs::write(root.join("logs").join("2024-01-02.log"), "y").unwrap();

        let config = Config::default();
        let matcher = PatternMatcher::empty();
        let renderer = TreeRenderer::new(&config, &matcher);
        let tree = renderer.data_tree(root);

        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], root.display().to_string());
        assert_eq!(lines[1], "logs/");
        assert_eq!(lines[2], "  2024-01-01.log");
        assert_eq!(lines[3], "measurements/");
        assert_eq!(lines[4], "  run1.csv");
        assert!(!tree.contains("2024-01-02.log"));
    }
}
