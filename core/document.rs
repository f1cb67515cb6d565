use crate::collect;
use crate::config::{self, Config};
use crate::descriptor;
use crate::error::{AppError, Result};
use crate::matcher::PatternMatcher;
use crate::reader;
use crate::system;
use crate::toolchain;
use crate::tree::{self, TreeRenderer};
use crate::vcs;
use std::fs;
use std::path::{Path, PathBuf};

/// Characters reserved for the truncation notice when the total-size limit
/// cuts the document.
const TRUNCATION_HEADROOM: usize = 500;
const TOTAL_TRUNCATION_NOTICE: &str =
    "[... excerpt due to total size limit, remaining content truncated ...]";

/// Assembles the ordered prompt sections and applies the single global
/// truncation pass. Owns the one compiled `PatternMatcher` shared by the
/// source listing, the tree views, and the log sample.
pub struct DocumentAssembler<'a> {
    root: &'a Path,
    config: &'a Config,
    matcher: PatternMatcher,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(root: &'a Path, config: &'a Config) -> Result<Self> {
        let matcher = PatternMatcher::new(&config.source.exclude)?;
        Ok(DocumentAssembler {
            root,
            config,
            matcher,
        })
    }

    /// Build the full document. Every section degrades internally; this
    /// function cannot fail.
    pub fn build(&self) -> String {
        log::info!("Assembling prompt for: {}", self.root.display());
        let renderer = TreeRenderer::new(self.config, &self.matcher);

        let mut parts: Vec<String> = Vec::new();
        parts.push(self.preamble_section());
        parts.push(self.environment_section());
        parts.push(self.paths_section());
        parts.push(self.vcs_section());
        parts.push(self.repo_tree_section(&renderer));
        if let Some(section) = self.data_tree_section(&renderer) {
            parts.push(section);
        }
        parts.push(self.example_config_section());
        if let Some(section) = self.sample_log_section() {
            parts.push(section);
        }
        parts.push(self.sources_section());

        let document = parts.join("\n\n");
        truncate_total(document, self.config.limits.max_total_chars)
    }

    /// Write the document to the configured output path and return it.
    /// This is the only hard failure in the pipeline.
    pub fn write(&self, document: &str) -> Result<PathBuf> {
        let output = self.config.output_path(self.root);
        write_document(document, &output)?;
        Ok(output)
    }

    fn preamble_section(&self) -> String {
        let candidates = &self.config.general.preamble_candidates;
        match config::choose_existing(self.root, candidates) {
            Some(path) => {
                log::debug!("Using preamble file: {}", path.display());
                reader::read_text(&path, self.config.limits.max_file_bytes)
                    .trim_end_matches('\n')
                    .to_string()
            }
            None => {
                let shown = candidates
                    .first()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "none configured".to_string());
                format!("[preface file not found: {}]", shown)
            }
        }
    }

    fn environment_section(&self) -> String {
        let parsed = descriptor::find_build_descriptor(self.root)
            .map(|p| descriptor::parse_build_descriptor(&p, self.config.limits.max_file_bytes))
            .unwrap_or_default();
        let target_framework = parsed
            .target_framework
            .unwrap_or_else(|| "unknown".to_string());
        let lang_version = parsed
            .lang_version
            .unwrap_or_else(|| "default (SDK-driven)".to_string());
        let toolchain = toolchain::detect_toolchain_version(self.root);

        [
            "## Environment".to_string(),
            format!("- .NET TargetFramework(s): {}", target_framework),
            format!("- C# LangVersion: {}", lang_version),
            format!("- Visual Studio: {}", toolchain),
            format!("- OS: {}", system::os_description()),
        ]
        .join("\n")
    }

    fn paths_section(&self) -> String {
        let mut lines = vec![
            "## Paths".to_string(),
            format!("- Repository: {}", self.root.display()),
        ];
        if let Some(data_root) = &self.config.data_tree.root {
            lines.push(format!(
                "- Data root: {}",
                config::resolve_against(self.root, data_root).display()
            ));
        }
        if let Some(sample_log) = &self.config.data_tree.sample_log {
            lines.push(format!(
                "- Sample log: {}",
                config::resolve_against(self.root, sample_log).display()
            ));
        }
        lines.join("\n")
    }

    fn vcs_section(&self) -> String {
        let info = vcs::gather_vcs_info(self.root);
        [
            "## Git".to_string(),
            format!("- Branch: {}", info.branch),
            format!("- Last commit: {}", info.last_commit),
            "- Remotes:".to_string(),
            "```".to_string(),
            info.remotes,
            "```".to_string(),
        ]
        .join("\n")
    }

    fn repo_tree_section(&self, renderer: &TreeRenderer<'_>) -> String {
        [
            "## Directory tree (repository)".to_string(),
            "```text".to_string(),
            renderer.repo_tree(self.root),
            "```".to_string(),
        ]
        .join("\n")
    }

    fn data_tree_section(&self, renderer: &TreeRenderer<'_>) -> Option<String> {
        let data_root = self.config.data_tree.root.as_ref()?;
        let data_root = config::resolve_against(self.root, data_root);
        Some(
            [
                "## Directory tree (data)".to_string(),
                "```text".to_string(),
                renderer.data_tree(&data_root),
                "```".to_string(),
            ]
            .join("\n"),
        )
    }

    fn example_config_section(&self) -> String {
        let mut lines = vec!["## Example config".to_string()];
        match config::choose_existing(self.root, &self.config.general.config_candidates) {
            Some(path) => {
                let text = reader::read_text(&path, self.config.limits.max_file_bytes);
                lines.push("```json".to_string());
                lines.push(text.trim_end_matches('\n').to_string());
                lines.push("```".to_string());
            }
            None => lines.push("[example config not found]".to_string()),
        }
        lines.join("\n")
    }

    fn sample_log_section(&self) -> Option<String> {
        let sample_log = self.config.data_tree.sample_log.as_ref()?;
        let path = config::resolve_against(self.root, sample_log);
        let sampled = tree::head_tail(
            &path,
            self.config.limits.log_head_lines,
            self.config.limits.log_tail_lines,
        );
        Some(
            [
                "## Sample log".to_string(),
                "```text".to_string(),
                sampled.trim_end_matches('\n').to_string(),
                "```".to_string(),
            ]
            .join("\n"),
        )
    }

    fn sources_section(&self) -> String {
        let sources = collect::collect(self.root, self.config, &self.matcher);
        let mut lines = vec!["## Files (all sources)".to_string()];
        for source in sources {
            lines.push(format!("File: {}", source.relative));
            lines.push(format!("```{}", source.language));
            lines.push(source.content.trim_end_matches('\n').to_string());
            lines.push("```".to_string());
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

/// Apply the global size ceiling once to the fully joined document.
pub fn truncate_total(text: String, limit: Option<usize>) -> String {
    let Some(limit) = limit else {
        return text;
    };
    if text.chars().count() <= limit {
        return text;
    }
    let keep = limit.saturating_sub(TRUNCATION_HEADROOM);
    let kept: String = text.chars().take(keep).collect();
    format!("{}\n{}\n", kept, TOTAL_TRUNCATION_NOTICE)
}

/// Write the document as UTF-8 with normalized line endings and a single
/// trailing newline, creating the parent directory if needed.
pub fn write_document(document: &str, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut normalized = document.replace("\r\n", "\n");
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    fs::write(output, normalized).map_err(|e| AppError::FileWrite {
        path: output.to_path_buf(),
        source: e,
    })
}
