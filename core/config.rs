use crate::error::{AppError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "repoprompt.toml";
pub const DEFAULT_OUTPUT_FILENAME: &str = "Prompt.md";
pub const PROJECT_ROOT_ENV_VAR: &str = "REPOPROMPT_ROOT";

/// A set of bare file/directory names excluded from traversal wherever they
/// appear as a path segment. Membership tests are lowercase-normalized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IgnoreNameSet(HashSet<String>);

impl IgnoreNameSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IgnoreNameSet(names.into_iter().map(|n| n.into().to_lowercase()).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_lowercase())
    }

    pub fn contains_os(&self, name: &OsStr) -> bool {
        self.contains(&name.to_string_lossy())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for IgnoreNameSet {
    fn from(names: Vec<String>) -> Self {
        IgnoreNameSet::new(names)
    }
}

impl From<IgnoreNameSet> for Vec<String> {
    fn from(set: IgnoreNameSet) -> Self {
        let mut names: Vec<String> = set.0.into_iter().collect();
        names.sort();
        names
    }
}

/// File extensions (dotted, lowercase) that count as source for collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionSet(HashSet<String>);

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExtensionSet(
            extensions
                .into_iter()
                .map(|e| normalize_extension(&e.into()))
                .collect(),
        )
    }

    /// True when the path's extension (lowercased, with its dot) is in the set.
    pub fn matches(&self, path: &Path) -> bool {
        dotted_extension(path).is_some_and(|ext| self.0.contains(&ext))
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(extensions: Vec<String>) -> Self {
        ExtensionSet::new(extensions)
    }
}

impl From<ExtensionSet> for Vec<String> {
    fn from(set: ExtensionSet) -> Self {
        let mut extensions: Vec<String> = set.0.into_iter().collect();
        extensions.sort();
        extensions
    }
}

fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Lowercased extension of `path` including the leading dot, if any.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub repo_tree: TreeViewConfig,
    #[serde(default)]
    pub data_tree: DataTreeConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default = "default_languages")]
    pub languages: IndexMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_preamble_candidates")]
    pub preamble_candidates: Vec<PathBuf>,
    #[serde(default = "default_config_candidates")]
    pub config_candidates: Vec<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TreeViewConfig {
    #[serde(default = "default_repo_ignore")]
    pub ignore: IgnoreNameSet,
    #[serde(default = "default_tree_depth")]
    pub max_depth: usize,
    #[serde(default = "default_tree_entries")]
    pub max_entries_per_dir: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataTreeConfig {
    /// Data root rendered below the repository tree. The section is omitted
    /// entirely when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub ignore: IgnoreNameSet,
    #[serde(default = "default_tree_depth")]
    pub max_depth: usize,
    #[serde(default = "default_tree_entries")]
    pub max_entries_per_dir: usize,
    /// Directory name that renders as a single representative file instead
    /// of its full contents.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_log: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default = "default_source_extensions")]
    pub extensions: ExtensionSet,
    #[serde(default = "default_exclude_patterns")]
    pub exclude: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_chars: Option<usize>,
    #[serde(default = "default_log_head")]
    pub log_head_lines: usize,
    #[serde(default = "default_log_tail")]
    pub log_tail_lines: usize,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILENAME)
}
fn default_preamble_candidates() -> Vec<PathBuf> {
    vec![PathBuf::from("prePrompt.md")]
}
fn default_config_candidates() -> Vec<PathBuf> {
    vec![PathBuf::from("settings.json")]
}
fn default_repo_ignore() -> IgnoreNameSet {
    IgnoreNameSet::new([
        ".git",
        ".vs",
        "bin",
        "obj",
        "packages",
        "node_modules",
        "__pycache__",
        "target",
        "prePrompt.md",
        "Prompt.md",
    ])
}
fn default_tree_depth() -> usize {
    100
}
fn default_tree_entries() -> usize {
    100
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_source_extensions() -> ExtensionSet {
    ExtensionSet::new([
        ".cs", ".xaml", ".xml", ".json", ".config", ".csproj", ".sln", ".props", ".targets",
        ".md",
    ])
}
fn default_exclude_patterns() -> Vec<String> {
    ["*.bak", "TODO.md", "README.md", "CHANGELOG.md"]
        .map(String::from)
        .to_vec()
}
fn default_log_head() -> usize {
    20
}
fn default_log_tail() -> usize {
    20
}
fn default_languages() -> IndexMap<String, String> {
    [
        (".cs", "csharp"),
        (".xaml", "xml"),
        (".xml", "xml"),
        (".json", "json"),
        (".config", "xml"),
        (".csproj", "xml"),
        (".sln", "ini"),
        (".props", "xml"),
        (".targets", "xml"),
        (".md", "markdown"),
        (".rs", "rust"),
        (".toml", "toml"),
        (".py", "python"),
        (".yml", "yaml"),
        (".yaml", "yaml"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            repo_tree: TreeViewConfig::default(),
            data_tree: DataTreeConfig::default(),
            source: SourceConfig::default(),
            limits: LimitsConfig::default(),
            languages: default_languages(),
        }
    }
}
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            preamble_candidates: default_preamble_candidates(),
            config_candidates: default_config_candidates(),
        }
    }
}
impl Default for TreeViewConfig {
    fn default() -> Self {
        Self {
            ignore: default_repo_ignore(),
            max_depth: default_tree_depth(),
            max_entries_per_dir: default_tree_entries(),
        }
    }
}
impl Default for DataTreeConfig {
    fn default() -> Self {
        Self {
            root: None,
            ignore: IgnoreNameSet::default(),
            max_depth: default_tree_depth(),
            max_entries_per_dir: default_tree_entries(),
            log_dir: default_log_dir(),
            sample_log: None,
        }
    }
}
impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extensions: default_source_extensions(),
            exclude: default_exclude_patterns(),
        }
    }
}
impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: None,
            max_total_chars: None,
            log_head_lines: default_log_head(),
            log_tail_lines: default_log_tail(),
        }
    }
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var(PROJECT_ROOT_ENV_VAR).ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&PathBuf>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p) => {
                let expanded = PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref());
                if !expanded.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        expanded.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", expanded.display());
                Ok(Some(expanded))
            }
            None => {
                let default_path = project_root.join(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<Config>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    /// Default configuration rendered as TOML, for `repoprompt config`.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).map_err(AppError::from)
    }

    /// Absolute output path for the assembled document.
    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        resolve_against(project_root, &self.general.output)
    }

    /// Fence language tag for a source file, `"text"` when unmapped.
    pub fn language_for(&self, path: &Path) -> String {
        dotted_extension(path)
            .and_then(|ext| self.languages.get(&ext).cloned())
            .unwrap_or_else(|| "text".to_string())
    }
}

/// Join a possibly-relative configured path onto the project root.
pub fn resolve_against(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// First existing path among `candidates`, each resolved against the root.
pub fn choose_existing(project_root: &Path, candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|c| resolve_against(project_root, c))
        .find(|p| p.exists())
}
