use crate::config::ExtensionSet;
use crate::matcher::PatternMatcher;
use crate::reader;
use crate::walker;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static TARGET_FRAMEWORK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<TargetFramework>([^<]+)</TargetFramework>").unwrap());
static TARGET_FRAMEWORKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<TargetFrameworks>([^<]+)</TargetFrameworks>").unwrap());
static LANG_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<LangVersion>([^<]+)</LangVersion>").unwrap());

/// The two fields pattern-searched out of a build-descriptor file. Either
/// may be absent; callers render `None` as an explicit placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildDescriptor {
    pub target_framework: Option<String>,
    pub lang_version: Option<String>,
}

/// First `*.csproj` under the root: root level first, then the full tree,
/// sorted in either case.
pub fn find_build_descriptor(root: &Path) -> Option<PathBuf> {
    let top_level = sorted_by_extension_at(root, ".csproj");
    if let Some(found) = top_level.into_iter().next() {
        return Some(found);
    }
    let extensions = ExtensionSet::new([".csproj"]);
    walker::list_files(
        root,
        &extensions,
        &crate::config::IgnoreNameSet::default(),
        &PatternMatcher::empty(),
    )
    .into_iter()
    .next()
}

/// Extract the target-framework and language-version fields via textual
/// pattern search. Unreadable files yield an empty descriptor.
pub fn parse_build_descriptor(path: &Path, max_bytes: Option<u64>) -> BuildDescriptor {
    let text = reader::read_text(path, max_bytes);
    parse_descriptor_text(&text)
}

fn parse_descriptor_text(text: &str) -> BuildDescriptor {
    let target_framework = TARGET_FRAMEWORK
        .captures(text)
        .or_else(|| TARGET_FRAMEWORKS.captures(text))
        .map(|c| c[1].trim().to_string());
    let lang_version = LANG_VERSION.captures(text).map(|c| c[1].trim().to_string());
    BuildDescriptor {
        target_framework,
        lang_version,
    }
}

/// Immediate children of `dir` with the given dotted extension, sorted by
/// lowercase path. Listing errors yield an empty result.
pub fn sorted_by_extension_at(dir: &Path, dotted_ext: &str) -> Vec<PathBuf> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<PathBuf> = read
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && crate::config::dotted_extension(p).as_deref() == Some(dotted_ext)
        })
        .collect();
    found.sort_by_key(|p| p.to_string_lossy().to_lowercase());
    found
}
