use crate::descriptor::sorted_by_extension_at;
use crate::exec::{self, DEFAULT_TIMEOUT};
use crate::matcher::PatternMatcher;
use crate::reader;
use crate::walker;
use std::path::Path;

const VSWHERE_PATH: &str =
    r"C:\Program Files (x86)\Microsoft Visual Studio\Installer\vswhere.exe";
const SOLUTION_HEADER_LINES: usize = 10;

/// Human-readable toolchain version string.
///
/// Probes the Visual Studio installer locator first; falls back to the
/// header lines of the first solution file; never fails, only degrades to a
/// "not determined" placeholder.
pub fn detect_toolchain_version(root: &Path) -> String {
    if let Some(version) = probe_vswhere() {
        return version;
    }
    if let Some(version) = probe_solution_header(root) {
        return version;
    }
    "Visual Studio (version not determined)".to_string()
}

fn probe_vswhere() -> Option<String> {
    let vswhere = Path::new(VSWHERE_PATH);
    if !exec::binary_exists(vswhere) {
        return None;
    }
    let out = match exec::run_with_timeout(
        VSWHERE_PATH,
        &[
            "-latest",
            "-products",
            "*",
            "-requires",
            "Microsoft.Component.MSBuild",
            "-property",
            "installationVersion",
        ],
        DEFAULT_TIMEOUT,
    ) {
        Ok(out) if out.success && !out.stdout.is_empty() => out,
        Ok(_) | Err(_) => return None,
    };

    let version = out.stdout;
    match version.split('.').next().and_then(|m| m.parse::<u32>().ok()) {
        Some(major) => Some(format!(
            "Visual Studio {} ({})",
            release_for_major(major),
            version
        )),
        None => Some(format!("Visual Studio (Version: {})", version)),
    }
}

fn probe_solution_header(root: &Path) -> Option<String> {
    let solution = find_solution(root)?;
    let text = reader::read_text(&solution, None);
    for line in text.lines().take(SOLUTION_HEADER_LINES) {
        if line.contains("VisualStudioVersion") {
            let version = line.split_once('=')?.1.trim();
            let major = version.split('.').next()?.parse::<u32>().ok()?;
            return Some(format!(
                "Visual Studio {} ({})",
                release_for_major(major),
                version
            ));
        }
        if line.contains("# Visual Studio Version") {
            let number = line.rsplit(' ').next()?.trim();
            let release = if number.starts_with("17") {
                "2022"
            } else if number.starts_with("16") {
                "2019"
            } else {
                "unknown"
            };
            return Some(format!("Visual Studio {}", release));
        }
    }
    None
}

fn find_solution(root: &Path) -> Option<std::path::PathBuf> {
    let top_level = sorted_by_extension_at(root, ".sln");
    if let Some(found) = top_level.into_iter().next() {
        return Some(found);
    }
    let extensions = crate::config::ExtensionSet::new([".sln"]);
    walker::list_files(
        root,
        &extensions,
        &crate::config::IgnoreNameSet::default(),
        &PatternMatcher::empty(),
    )
    .into_iter()
    .next()
}

fn release_for_major(major: u32) -> &'static str {
    match major {
        17 => "2022",
        16 => "2019",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn solution_version_line_maps_to_release() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("App.sln"),
            "Microsoft Visual Studio Solution File, Format Version 12.00\n\
             # Visual Studio Version 17\n\
             VisualStudioVersion = 17.9.34728.123\n\
             MinimumVisualStudioVersion = 10.0.40219.1\n",
        )
        .unwrap();

        let version = detect_toolchain_version(dir.path());
        assert_eq!(version, "Visual Studio 2022");
    }

    #[test]
    fn equals_form_is_parsed_when_comment_form_is_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("App.sln"),
            "Microsoft Visual Studio Solution File, Format Version 12.00\n\
             VisualStudioVersion = 16.11.35312.102\n",
        )
        .unwrap();

        let version = detect_toolchain_version(dir.path());
        assert_eq!(version, "Visual Studio 2019 (16.11.35312.102)");
    }

    #[test]
    fn no_evidence_yields_placeholder() {
        let dir = TempDir::new().unwrap();
        let version = detect_toolchain_version(dir.path());
        assert_eq!(version, "Visual Studio (version not determined)");
    }

    #[test]
    fn nested_solution_is_found_recursively() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src").join("App.sln"),
            "VisualStudioVersion = 17.1.1\n",
        )
        .unwrap();

        let version = detect_toolchain_version(dir.path());
        assert_eq!(version, "Visual Studio 2022 (17.1.1)");
    }
}
