use crate::exec::{self, DEFAULT_TIMEOUT};
use std::path::Path;

/// Version-control metadata for the repository root. Each field degrades
/// independently to an `unknown (<reason>)` placeholder; no git failure is
/// ever fatal to the run.
#[derive(Debug, Clone, PartialEq)]
pub struct VcsInfo {
    pub branch: String,
    pub last_commit: String,
    pub remotes: String,
}

pub fn gather_vcs_info(root: &Path) -> VcsInfo {
    if !root.exists() {
        let missing = format!("unknown (repository path not found: {})", root.display());
        return VcsInfo {
            branch: missing.clone(),
            last_commit: missing.clone(),
            remotes: missing,
        };
    }

    let root_str = root.to_string_lossy();
    VcsInfo {
        branch: git_field(&["-C", &root_str, "rev-parse", "--abbrev-ref", "HEAD"]),
        last_commit: git_field(&[
            "-C",
            &root_str,
            "log",
            "-1",
            "--pretty=%H | %an | %ad | %s",
            "--date=iso",
        ]),
        remotes: git_field(&["-C", &root_str, "remote", "-v"]),
    }
}

fn git_field(args: &[&str]) -> String {
    match exec::run_with_timeout("git", args, DEFAULT_TIMEOUT) {
        Ok(out) if out.success => out.stdout,
        Ok(out) => format!("unknown ({})", out.stderr),
        Err(e) => format!("unknown ({})", e),
    }
}
