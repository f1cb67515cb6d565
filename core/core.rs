pub mod collect;
pub mod config;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod exec;
pub mod matcher;
pub mod reader;
pub mod system;
pub mod toolchain;
pub mod tree;
pub mod vcs;
pub mod walker;

pub use collect::{SourceFile, collect};
pub use config::{Config, ExtensionSet, IgnoreNameSet};
pub use descriptor::{BuildDescriptor, find_build_descriptor, parse_build_descriptor};
pub use document::{DocumentAssembler, truncate_total, write_document};
pub use error::{AppError, Result};
pub use matcher::PatternMatcher;
pub use tree::{TreeRenderer, head_tail};
pub use vcs::{VcsInfo, gather_vcs_info};
pub use walker::{TreeLine, TreeLineKind, TreeOptions, list_files, render_tree};
