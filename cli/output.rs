use anyhow::{Context, Result};
use colored::*;
use std::io::{self, Write};
use std::path::Path;

pub fn print_document_written(path: &Path) {
    println!(
        "{} Prompt written to: {}",
        "✅".green(),
        path.display().to_string().blue()
    );
}

pub fn print_config_saved(path: &Path) {
    println!(
        "{} Default config saved to: {}",
        "✅".green(),
        path.display().to_string().blue()
    );
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
