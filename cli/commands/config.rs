use crate::cli_args::ConfigArgs;
use crate::output;
use anyhow::{Context, Result};
use repoprompt_core::{Config, config::DEFAULT_CONFIG_FILENAME};
use std::fs;

pub fn handle_config_command(args: &ConfigArgs, quiet: bool) -> Result<()> {
    let rendered = Config::default_toml().context("Failed to render default configuration")?;

    if !args.save {
        return output::write_to_stdout(&rendered);
    }

    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    let path = project_root.join(DEFAULT_CONFIG_FILENAME);
    if path.exists() {
        anyhow::bail!(
            "Refusing to overwrite existing config file: {}",
            path.display()
        );
    }
    fs::write(&path, &rendered)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    if !quiet {
        output::print_config_saved(&path);
    }
    Ok(())
}
