use crate::cli_args::GenerateArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use repoprompt_core::{Config, DocumentAssembler};

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let mut config = load_config_for_command(&project_root, &args.project_config)
        .context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, &args);

    let assembler = DocumentAssembler::new(&project_root, &config)
        .context("Failed to compile exclude patterns")?;
    let document = assembler.build();

    if args.stdout {
        log::debug!("Outputting document to stdout...");
        output::write_to_stdout(&document)?;
        return Ok(());
    }

    let written_to = assembler
        .write(&document)
        .context("Failed to write prompt document")?;
    if !quiet {
        output::print_document_written(&written_to);
    }
    Ok(())
}

fn apply_cli_overrides(config: &mut Config, args: &GenerateArgs) {
    log::trace!("Applying generate command CLI overrides to config...");
    if let Some(output) = &args.output {
        config.general.output = output.clone();
    }
    if let Some(max_total_chars) = args.max_total_chars {
        config.limits.max_total_chars = Some(max_total_chars);
    }
    if let Some(max_file_bytes) = args.max_file_bytes {
        config.limits.max_file_bytes = Some(max_file_bytes);
    }
}
