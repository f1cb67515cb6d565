use crate::cli_args::{Cli, CompletionArgs};
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io;

pub fn handle_completion_command(args: &CompletionArgs) -> Result<()> {
    let shell = args.shell.unwrap_or(Shell::Fish);
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    generate(shell, &mut command, bin_name, &mut io::stdout());
    Ok(())
}
