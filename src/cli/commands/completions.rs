//! `veil completions <shell>`: print a completion script to stdout.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::errors::Result;

pub fn execute(shell: Shell) -> Result<()> {
    write_completions(shell, &mut io::stdout().lock())
}

/// Render the completion script for `veil` into `out`.
pub fn write_completions<W: Write>(shell: Shell, out: &mut W) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "veil", out);
    out.flush()?;
    Ok(())
}
