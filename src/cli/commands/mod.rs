//! Command implementations, one module per subcommand.

pub mod completions;
pub mod delete;
pub mod export;
pub mod get;
pub mod keygen;
pub mod list;
pub mod reset;
pub mod set;
pub mod vaults;

use crate::cli::{open_vault, Cli, Commands};
use crate::errors::Result;
use crate::vault::VaultService;

/// Dispatch the parsed command line.
///
/// Commands that touch secrets share one `VaultService`, opened here and
/// closed once the command finishes.
pub fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Keygen => keygen::execute(),
        Commands::Completions { shell } => completions::execute(*shell),
        command => {
            let mut vault = open_vault(cli)?;
            let result = execute_with_vault(command, &mut vault);
            let closed = vault.close();
            result.and(closed)
        }
    }
}

fn execute_with_vault(command: &Commands, vault: &mut VaultService) -> Result<()> {
    match command {
        Commands::Set {
            vault: v,
            name,
            value,
        } => set::execute(vault, v, name, value.as_deref()),
        Commands::Get { vault: v, name } => get::execute(vault, v, name),
        Commands::Delete {
            vault: v,
            name,
            force,
        } => delete::execute(vault, v, name, *force),
        Commands::List { vault: v } => list::execute(vault, v),
        Commands::Vaults => vaults::execute(vault),
        Commands::Reset { force } => reset::execute(vault, *force),
        Commands::Export(args) => export::execute(vault, args),
        // Handled before the vault is opened.
        Commands::Keygen | Commands::Completions { .. } => Ok(()),
    }
}
