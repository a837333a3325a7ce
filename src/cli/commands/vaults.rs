//! `veil vaults`: display every vault that holds at least one secret.

use crate::cli::output;
use crate::errors::Result;
use crate::vault::VaultService;

/// Execute the `vaults` command.
pub fn execute(service: &VaultService) -> Result<()> {
    let vaults = service.list_vaults()?;
    output::print_names_table("Vault", &vaults, "No vaults yet.");
    Ok(())
}
