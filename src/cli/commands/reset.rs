//! `veil reset`: delete every secret in every vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::errors::{Result, VeilError};
use crate::vault::VaultService;

/// Execute the `reset` command.
pub fn execute(service: &mut VaultService, force: bool) -> Result<()> {
    if !force {
        output::warning("This permanently deletes every secret in every vault.");
        let confirmed = Confirm::new()
            .with_prompt("Reset the secret database?")
            .default(false)
            .interact()
            .map_err(|e| VeilError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    service.reset()?;
    output::success("All vaults deleted");

    Ok(())
}
