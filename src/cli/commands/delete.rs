//! `veil delete`: remove a secret from a vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::errors::{Result, VeilError};
use crate::vault::VaultService;

/// Execute the `delete` command.
pub fn execute(service: &mut VaultService, vault: &str, name: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete secret '{name}' from vault '{vault}'?"))
            .default(false)
            .interact()
            .map_err(|e| VeilError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    service.delete(vault, name)?;
    output::success(&format!("Deleted secret '{name}' from vault '{vault}'"));

    Ok(())
}
