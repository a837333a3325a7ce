//! `veil list`: display the secret names in a vault.

use crate::cli::output;
use crate::errors::Result;
use crate::vault::VaultService;

/// Execute the `list` command.
pub fn execute(service: &VaultService, vault: &str) -> Result<()> {
    let names = service.list(vault)?;

    output::info(&format!("{vault}: {} secret(s)", names.len()));
    output::print_names_table("Name", &names, "No secrets in this vault yet.");
    if names.is_empty() {
        output::tip(&format!("Run `veil set {vault} <NAME>` to add your first secret."));
    }

    Ok(())
}
