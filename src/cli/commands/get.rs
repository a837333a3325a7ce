//! `veil get`: print a single secret's value.

use crate::errors::Result;
use crate::vault::VaultService;

/// Execute the `get` command.
pub fn execute(service: &VaultService, vault: &str, name: &str) -> Result<()> {
    let value = service.get(vault, name)?;
    println!("{value}");
    Ok(())
}
