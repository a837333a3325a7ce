//! `veil set`: add or update a secret.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::errors::{Result, VeilError};
use crate::vault::VaultService;

/// Execute the `set` command.
pub fn execute(
    service: &mut VaultService,
    vault: &str,
    name: &str,
    value: Option<&str>,
) -> Result<()> {
    // Determine the secret value from one of three sources.
    let secret_value = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line; it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        // Source 3: Interactive hidden prompt (default).
        let v = dialoguer::Password::new()
            .with_prompt(format!("Enter value for {name}"))
            .interact()
            .map_err(|e| VeilError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(v)
    };

    let existed = service.list(vault)?.iter().any(|n| n == name);
    service.set(vault, name, &secret_value)?;

    if existed {
        output::success(&format!("Secret '{name}' updated in vault '{vault}'"));
    } else {
        output::success(&format!("Secret '{name}' added to vault '{vault}'"));
    }

    Ok(())
}
