//! `veil keygen`: print a fresh random master key.

use std::io::{self, IsTerminal};

use crate::cli::output;
use crate::crypto::generate_key;
use crate::errors::Result;

/// Execute the `keygen` command.
///
/// Only the key goes to stdout, so `export MASTER_KEY=$(veil keygen)`
/// works.
pub fn execute() -> Result<()> {
    let key = generate_key();
    println!("{key}");

    if io::stdout().is_terminal() {
        output::tip("Store it safely and export it as MASTER_KEY; lost keys cannot be recovered.");
    }
    Ok(())
}
