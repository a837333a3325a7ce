//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, Settings};
use crate::crypto::Engine;
use crate::errors::Result;
use crate::store::open_store;
use crate::vault::VaultService;

/// Veil CLI: local encrypted secret vault.
#[derive(Parser)]
#[command(name = "veil", about = "Local encrypted secret vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Secret database path (overrides VEIL_DB_PATH and the config file)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate a new random master key
    Keygen,

    /// Set a secret (add or update)
    Set {
        /// Vault name (e.g. myapp)
        vault: String,
        /// Secret name (e.g. DATABASE_URL)
        name: String,
        /// Secret value (omit for interactive prompt or piped stdin)
        value: Option<String>,
    },

    /// Print a secret's value
    Get {
        /// Vault name
        vault: String,
        /// Secret name
        name: String,
    },

    /// Delete a secret
    Delete {
        /// Vault name
        vault: String,
        /// Secret name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List the secret names in a vault
    List {
        /// Vault name
        vault: String,
    },

    /// List all vaults
    Vaults,

    /// Delete every secret in every vault
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Export a vault to an env or JSON file
    Export(ExportArgs),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum, ignore_case = true)]
        shell: clap_complete::Shell,
    },
}

/// Arguments of `veil export`.
#[derive(clap::Args)]
pub struct ExportArgs {
    /// Vault name
    pub vault: String,

    /// Output format: env (default), dotenv or json
    #[arg(short, long, default_value = "env")]
    pub format: String,

    /// Destination file (default: .env, or secrets.json for json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only export names matching this name or glob (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Skip names matching this name or glob (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Merge into an existing file instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Overwrite an existing file, or update existing keys with --append
    #[arg(long)]
    pub force: bool,

    /// Back up the destination before changing it
    #[arg(long)]
    pub backup: bool,

    /// Directory for backups (default: next to the destination)
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve settings for this invocation: config file and environment,
/// then the `--db-path` flag.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load()?;
    if let Some(path) = &cli.db_path {
        settings.db_path = path.clone();
    }
    settings.validate()?;
    Ok(settings)
}

/// Build the vault service from the master key and the configured store.
///
/// The key is checked before the store is opened, so a missing key never
/// creates an empty database as a side effect.
pub fn open_vault(cli: &Cli) -> Result<VaultService> {
    let settings = load_settings(cli)?;
    let key = config::master_key()?;
    let engine = Engine::new(&key)?;

    let store = open_store(&settings.store_type, &settings.db_path)?;
    Ok(VaultService::new(store, engine))
}

/// Default destination for an export format.
pub fn default_output(format: &str) -> PathBuf {
    match format.to_ascii_lowercase().as_str() {
        "json" => PathBuf::from("secrets.json"),
        _ => PathBuf::from(".env"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_export_flags() {
        let cli = Cli::parse_from([
            "veil", "export", "app", "-f", "json", "--include", "DB_*", "--include", "API_KEY",
            "--exclude", "*_OLD", "--append", "--force", "--dry-run",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.vault, "app");
        assert_eq!(args.format, "json");
        assert_eq!(args.include, vec!["DB_*", "API_KEY"]);
        assert_eq!(args.exclude, vec!["*_OLD"]);
        assert!(args.append && args.force && args.dry_run);
        assert!(!args.backup);
        assert!(args.output.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["veil", "list", "app", "--db-path", "/tmp/x.db", "-v"]);
        assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/x.db")));
        assert!(cli.verbose);
    }

    #[test]
    fn completions_shell_is_parsed_by_clap() {
        let cli = Cli::parse_from(["veil", "completions", "ZSH"]);
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: clap_complete::Shell::Zsh
            }
        ));
        assert!(Cli::try_parse_from(["veil", "completions", "csh"]).is_err());
    }

    #[test]
    fn default_output_follows_format() {
        assert_eq!(default_output("env"), PathBuf::from(".env"));
        assert_eq!(default_output("dotenv"), PathBuf::from(".env"));
        assert_eq!(default_output("JSON"), PathBuf::from("secrets.json"));
    }
}
