//! `veil export`: write a vault to an env or JSON file.

use crate::cli::{default_output, output, ExportArgs};
use crate::errors::Result;
use crate::export::{ExportOptions, Preview};
use crate::vault::VaultService;

/// Execute the `export` command.
pub fn execute(service: &VaultService, args: &ExportArgs) -> Result<()> {
    let opts = options_from_args(args);
    let preview = service.export(&args.vault, &opts)?;

    output::print_preview_table(&preview);

    let target = opts.target_path.display();
    if opts.dry_run {
        output::info(&format!("Dry run: {target} was not modified."));
        if !preview.content.is_empty() {
            print!("{}", preview.content);
        }
        return Ok(());
    }

    if opts.append && preview.is_noop() {
        output::info(&format!("{target} is already up to date."));
    } else {
        output::success(&summary(&preview, &target.to_string()));
    }

    if !preview.skipped_keys.is_empty() {
        output::tip("Use --force with --append to overwrite existing keys.");
    }

    Ok(())
}

fn options_from_args(args: &ExportArgs) -> ExportOptions {
    ExportOptions {
        format: args.format.clone(),
        target_path: args
            .output
            .clone()
            .unwrap_or_else(|| default_output(&args.format)),
        include: args.include.clone(),
        exclude: args.exclude.clone(),
        append: args.append,
        force: args.force,
        backup: args.backup,
        backup_dir: args.backup_dir.clone(),
        dry_run: args.dry_run,
    }
}

fn summary(preview: &Preview, target: &str) -> String {
    format!(
        "Exported to {target}: {} new, {} updated, {} skipped",
        preview.new_keys.len(),
        preview.updated_keys.len(),
        preview.skipped_keys.len()
    )
}
