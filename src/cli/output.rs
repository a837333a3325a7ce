//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Logging is separate and
//! goes through `tracing`.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::export::Preview;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a dim hint after an error, on stderr.
pub fn hint(msg: &str) {
    eprintln!("{} {}", style("hint:").dim(), style(msg).dim());
}

/// Print a one-column table of names, or `empty` when there are none.
pub fn print_names_table(header: &str, names: &[String], empty: &str) {
    if names.is_empty() {
        info(empty);
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![header]);
    for name in names {
        table.add_row(vec![name.as_str()]);
    }

    println!("{table}");
}

/// Print the per-key outcome of an export, sorted by key.
pub fn print_preview_table(preview: &Preview) {
    let rows = preview_rows(preview);
    if rows.is_empty() {
        info("No secrets matched.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Status"]);
    for (key, status) in rows {
        table.add_row(vec![key, status]);
    }

    println!("{table}");
}

fn preview_rows(preview: &Preview) -> Vec<(&str, &'static str)> {
    let mut rows: Vec<(&str, &'static str)> = preview
        .new_keys
        .iter()
        .map(|k| (k.as_str(), "new"))
        .chain(preview.updated_keys.iter().map(|k| (k.as_str(), "updated")))
        .chain(preview.skipped_keys.iter().map(|k| (k.as_str(), "skipped")))
        .collect();
    rows.sort_unstable_by(|a, b| a.0.cmp(b.0));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_rows_are_sorted_with_status() {
        let preview = Preview {
            new_keys: vec!["C".into()],
            updated_keys: vec!["A".into()],
            skipped_keys: vec!["B".into()],
            content: String::new(),
        };
        assert_eq!(
            preview_rows(&preview),
            vec![("A", "updated"), ("B", "skipped"), ("C", "new")]
        );
    }
}
