//! Integration tests for the Veil CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  Every
//! test gets its own temp dir holding the database and export files, and
//! the master key is passed through the environment.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const KEY: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

/// Helper: a `veil` command isolated from the user's config and database.
fn veil(tmp: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("veil").expect("binary should exist");
    cmd.current_dir(tmp.path())
        .env("MASTER_KEY", KEY)
        .env("VEIL_DB_PATH", tmp.path().join("veil.db"))
        .env("VEIL_CONFIG", tmp.path().join("no-config.toml"))
        .env_remove("VEIL_STORE_TYPE")
        .env_remove("VEIL_LOG");
    cmd
}

fn set(tmp: &TempDir, vault: &str, name: &str, value: &str) {
    veil(tmp)
        .args(["set", vault, name, value])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// Help and key generation
// ---------------------------------------------------------------------------

#[test]
fn help_flag_shows_usage() {
    let tmp = TempDir::new().unwrap();
    veil(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted secret vault"))
        .stdout(predicate::str::contains("keygen"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("vaults"));
}

#[test]
fn no_args_shows_help() {
    let tmp = TempDir::new().unwrap();
    veil(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn keygen_prints_a_64_char_hex_key() {
    let tmp = TempDir::new().unwrap();
    veil(&tmp)
        .env_remove("MASTER_KEY")
        .arg("keygen")
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[0-9a-f]{64}\n$").unwrap());
}

// ---------------------------------------------------------------------------
// Key handling
// ---------------------------------------------------------------------------

#[test]
fn missing_master_key_fails_with_hint() {
    let tmp = TempDir::new().unwrap();
    veil(&tmp)
        .env_remove("MASTER_KEY")
        .args(["list", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MASTER_KEY is not set"))
        .stderr(predicate::str::contains("veil keygen"));

    tmp.child("veil.db").assert(predicate::path::missing());
}

#[test]
fn short_master_key_is_rejected() {
    let tmp = TempDir::new().unwrap();
    veil(&tmp)
        .env("MASTER_KEY", "abcd")
        .args(["list", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 32 bytes"));
}

#[test]
fn wrong_master_key_cannot_decrypt() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "TOKEN", "s3cret");

    veil(&tmp)
        .env("MASTER_KEY", "ff".repeat(32))
        .args(["get", "app", "TOKEN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));
}

// ---------------------------------------------------------------------------
// Secret lifecycle
// ---------------------------------------------------------------------------

#[test]
fn set_get_list_delete_lifecycle() {
    let tmp = TempDir::new().unwrap();

    veil(&tmp)
        .args(["set", "app", "DB_URL", "postgres://localhost/db"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added"))
        .stderr(predicate::str::contains("shell history"));

    veil(&tmp)
        .args(["get", "app", "DB_URL"])
        .assert()
        .success()
        .stdout("postgres://localhost/db\n");

    veil(&tmp)
        .args(["list", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DB_URL"));

    veil(&tmp)
        .args(["delete", "app", "DB_URL", "--force"])
        .assert()
        .success();

    veil(&tmp)
        .args(["get", "app", "DB_URL"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn set_reads_value_from_stdin() {
    let tmp = TempDir::new().unwrap();

    veil(&tmp)
        .args(["set", "app", "PIPED"])
        .write_stdin("from a pipe\n")
        .assert()
        .success();

    veil(&tmp)
        .args(["get", "app", "PIPED"])
        .assert()
        .success()
        .stdout("from a pipe\n");
}

#[test]
fn set_twice_reports_update() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "A", "1");

    veil(&tmp)
        .args(["set", "app", "A", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated"));
}

#[test]
fn invalid_secret_name_is_rejected() {
    let tmp = TempDir::new().unwrap();
    veil(&tmp)
        .args(["set", "app", "has space", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid name"));
}

#[test]
fn vaults_and_reset() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "A", "1");
    set(&tmp, "worker", "B", "2");

    veil(&tmp)
        .arg("vaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("app"))
        .stdout(predicate::str::contains("worker"));

    veil(&tmp).args(["reset", "--force"]).assert().success();

    veil(&tmp)
        .arg("vaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("No vaults yet"));
}

#[test]
fn db_path_flag_overrides_environment() {
    let tmp = TempDir::new().unwrap();
    let other = tmp.path().join("nested").join("other.db");

    veil(&tmp)
        .args(["set", "app", "A", "1", "--db-path"])
        .arg(&other)
        .assert()
        .success();

    assert!(other.exists());
    tmp.child("veil.db").assert(predicate::path::missing());
}

#[test]
fn unsupported_store_type_fails() {
    let tmp = TempDir::new().unwrap();
    veil(&tmp)
        .env("VEIL_STORE_TYPE", "postgres")
        .args(["list", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported store type"));
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn export_writes_env_file() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "DB_URL", "postgres://x");
    set(&tmp, "app", "GREETING", "hello world");

    veil(&tmp)
        .args(["export", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 new"));

    tmp.child(".env")
        .assert("DB_URL=postgres://x\nGREETING=\"hello world\"\n");
}

#[test]
fn export_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "A", "1");
    tmp.child(".env").write_str("MINE=1\n").unwrap();

    veil(&tmp)
        .args(["export", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--append"));

    tmp.child(".env").assert("MINE=1\n");
}

#[test]
fn export_append_merges_and_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "A", "1");
    set(&tmp, "app", "MINE", "vault-value");
    tmp.child(".env").write_str("MINE=local\n").unwrap();

    veil(&tmp)
        .args(["export", "app", "--append"])
        .assert()
        .success();

    let after_first = std::fs::read_to_string(tmp.path().join(".env")).unwrap();
    assert!(after_first.starts_with("MINE=local\n\n# Added by veil on "));
    assert!(after_first.ends_with("\nA=1\n"));

    veil(&tmp)
        .args(["export", "app", "--append"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));

    tmp.child(".env").assert(after_first.as_str());
}

#[test]
fn export_dry_run_leaves_file_alone() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "NEW", "1");
    tmp.child(".env").write_str("OLD=1\n").unwrap();

    veil(&tmp)
        .args(["export", "app", "--append", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("NEW=1"));

    tmp.child(".env").assert("OLD=1\n");
}

#[test]
fn export_json_with_filters() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "DB_URL", "u");
    set(&tmp, "app", "DB_PASSWORD", "p");
    set(&tmp, "app", "OTHER", "o");

    veil(&tmp)
        .args([
            "export", "app", "-f", "json", "-o", "out.json", "--include", "DB_*", "--exclude",
            "DB_PASSWORD",
        ])
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path().join("out.json")).unwrap())
            .unwrap();
    assert_eq!(written, serde_json::json!({ "DB_URL": "u" }));
}

#[test]
fn export_unknown_format_fails() {
    let tmp = TempDir::new().unwrap();
    set(&tmp, "app", "A", "1");

    veil(&tmp)
        .args(["export", "app", "-f", "yaml", "-o", "out.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported export format"));
}

// ---------------------------------------------------------------------------
// Completions
// ---------------------------------------------------------------------------

#[test]
fn completions_for_bash() {
    let tmp = TempDir::new().unwrap();
    veil(&tmp)
        .env_remove("MASTER_KEY")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("veil"));
}
