use assert_cmd::Command;

fn libris() -> Command {
    let mut cmd = Command::cargo_bin("libris").unwrap();
    // Point at an empty config directory so only defaults apply
    cmd.env("LIBRIS_CONFIG_DIR", std::env::temp_dir().join("libris-cli-no-config"))
        .env("LIBRIS_ENV", "local")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = libris().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for sub in ["serve", "migrate", "config", "routes"] {
        assert!(stdout.contains(sub), "help is missing {}", sub);
    }
}

#[test]
fn config_prints_effective_settings() {
    let output = libris()
        .arg("config")
        .env("LIBRIS_SERVER__PORT", "9123")
        .output()
        .unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["server"]["port"], 9123);
    assert_eq!(settings["environment"], "local");
}

#[test]
fn routes_lists_book_endpoints() {
    let output = libris().arg("routes").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("/books/all"));
    assert!(stdout.contains("/books/lend/{id}"));
    assert!(stdout.contains("/healthz"));
}

#[test]
fn migrate_runs_against_in_memory_sqlite() {
    let output = libris().arg("migrate").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)
        .unwrap()
        .contains("applied 1 migration(s)"));
}

#[test]
fn unknown_environment_fails() {
    let output = libris().arg("config").env("LIBRIS_ENV", "qa").output().unwrap();
    assert!(!output.status.success());
}
