use assert_cmd::Command;
use predicates::prelude::*;

fn suiteauth() -> Command {
    Command::cargo_bin("suiteauth").unwrap()
}

#[test]
fn help_lists_subcommands() {
    suiteauth()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("connect"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("disconnect"));
}

#[test]
fn version_flag_works() {
    suiteauth()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("suiteauth"));
}

#[test]
fn connect_without_credentials_fails() {
    suiteauth()
        .args(["connect", "ACME_1"])
        .env("NETSUITE_CLIENT_ID", "")
        .env("NETSUITE_CLIENT_SECRET", "")
        .env("NETSUITE_REDIRECT_URI", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NETSUITE_CLIENT_ID"))
        .stderr(predicate::str::contains("missing_config"));
}

#[test]
fn status_for_unconnected_account_suggests_connect() {
    let home = tempfile::tempdir().unwrap();
    suiteauth()
        .args(["status", "ACME_NEVER_SEEN"])
        .env("SUITEAUTH_HOME", home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("reauthorization_required"))
        .stderr(predicate::str::contains("suiteauth connect acme-never-seen"));
}

#[test]
fn refresh_without_credentials_fails() {
    suiteauth()
        .args(["refresh", "ACME_1"])
        .env("NETSUITE_CLIENT_ID", "")
        .env("NETSUITE_CLIENT_SECRET", "")
        .env("NETSUITE_REDIRECT_URI", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing_config"));
}

#[test]
fn unknown_subcommand_fails() {
    suiteauth().arg("frobnicate").assert().failure();
}
