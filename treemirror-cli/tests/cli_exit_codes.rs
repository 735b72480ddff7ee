use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    home: TempDir,
    root: TempDir,
}

impl Env {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("readme.md"), "# Readme\n").unwrap();
        Self { home, root }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("treemirror").unwrap();
        cmd.env("HOME", self.home.path())
            .env("USERPROFILE", self.home.path())
            .env_remove("RUST_LOG");
        cmd
    }

    fn root(&self) -> String {
        self.root.path().display().to_string()
    }
}

#[test]
fn unparseable_master_page_is_fatal() {
    let env = Env::new();
    env.cmd()
        .args(["key", "DOCS", &env.root(), "home-page", "https://wiki.example.com", "false"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("MASTER_PAGE_ID"));
}

#[test]
fn non_boolean_only_docs_is_fatal() {
    let env = Env::new();
    env.cmd()
        .args(["key", "DOCS", &env.root(), "0", "https://wiki.example.com", "maybe"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ONLY_DOCS"));
}

#[test]
fn root_that_is_a_file_is_fatal() {
    let env = Env::new();
    let file = env.root.path().join("readme.md").display().to_string();
    env.cmd()
        .args(["key", "DOCS", &file, "0", "https://wiki.example.com", "false"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn missing_root_is_fatal() {
    let env = Env::new();
    let missing = env.root.path().join("nope").display().to_string();
    env.cmd()
        .args(["key", "DOCS", &missing, "0", "https://wiki.example.com", "false"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot resolve root path"));
}

#[test]
fn empty_api_key_is_fatal() {
    let env = Env::new();
    env.cmd()
        .args(["", "DOCS", &env.root(), "0", "https://wiki.example.com", "false"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API key is empty"));
}

#[test]
fn missing_base_url_everywhere_is_fatal() {
    let env = Env::new();
    env.cmd()
        .args(["key", "DOCS", &env.root(), "0", "", "false"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("base URL"));
}

#[test]
fn explicit_config_must_exist() {
    let env = Env::new();
    let missing = env.home.path().join("absent.yaml").display().to_string();
    env.cmd()
        .args(["key", "DOCS", &env.root(), "0", "https://wiki.example.com", "false"])
        .args(["--config", &missing])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.yaml"));
}

#[test]
fn malformed_home_config_is_fatal() {
    let env = Env::new();
    let dir = env.home.path().join(".treemirror");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.yaml"), "http: [not, a, map\n").unwrap();
    env.cmd()
        .args(["key", "DOCS", &env.root(), "0", "https://wiki.example.com", "false"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config.yaml"));
}

#[test]
fn unreachable_server_is_recoverable() {
    let env = Env::new();
    let config = env.home.path().join("fast.yaml");
    std::fs::write(
        &config,
        "base_url: http://127.0.0.1:9\nhttp:\n  timeout_secs: 2\n  retries: 0\n  backoff_ms: 0\n",
    )
    .unwrap();
    env.cmd()
        .args(["key", "DOCS", &env.root(), "0", "", "true", "--dry-run"])
        .args(["--config", &config.display().to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run]"))
        .stdout(predicate::str::contains("0 created"))
        .stdout(predicate::str::contains("2 skipped"));
}
