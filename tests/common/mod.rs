//! Common test utilities for defactory CLI and resolution tests.
//!
//! - `TestEnv`: isolated project directory plus a private config home
//! - Fixtures: a small require tree used across tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running the defactory binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Non-empty stdout lines parsed as JSON.
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("not NDJSON ({e}): {line}\n{}", self.stdout))
            })
            .collect()
    }
}

/// Isolated environment: a project directory and an empty config home, so
/// no user config or `DEFACTORY_*` variable leaks into a test.
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().unwrap(),
            home_dir: TempDir::new().unwrap(),
        }
    }

    /// Environment pre-populated with [`write_fixture_tree`] under `defs/`.
    pub fn with_fixture() -> Self {
        let env = Self::new();
        write_fixture_tree(&env.project_path("defs"));
        env
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.project_path(relative)).unwrap()
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut command = Command::new(env!("CARGO_BIN_EXE_defactory"));
        command
            .current_dir(self.project_root.path())
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("APPDATA", self.home_dir.path())
            .env_remove("RUST_LOG");
        for name in [
            "DEFACTORY_SOURCE_PATH",
            "DEFACTORY_SOURCE_EXTENSION",
            "DEFACTORY_OUTPUT_FORMAT",
            "DEFACTORY_LOG_LEVEL",
            "DEFACTORY_LOG_FILE",
        ] {
            command.env_remove(name);
        }
        for (key, value) in env_vars {
            command.env(key, value);
        }

        let output = command.output().expect("failed to run defactory");
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// `base` <- `solar/mid` <- `leaf`, plus `other` which requires `base` too.
pub fn write_fixture_tree(root: &Path) {
    let files = [
        (
            "base.yaml",
            "name: Base\nlabel: Base quantity\nsymbol: B\ncolor: lightblue\nunit: W\nsections:\n  output:\n    structure:\n      - section: a\n        value: 1\n",
        ),
        (
            "solar/mid.yaml",
            "name: Mid\nrequire: base\nsections:\n  output:\n    structure:\n      - section: a\n        value: 2\n      - section: b\n        value: 9\n",
        ),
        ("leaf.yaml", "name: Leaf\nrequire: solar/mid\ndescription: The leaf\n"),
        ("other.yaml", "name: Other\nrequire: base\nunit: kW\n"),
    ];
    for (relative, contents) in files {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }
}
