//! Integration tests for setup-odin

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    const INPUT_VARS: &[&str] = &[
        "INPUT_REPOSITORY",
        "INPUT_ODIN-VERSION",
        "INPUT_LLVM-VERSION",
        "INPUT_BUILD-TYPE",
        "INPUT_CACHE",
        "SETUP_ODIN_CONFIG",
        "GITHUB_OUTPUT",
        "GITHUB_STATE",
        "GITHUB_PATH",
        "STATE_cache-hit",
        "STATE_cache-key",
        "STATE_cache-enabled",
    ];

    fn setup_odin() -> Command {
        let mut cmd = cargo_bin_cmd!("setup-odin");
        for var in INPUT_VARS {
            cmd.env_remove(var);
        }
        cmd.arg("--no-local");
        cmd
    }

    fn key_for(args: &[&str]) -> String {
        let output = setup_odin().arg("key").args(args).output().unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    #[test]
    fn help_displays() {
        setup_odin()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Provision the Odin compiler"));
    }

    #[test]
    fn version_displays() {
        setup_odin()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("setup-odin"));
    }

    #[test]
    fn key_is_stable_and_version_sensitive() {
        let a = key_for(&["--os", "linux", "--odin-version", "v1.2.0"]);
        let b = key_for(&["--os", "linux", "--odin-version", "v1.2.0"]);
        let c = key_for(&["--os", "linux", "--odin-version", "v1.3.0"]);

        assert!(a.starts_with("setup-odin-linux-"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn key_reads_action_inputs() {
        let from_flag = key_for(&["--os", "macos", "--build-type", "debug"]);
        let output = setup_odin()
            .env("INPUT_BUILD-TYPE", "debug")
            .args(["key", "--os", "macos"])
            .output()
            .unwrap();
        let from_env = String::from_utf8(output.stdout).unwrap().trim().to_string();
        assert_eq!(from_flag, from_env);
    }

    #[test]
    fn malformed_config_fails() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("setup-odin.toml");
        std::fs::write(&config, "[inputs\n").unwrap();

        setup_odin()
            .arg("--config")
            .arg(&config)
            .arg("key")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn malformed_cache_input_fails_run() {
        let dir = TempDir::new().unwrap();
        setup_odin()
            .args(["run", "--cache", "sometimes", "--checkout"])
            .arg(dir.path().join("odin"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("cache"));
    }

    #[test]
    fn post_without_state_does_nothing() {
        let dir = TempDir::new().unwrap();
        setup_odin()
            .arg("post")
            .arg("--cache-dir")
            .arg(dir.path().join("cache"))
            .assert()
            .success();
        assert!(!dir.path().join("cache").exists());
    }
}

/// Full runs against a local repository. Needs `git` and `sh`.
#[cfg(target_os = "linux")]
mod provisioning_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    const BRANCH: &str = "ci-test";

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Option<Self> {
            let git = StdCommand::new("git").arg("--version").output().ok()?;
            if !git.status.success() {
                return None;
            }

            let ws = Self {
                dir: TempDir::new().unwrap(),
            };
            ws.init_upstream();
            ws.install_fake_llvm();
            Some(ws)
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn git(&self, cwd: &Path, args: &[&str]) {
            let status = StdCommand::new("git")
                .args(["-c", "user.name=ci", "-c", "user.email=ci@example.com"])
                .args(args)
                .current_dir(cwd)
                .status()
                .unwrap();
            assert!(status.success(), "git {:?} failed", args);
        }

        fn init_upstream(&self) {
            let upstream = self.path("upstream");
            fs::create_dir_all(&upstream).unwrap();
            let script = upstream.join("build_odin.sh");
            fs::write(
                &script,
                "#!/bin/sh\necho \"$1\" >> \"$BUILD_LOG\"\necho binary > odin\nchmod +x odin\n",
            )
            .unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

            self.git(&upstream, &["init", "-q"]);
            self.git(&upstream, &["checkout", "-q", "-b", BRANCH]);
            self.git(&upstream, &["add", "."]);
            self.git(&upstream, &["commit", "-q", "-m", "initial"]);
        }

        fn push_upstream_change(&self) {
            let upstream = self.path("upstream");
            fs::write(upstream.join("CHANGELOG"), "new\n").unwrap();
            self.git(&upstream, &["add", "."]);
            self.git(&upstream, &["commit", "-q", "-m", "change"]);
        }

        fn install_fake_llvm(&self) {
            let bin = self.path("bin");
            fs::create_dir_all(&bin).unwrap();
            let probe = bin.join("llvm-config-17");
            fs::write(&probe, "#!/bin/sh\n").unwrap();
            fs::set_permissions(&probe, fs::Permissions::from_mode(0o755)).unwrap();
        }

        fn command(&self, subcommand: &str) -> Command {
            let path = format!(
                "{}:{}",
                self.path("bin").display(),
                std::env::var("PATH").unwrap_or_default()
            );
            let mut cmd = cargo_bin_cmd!("setup-odin");
            for var in ["INPUT_CACHE", "INPUT_BUILD-TYPE", "INPUT_REPOSITORY", "INPUT_ODIN-VERSION"] {
                cmd.env_remove(var);
            }
            cmd.env("PATH", path)
                .env("BUILD_LOG", self.path("build.log"))
                .env("GITHUB_OUTPUT", self.path("output"))
                .env("GITHUB_STATE", self.path("state"))
                .env("GITHUB_PATH", self.path("path"))
                .env("SETUP_ODIN_CHECKOUT", self.path("odin"))
                .env("SETUP_ODIN_CACHE_DIR", self.path("cache"))
                .args(["--no-local", subcommand]);
            cmd
        }

        fn run(&self) {
            let repository = format!("file://{}", self.path("upstream").display());
            self.command("run")
                .args(["--repository", &repository, "--odin-version", BRANCH])
                .args(["--llvm-version", "17", "--build-type", "release"])
                .assert()
                .success();
        }

        /// Run the post step with the state the last run saved
        fn post(&self) {
            let state = fs::read_to_string(self.path("state")).unwrap();
            let mut cmd = self.command("post");
            for line in state.lines() {
                if let Some((name, value)) = line.split_once('=') {
                    cmd.env(format!("STATE_{}", name), value);
                }
            }
            cmd.assert().success();
            fs::remove_file(self.path("state")).unwrap();
        }

        fn builds(&self) -> usize {
            fs::read_to_string(self.path("build.log"))
                .map(|log| log.lines().count())
                .unwrap_or(0)
        }

        fn last_cache_hit(&self) -> String {
            fs::read_to_string(self.path("output"))
                .unwrap()
                .lines()
                .filter_map(|l| l.strip_prefix("cache-hit="))
                .last()
                .unwrap()
                .to_string()
        }
    }

    #[test]
    fn second_run_reuses_cache_until_upstream_moves() {
        let Some(ws) = Workspace::new() else {
            eprintln!("git not available, skipping");
            return;
        };

        // First run: miss, clone, build
        ws.run();
        assert_eq!(ws.builds(), 1);
        assert_eq!(ws.last_cache_hit(), "false");
        assert!(ws.path("odin").join("odin").is_file());
        ws.post();

        // Second run: restored and current, no build
        fs::remove_dir_all(ws.path("odin")).unwrap();
        ws.run();
        assert_eq!(ws.builds(), 1);
        assert_eq!(ws.last_cache_hit(), "true");
        assert!(ws.path("odin").join("odin").is_file());
        ws.post();

        // Upstream moved: stale hit, rebuilt in place
        ws.push_upstream_change();
        ws.run();
        assert_eq!(ws.builds(), 2);
        assert_eq!(ws.last_cache_hit(), "false");
        assert!(ws.path("odin").join("CHANGELOG").is_file());

        let added = fs::read_to_string(ws.path("path")).unwrap();
        assert!(added.lines().any(|l| Path::new(l) == ws.path("odin")));
    }

    #[test]
    fn missing_version_reports_exit_code() {
        let Some(ws) = Workspace::new() else {
            eprintln!("git not available, skipping");
            return;
        };
        let repository = format!("file://{}", ws.path("upstream").display());

        let output = ws
            .command("run")
            .args(["--repository", &repository, "--odin-version", "no-such-branch"])
            .args(["--llvm-version", "17"])
            .output()
            .unwrap();

        assert!(!output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("::error::"));
        assert!(stdout.contains("may not exist"));
        assert_eq!(ws.builds(), 0);
    }
}
