#![allow(dead_code)]

use std::{fs, path::PathBuf};

use supervisorgen::ProgramConfig;
use tempfile::TempDir;

/// Builds a program whose root is `/opt/<name>`.
pub fn program(name: &str, user: &str, log_dir: &str) -> ProgramConfig {
    ProgramConfig::new(name, format!("/opt/{name}"), user, log_dir)
        .expect("valid program config")
}

/// Writes `contents` as `supervisorgen.yaml` inside a fresh temp dir.
pub fn write_manifest(contents: &str) -> (TempDir, PathBuf) {
    let temp = tempfile::tempdir().expect("failed to create tempdir");
    let path = temp.path().join("supervisorgen.yaml");
    fs::write(&path, contents).expect("failed to write manifest");
    (temp, path)
}

pub const CLUSTER_MANIFEST: &str = r#"version: "1"
programs:
  - name: api-server
    root: /opt/api-server
    user: deploy
    log_dir: /var/log/services
    startretries: 3
  - name: worker
    root: /opt/worker
    user: deploy
    log_dir: /var/log/services
    autostart: false
  - name: scheduler
    root: /opt/scheduler
    user: ops
    log_dir: /var/log/ops
    stopsignal: QUIT
groups:
  - name: microservices
    programs: [api-server, worker]
"#;
