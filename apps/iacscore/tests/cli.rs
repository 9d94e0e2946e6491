use std::path::Path;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_iacscore"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("run iacscore")
}

fn write(root: &Path, rel: &str, content: &str) {
    let p = root.join(rel);
    std::fs::create_dir_all(p.parent().expect("parent")).expect("create dirs");
    std::fs::write(p, content).expect("write file");
}

fn clean_project(root: &Path) {
    write(
        root,
        "playbooks/site.yml",
        "- name: Deploy Traefik\n  hosts: traefik\n  tasks:\n    - name: Ensure Traefik compose is present\n      community.docker.docker_compose:\n        project_src: /opt/stacks/traefik\n        state: present\n",
    );
    write(
        root,
        "stacks/app/docker-compose.yml",
        "services:\n  traefik:\n    image: traefik:v3.2\n    networks:\n      - traefik\nnetworks:\n  traefik:\n    external: true\n",
    );
}

#[test]
fn clean_project_passes_with_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    clean_project(dir.path());
    let root = dir.path().to_str().expect("utf-8 path");

    let out = run(&["analyze", "--root", root, "--output", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json stdout");
    assert_eq!(json["summary"]["total_issues"], 0);
    assert_eq!(json["files_analyzed"], 2);
    assert_eq!(json["scores"]["overall"], 100.0);
}

#[test]
fn low_score_exits_1() {
    let dir = tempfile::tempdir().expect("tempdir");
    let networks: String = (0..10)
        .map(|i| format!("  net{i}:\n    driver: bridge\n"))
        .collect();
    write(
        dir.path(),
        "stacks/app/docker-compose.yml",
        &format!("services:\n  web:\n    image: nginx\nnetworks:\n{networks}"),
    );
    let root = dir.path().to_str().expect("utf-8 path");

    let out = run(&["analyze", "--root", root, "--output", "text"]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Infrastructure-as-Code Quality Report"));
    assert!(stdout.contains("Standards:       0.0/100"));
    assert!(stdout.contains("Overall:         75.0/100"));
}

#[test]
fn missing_root_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent");
    let out = run(&["analyze", "--root", missing.to_str().expect("utf-8 path")]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("project root not found"));
}

#[test]
fn report_flag_writes_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    clean_project(dir.path());
    let root = dir.path().to_str().expect("utf-8 path");
    let report = dir.path().join("tests/artifacts/quality_report.json");

    let out = run(&[
        "analyze",
        "--root",
        root,
        "--output",
        "json",
        "--report",
        report.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    let data = std::fs::read_to_string(&report).expect("report file");
    let json: serde_json::Value = serde_json::from_str(&data).expect("json report");
    assert!(json["scores"].is_object());
}

#[test]
fn version_prints_package_version() {
    let out = run(&["version"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        env!("CARGO_PKG_VERSION")
    );
}
