//! Configuration discovery and effective settings resolution.
//!
//! iacscore reads `iacscore.toml|yaml|yml` from the project root and merges
//! it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `text`
//! - `report`: none (render to stdout)
//! - `line_hints`: `fixed`
//! - `scan.playbooks`: `playbooks`, `scan.stacks`: `stacks`
//! - `standards.*`: see [`Conventions`]; `standards.orchestrator_dir`
//!   defaults to the last component of `scan.stacks`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::analyze::AnalyzeOptions;
use crate::error::{Error, Result};
use crate::models::policy::{Conventions, LineHints};
use crate::output::OutputMode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 3] = ["iacscore.toml", "iacscore.yaml", "iacscore.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Scan roots under `[scan]`, relative to the project root.
pub struct ScanCfg {
    pub playbooks: Option<String>,
    pub stacks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Convention overrides under `[standards]`; unset keys keep their defaults.
pub struct StandardsCfg {
    pub compose_file: Option<String>,
    pub orchestrator_dir: Option<String>,
    pub socket_path: Option<String>,
    pub socket_proxy_service: Option<String>,
    pub host_network_mode: Option<String>,
}

impl StandardsCfg {
    /// Merge onto the defaults. Without an explicit `orchestrator_dir` the
    /// root orchestrator lives directly in `stacks_dir`.
    fn into_conventions(self, stacks_dir: &Path) -> Conventions {
        let d = Conventions::default();
        let stacks_name = stacks_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Conventions {
            compose_file: self.compose_file.unwrap_or(d.compose_file),
            orchestrator_dir: self
                .orchestrator_dir
                .or(stacks_name)
                .unwrap_or(d.orchestrator_dir),
            socket_path: self.socket_path.unwrap_or(d.socket_path),
            socket_proxy_service: self.socket_proxy_service.unwrap_or(d.socket_proxy_service),
            host_network_mode: self.host_network_mode.unwrap_or(d.host_network_mode),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `iacscore.toml|yaml`.
pub struct ProjectConfig {
    pub output: Option<OutputMode>,
    /// Report file, relative to the project root.
    pub report: Option<String>,
    pub line_hints: Option<LineHints>,
    #[serde(default)]
    pub scan: Option<ScanCfg>,
    #[serde(default)]
    pub standards: Option<StandardsCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub output: OutputMode,
    pub report: Option<PathBuf>,
    pub options: AnalyzeOptions,
    /// Config file that was applied, if any.
    pub config_file: Option<PathBuf>,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when an `iacscore.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load the first config file present under `root`.
///
/// Absent files are not an error; a file that exists but does not parse is.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, ProjectConfig)>> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.is_file() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let cfg: ProjectConfig = if name.ends_with(".toml") {
            toml::from_str(&s).map_err(|source| Error::ConfigToml {
                path: path.clone(),
                source,
            })?
        } else {
            serde_yaml::from_str(&s).map_err(|source| Error::ConfigYaml {
                path: path.clone(),
                source,
            })?
        };
        return Ok(Some((path, cfg)));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// Without `cli_root` the root is detected from the current directory.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_output: Option<OutputMode>,
    cli_report: Option<&str>,
    cli_line_hints: Option<LineHints>,
) -> Result<Effective> {
    let root = match cli_root {
        Some(r) => PathBuf::from(r),
        None => detect_repo_root(&std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))),
    };
    let (config_file, cfg) = match load_config(&root)? {
        Some((path, cfg)) => (Some(path), cfg),
        None => (None, ProjectConfig::default()),
    };

    let output = cli_output.or(cfg.output).unwrap_or_default();
    let report = cli_report
        .map(PathBuf::from)
        .or_else(|| cfg.report.as_ref().map(|r| root.join(r)));
    let line_hints = cli_line_hints.or(cfg.line_hints).unwrap_or_default();

    let defaults = AnalyzeOptions::default();
    let scan = cfg.scan.unwrap_or_default();
    let stacks_dir = scan.stacks.map(PathBuf::from).unwrap_or(defaults.stacks_dir);
    let conventions = cfg.standards.unwrap_or_default().into_conventions(&stacks_dir);
    let options = AnalyzeOptions {
        playbooks_dir: scan
            .playbooks
            .map(PathBuf::from)
            .unwrap_or(defaults.playbooks_dir),
        stacks_dir,
        conventions,
        line_hints,
    };

    Ok(Effective {
        root,
        output,
        report,
        options,
        config_file,
    })
}
