//! Project conventions enforced by the standards checks.
//!
//! Defaults describe the layout this analyzer was written for:
//! - `stacks/docker-compose.yml` is the root orchestrator and the only file
//!   allowed to define its own networks.
//! - Only the `docker-socket-proxy` service may mount the Docker socket.
//!
//! All values can be overridden from the `[standards]` config section. When
//! `orchestrator_dir` is left unset it follows the configured stacks
//! directory.

use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    /// File name of a stack's compose file.
    pub compose_file: String,
    /// Directory name whose compose file is the root orchestrator.
    pub orchestrator_dir: String,
    pub socket_path: String,
    pub socket_proxy_service: String,
    pub host_network_mode: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            compose_file: "docker-compose.yml".into(),
            orchestrator_dir: "stacks".into(),
            socket_path: "/var/run/docker.sock".into(),
            socket_proxy_service: "docker-socket-proxy".into(),
            host_network_mode: "host".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
/// How line numbers are attributed where the tree carries no position.
pub enum LineHints {
    /// Report line 1 for compose findings, the package/service state check
    /// and parse errors.
    #[default]
    Fixed,
    /// Report the entry ordinal (task, service, network) or the parser's
    /// error line instead.
    Ordinal,
}

impl LineHints {
    /// Pick the line for a finding that is pinned to 1 in fixed mode.
    pub fn pick(self, ordinal: usize) -> usize {
        match self {
            LineHints::Fixed => 1,
            LineHints::Ordinal => ordinal.max(1),
        }
    }
}

impl FromStr for LineHints {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(LineHints::Fixed),
            "ordinal" => Ok(LineHints::Ordinal),
            other => Err(format!("unknown line hint mode '{other}' (fixed|ordinal)")),
        }
    }
}
