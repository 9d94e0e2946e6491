//! Compose file checks for project standards and container security.
//!
//! Findings are pinned to line 1 unless ordinal line hints are enabled, in
//! which case they carry the 1-based position of the offending entry inside
//! `networks` or `services`.

use super::{as_mapping, as_sequence, as_str, is_truthy, key_name, CheckContext};
use crate::models::{Category, Finding, Severity};
use serde_yaml::{Mapping, Value};

type Check = fn(&CheckContext<'_>, &Mapping, &mut Vec<Finding>);

/// Checks run on every compose file, in emission order.
pub const COMPOSE_CHECKS: [Check; 3] = [
    check_network_ownership,
    check_socket_mounts,
    check_service_security,
];

/// Evaluate a parsed compose file. Non-map roots yield nothing.
pub fn evaluate(tree: &Value, ctx: &CheckContext<'_>) -> Vec<Finding> {
    let mut out = Vec::new();
    if let Some(root) = as_mapping(tree) {
        for check in COMPOSE_CHECKS {
            check(ctx, root, &mut out);
        }
    }
    out
}

/// `<orchestrator_dir>/<compose_file>` is the only file allowed to own
/// networks.
pub fn is_root_orchestrator(ctx: &CheckContext<'_>) -> bool {
    let conv = ctx.conventions;
    let name_matches = ctx
        .path
        .file_name()
        .is_some_and(|n| n == conv.compose_file.as_str());
    let parent_matches = ctx
        .path
        .parent()
        .and_then(|p| p.file_name())
        .is_some_and(|n| n == conv.orchestrator_dir.as_str());
    name_matches && parent_matches
}

fn check_network_ownership(ctx: &CheckContext<'_>, root: &Mapping, out: &mut Vec<Finding>) {
    if is_root_orchestrator(ctx) {
        return;
    }
    let Some(networks) = root.get("networks").and_then(as_mapping) else {
        return;
    };
    for (idx, (name, def)) in networks.iter().enumerate() {
        let Some(def) = as_mapping(def) else {
            continue;
        };
        if def.get("external").is_some_and(is_truthy) {
            continue;
        }
        out.push(
            ctx.finding(
                ctx.line_hints.pick(idx + 1),
                Severity::Error,
                Category::Standards,
                format!(
                    "Only root orchestrator can define networks (found: {})",
                    key_name(name)
                ),
            )
            .with_remediation(
                "Use 'external: true' or move network definition to root orchestrator",
            ),
        );
    }
}

fn check_socket_mounts(ctx: &CheckContext<'_>, root: &Mapping, out: &mut Vec<Finding>) {
    let conv = ctx.conventions;
    for (idx, name, service) in services(root) {
        if name == conv.socket_proxy_service {
            continue;
        }
        let volumes = service
            .get("volumes")
            .and_then(as_sequence)
            .unwrap_or_default();
        for volume in volumes.iter().filter_map(as_str) {
            if volume.contains(conv.socket_path.as_str()) {
                out.push(
                    ctx.finding(
                        ctx.line_hints.pick(idx + 1),
                        Severity::Error,
                        Category::Standards,
                        format!("Service '{name}' accesses Docker socket directly"),
                    )
                    .with_remediation(format!(
                        "Use {proxy} service instead: DOCKER_HOST=tcp://{proxy}:2375",
                        proxy = conv.socket_proxy_service
                    )),
                );
            }
        }
    }
}

fn check_service_security(ctx: &CheckContext<'_>, root: &Mapping, out: &mut Vec<Finding>) {
    for (idx, name, service) in services(root) {
        let line = ctx.line_hints.pick(idx + 1);
        if service.get("privileged").is_some_and(is_truthy) {
            out.push(
                ctx.finding(
                    line,
                    Severity::Warning,
                    Category::Standards,
                    format!("Service '{name}' uses privileged mode"),
                )
                .with_remediation("Avoid privileged mode; use specific capabilities instead"),
            );
        }
        let mode = service.get("network_mode").and_then(as_str);
        if mode == Some(ctx.conventions.host_network_mode.as_str()) {
            out.push(
                ctx.finding(
                    line,
                    Severity::Warning,
                    Category::Standards,
                    format!("Service '{name}' uses host network mode"),
                )
                .with_remediation("Use bridge networking and port mappings instead"),
            );
        }
    }
}

/// Map-shaped services with their index and display name.
fn services(root: &Mapping) -> impl Iterator<Item = (usize, String, &Mapping)> {
    root.get("services")
        .and_then(as_mapping)
        .into_iter()
        .flat_map(|services| services.iter())
        .enumerate()
        .filter_map(|(idx, (name, def))| as_mapping(def).map(|m| (idx, key_name(name), m)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::policy::{Conventions, LineHints};
    use std::path::Path;

    const BRIDGE_NETWORK: &str = "networks:\n  backend:\n    driver: bridge\n";

    fn run_at(path: &str, src: &str, hints: LineHints) -> Vec<Finding> {
        let conventions = Conventions::default();
        let ctx = CheckContext::new(Path::new(path), &conventions, hints);
        let tree: Value = serde_yaml::from_str(src).unwrap();
        evaluate(&tree, &ctx)
    }

    fn run(path: &str, src: &str) -> Vec<Finding> {
        run_at(path, src, LineHints::Fixed)
    }

    #[test]
    fn test_non_root_stack_may_not_define_networks() {
        let out = run("stacks/app/docker-compose.yml", BRIDGE_NETWORK);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Error);
        assert_eq!(out[0].category, Category::Standards);
        assert_eq!(out[0].line, 1);
        assert!(out[0].message.contains("backend"));
    }

    #[test]
    fn test_root_orchestrator_may_define_networks() {
        assert!(run("stacks/docker-compose.yml", BRIDGE_NETWORK).is_empty());
        assert!(run("/srv/infra/stacks/docker-compose.yml", BRIDGE_NETWORK).is_empty());
    }

    #[test]
    fn test_external_and_null_networks_are_allowed() {
        let src = "networks:\n  proxy:\n    external: true\n  traefik:\n  socket-proxy:\n";
        assert!(run("stacks/app/docker-compose.yml", src).is_empty());
        let src = "networks:\n  proxy:\n    external: false\n";
        assert_eq!(run("stacks/app/docker-compose.yml", src).len(), 1);
    }

    #[test]
    fn test_only_socket_proxy_mounts_docker_socket() {
        let proxy = "services:\n  docker-socket-proxy:\n    volumes:\n      - /var/run/docker.sock:/var/run/docker.sock:ro\n";
        assert!(run("stacks/proxy/docker-compose.yml", proxy).is_empty());

        let direct = "services:\n  traefik:\n    volumes:\n      - /var/run/docker.sock:/var/run/docker.sock\n";
        let out = run("stacks/proxy/docker-compose.yml", direct);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Error);
        assert_eq!(out[0].category, Category::Standards);
        assert_eq!(out[0].message, "Service 'traefik' accesses Docker socket directly");
    }

    #[test]
    fn test_long_form_volumes_are_not_inspected() {
        let src = "services:\n  traefik:\n    volumes:\n      - type: bind\n        source: /var/run/docker.sock\n        target: /var/run/docker.sock\n";
        assert!(run("stacks/app/docker-compose.yml", src).is_empty());
    }

    #[test]
    fn test_privileged_and_host_network() {
        let src = "services:\n  traefik:\n    image: traefik:v3.2\n    privileged: true\n  oauth:\n    image: oauth2-proxy\n    network_mode: host\n  bridge:\n    network_mode: bridge\n    privileged: false\n";
        let out = run("stacks/app/docker-compose.yml", src);
        assert_eq!(out.len(), 2);
        assert!(out[0].message.ends_with("privileged mode"));
        assert!(out[1].message.contains("host network mode"));
        assert!(out
            .iter()
            .all(|f| f.severity == Severity::Warning && f.category == Category::Standards));
    }

    #[test]
    fn test_findings_follow_rule_order_and_ordinals() {
        let src = "services:\n  web:\n    privileged: true\n  traefik:\n    volumes:\n      - /var/run/docker.sock:/var/run/docker.sock\nnetworks:\n  a:\n    driver: bridge\n  b:\n    driver: overlay\n";
        let out = run_at("stacks/app/docker-compose.yml", src, LineHints::Ordinal);
        let got: Vec<(usize, Severity)> = out.iter().map(|f| (f.line, f.severity)).collect();
        assert_eq!(
            got,
            vec![
                (1, Severity::Error),
                (2, Severity::Error),
                (2, Severity::Error),
                (1, Severity::Warning),
            ]
        );
    }

    #[test]
    fn test_custom_conventions() {
        let conventions = Conventions {
            socket_proxy_service: "sockets".into(),
            ..Conventions::default()
        };
        let path = Path::new("stacks/app/docker-compose.yml");
        let ctx = CheckContext::new(path, &conventions, LineHints::Fixed);
        let tree: Value = serde_yaml::from_str(
            "services:\n  sockets:\n    volumes: ['/var/run/docker.sock:/var/run/docker.sock']\n",
        )
        .unwrap();
        assert!(evaluate(&tree, &ctx).is_empty());
    }

    #[test]
    fn test_non_map_root_yields_nothing() {
        assert!(run("stacks/app/docker-compose.yml", "- a\n- b\n").is_empty());
    }
}
