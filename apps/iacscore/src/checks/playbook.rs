//! Ansible playbook checks.
//!
//! A playbook is a sequence of plays; each play may carry a `tasks`
//! sequence. Line numbers are play or task ordinals (1-based), not source
//! lines.

use super::{as_mapping, as_sequence, CheckContext};
use crate::models::{Category, Finding, Severity};
use serde_yaml::{Mapping, Value};

/// A check over one play or task map and its 1-based ordinal.
type Check = fn(&CheckContext<'_>, &Mapping, usize, &mut Vec<Finding>);

/// Checks run on every play, in emission order.
pub const PLAY_CHECKS: [Check; 3] = [check_play_name, check_tasks, check_module_state];

/// Checks run on every task of a play, in emission order.
pub const TASK_CHECKS: [Check; 3] = [
    check_task_name,
    check_unguarded_command,
    check_shell_package_ops,
];

const COMMAND_MODULES: [&str; 3] = ["shell", "command", "raw"];
const SHELL_MODULES: [&str; 2] = ["shell", "command"];
const PACKAGE_COMMANDS: [&str; 6] = ["apt", "yum", "dnf", "pip", "systemctl", "service"];
const STATEFUL_MODULES: [&str; 6] = ["apt", "yum", "dnf", "package", "service", "systemd"];

/// Evaluate a parsed playbook.
pub fn evaluate(tree: &Value, ctx: &CheckContext<'_>) -> Vec<Finding> {
    let mut out = Vec::new();
    let Some(plays) = as_sequence(tree) else {
        out.push(ctx.finding(
            1,
            Severity::Error,
            Category::Maintainability,
            "Playbook must be a list of plays",
        ));
        return out;
    };
    for (idx, play) in plays.iter().enumerate() {
        let Some(play) = as_mapping(play) else {
            continue;
        };
        for check in PLAY_CHECKS {
            check(ctx, play, idx + 1, &mut out);
        }
    }
    out
}

fn check_play_name(ctx: &CheckContext<'_>, play: &Mapping, ordinal: usize, out: &mut Vec<Finding>) {
    if !play.contains_key("name") {
        out.push(
            ctx.finding(
                ordinal,
                Severity::Warning,
                Category::Maintainability,
                "Play should have a descriptive name",
            )
            .with_remediation("Add 'name: <description>' to the play"),
        );
    }
}

fn check_tasks(ctx: &CheckContext<'_>, play: &Mapping, _ordinal: usize, out: &mut Vec<Finding>) {
    for (idx, task) in tasks(play) {
        for check in TASK_CHECKS {
            check(ctx, task, idx + 1, out);
        }
    }
}

/// Package and service modules given as a map must state the target state.
/// Pinned to line 1 unless ordinal line hints are enabled.
fn check_module_state(
    ctx: &CheckContext<'_>,
    play: &Mapping,
    _ordinal: usize,
    out: &mut Vec<Finding>,
) {
    for (idx, task) in tasks(play) {
        for module in STATEFUL_MODULES {
            let Some(args) = task.get(module).and_then(as_mapping) else {
                continue;
            };
            if !args.contains_key("state") {
                out.push(
                    ctx.finding(
                        ctx.line_hints.pick(idx + 1),
                        Severity::Info,
                        Category::Idempotence,
                        format!("{module} task should explicitly set 'state' parameter"),
                    )
                    .with_remediation("Add 'state: present' or 'state: started' etc."),
                );
            }
        }
    }
}

fn check_task_name(ctx: &CheckContext<'_>, task: &Mapping, ordinal: usize, out: &mut Vec<Finding>) {
    if !task.contains_key("name") {
        out.push(
            ctx.finding(
                ordinal,
                Severity::Warning,
                Category::Maintainability,
                "Task should have a descriptive name",
            )
            .with_remediation("Add 'name: <description>' to the task"),
        );
    }
}

fn check_unguarded_command(
    ctx: &CheckContext<'_>,
    task: &Mapping,
    ordinal: usize,
    out: &mut Vec<Finding>,
) {
    if has_any(task, &COMMAND_MODULES) && !task.contains_key("changed_when") {
        out.push(
            ctx.finding(
                ordinal,
                Severity::Warning,
                Category::Idempotence,
                "shell/command/raw should define 'changed_when' for idempotence",
            )
            .with_remediation("Add 'changed_when: <condition>' to indicate when task makes changes"),
        );
    }
}

/// Shell invocations of package managers or service control.
///
/// Matches against the whole rendered task, keys and values alike.
fn check_shell_package_ops(
    ctx: &CheckContext<'_>,
    task: &Mapping,
    ordinal: usize,
    out: &mut Vec<Finding>,
) {
    if !has_any(task, &SHELL_MODULES) {
        return;
    }
    let rendered = serde_yaml::to_string(task).unwrap_or_default();
    if PACKAGE_COMMANDS.iter().any(|kw| rendered.contains(kw)) {
        out.push(
            ctx.finding(
                ordinal,
                Severity::Info,
                Category::Atomicity,
                "Consider using dedicated Ansible module instead of shell/command",
            )
            .with_remediation("Use apt, package, pip, systemd, or service modules"),
        );
    }
}

fn has_any(task: &Mapping, keys: &[&str]) -> bool {
    keys.iter().any(|k| task.contains_key(*k))
}

/// Map-shaped tasks of a play with their index; empty unless `tasks` is a
/// sequence.
fn tasks(play: &Mapping) -> impl Iterator<Item = (usize, &Mapping)> {
    play.get("tasks")
        .and_then(as_sequence)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(idx, task)| as_mapping(task).map(|m| (idx, m)))
}
